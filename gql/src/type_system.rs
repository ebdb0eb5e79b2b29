//! The assembled type system.
//!
//! [`TypeSystem::evaluate`] consumes definition expressions in document
//! order. Definitions insert into per-kind registries keyed by name,
//! extensions append onto the entity already registered under that name.
//! An extension ahead of its definition fails, even if the definition
//! appears later in the document.

use std::collections::BTreeMap;

use tracing::debug;

use crate::ast::{
    Definition, DirectiveDefinition, DirectiveRef, EnumDefinition, EnumExtension,
    EnumValueDefinition, FieldDefinition, InputObjectDefinition, InputObjectExtension,
    InputValueDefinition, InterfaceDefinition, InterfaceExtension, ObjectDefinition,
    ObjectExtension, OperationKind, RootOperation, ScalarDefinition, ScalarExtension,
    SchemaDefinition, SchemaExtension, TypeRef, UnionDefinition, UnionExtension,
};
use crate::directive::DirectiveLocation;
use crate::error::SdlError;

/// Root operation bindings and schema level directives.
///
/// The schema is not named, so repeated schema definitions merge instead
/// of clashing: directives accumulate and an operation bound twice keeps
/// the later binding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    pub directives: Vec<DirectiveRef>,
    pub query: Option<TypeRef>,
    pub mutation: Option<TypeRef>,
    pub subscription: Option<TypeRef>,
}

impl Schema {
    fn assign(&mut self, operation: RootOperation) {
        match operation.kind {
            OperationKind::Query => self.query = Some(operation.ty),
            OperationKind::Mutation => self.mutation = Some(operation.ty),
            OperationKind::Subscription => self.subscription = Some(operation.ty),
        }
    }

    fn merge(&mut self, directives: Vec<DirectiveRef>, operations: Vec<RootOperation>) {
        self.directives.extend(directives);
        for operation in operations {
            self.assign(operation);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
}

impl From<ScalarDefinition> for Scalar {
    fn from(def: ScalarDefinition) -> Self {
        Scalar {
            description: def.description,
            name: def.name,
            directives: def.directives,
        }
    }
}

impl Scalar {
    fn merge(&mut self, extension: ScalarExtension) {
        self.directives.extend(extension.directives);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub description: String,
    pub name: String,
    pub implements: Vec<TypeRef>,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<FieldDefinition>,
}

impl From<ObjectDefinition> for Object {
    fn from(def: ObjectDefinition) -> Self {
        Object {
            description: def.description,
            name: def.name,
            implements: def.implements,
            directives: def.directives,
            fields: def.fields,
        }
    }
}

impl Object {
    fn merge(&mut self, extension: ObjectExtension) {
        self.implements.extend(extension.implements);
        self.directives.extend(extension.directives);
        self.fields.extend(extension.fields);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interface {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<FieldDefinition>,
}

impl From<InterfaceDefinition> for Interface {
    fn from(def: InterfaceDefinition) -> Self {
        Interface {
            description: def.description,
            name: def.name,
            directives: def.directives,
            fields: def.fields,
        }
    }
}

impl Interface {
    fn merge(&mut self, extension: InterfaceExtension) {
        self.directives.extend(extension.directives);
        self.fields.extend(extension.fields);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Union {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub members: Vec<TypeRef>,
}

impl From<UnionDefinition> for Union {
    fn from(def: UnionDefinition) -> Self {
        Union {
            description: def.description,
            name: def.name,
            directives: def.directives,
            members: def.members,
        }
    }
}

impl Union {
    fn merge(&mut self, extension: UnionExtension) {
        self.directives.extend(extension.directives);
        self.members.extend(extension.members);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enum {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub values: Vec<EnumValueDefinition>,
}

impl From<EnumDefinition> for Enum {
    fn from(def: EnumDefinition) -> Self {
        Enum {
            description: def.description,
            name: def.name,
            directives: def.directives,
            values: def.values,
        }
    }
}

impl Enum {
    fn merge(&mut self, extension: EnumExtension) {
        self.directives.extend(extension.directives);
        self.values.extend(extension.values);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObject {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<InputValueDefinition>,
}

impl From<InputObjectDefinition> for InputObject {
    fn from(def: InputObjectDefinition) -> Self {
        InputObject {
            description: def.description,
            name: def.name,
            directives: def.directives,
            fields: def.fields,
        }
    }
}

impl InputObject {
    fn merge(&mut self, extension: InputObjectExtension) {
        self.directives.extend(extension.directives);
        self.fields.extend(extension.fields);
    }
}

/// A directive definition. There is no extension form for directives.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub description: String,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub locations: Vec<DirectiveLocation>,
}

impl From<DirectiveDefinition> for Directive {
    fn from(def: DirectiveDefinition) -> Self {
        Directive {
            description: def.description,
            name: def.name,
            arguments: def.arguments,
            locations: def.locations,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeSystem {
    pub schema: Schema,
    pub scalars: BTreeMap<String, Scalar>,
    pub objects: BTreeMap<String, Object>,
    pub interfaces: BTreeMap<String, Interface>,
    pub unions: BTreeMap<String, Union>,
    pub enums: BTreeMap<String, Enum>,
    pub input_objects: BTreeMap<String, InputObject>,
    pub directives: BTreeMap<String, Directive>,
}

impl TypeSystem {
    /// Folds parsed definitions into a type system, in document order.
    pub fn evaluate(definitions: Vec<Definition>) -> Result<Self, SdlError> {
        let mut system = TypeSystem::default();
        for definition in definitions {
            system.apply(definition)?;
        }
        Ok(system)
    }

    fn apply(&mut self, definition: Definition) -> Result<(), SdlError> {
        match definition {
            Definition::Schema(def) => {
                debug!("defining schema");
                self.schema.merge(def.directives, def.operations);
                Ok(())
            }
            Definition::Scalar(def) => {
                define(&mut self.scalars, "scalar", def.name.clone(), def.into())
            }
            Definition::Object(def) => {
                define(&mut self.objects, "object", def.name.clone(), def.into())
            }
            Definition::Interface(def) => {
                define(&mut self.interfaces, "interface", def.name.clone(), def.into())
            }
            Definition::Union(def) => {
                define(&mut self.unions, "union", def.name.clone(), def.into())
            }
            Definition::Enum(def) => define(&mut self.enums, "enum", def.name.clone(), def.into()),
            Definition::InputObject(def) => define(
                &mut self.input_objects,
                "input object",
                def.name.clone(),
                def.into(),
            ),
            Definition::Directive(def) => {
                define(&mut self.directives, "directive", def.name.clone(), def.into())
            }
            Definition::ExtendSchema(SchemaExtension {
                directives,
                operations,
            }) => {
                debug!("extending schema");
                self.schema.merge(directives, operations);
                Ok(())
            }
            Definition::ExtendScalar(ext) => {
                registered(&mut self.scalars, "scalar", &ext.name)?.merge(ext);
                Ok(())
            }
            Definition::ExtendObject(ext) => {
                registered(&mut self.objects, "object", &ext.name)?.merge(ext);
                Ok(())
            }
            Definition::ExtendInterface(ext) => {
                registered(&mut self.interfaces, "interface", &ext.name)?.merge(ext);
                Ok(())
            }
            Definition::ExtendUnion(ext) => {
                registered(&mut self.unions, "union", &ext.name)?.merge(ext);
                Ok(())
            }
            Definition::ExtendEnum(ext) => {
                registered(&mut self.enums, "enum", &ext.name)?.merge(ext);
                Ok(())
            }
            Definition::ExtendInputObject(ext) => {
                registered(&mut self.input_objects, "input object", &ext.name)?.merge(ext);
                Ok(())
            }
        }
    }
}

fn define<T>(
    registry: &mut BTreeMap<String, T>,
    kind: &'static str,
    name: String,
    entity: T,
) -> Result<(), SdlError> {
    if registry.contains_key(&name) {
        return Err(SdlError::DuplicateDefinition { kind, name });
    }
    debug!("defining {kind} {name}");
    registry.insert(name, entity);
    Ok(())
}

fn registered<'a, T>(
    registry: &'a mut BTreeMap<String, T>,
    kind: &'static str,
    name: &str,
) -> Result<&'a mut T, SdlError> {
    debug!("extending {kind} {name}");
    registry.get_mut(name).ok_or_else(|| SdlError::ExtendTargetNotFound {
        kind,
        name: name.to_string(),
    })
}
