//! Definition expressions produced by the parser.
//!
//! A document parses into a sequence of [`Definition`]s, which the type
//! system consumes in document order. Descriptions are carried as the raw
//! string token text, delimiters included, so that generated artifacts can
//! reproduce them exactly as written.

use std::collections::BTreeMap;
use std::fmt;

use crate::directive::DirectiveLocation;
use crate::value::Value;

/// A reference to a named type or a list wrapping, with its nullability.
///
/// An SDL type without a trailing `!` is nullable at that level.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeRef {
    Named { name: String, nullable: bool },
    List { of: Box<TypeRef>, nullable: bool },
}

impl TypeRef {
    pub fn named(name: impl Into<String>, nullable: bool) -> Self {
        TypeRef::Named {
            name: name.into(),
            nullable,
        }
    }

    pub fn list(of: TypeRef, nullable: bool) -> Self {
        TypeRef::List {
            of: Box::new(of),
            nullable,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeRef::Named { nullable, .. } | TypeRef::List { nullable, .. } => *nullable,
        }
    }

    /// The named type at the bottom of any list nesting.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named { name, .. } => name,
            TypeRef::List { of, .. } => of.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, nullable } => {
                f.write_str(name)?;
                if !nullable {
                    f.write_str("!")?;
                }
                Ok(())
            }
            TypeRef::List { of, nullable } => {
                write!(f, "[{of}]")?;
                if !nullable {
                    f.write_str("!")?;
                }
                Ok(())
            }
        }
    }
}

/// A directive applied to some construct, e.g. `@deprecated(reason: "x")`.
///
/// Arguments are keyed by name; a name given twice keeps the last value.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DirectiveRef {
    pub name: String,
    pub arguments: BTreeMap<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

/// One `query:`/`mutation:`/`subscription:` entry of a schema block.
#[derive(Clone, Debug, PartialEq)]
pub struct RootOperation {
    pub kind: OperationKind,
    pub ty: TypeRef,
}

/// A field of an object or interface type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub description: String,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: TypeRef,
    pub directives: Vec<DirectiveRef>,
}

/// A field argument, an input object field or a directive argument.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub description: String,
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
    pub directives: Vec<DirectiveRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDefinition {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDefinition {
    pub directives: Vec<DirectiveRef>,
    pub operations: Vec<RootOperation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarDefinition {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDefinition {
    pub description: String,
    pub name: String,
    pub implements: Vec<TypeRef>,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDefinition {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionDefinition {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub members: Vec<TypeRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDefinition {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub values: Vec<EnumValueDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectDefinition {
    pub description: String,
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<InputValueDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDefinition {
    pub description: String,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub locations: Vec<DirectiveLocation>,
}

/// Extension payloads mirror their definitions without a description.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaExtension {
    pub directives: Vec<DirectiveRef>,
    pub operations: Vec<RootOperation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarExtension {
    pub name: String,
    pub directives: Vec<DirectiveRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectExtension {
    pub name: String,
    pub implements: Vec<TypeRef>,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceExtension {
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionExtension {
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub members: Vec<TypeRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumExtension {
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub values: Vec<EnumValueDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectExtension {
    pub name: String,
    pub directives: Vec<DirectiveRef>,
    pub fields: Vec<InputValueDefinition>,
}

/// A top level definition or extension, in document order.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Schema(SchemaDefinition),
    Scalar(ScalarDefinition),
    Object(ObjectDefinition),
    Interface(InterfaceDefinition),
    Union(UnionDefinition),
    Enum(EnumDefinition),
    InputObject(InputObjectDefinition),
    Directive(DirectiveDefinition),
    ExtendSchema(SchemaExtension),
    ExtendScalar(ScalarExtension),
    ExtendObject(ObjectExtension),
    ExtendInterface(InterfaceExtension),
    ExtendUnion(UnionExtension),
    ExtendEnum(EnumExtension),
    ExtendInputObject(InputObjectExtension),
}
