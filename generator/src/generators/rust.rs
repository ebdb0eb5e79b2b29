//! Rust source emission.
//!
//! Items are built with `parse_quote!` into typed [`syn`] trees, collected
//! into a [`syn::File`] and printed with `prettyplease`, so every emitted
//! file is well formed, formatted Rust.

use std::collections::BTreeSet;
use std::path::PathBuf;

use syn::{Attribute, Ident, Index, Item, TraitItem, Type, Variant, __private::Span, parse_quote};

use dt_gql::ast::DirectiveRef;
use dt_gql::type_system::{Enum, Object};
use dt_gql::{TypeRef, TypeSystem};

use heck::ToShoutySnakeCase;

use crate::context::GenerationContext;
use crate::naming;

use super::{GenerateError, SourceFile};

/// One module per enum type, at `<module>/<module><suffix>.rs`.
pub(super) fn generate_enums(
    system: &TypeSystem,
    context: &GenerationContext,
) -> Result<Vec<SourceFile>, GenerateError> {
    let mut files = Vec::new();
    for enum_type in system.enums.values() {
        let module = naming::module_name(&enum_type.name);
        let path = PathBuf::from(&module).join(format!("{}{}.rs", module, context.file_suffix));
        files.push(SourceFile {
            path,
            contents: render_enum(enum_type),
        });
    }
    Ok(files)
}

/// One resolver trait per object type, at `<module><suffix>.rs`.
pub(super) fn generate_resolvers(
    system: &TypeSystem,
    context: &GenerationContext,
) -> Result<Vec<SourceFile>, GenerateError> {
    let mut files = Vec::new();
    for object in system.objects.values() {
        let path = PathBuf::from(format!(
            "{}{}.rs",
            naming::module_name(&object.name),
            context.file_suffix
        ));
        files.push(SourceFile {
            path,
            contents: render_resolver(object, context)?,
        });
    }
    Ok(files)
}

fn render_enum(enum_type: &Enum) -> String {
    let type_ident = naming::ident(&naming::type_name(&enum_type.name));
    let prefix = enum_type.name.to_shouty_snake_case();
    let name_const = Ident::new(&format!("{prefix}_NAME"), Span::call_site());
    let index_const = Ident::new(&format!("{prefix}_INDEX"), Span::call_site());
    let values_const = Ident::new(&format!("{prefix}_VALUES"), Span::call_site());

    // All value names packed back to back; the index table holds the byte
    // offset of each boundary, so value i spans offsets[i]..offsets[i + 1].
    let mut packed = String::new();
    let mut offsets = vec![0usize];
    for value in &enum_type.values {
        packed.push_str(&value.name);
        offsets.push(packed.len());
    }
    let packed = packed.as_str();
    let offset_literals: Vec<Index> = offsets.iter().map(|&offset| Index::from(offset)).collect();
    let offset_count = Index::from(offsets.len());
    let value_count = Index::from(enum_type.values.len());

    let variant_idents: Vec<Ident> = enum_type
        .values
        .iter()
        .map(|value| naming::ident(&naming::pascal(&value.name)))
        .collect();
    let variants: Vec<Variant> = enum_type
        .values
        .iter()
        .zip(&variant_idents)
        .enumerate()
        .map(|(ordinal, (value, ident))| {
            let mut variant: Variant = if ordinal == 0 {
                parse_quote!(#ident = 0)
            } else {
                parse_quote!(#ident)
            };
            variant.attrs = doc_attrs(&value.description, &value.directives);
            variant
        })
        .collect();

    let mut items: Vec<Item> = Vec::new();
    items.push(parse_quote!(use std::fmt;));
    items.push(parse_quote!(use std::str::FromStr;));

    let mut enum_item: syn::ItemEnum = parse_quote! {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[repr(i32)]
        pub enum #type_ident {
            #(#variants),*
        }
    };
    let mut attrs = doc_attrs(&enum_type.description, &enum_type.directives);
    attrs.append(&mut enum_item.attrs);
    enum_item.attrs = attrs;
    items.push(Item::Enum(enum_item));

    items.push(parse_quote! {
        const #name_const: &str = #packed;
    });
    items.push(parse_quote! {
        const #index_const: [usize; #offset_count] = [#(#offset_literals),*];
    });
    items.push(parse_quote! {
        const #values_const: [#type_ident; #value_count] = [#(#type_ident::#variant_idents),*];
    });

    items.push(parse_quote! {
        impl fmt::Display for #type_ident {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let ordinal = *self as usize;
                f.write_str(&#name_const[#index_const[ordinal]..#index_const[ordinal + 1]])
            }
        }
    });

    items.push(parse_quote! {
        /// Failure to map runtime input onto an enum value.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum InputError {
            NotFound(String),
            WrongType,
        }
    });
    items.push(parse_quote! {
        impl fmt::Display for InputError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    InputError::NotFound(name) => write!(f, "{name} is not found"),
                    InputError::WrongType => f.write_str("wrong type"),
                }
            }
        }
    });
    items.push(parse_quote!(impl std::error::Error for InputError {}));

    items.push(parse_quote! {
        impl FromStr for #type_ident {
            type Err = InputError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                for ordinal in 0..#values_const.len() {
                    if s == &#name_const[#index_const[ordinal]..#index_const[ordinal + 1]] {
                        return Ok(#values_const[ordinal]);
                    }
                }
                Err(InputError::NotFound(s.to_string()))
            }
        }
    });

    let graphql_name = enum_type.name.as_str();
    items.push(parse_quote! {
        impl #type_ident {
            pub fn implements_graphql_type(name: &str) -> bool {
                name == #graphql_name
            }

            pub fn unmarshal_graphql(input: &serde_json::Value) -> Result<Self, InputError> {
                match input {
                    serde_json::Value::String(name) => name.parse(),
                    _ => Err(InputError::WrongType),
                }
            }

            pub fn marshal_json(&self) -> String {
                format!("{:?}", self.to_string())
            }
        }
    });

    render_file(items)
}

fn render_resolver(object: &Object, context: &GenerationContext) -> Result<String, GenerateError> {
    let resolver = naming::resolver_name(&object.name);
    let resolver_ident = naming::ident(&resolver);

    let mut methods: Vec<TraitItem> = Vec::new();
    let mut arg_structs: Vec<Item> = Vec::new();
    for field in &object.fields {
        let method_ident = naming::ident(&naming::snake(&field.name));
        let return_type = resolve_type(&field.ty, context)?;
        let mut attrs = doc_attrs(&field.description, &field.directives);
        if field.ty.is_nullable() {
            let note = format!(" Return value of `{}` is nullable.", field.name);
            attrs.push(parse_quote!(#[doc = #note]));
        }
        let mut method: syn::TraitItemFn = if field.arguments.is_empty() {
            parse_quote! {
                fn #method_ident(&self) -> #return_type;
            }
        } else {
            let arg_ident =
                naming::ident(&format!("{}{}Arg", resolver, naming::pascal(&field.name)));
            let mut names = Vec::new();
            let mut types = Vec::new();
            for argument in &field.arguments {
                names.push(naming::ident(&naming::snake(&argument.name)));
                types.push(resolve_type(&argument.ty, context)?);
            }
            arg_structs.push(parse_quote! {
                pub struct #arg_ident {
                    #(pub #names: #types),*
                }
            });
            parse_quote! {
                fn #method_ident(&self, ctx: &Context, arg: #arg_ident) -> #return_type;
            }
        };
        method.attrs = attrs;
        methods.push(TraitItem::Fn(method));
    }

    let mut items = import_items(object, context)?;
    items.push(parse_quote! {
        pub trait #resolver_ident {
            #(#methods)*
        }
    });
    items.extend(arg_structs);
    Ok(render_file(items))
}

/// Maps a schema type reference onto the Rust type spelled in generated
/// code. Resolution order: resolver, enum, scalar, builtin. Nullable
/// references become `Option`, except resolvers, which stay a plain boxed
/// trait object at every nesting depth.
fn resolve_type(ty: &TypeRef, context: &GenerationContext) -> Result<Type, GenerateError> {
    match ty {
        TypeRef::Named { name, nullable } => {
            if context.resolver_names.contains(name) {
                let resolver = naming::ident(&naming::resolver_name(name));
                return Ok(parse_quote!(Box<dyn #resolver>));
            }
            let base: Type = if context.enum_names.contains(name) {
                let module = module_ident(&naming::module_name(name))?;
                let type_ident = naming::ident(&naming::type_name(name));
                parse_quote!(#module::#type_ident)
            } else if context.scalar_names.contains(name) {
                module_path(&context.scalar_module)?;
                let module = naming::ident(context.scalar_base());
                let type_ident = naming::ident(&naming::type_name(name));
                parse_quote!(#module::#type_ident)
            } else {
                match name.as_str() {
                    "Int" => parse_quote!(i32),
                    "String" => parse_quote!(String),
                    "Boolean" => parse_quote!(bool),
                    "Float" => parse_quote!(f32),
                    _ => return Err(GenerateError::UnknownType(name.clone())),
                }
            };
            if *nullable {
                Ok(parse_quote!(Option<#base>))
            } else {
                Ok(base)
            }
        }
        TypeRef::List { of, nullable } => {
            let inner = resolve_type(of, context)?;
            let base: Type = parse_quote!(Vec<#inner>);
            if *nullable {
                Ok(parse_quote!(Option<#base>))
            } else {
                Ok(base)
            }
        }
    }
}

/// The `use` items heading a resolver file: the caller's `Context` when any
/// field takes arguments, sibling resolver traits, enum modules, and the
/// scalar module, in that order.
fn import_items(
    object: &Object,
    context: &GenerationContext,
) -> Result<Vec<Item>, GenerateError> {
    let mut referenced = BTreeSet::new();
    for field in &object.fields {
        referenced.insert(field.ty.base_name().to_string());
        for argument in &field.arguments {
            referenced.insert(argument.ty.base_name().to_string());
        }
    }

    let mut items: Vec<Item> = Vec::new();
    if object.fields.iter().any(|field| !field.arguments.is_empty()) {
        items.push(parse_quote!(use crate::Context;));
    }
    for name in &referenced {
        if name != &object.name && context.resolver_names.contains(name) {
            let module = module_ident(&format!(
                "{}{}",
                naming::module_name(name),
                context.file_suffix
            ))?;
            let resolver = naming::ident(&naming::resolver_name(name));
            items.push(parse_quote!(use super::#module::#resolver;));
        }
    }
    for name in &referenced {
        if context.enum_names.contains(name) && !context.resolver_names.contains(name) {
            let prefix = module_path(&context.enum_module_prefix)?;
            let module = module_ident(&naming::module_name(name))?;
            items.push(parse_quote!(use #prefix::#module;));
        }
    }
    let needs_scalar = referenced.iter().any(|name| {
        context.scalar_names.contains(name)
            && !context.resolver_names.contains(name)
            && !context.enum_names.contains(name)
    });
    if needs_scalar {
        let path = module_path(&context.scalar_module)?;
        items.push(parse_quote!(use #path;));
    }
    Ok(items)
}

fn module_path(path: &str) -> Result<syn::Path, GenerateError> {
    syn::parse_str(path).map_err(|_| GenerateError::InvalidModulePath(path.to_string()))
}

// A module segment has to match its file name on disk, so names that
// `naming::ident` would rewrite cannot be used as module segments.
fn module_ident(name: &str) -> Result<Ident, GenerateError> {
    let valid_head = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_tail = name
        .chars()
        .skip(1)
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_head || !valid_tail || naming::UNRAWABLE.contains(&name) {
        return Err(GenerateError::InvalidModulePath(name.to_string()));
    }
    Ok(naming::ident(name))
}

/// Carries a definition's description and applied directives over into doc
/// comments on the generated item.
fn doc_attrs(description: &str, directives: &[DirectiveRef]) -> Vec<Attribute> {
    let mut lines = Vec::new();
    if !description.is_empty() {
        lines.push(" Description:".to_string());
        for line in description.lines() {
            lines.push(format!("   {line}"));
        }
    }
    if !directives.is_empty() {
        lines.push(" Directives:".to_string());
        for directive in directives {
            let arguments = directive
                .arguments
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("   @{}({})", directive.name, arguments));
        }
    }
    lines
        .iter()
        .map(|line| parse_quote!(#[doc = #line]))
        .collect()
}

fn render_file(items: Vec<Item>) -> String {
    let doc_comment = concat!(
        "Generated by ",
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION"),
        ". DO NOT EDIT."
    );
    let root = syn::File {
        shebang: None,
        attrs: vec![
            parse_quote!(#![doc = #doc_comment]),
            parse_quote!(#![allow(dead_code, unused_imports)]),
        ],
        items,
    };
    prettyplease::unparse(&root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Target;

    fn read(source: &str) -> (TypeSystem, GenerationContext) {
        let system = dt_gql::read_type_system(source).unwrap();
        let context = GenerationContext::new(
            &system,
            "crate::enums".to_string(),
            "crate::scalar".to_string(),
            "_gql".to_string(),
        );
        (system, context)
    }

    #[test]
    fn enum_tables_pack_names_and_offsets() {
        let (system, _) = read("enum Class { ROOKIE ELITE KING_OF_ROAD LEGEND }");
        let source = render_enum(&system.enums["Class"]);
        assert!(source.contains("pub enum Class"));
        assert!(source.contains("Rookie = 0"));
        assert!(source.contains("KingOfRoad"));
        assert!(source.contains("const CLASS_NAME: &str = \"ROOKIEELITEKING_OF_ROADLEGEND\";"));
        assert!(source.contains("const CLASS_INDEX: [usize; 5] = [0, 6, 11, 23, 29];"));
        assert!(source.contains("const CLASS_VALUES: [Class; 4]"));
        assert!(source.contains("name == \"Class\""));
        assert!(source.contains("impl FromStr for Class"));
        assert!(source.starts_with("//! Generated by "));
        assert!(source.contains("DO NOT EDIT"));
    }

    #[test]
    fn enum_descriptions_become_doc_comments() {
        let (system, _) = read(
            "\"Driver ranks\" enum Class @label(text: \"ranks\") {\n\
             \x20 \"starter\" ROOKIE\n\
             \x20 ELITE\n\
             }",
        );
        let source = render_enum(&system.enums["Class"]);
        assert!(source.contains("/// Description:"));
        assert!(source.contains("///   \"Driver ranks\""));
        assert!(source.contains("/// Directives:"));
        assert!(source.contains("///   @label(text: \"ranks\")"));
        assert!(source.contains("///   \"starter\""));
    }

    #[test]
    fn empty_enum_still_renders() {
        let (system, _) = read("enum Empty { }");
        let source = render_enum(&system.enums["Empty"]);
        assert!(source.contains("pub enum Empty {}"));
        assert!(source.contains("const EMPTY_INDEX: [usize; 1] = [0];"));
    }

    #[test]
    fn enum_file_path_nests_in_module_directory() {
        let (system, context) = read("enum Class { A }");
        let files = generate_enums(&system, &context).unwrap();
        assert_eq!(files[0].path, PathBuf::from("class/class_gql.rs"));
    }

    #[test]
    fn resolver_trait_with_arguments() {
        let (system, context) = read(
            "type Query {\n\
             \x20 user(id: Int!): User\n\
             \x20 users: [User!]!\n\
             \x20 version: String!\n\
             }\n\
             type User { id: Int! }",
        );
        let source = render_resolver(&system.objects["Query"], &context).unwrap();
        assert!(source.contains("pub trait QueryResolver"));
        assert!(source.contains(
            "fn user(&self, ctx: &Context, arg: QueryResolverUserArg) -> Box<dyn UserResolver>;"
        ));
        assert!(source.contains("fn users(&self) -> Vec<Box<dyn UserResolver>>;"));
        assert!(source.contains("fn version(&self) -> String;"));
        assert!(source.contains("use crate::Context;"));
        assert!(source.contains("use super::user_gql::UserResolver;"));
        assert!(source.contains("pub struct QueryResolverUserArg"));
        assert!(source.contains("pub id: i32"));
    }

    #[test]
    fn methods_without_arguments_take_no_context() {
        let (system, context) = read("type User { id: Int! }");
        let source = render_resolver(&system.objects["User"], &context).unwrap();
        assert!(source.contains("fn id(&self) -> i32;"));
        assert!(!source.contains("use crate::Context;"));
    }

    #[test]
    fn nullable_fields_get_option_and_a_note() {
        let (system, context) =
            read("type T { a: Int b: [Int] c: User }\ntype User { id: Int! }");
        let source = render_resolver(&system.objects["T"], &context).unwrap();
        assert!(source.contains("fn a(&self) -> Option<i32>;"));
        assert!(source.contains("fn b(&self) -> Option<Vec<Option<i32>>>;"));
        // Resolver returns stay bare even when the field is nullable.
        assert!(source.contains("fn c(&self) -> Box<dyn UserResolver>;"));
        assert!(source.contains("/// Return value of `a` is nullable."));
        assert!(source.contains("/// Return value of `c` is nullable."));
    }

    #[test]
    fn field_names_are_snake_cased() {
        let (system, context) = read("type T { fullName: String! type: Int! }");
        let source = render_resolver(&system.objects["T"], &context).unwrap();
        assert!(source.contains("fn full_name(&self) -> String;"));
        assert!(source.contains("fn r#type(&self) -> i32;"));
    }

    #[test]
    fn enum_and_scalar_references_are_imported() {
        let (system, context) = read(
            "scalar Uri\n\
             enum Class { A }\n\
             type T { class: Class! link: Uri! }",
        );
        let source = render_resolver(&system.objects["T"], &context).unwrap();
        assert!(source.contains("use crate::enums::class;"));
        assert!(source.contains("use crate::scalar;"));
        assert!(source.contains("fn class(&self) -> class::Class;"));
        assert!(source.contains("fn link(&self) -> scalar::Uri;"));
    }

    #[test]
    fn builtin_mappings() {
        let (system, context) = read("type T { a: Int! b: String! c: Boolean! d: Float! }");
        let source = render_resolver(&system.objects["T"], &context).unwrap();
        assert!(source.contains("fn a(&self) -> i32;"));
        assert!(source.contains("fn b(&self) -> String;"));
        assert!(source.contains("fn c(&self) -> bool;"));
        assert!(source.contains("fn d(&self) -> f32;"));
    }

    #[test]
    fn id_is_not_a_builtin() {
        let (system, context) = read("type T { id: ID! }");
        let err = render_resolver(&system.objects["T"], &context).unwrap_err();
        assert_eq!(err, GenerateError::UnknownType("ID".to_string()));
    }

    #[test]
    fn interface_references_are_unknown_types() {
        let (system, context) = read("interface Node { id: Int! }\ntype T { n: Node! }");
        let err = render_resolver(&system.objects["T"], &context).unwrap_err();
        assert_eq!(err, GenerateError::UnknownType("Node".to_string()));
    }

    #[test]
    fn resolver_shadows_enum_of_the_same_name() {
        let (system, context) =
            read("enum Thing { A }\ntype Thing { id: Int! }\ntype T { thing: Thing! }");
        let source = render_resolver(&system.objects["T"], &context).unwrap();
        assert!(source.contains("fn thing(&self) -> Box<dyn ThingResolver>;"));
        assert!(source.contains("use super::thing_gql::ThingResolver;"));
        assert!(!source.contains("use crate::enums::thing;"));
    }

    #[test]
    fn self_references_need_no_import() {
        let (system, context) = read("type Node { parent: Node }");
        let source = render_resolver(&system.objects["Node"], &context).unwrap();
        assert!(source.contains("fn parent(&self) -> Box<dyn NodeResolver>;"));
        assert!(!source.contains("use super::node_gql"));
    }

    #[test]
    fn argument_types_contribute_imports() {
        let (system, context) = read(
            "enum Class { A }\n\
             type T { count(class: Class!): Int! }",
        );
        let source = render_resolver(&system.objects["T"], &context).unwrap();
        assert!(source.contains("use crate::enums::class;"));
        assert!(source.contains("pub class: class::Class"));
    }

    #[test]
    fn invalid_module_prefix_is_an_error() {
        let system = dt_gql::read_type_system("enum Class { A }\ntype T { c: Class! }").unwrap();
        let context = GenerationContext::new(
            &system,
            "not a path".to_string(),
            "crate::scalar".to_string(),
            "_gql".to_string(),
        );
        let err = render_resolver(&system.objects["T"], &context).unwrap_err();
        assert_eq!(
            err,
            GenerateError::InvalidModulePath("not a path".to_string())
        );
    }

    #[test]
    fn invalid_suffix_is_an_error() {
        let system = dt_gql::read_type_system("type A { b: B! }\ntype B { id: Int! }").unwrap();
        let context = GenerationContext::new(
            &system,
            "crate::enums".to_string(),
            "crate::scalar".to_string(),
            "-gen".to_string(),
        );
        let err = render_resolver(&system.objects["A"], &context).unwrap_err();
        assert_eq!(err, GenerateError::InvalidModulePath("b-gen".to_string()));
    }

    #[test]
    fn resolver_file_paths_sit_at_the_output_root() {
        let (system, context) = read("type Query { id: Int! }");
        let files = generate_resolvers(&system, &context).unwrap();
        assert_eq!(files[0].path, PathBuf::from("query_gql.rs"));
    }

    #[test]
    fn generated_output_is_parseable_rust() {
        let (system, context) = read(
            "scalar Uri\n\
             enum Class { ROOKIE ELITE }\n\
             type Query { user(id: Int!, class: Class): User version: String! }\n\
             type User { id: Int! link: Uri friends: [User!]! }",
        );
        for target in [Target::Enum, Target::Resolver] {
            for file in target.generate(&system, &context).unwrap() {
                syn::parse_file(&file.contents).unwrap();
            }
        }
    }
}
