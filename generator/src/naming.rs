//! Mapping GraphQL names onto Rust identifiers.
//!
//! GraphQL names and Rust identifiers share the same character set, so the
//! only hazards are Rust keywords and casing conventions. Keywords become
//! raw identifiers where possible; the handful that cannot be spelled raw
//! get a trailing underscore instead.

use check_keyword::CheckKeyword;
use heck::{ToPascalCase, ToSnakeCase};
use syn::{Ident, __private::Span};

pub(crate) const UNRAWABLE: [&str; 5] = ["crate", "self", "super", "Self", "_"];

pub fn ident(name: &str) -> Ident {
    if UNRAWABLE.contains(&name) {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if name.is_keyword() {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// Module holding a generated type, `Class` to `class`.
pub fn module_name(name: &str) -> String {
    name.to_lowercase()
}

/// Rust type name of a GraphQL type. Only the first letter is upcased so
/// interior capitalization survives, `APIKey` stays `APIKey`.
pub fn type_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn resolver_name(name: &str) -> String {
    format!("{}Resolver", type_name(name))
}

/// PascalCase for variant and struct name parts. Names that the conversion
/// collapses to nothing, such as a bare underscore, are kept as written.
pub fn pascal(name: &str) -> String {
    let converted = name.to_pascal_case();
    if converted.is_empty() {
        name.to_string()
    } else {
        converted
    }
}

/// snake_case for method and struct field names, with the same fallback.
pub fn snake(name: &str) -> String {
    let converted = name.to_snake_case();
    if converted.is_empty() {
        name.to_string()
    } else {
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_become_raw_identifiers() {
        assert_eq!(ident("type").to_string(), "r#type");
        assert_eq!(ident("match").to_string(), "r#match");
        assert_eq!(ident("user").to_string(), "user");
    }

    #[test]
    fn unrawable_keywords_get_a_suffix() {
        assert_eq!(ident("crate").to_string(), "crate_");
        assert_eq!(ident("Self").to_string(), "Self_");
        assert_eq!(ident("self").to_string(), "self_");
        assert_eq!(ident("_").to_string(), "__");
    }

    #[test]
    fn type_name_upcases_only_the_first_letter() {
        assert_eq!(type_name("query"), "Query");
        assert_eq!(type_name("APIKey"), "APIKey");
        assert_eq!(resolver_name("query"), "QueryResolver");
    }

    #[test]
    fn module_name_is_lowercased() {
        assert_eq!(module_name("KingOfRoad"), "kingofroad");
        assert_eq!(module_name("Class"), "class");
    }

    #[test]
    fn casing_conversions() {
        assert_eq!(pascal("KING_OF_ROAD"), "KingOfRoad");
        assert_eq!(pascal("fullName"), "FullName");
        assert_eq!(snake("fullName"), "full_name");
        assert_eq!(snake("ID"), "id");
    }

    #[test]
    fn degenerate_names_fall_back_to_the_original() {
        assert_eq!(pascal("_"), "_");
        assert_eq!(snake("_"), "_");
    }
}
