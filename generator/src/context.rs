//! Shared state threaded through source emission.

use std::collections::BTreeSet;

use dt_gql::TypeSystem;

/// Name registries a type reference is resolved against, together with the
/// module environment configured on the command line.
///
/// Resolution priority is resolver, then enum, then scalar, then builtin.
/// The sets are snapshots of the type system registries, so emission only
/// needs this context and the entity being rendered.
pub struct GenerationContext {
    pub resolver_names: BTreeSet<String>,
    pub enum_names: BTreeSet<String>,
    pub scalar_names: BTreeSet<String>,
    pub enum_module_prefix: String,
    pub scalar_module: String,
    pub file_suffix: String,
}

impl GenerationContext {
    pub fn new(
        system: &TypeSystem,
        enum_module_prefix: String,
        scalar_module: String,
        file_suffix: String,
    ) -> Self {
        GenerationContext {
            resolver_names: system.objects.keys().cloned().collect(),
            enum_names: system.enums.keys().cloned().collect(),
            scalar_names: system.scalars.keys().cloned().collect(),
            enum_module_prefix,
            scalar_module,
            file_suffix,
        }
    }

    /// Final segment of the scalar module path, the name scalar types are
    /// qualified with after the import.
    pub fn scalar_base(&self) -> &str {
        self.scalar_module
            .rsplit("::")
            .next()
            .unwrap_or(&self.scalar_module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_scalar_module(scalar_module: &str) -> GenerationContext {
        let system = dt_gql::read_type_system("scalar Uri").unwrap();
        GenerationContext::new(
            &system,
            "crate::enums".to_string(),
            scalar_module.to_string(),
            "_gql".to_string(),
        )
    }

    #[test]
    fn collects_registry_names() {
        let system = dt_gql::read_type_system(
            "scalar Uri\nenum Class { A }\ntype Query { class: Class }",
        )
        .unwrap();
        let context = GenerationContext::new(
            &system,
            String::new(),
            String::new(),
            "_gql".to_string(),
        );
        assert!(context.scalar_names.contains("Uri"));
        assert!(context.enum_names.contains("Class"));
        assert!(context.resolver_names.contains("Query"));
    }

    #[test]
    fn scalar_base_is_the_last_path_segment() {
        assert_eq!(context_with_scalar_module("crate::gql::scalar").scalar_base(), "scalar");
        assert_eq!(context_with_scalar_module("types").scalar_base(), "types");
    }
}
