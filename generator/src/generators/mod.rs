mod rust;

use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;

use dt_gql::TypeSystem;

use crate::context::GenerationContext;

/// What to generate from a type system. Each target contributes its own
/// set of output files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// One Rust module per enum type, with string mapping tables.
    Enum,
    /// One resolver trait per object type.
    Resolver,
}

/// A generated source file. `path` is relative to the output directory.
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("unknown type {0:?}")]
    UnknownType(String),

    #[error("invalid module path {0:?}")]
    InvalidModulePath(String),
}

impl Target {
    pub fn generate(
        &self,
        system: &TypeSystem,
        context: &GenerationContext,
    ) -> Result<Vec<SourceFile>, GenerateError> {
        match *self {
            Self::Enum => rust::generate_enums(system, context),
            Self::Resolver => rust::generate_resolvers(system, context),
        }
    }
}
