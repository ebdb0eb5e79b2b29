//! Model and parser for GraphQL SDL documents.
//!
//! The pipeline has three stages: the [`lexer`] turns source text into
//! position tagged tokens, the [`parser`] turns the token stream into
//! definition expressions, and [`TypeSystem::evaluate`] folds those into
//! the registries a code generator consumes.

pub mod ast;
pub mod charset;
pub mod directive;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod type_system;
pub mod value;

pub use ast::{Definition, TypeRef};
pub use directive::DirectiveLocation;
pub use error::SdlError;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};
pub use type_system::TypeSystem;
pub use value::Value;

/// Parses an SDL document and assembles its type system.
pub fn read_type_system(source: &str) -> Result<TypeSystem, SdlError> {
    let definitions = Parser::new(source)?.parse_document()?;
    TypeSystem::evaluate(definitions)
}
