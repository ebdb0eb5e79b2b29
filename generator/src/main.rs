mod cli;
mod context;
mod generators;
mod naming;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::context::GenerationContext;
use crate::generators::SourceFile;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = fs::read_to_string(&cli.schema)?;
    let system = dt_gql::read_type_system(&source)?;
    let context = GenerationContext::new(
        &system,
        cli.enum_module_prefix,
        cli.scalar_module,
        cli.suffix,
    );

    for target in &cli.target {
        let files = target.generate(&system, &context)?;
        write_files(&cli.out_dir, &files)?;
    }
    Ok(())
}

fn write_files(out_dir: &Path, files: &[SourceFile]) -> std::io::Result<()> {
    for file in files {
        let path = out_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("writing {}", path.display());
        fs::write(&path, &file.contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Target;

    #[test]
    fn write_files_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            SourceFile {
                path: Path::new("class").join("class_gql.rs"),
                contents: "pub enum Class {}\n".to_string(),
            },
            SourceFile {
                path: Path::new("query_gql.rs").to_path_buf(),
                contents: "pub trait QueryResolver {}\n".to_string(),
            },
        ];
        write_files(dir.path(), &files).unwrap();
        let nested = fs::read_to_string(dir.path().join("class/class_gql.rs")).unwrap();
        assert_eq!(nested, "pub enum Class {}\n");
        assert!(dir.path().join("query_gql.rs").exists());
    }

    #[test]
    fn generates_files_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let system = dt_gql::read_type_system(
            "enum Class { ROOKIE ELITE }\n\
             type Query { class: Class! }",
        )
        .unwrap();
        let context = GenerationContext::new(
            &system,
            "crate::enums".to_string(),
            "crate::scalar".to_string(),
            "_gql".to_string(),
        );
        for target in [Target::Enum, Target::Resolver] {
            let files = target.generate(&system, &context).unwrap();
            write_files(dir.path(), &files).unwrap();
        }
        let enum_source = fs::read_to_string(dir.path().join("class/class_gql.rs")).unwrap();
        assert!(enum_source.contains("pub enum Class"));
        let resolver_source = fs::read_to_string(dir.path().join("query_gql.rs")).unwrap();
        assert!(resolver_source.contains("pub trait QueryResolver"));
    }
}
