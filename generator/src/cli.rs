use std::path::PathBuf;

use clap::Parser;

use crate::generators::Target;

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(
        long,
        value_enum,
        value_delimiter = ',',
        required = true,
        help = "Comma-separated list of generation targets"
    )]
    pub target: Vec<Target>,

    #[clap(long, help = "The SDL schema file to read")]
    pub schema: PathBuf,

    #[clap(
        long,
        default_value = "crate::enums",
        help = "Module path prefix under which generated enum modules live"
    )]
    pub enum_module_prefix: String,

    #[clap(
        long,
        default_value = "crate::scalar",
        help = "Module path holding the custom scalar types"
    )]
    pub scalar_module: String,

    #[clap(long, default_value = "_gql", help = "Suffix appended to generated file stems")]
    pub suffix: String,

    #[clap(long, help = "Enable debug logging")]
    pub verbose: bool,

    #[clap(value_parser, default_value = ".", help = "Directory the generated files are written to")]
    pub out_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_targets_at_commas() {
        let cli = Cli::try_parse_from([
            "dt-gql-generator",
            "--target",
            "enum,resolver",
            "--schema",
            "schema.graphql",
        ])
        .unwrap();
        assert_eq!(cli.target, vec![Target::Enum, Target::Resolver]);
        assert_eq!(cli.suffix, "_gql");
        assert_eq!(cli.out_dir, PathBuf::from("."));
    }

    #[test]
    fn rejects_unknown_target() {
        let result = Cli::try_parse_from([
            "dt-gql-generator",
            "--target",
            "enum,interface",
            "--schema",
            "schema.graphql",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn target_is_required() {
        let result = Cli::try_parse_from(["dt-gql-generator", "--schema", "schema.graphql"]);
        assert!(result.is_err());
    }
}
