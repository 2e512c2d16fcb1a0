//! Command-line interface definitions

pub mod commands;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::table::FileKind;
use crate::transform::DEFAULT_EXPLODE_COLUMN;

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    version,
    about = "Explode agent rosters and reconcile them against the stored master file"
)]
pub struct Cli {
    /// Path to a config file (default: ~/.config/roster-cli/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explode the multi-value column and store the result as the master file
    Structure(StructureArgs),
    /// Compare a file against the stored master file
    Compare(CompareArgs),
    /// Explode the multi-value column into a local workbook without touching storage
    Explode(ExplodeArgs),
}

/// Input file type; guessed from the extension when omitted
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    #[value(alias = "xlsx")]
    Spreadsheet,
}

impl From<InputKind> for FileKind {
    fn from(kind: InputKind) -> Self {
        match kind {
            InputKind::Csv => FileKind::Csv,
            InputKind::Spreadsheet => FileKind::Spreadsheet,
        }
    }
}

/// Explicit kind if given, otherwise guessed from the path
pub fn resolve_kind(kind: Option<InputKind>, path: &Path) -> FileKind {
    kind.map(FileKind::from)
        .unwrap_or_else(|| FileKind::from_path(path))
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// JSON document with `unmatched_master` and `unmatched_uploaded`
    Json,
}

#[derive(Args, Debug)]
pub struct StructureArgs {
    /// CSV or Excel file to structure
    pub file: PathBuf,

    #[arg(long, value_enum)]
    pub kind: Option<InputKind>,

    /// Column holding comma-separated values
    #[arg(long, default_value = DEFAULT_EXPLODE_COLUMN)]
    pub column: String,

    /// Also write the structured workbook to this path
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// CSV or Excel file to compare
    pub file: PathBuf,

    #[arg(long, value_enum)]
    pub kind: Option<InputKind>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the differences to a .csv or .xlsx file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExplodeArgs {
    /// CSV or Excel file to explode
    pub file: PathBuf,

    #[arg(long, value_enum)]
    pub kind: Option<InputKind>,

    /// Column holding comma-separated values
    #[arg(long, default_value = DEFAULT_EXPLODE_COLUMN)]
    pub column: String,

    /// Output workbook path
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from([
            "roster",
            "-vv",
            "compare",
            "upload.xlsx",
            "--format",
            "json",
            "--export",
            "diff.csv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.export, Some(PathBuf::from("diff.csv")));
                assert_eq!(resolve_kind(args.kind, &args.file), FileKind::Spreadsheet);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_structure_defaults() {
        let cli =
            Cli::try_parse_from(["roster", "structure", "roster.csv", "--kind", "xlsx"]).unwrap();

        match cli.command {
            Commands::Structure(args) => {
                assert_eq!(args.column, "States");
                assert_eq!(resolve_kind(args.kind, &args.file), FileKind::Spreadsheet);
                assert!(args.save.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_explode_requires_output() {
        assert!(Cli::try_parse_from(["roster", "explode", "roster.csv"]).is_err());
    }
}
