//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Export compliance dashboard data as XLSX workbooks and PDF reports
#[derive(Parser, Debug)]
#[command(name = "posture")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.posture/config.json)
    #[arg(long, global = true, env = "POSTURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to save exports into (overrides the config)
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a JSON array of records as a single-sheet workbook
    Sheet {
        /// JSON file holding an array of objects
        input: PathBuf,

        /// File name without extension (default: input file stem)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Export a report ({"title": ..., "widgets": [...]}) as a PDF
    Report {
        /// JSON file holding the report
        input: PathBuf,
    },

    /// Export the built-in sample report and sample records
    Sample,
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
    fn test_parse_sheet_with_global_flags() {
        let cli = Cli::try_parse_from([
            "posture", "sheet", "risks.json", "--name", "audit_2024", "--out-dir", "/tmp/x",
        ])
        .unwrap();
        assert_eq!(cli.out_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Commands::Sheet { input, name } => {
                assert_eq!(input, PathBuf::from("risks.json"));
                assert_eq!(name.as_deref(), Some("audit_2024"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_report_requires_input() {
        assert!(Cli::try_parse_from(["posture", "report"]).is_err());
    }
}
