mod check;
mod convert;
mod lookup;
mod schemas;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use convert::ConvertCommand;
use eyre::Result;
use lookup::LookupCommand;
use schemas::SchemasCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for sheetsync_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "sheetsync")]
#[command(version)]
#[command(about = "Convert spreadsheet exports into typed record artifacts")]
pub(crate) struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Convert(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Schemas(cmd) => cmd.run(),
            Commands::Lookup(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the workbook dumps listed in sheetsync.toml
    Convert(ConvertCommand),

    /// Validate sheetsync.toml and its conversion entries
    Check(CheckCommand),

    /// List the record schemas declared in sheetsync.toml
    Schemas(SchemasCommand),

    /// Look up a record in a generated container artifact
    Lookup(LookupCommand),
}
