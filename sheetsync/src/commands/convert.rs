use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use sheetsync_manifest::SheetsyncToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ConvertCommand {
    /// Path to sheetsync.toml (defaults to ./sheetsync.toml)
    #[arg(short, long, default_value = "sheetsync.toml")]
    pub config: PathBuf,

    /// Only convert the entries reading this source
    #[arg(long)]
    pub only: Option<String>,

    /// Delete multi-file artifacts whose rows are gone from the source
    #[arg(long)]
    pub prune: bool,

    /// Convert without writing, and list what would be pruned
    #[arg(long)]
    pub dry_run: bool,
}

impl ConvertCommand {
    pub fn run(&self) -> Result<()> {
        let toml = SheetsyncToml::open(&self.config).unwrap_or_exit();

        let report = ops::convert(
            toml.manifest(),
            toml.base_dir(),
            ops::convert::ConvertOptions {
                only: self.only.as_deref(),
                prune: self.prune,
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());

        if report.has_errors() {
            std::process::exit(1);
        }
        Ok(())
    }
}
