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
pub struct SchemasCommand {
    /// Path to sheetsync.toml (defaults to ./sheetsync.toml)
    #[arg(short, long, default_value = "sheetsync.toml")]
    pub config: PathBuf,
}

impl SchemasCommand {
    pub fn run(&self) -> Result<()> {
        let toml = SheetsyncToml::open(&self.config).unwrap_or_exit();

        let report = ops::schemas(toml.manifest());
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
