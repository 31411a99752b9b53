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
pub struct CheckCommand {
    /// Path to sheetsync.toml (defaults to ./sheetsync.toml)
    #[arg(short, long, default_value = "sheetsync.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let toml = SheetsyncToml::open(&self.config).unwrap_or_exit();

        let report = ops::check(toml.manifest(), toml.path(), toml.base_dir());
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
