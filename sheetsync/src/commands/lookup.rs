use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use crate::{
    ops::{self, lookup::Query},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct LookupCommand {
    /// Container artifact to open
    pub artifact: PathBuf,

    /// Find the first record with this key
    #[arg(long, conflicts_with = "index", required_unless_present = "index")]
    pub key: Option<String>,

    /// Take the record at this position
    #[arg(long)]
    pub index: Option<usize>,
}

impl LookupCommand {
    pub fn run(&self) -> Result<()> {
        let query = match (&self.key, self.index) {
            (Some(key), _) => Query::Key(key.clone()),
            (None, Some(index)) => Query::Index(index),
            (None, None) => eyre::bail!("pass --key or --index"),
        };

        let report = ops::lookup(&self.artifact, query)?;
        report.render(&mut TerminalOutput::new());

        if report.record.is_none() {
            std::process::exit(1);
        }
        Ok(())
    }
}
