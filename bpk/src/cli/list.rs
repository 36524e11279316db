// bpk/src/cli/list.rs
use std::sync::Arc;

use bpk_common::config::Config;
use bpk_common::error::Result;
use bpk_core::SubsetRegistry;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct List {
    /// Print only the paths, one per line
    #[arg(long, short)]
    pub quiet: bool,
}

impl List {
    pub async fn run(&self, config: &Config, registry: Arc<SubsetRegistry>) -> Result<()> {
        let quiet = self.quiet;
        super::run_resolution(config, registry, |file| {
            if quiet {
                println!("{}", file.absolute_path.display());
            } else {
                println!(
                    "{} {}",
                    file.dependency_name.bold(),
                    file.absolute_path.display()
                );
            }
            Ok(())
        })
        .await?;
        Ok(())
    }
}
