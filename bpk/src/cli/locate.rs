// bpk/src/cli/locate.rs
use bpk_common::config::Config;
use bpk_common::error::Result;
use bpk_core::locate_entry;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct Locate {
    /// Dependency folder name inside the components directory
    #[arg(required = true)]
    pub name: String,
}

impl Locate {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let located = locate_entry(&self.name, &config.base_dir()).await?;
        println!(
            "{} {} {}",
            self.name.bold(),
            located.path.display(),
            format!("({})", located.step).dimmed()
        );
        Ok(())
    }
}
