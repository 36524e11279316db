// bpk/src/cli/bundle.rs
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use bpk_aio::fs::atomic_write_file;
use bpk_common::config::Config;
use bpk_common::error::Result;
use bpk_common::model::ResolvedFile;
use bpk_core::SubsetRegistry;
use clap::Args;
use tracing::{debug, instrument};

#[derive(Args, Debug)]
pub struct Bundle {
    /// Write the bundle here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Precede each file with a `/* name: path */` comment
    #[arg(long)]
    pub banner: bool,
}

impl Bundle {
    #[instrument(skip_all, fields(output = ?self.output))]
    pub async fn run(&self, config: &Config, registry: Arc<SubsetRegistry>) -> Result<()> {
        let mut bundle = Vec::new();
        let summary = super::run_resolution(config, registry, |file| {
            append_file(&mut bundle, &file, self.banner);
            Ok(())
        })
        .await?;
        debug!(
            "Bundled {} files ({} bytes)",
            summary.emitted,
            bundle.len()
        );

        match &self.output {
            Some(path) => atomic_write_file(path, &bundle)?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bundle)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Appends one file to the bundle, keeping files on separate lines.
fn append_file(bundle: &mut Vec<u8>, file: &ResolvedFile, banner: bool) {
    if banner {
        bundle.extend_from_slice(
            format!(
                "/* {}: {} */\n",
                file.dependency_name,
                file.absolute_path.display()
            )
            .as_bytes(),
        );
    }
    bundle.extend_from_slice(&file.content);
    if !file.content.ends_with(b"\n") {
        bundle.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> ResolvedFile {
        ResolvedFile {
            dependency_name: name.to_string(),
            absolute_path: PathBuf::from(format!("/deps/{name}/{name}.js")),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn files_are_newline_separated() {
        let mut bundle = Vec::new();
        append_file(&mut bundle, &file("a", "var a;"), false);
        append_file(&mut bundle, &file("b", "var b;\n"), false);
        assert_eq!(bundle, b"var a;\nvar b;\n");
    }

    #[test]
    fn banner_names_the_source() {
        let mut bundle = Vec::new();
        append_file(&mut bundle, &file("jquery", "$"), true);
        assert_eq!(
            String::from_utf8(bundle).unwrap(),
            "/* jquery: /deps/jquery/jquery.js */\n$\n"
        );
    }
}
