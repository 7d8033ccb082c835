//! List command - print directory contents
//!
//! Human output streams one line per entry as pages arrive, printing
//! unlistable directories inline. JSON output collects the listing first so
//! that completeness can be reported next to the entries.

use anyhow::{bail, Result};
use clap::Args;
use drivefs_core::ports::{collect_listing, IStorageAdapter};
use futures_util::StreamExt;
use serde_json::json;

use super::AppContext;

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Remote directory
    #[arg(default_value = "/")]
    pub path: String,
    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
}

impl ListCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        let formatter = ctx.formatter();

        if ctx.is_json() {
            let listing = collect_listing(adapter.list_contents(&self.path, self.recursive)).await;
            let errors: Vec<String> = listing.errors.iter().map(ToString::to_string).collect();
            formatter.print_json(&json!({
                "path": self.path,
                "recursive": self.recursive,
                "complete": listing.is_complete(),
                "entries": listing.entries,
                "errors": errors,
            }));
            return match listing.errors.len() {
                0 => Ok(()),
                n => bail!("{} director{} could not be listed", n, plural(n)),
            };
        }

        let mut stream = adapter.list_contents(&self.path, self.recursive);
        let mut count = 0usize;
        let mut failures = 0usize;
        while let Some(item) = stream.next().await {
            match item {
                Ok(entry) => {
                    formatter.entry(&entry);
                    count += 1;
                }
                Err(err) => {
                    formatter.error(&err.to_string());
                    failures += 1;
                }
            }
        }

        if count == 0 && failures == 0 {
            formatter.info("(empty)");
        }
        if failures > 0 {
            bail!("{} director{} could not be listed", failures, plural(failures));
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
