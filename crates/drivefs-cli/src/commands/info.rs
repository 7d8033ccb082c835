//! Item information commands - stat, exists, url, upload-session

use anyhow::{bail, Result};
use clap::Args;
use drivefs_core::domain::ConflictBehavior;
use drivefs_core::ports::IStorageAdapter;
use serde_json::{json, Map, Value};

use super::AppContext;

/// Show metadata for a remote item
#[derive(Debug, Args)]
pub struct StatCommand {
    pub path: String,
}

impl StatCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        let attributes = adapter.metadata(&self.path).await?;
        let formatter = ctx.formatter();

        if ctx.is_json() {
            formatter.print_json(&serde_json::to_value(&attributes)?);
        } else {
            formatter.entry(&attributes);
            if let drivefs_core::domain::StorageAttributes::File(file) = &attributes {
                if let Some(mime) = &file.mime_type {
                    formatter.info(&format!("MIME type: {}", mime));
                }
            }
        }
        Ok(())
    }
}

/// Check whether a remote item exists
#[derive(Debug, Args)]
pub struct ExistsCommand {
    pub path: String,
    /// Only report true for directories
    #[arg(short, long)]
    pub dir: bool,
}

impl ExistsCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        let exists = if self.dir {
            adapter.directory_exists(&self.path).await
        } else {
            adapter.file_exists(&self.path).await
        };

        if ctx.is_json() {
            ctx.formatter()
                .print_json(&json!({ "path": self.path, "exists": exists }));
        } else {
            println!("{}", exists);
        }
        Ok(())
    }
}

/// Print a browser URL for a remote item
#[derive(Debug, Args)]
pub struct UrlCommand {
    pub path: String,
}

impl UrlCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        let url = adapter.get_url(&self.path).await?;

        if ctx.is_json() {
            ctx.formatter()
                .print_json(&json!({ "path": self.path, "url": url }));
        } else {
            println!("{}", url);
        }
        Ok(())
    }
}

/// Open a resumable upload session
#[derive(Debug, Args)]
pub struct UploadSessionCommand {
    /// Remote destination path
    pub path: String,
    /// Behavior when the name is taken: fail, rename or replace
    #[arg(long)]
    pub conflict: Option<ConflictBehavior>,
    /// Extra item property as KEY=VALUE (repeatable)
    #[arg(long, value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl UploadSessionCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let overrides = self.overrides()?;
        let adapter = ctx.adapter().await?;
        let session = adapter.create_upload_session(&self.path, overrides).await?;

        if !session.is_valid() {
            bail!("The server did not return an upload URL for {}", self.path);
        }

        let formatter = ctx.formatter();
        if ctx.is_json() {
            formatter.print_json(&serde_json::to_value(&session)?);
        } else {
            formatter.success(&format!("Upload session opened for {}", self.path));
            formatter.info(&format!("URL:      {}", session.upload_url));
            formatter.info(&format!("Conflict: {}", session.conflict_behavior.as_str()));
            if let Some(expiration) = session.expiration {
                formatter.info(&format!("Expires:  {}", expiration.to_rfc3339()));
            }
        }
        Ok(())
    }

    fn overrides(&self) -> Result<Map<String, Value>> {
        let mut overrides = Map::new();

        for pair in &self.set {
            let Some((key, value)) = pair.split_once('=') else {
                bail!("Expected KEY=VALUE, got '{}'", pair);
            };
            overrides.insert(key.trim().to_string(), Value::from(value));
        }

        if let Some(behavior) = self.conflict {
            overrides.insert(
                "@microsoft.graph.conflictBehavior".to_string(),
                Value::from(behavior.as_str()),
            );
        }

        Ok(overrides)
    }
}
