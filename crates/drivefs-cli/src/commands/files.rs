//! File commands - cat, put, rm, mkdir, cp, mv

use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Args;
use drivefs_core::ports::IStorageAdapter;
use futures_util::StreamExt;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::info;

use super::AppContext;

/// Print a remote file to stdout
#[derive(Debug, Args)]
pub struct CatCommand {
    /// Remote path
    pub path: String,
}

impl CatCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        let contents = adapter.read(&self.path).await?;

        let mut stdout = tokio::io::stdout();
        stdout.write_all(&contents).await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Upload a local file
#[derive(Debug, Args)]
pub struct PutCommand {
    /// Local file, or `-` for stdin
    pub local: PathBuf,
    /// Remote destination path
    pub remote: String,
}

impl PutCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;

        if self.local.as_os_str() == "-" {
            let mut buffer = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            adapter.write(&self.remote, Bytes::from(buffer)).await?;
        } else {
            let file = tokio::fs::File::open(&self.local)
                .await
                .with_context(|| format!("Failed to open {}", self.local.display()))?;
            adapter
                .write_stream(&self.remote, ReaderStream::new(file).boxed())
                .await?;
        }

        info!(local = %self.local.display(), remote = %self.remote, "Upload complete");
        report(ctx, "put", &format!("Uploaded {}", self.remote), json!({ "path": self.remote }));
        Ok(())
    }
}

/// Delete a remote file or directory
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Remote path
    pub path: String,
    /// Delete a directory and everything below it
    #[arg(short, long)]
    pub recursive: bool,
}

impl RemoveCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;

        if self.recursive {
            adapter.delete_directory(&self.path).await?;
        } else {
            adapter.delete(&self.path).await?;
        }

        report(ctx, "rm", &format!("Deleted {}", self.path), json!({ "path": self.path }));
        Ok(())
    }
}

/// Create a remote directory
#[derive(Debug, Args)]
pub struct MkdirCommand {
    /// Remote path
    pub path: String,
}

impl MkdirCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        adapter.create_directory(&self.path).await?;

        report(ctx, "mkdir", &format!("Created {}", self.path), json!({ "path": self.path }));
        Ok(())
    }
}

/// Copy a remote item
#[derive(Debug, Args)]
pub struct CopyCommand {
    pub source: String,
    pub destination: String,
}

impl CopyCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        adapter.copy(&self.source, &self.destination).await?;

        // Graph copies asynchronously; the request was accepted, nothing more
        report(
            ctx,
            "cp",
            &format!("Copy of {} to {} accepted", self.source, self.destination),
            json!({ "source": self.source, "destination": self.destination }),
        );
        Ok(())
    }
}

/// Move a remote item
#[derive(Debug, Args)]
pub struct MoveCommand {
    pub source: String,
    pub destination: String,
}

impl MoveCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let adapter = ctx.adapter().await?;
        adapter.move_file(&self.source, &self.destination).await?;

        report(
            ctx,
            "mv",
            &format!("Moved {} to {}", self.source, self.destination),
            json!({ "source": self.source, "destination": self.destination }),
        );
        Ok(())
    }
}

fn report(ctx: &AppContext, operation: &str, message: &str, mut details: serde_json::Value) {
    let formatter = ctx.formatter();
    if ctx.is_json() {
        if let Some(map) = details.as_object_mut() {
            map.insert("success".into(), true.into());
            map.insert("operation".into(), operation.into());
        }
        formatter.print_json(&details);
    } else {
        formatter.success(message);
    }
}
