//! Token command - inspect or drop the cached access token

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use super::AppContext;

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Acquire (or reuse) an access token and report it
    Show {
        /// Print the full token instead of a prefix
        #[arg(long)]
        reveal: bool,
    },
    /// Remove the cached token so the next command requests a new one
    Clear,
}

impl TokenCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let config = ctx.load_config()?;
        let provider = ctx.token_provider(&config).await?;
        let formatter = ctx.formatter();

        match self {
            TokenCommand::Show { reveal } => {
                let token = provider.get_access_token().await?;
                let shown = if *reveal { token.clone() } else { mask(&token) };

                if ctx.is_json() {
                    formatter.print_json(&json!({
                        "token": shown,
                        "length": token.len(),
                        "cache_backend": config.cache.backend,
                    }));
                } else {
                    formatter.success("Access token available");
                    formatter.info(&format!("Token: {}", shown));
                }
            }
            TokenCommand::Clear => {
                provider.invalidate().await;
                formatter.success("Cached access token cleared");
            }
        }

        Ok(())
    }
}

/// Keeps the first 8 characters
fn mask(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}...", prefix)
}
