use anyhow::Result;
use std::io::Write;

use crate::{http::Transport, runtime::Runtime};

use super::{Config, display_value};

/// Show service health and when its rates were last refreshed.
#[tracing::instrument(skip(config, out))]
pub async fn status<R: Runtime, T: Transport, W: Write>(
    config: &Config<R, T>,
    out: &mut W,
) -> Result<()> {
    let response = config.client.status().await?;
    writeln!(out, "Status: {}", display_value(&response["status"]))?;
    writeln!(out, "Updated: {}", display_value(&response["updated"]))?;
    Ok(())
}
