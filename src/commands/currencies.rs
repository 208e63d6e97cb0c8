use anyhow::{Result, anyhow};
use log::debug;
use serde_json::{Map, Value};
use std::io::Write;

use crate::{http::Transport, runtime::Runtime};

use super::Config;

/// List the supported currencies, refreshing the cache.
#[tracing::instrument(skip(config, out))]
pub async fn currencies<R: Runtime, T: Transport, W: Write>(
    config: &Config<R, T>,
    fast: bool,
    out: &mut W,
) -> Result<()> {
    if fast {
        let cache = config.load_cache();
        if let Some(table) = cache.currency_table() {
            writeln!(out, "Supported currencies (cached):")?;
            return write_currency_lines(out, table);
        }
        debug!("No cached currencies, asking the API");
    }

    let response = config.client.currencies().await?;
    config.update_cache(|cache| cache.currencies = Some(response.clone()));

    let table = response
        .as_object()
        .ok_or_else(|| anyhow!("Unexpected response from API: expected a currency mapping"))?;
    writeln!(out, "Supported currencies:")?;
    write_currency_lines(out, table)
}

fn write_currency_lines<W: Write>(out: &mut W, table: &Map<String, Value>) -> Result<()> {
    for (code, info) in table {
        let description = info
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        writeln!(out, "{}: {}", code, description)?;
    }
    Ok(())
}
