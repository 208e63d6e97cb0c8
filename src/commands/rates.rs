use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::{cache::Cache, http::Transport, runtime::Runtime};

use super::{Config, display_value, rate_table, write_rate_lines};

/// Show the latest rates relative to `base`, refreshing the cache.
///
/// With `fast`, a cached rate table that includes `base` is rebased onto it
/// and printed instead.
#[tracing::instrument(skip(config, out))]
pub async fn rates<R: Runtime, T: Transport, W: Write>(
    config: &Config<R, T>,
    base: &str,
    fast: bool,
    out: &mut W,
) -> Result<()> {
    if fast {
        if let Some(table) = rebased_rates(&config.load_cache(), base) {
            writeln!(out, "Rates for {} (cached):", base)?;
            write_rate_lines(out, table.iter().map(|(code, rate)| (code, rate.to_string())))?;
            return Ok(());
        }
        debug!("No cached rate for {}, asking the API", base);
    }

    let response = config.client.rates(Some(base)).await?;
    config.update_cache(|cache| cache.rates = Some(response.clone()));

    writeln!(out, "Rates for {}:", base)?;
    write_rate_lines(
        out,
        rate_table(&response)?
            .iter()
            .map(|(code, rate)| (code, display_value(rate))),
    )?;
    Ok(())
}

/// The cached rate table expressed relative to `base`.
fn rebased_rates(cache: &Cache, base: &str) -> Option<Vec<(String, f64)>> {
    let base_rate = cache.rate(base).filter(|r| *r != 0.0)?;
    let table = cache
        .rate_table()?
        .iter()
        .filter_map(|(code, rate)| Some((code.clone(), rate.as_f64()? / base_rate)))
        .collect();
    Some(table)
}
