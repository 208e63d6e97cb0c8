use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::{cache::Cache, http::Transport, runtime::Runtime};

use super::{Config, display_value};

/// Convert `amount` from one currency to another.
///
/// With `fast`, the conversion is computed from the cached rate table when it
/// knows both currencies, without touching the network.
#[tracing::instrument(skip(config, out))]
pub async fn convert<R: Runtime, T: Transport, W: Write>(
    config: &Config<R, T>,
    from: &str,
    to: &str,
    amount: f64,
    fast: bool,
    out: &mut W,
) -> Result<()> {
    if fast {
        if let Some((result, rate)) = cached_conversion(&config.load_cache(), from, to, amount) {
            writeln!(out, "{} {} = {} {} (rate: {})", amount, from, result, to, rate)?;
            return Ok(());
        }
        debug!("No cached rates for {} and {}, asking the API", from, to);
    }

    let response = config.client.convert(from, to, amount).await?;
    writeln!(
        out,
        "{} {} = {} {} (rate: {})",
        amount,
        from,
        display_value(&response["result"]),
        to,
        display_value(&response["rate"])
    )?;
    Ok(())
}

/// Returns `(result, rate)` computed from the cached rate table.
fn cached_conversion(cache: &Cache, from: &str, to: &str, amount: f64) -> Option<(f64, f64)> {
    let from_rate = cache.rate(from).filter(|r| *r != 0.0)?;
    let to_rate = cache.rate(to).filter(|r| *r != 0.0)?;
    Some((amount / from_rate * to_rate, to_rate / from_rate))
}
