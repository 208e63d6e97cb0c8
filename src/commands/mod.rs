//! `ocx` subcommands.
//!
//! Each command writes its human-readable output to `out` so it can be
//! captured in tests.

mod config;
mod convert;
mod currencies;
mod history;
mod rates;
mod status;

use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use std::io::Write;

pub use config::{API_URL_ENV, ClientOptions, Config, client_config, resolve_api_url};
pub use convert::convert;
pub use currencies::currencies;
pub use history::history;
pub use rates::rates;
pub use status::status;

/// Strings print without quotes; everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The `rates` object of a `/rates` or `/history` response.
fn rate_table(response: &Value) -> Result<&Map<String, Value>> {
    response
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow!("Unexpected response from API: missing 'rates' object"))
}

fn write_rate_lines<'a, W, I>(out: &mut W, entries: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a String, String)>,
{
    for (code, value) in entries {
        writeln!(out, "{}: {}", code, value)?;
    }
    Ok(())
}
