use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::{http::Transport, runtime::Runtime};

use super::{Config, display_value, rate_table, write_rate_lines};

/// Show the rates relative to `base` on `date`, caching the response.
#[tracing::instrument(skip(config, out))]
pub async fn history<R: Runtime, T: Transport, W: Write>(
    config: &Config<R, T>,
    base: &str,
    date: &str,
    fast: bool,
    out: &mut W,
) -> Result<()> {
    if fast {
        let cache = config.load_cache();
        if let Some(cached) = cache.history_entry(base, date) {
            writeln!(out, "Rates for {} on {} (cached):", base, date)?;
            return write_rate_lines(
                out,
                rate_table(cached)?
                    .iter()
                    .map(|(code, rate)| (code, display_value(rate))),
            );
        }
        debug!("No cached history for {} on {}, asking the API", base, date);
    }

    let response = config.client.history(base, date).await?;
    config.update_cache(|cache| cache.insert_history(base, date, response.clone()));

    writeln!(out, "Rates for {} on {}:", base, date)?;
    write_rate_lines(
        out,
        rate_table(&response)?
            .iter()
            .map(|(code, rate)| (code, display_value(rate))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_utils::{BASE, config, output, runtime_with_cache};
    use crate::http::MockTransport;
    use serde_json::Value;

    #[tokio::test]
    async fn test_history_from_api_merges_into_cache() {
        let mut runtime = runtime_with_cache(Some(
            r#""history": {"USD_2022-12-31": {"base": "USD", "rates": {"EUR": 0.93}}}"#,
        ));
        runtime
            .expect_write()
            .withf(|_, contents| {
                let written: Value = serde_json::from_slice(contents).unwrap();
                let history = written["history"].as_object().unwrap();
                history.contains_key("USD_2022-12-31") && history.contains_key("USD_2023-01-01")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|url, query, _| {
                url.to_string() == format!("{}/history", BASE)
                    && query.to_vec()
                        == vec![
                            ("base".to_string(), "USD".to_string()),
                            ("date".to_string(), "2023-01-01".to_string()),
                        ]
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(r#"{"base":"USD","date":"2023-01-01","rates":{"EUR":0.94,"GBP":0.83}}"#.to_string())
            });

        let config = config(runtime, transport);
        let mut out = Vec::new();
        history(&config, "USD", "2023-01-01", false, &mut out)
            .await
            .unwrap();

        assert_eq!(
            output(out),
            "Rates for USD on 2023-01-01:\nEUR: 0.94\nGBP: 0.83\n"
        );
    }

    #[tokio::test]
    async fn test_history_fast_uses_cached_entry() {
        let mut transport = MockTransport::new();
        transport.expect_get().never();

        let runtime = runtime_with_cache(Some(
            r#""history": {"USD_2023-01-01": {"base": "USD", "rates": {"EUR": 0.94}}}"#,
        ));
        let config = config(runtime, transport);
        let mut out = Vec::new();
        history(&config, "USD", "2023-01-01", true, &mut out)
            .await
            .unwrap();

        assert_eq!(output(out), "Rates for USD on 2023-01-01 (cached):\nEUR: 0.94\n");
    }

    #[tokio::test]
    async fn test_history_fast_misses_other_dates() {
        let mut runtime = runtime_with_cache(Some(
            r#""history": {"USD_2023-01-01": {"base": "USD", "rates": {"EUR": 0.94}}}"#,
        ));
        runtime.expect_write().returning(|_, _| Ok(()));

        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _, _| Ok(r#"{"rates":{"EUR":0.95}}"#.to_string()));

        let config = config(runtime, transport);
        let mut out = Vec::new();
        history(&config, "USD", "2023-01-02", true, &mut out)
            .await
            .unwrap();

        assert_eq!(output(out), "Rates for USD on 2023-01-02:\nEUR: 0.95\n");
    }
}
