//! Shared helper functions for CLI commands
//!
//! Config/session/client assembly and formatting utilities used across
//! multiple command modules.

use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::client::{ApiClient, Transport};
use crate::core::config::Config;
use crate::core::lifecycle::Lifecycle;
use crate::core::session::resolve_session;
use crate::core::store::{QueryState, Store};
use crate::entities::{parse_wo_reference, WorkOrder};

/// Effective configuration: file and environment, then command-line overrides
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    config.merge(Config {
        api_url: global.api_url.clone(),
        mechanic_id: global.mechanic,
        ..Default::default()
    });
    config
}

/// API client for the effective configuration and session
pub fn api_client(global: &GlobalOpts, config: &Config) -> Result<ApiClient> {
    let session = resolve_session(global.token.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    ApiClient::from_config(config, session).map_err(|e| miette::miette!("{}", e))
}

pub fn lifecycle(config: &Config) -> Lifecycle {
    Lifecycle::new(config.mechanic_id)
}

/// Resolve `Auto` against the configured default, then the command's own default
pub fn resolve_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| f.parse::<OutputFormat>().ok())
        .filter(|f| *f != OutputFormat::Auto)
        .unwrap_or(fallback)
}

/// Find a work order by `42` or `WO-00042` in the loaded list
pub fn find_work_order<T: Transport>(store: &mut Store<'_, T>, reference: &str) -> Result<WorkOrder> {
    let id = parse_wo_reference(reference)
        .ok_or_else(|| miette::miette!("Invalid work order reference '{}'. Use 42 or WO-00042", reference))?;
    match store.work_orders() {
        QueryState::Ready(list) => list
            .iter()
            .find(|wo| wo.id == id)
            .cloned()
            .ok_or_else(|| miette::miette!("No work order found matching '{}'", reference)),
        QueryState::Failed(message) => Err(miette::miette!("Failed to load work orders: {}", message)),
        QueryState::Idle => Err(miette::miette!("Work orders are not loaded")),
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::fake_client;
    use crate::core::client::Method;
    use serde_json::json;

    fn global(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: false,
            api_url: None,
            token: None,
            mechanic: None,
        }
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ééééé", 4), "é...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_resolve_format() {
        let config = Config {
            default_format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_format(&global(OutputFormat::Auto), &config, OutputFormat::Tsv),
            OutputFormat::Json
        );
        assert_eq!(
            resolve_format(&global(OutputFormat::Csv), &config, OutputFormat::Tsv),
            OutputFormat::Csv
        );
        assert_eq!(
            resolve_format(&global(OutputFormat::Auto), &Config::default(), OutputFormat::Tsv),
            OutputFormat::Tsv
        );
    }

    #[test]
    fn test_find_work_order() {
        let client = fake_client();
        client.transport().json(
            Method::Get,
            "/work-orders",
            json!([{"id": 42, "unit_id": 1, "title": "Lights"}]),
        );
        let mut store = Store::new(&client);
        assert_eq!(find_work_order(&mut store, "WO-00042").unwrap().id, 42);
        assert!(find_work_order(&mut store, "7").is_err());
        assert!(find_work_order(&mut store, "bogus").is_err());
    }
}
