//! We can have a little hard-coded config, [as a
//! snack](https://knowyourmeme.com/memes/cats-can-have-a-little-salami).
//! The rest comes from the environment (or a `.env` file).

use anyhow::{Context, Result};
use std::{env, net::SocketAddr};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// htmx is pulled from a CDN rather than served by us.
pub const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.6";

/// Event name the list container listens for to re-render itself.
pub const RELOAD_EVENT: &str = "reload-notes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Item collection URL, e.g. `http://localhost:3000/items`. Without it,
    /// notes live in memory only.
    pub api_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_addr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("LISTEN_ADDR {raw_addr:?} is invalid"))?;
        let api_url = lookup("NOTES_API_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            listen_addr,
            api_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_memory_store_on_localhost() {
        let config = Config::from_lookup(lookup_in(&[])).expect("config");
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn test_reads_api_url_and_addr() {
        let config = Config::from_lookup(lookup_in(&[
            ("LISTEN_ADDR", "0.0.0.0:9000"),
            ("NOTES_API_URL", " http://localhost:3000/items "),
        ]))
        .expect("config");
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(
            config.api_url.as_deref(),
            Some("http://localhost:3000/items")
        );
    }

    #[test]
    fn test_blank_api_url_means_memory() {
        let config =
            Config::from_lookup(lookup_in(&[("NOTES_API_URL", "  ")]))
                .expect("config");
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn test_rejects_bad_addr() {
        let res = Config::from_lookup(lookup_in(&[("LISTEN_ADDR", "nope")]));
        assert!(res.is_err());
    }
}
