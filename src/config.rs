use std::{sync::LazyLock, time::Duration};

pub static SITE_CONFIG: LazyLock<SiteConfig> = LazyLock::new(SiteConfig::from_env);

const DEFAULT_CONTACT_TIMEOUT_SECS: u64 = 10;

/// Server-side settings that don't belong in `[package.metadata.leptos]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub contact_endpoint: Option<String>,
    pub contact_timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_endpoint: None,
            contact_timeout: Duration::from_secs(DEFAULT_CONTACT_TIMEOUT_SECS),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("CONTACT_ENDPOINT") {
            config.contact_endpoint = Some(v);
        }
        if let Some(v) = non_empty("APP__CONTACT_ENDPOINT") {
            config.contact_endpoint = Some(v);
        }

        if let Some(v) = non_empty("CONTACT_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.contact_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %v, "ignoring invalid CONTACT_TIMEOUT_SECS"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> SiteConfig {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        SiteConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(config_from(&[]), SiteConfig::default());
        assert_eq!(SiteConfig::default().contact_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_prefixed_endpoint_overrides_plain() {
        let config = config_from(&[
            ("CONTACT_ENDPOINT", "https://a.example/f"),
            ("APP__CONTACT_ENDPOINT", "https://b.example/f"),
        ]);
        assert_eq!(config.contact_endpoint.as_deref(), Some("https://b.example/f"));
    }

    #[test]
    fn test_blank_endpoint_means_unconfigured() {
        let config = config_from(&[("CONTACT_ENDPOINT", "  ")]);
        assert_eq!(config.contact_endpoint, None);
    }

    #[test]
    fn test_timeout_parsing() {
        let config = config_from(&[("CONTACT_TIMEOUT_SECS", "3")]);
        assert_eq!(config.contact_timeout, Duration::from_secs(3));
        let config = config_from(&[("CONTACT_TIMEOUT_SECS", "0")]);
        assert_eq!(config.contact_timeout, Duration::from_secs(10));
        let config = config_from(&[("CONTACT_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.contact_timeout, Duration::from_secs(10));
    }
}
