use crate::types::config::ReputeConfig;

/// Rewrites content-addressed URIs (`<scheme>://<hash>`) onto an HTTP gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    scheme: String,
    host: String,
}

impl Gateway {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    pub fn from_config(config: &ReputeConfig) -> Self {
        Self::new(config.gateway_scheme(), config.gateway_host())
    }

    pub fn resolve(&self, uri: &str) -> String {
        let prefix = format!("{}://", self.scheme);
        match uri.strip_prefix(&prefix) {
            Some(rest) => format!("https://{}/{}/{}", self.host, self.scheme, rest),
            None => uri.to_string(),
        }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::from_config(&ReputeConfig::default())
    }
}
