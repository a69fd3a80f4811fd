use crate::error::ReputeError;
use serde::Deserialize;
use std::path::{Component, Path};
use std::time::Duration;

pub const DEFAULT_GATEWAY_SCHEME: &str = "ipfs";
pub const DEFAULT_GATEWAY_HOST: &str = "ipfs.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_STATE_FILE: &str = ".repute/ledger.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReputeConfig {
    pub gateway: Option<GatewayConfig>,
    pub http: Option<HttpConfig>,
    pub ledger: Option<LedgerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub use_system_proxy: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub state_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub use_system_proxy: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("repute/{}", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
        }
    }
}

impl ReputeConfig {
    pub fn gateway_scheme(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|gateway| gateway.scheme.as_deref())
            .unwrap_or(DEFAULT_GATEWAY_SCHEME)
    }

    pub fn gateway_host(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|gateway| gateway.host.as_deref())
            .unwrap_or(DEFAULT_GATEWAY_HOST)
    }

    pub fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        match &self.http {
            Some(http) => HttpSettings {
                timeout: http
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                user_agent: http.user_agent.clone().unwrap_or(defaults.user_agent),
                use_system_proxy: http
                    .use_system_proxy
                    .unwrap_or(defaults.use_system_proxy),
            },
            None => defaults,
        }
    }

    pub fn state_file(&self) -> &str {
        self.ledger
            .as_ref()
            .and_then(|ledger| ledger.state_file.as_deref())
            .unwrap_or(DEFAULT_STATE_FILE)
    }

    pub fn validate(&self) -> Result<(), ReputeError> {
        let scheme = self.gateway_scheme();
        if scheme.trim().is_empty() || scheme.contains(':') || scheme.contains('/') {
            return Err(ReputeError::ConfigParse(format!(
                "gateway.scheme must be a bare scheme name (found {scheme:?})"
            )));
        }

        let host = self.gateway_host();
        if host.trim().is_empty() || host.contains('/') {
            return Err(ReputeError::ConfigParse(format!(
                "gateway.host must be a bare host name (found {host:?})"
            )));
        }

        if let Some(timeout_secs) = self.http.as_ref().and_then(|http| http.timeout_secs) {
            if timeout_secs == 0 {
                return Err(ReputeError::ConfigParse(
                    "http.timeout_secs must be greater than 0".to_string(),
                ));
            }
        }

        let state_file = Path::new(self.state_file());
        if state_file.as_os_str().is_empty() {
            return Err(ReputeError::ConfigParse(
                "ledger.state_file cannot be empty".to_string(),
            ));
        }
        if state_file.is_absolute()
            || state_file
                .components()
                .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(ReputeError::ConfigParse(format!(
                "ledger.state_file must stay inside the workspace: {}",
                state_file.display()
            )));
        }

        Ok(())
    }
}
