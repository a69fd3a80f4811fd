use super::{FetchError, MetadataFetch};
use crate::error::{ReputeError, Result};
use crate::types::config::HttpSettings;
use reqwest::blocking::Client;
use serde_json::Value;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str());
        if !settings.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ReputeError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

impl MetadataFetch for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .map_err(|e| FetchError::InvalidJson(e.to_string()))
    }
}
