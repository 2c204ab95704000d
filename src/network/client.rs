//! HTTP client for making requests to the geo-search provider

use crate::config::{OutgoingSettings, ProxySettings};
use crate::providers::{ProviderRequest, ProviderResponse};
use anyhow::Result;
use reqwest::{Client, ClientBuilder, Proxy, Response};
use std::time::Duration;

/// HTTP client wrapper with provider-facing configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder = Self::with_proxies(builder, &settings.proxies)?;

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: format!("geosearch-rs/{}", crate::VERSION),
        })
    }

    /// `all` takes precedence over per-scheme proxies
    fn with_proxies(builder: ClientBuilder, proxies: &ProxySettings) -> Result<ClientBuilder> {
        if let Some(all) = &proxies.all {
            return Ok(builder.proxy(Proxy::all(all)?));
        }
        let mut builder = builder;
        if let Some(http) = &proxies.http {
            builder = builder.proxy(Proxy::http(http)?);
        }
        if let Some(https) = &proxies.https {
            builder = builder.proxy(Proxy::https(https)?);
        }
        Ok(builder)
    }

    /// Execute a provider request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: ProviderRequest,
        timeout: Duration,
    ) -> Result<ProviderResponse> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        // the URL carries the API key, keep it out of error messages
        let response = req_builder.send().await.map_err(reqwest::Error::without_url)?;

        Self::parse_response(response).await
    }

    /// Parse response into ProviderResponse
    async fn parse_response(response: Response) -> Result<ProviderResponse> {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(reqwest::Error::without_url)?;

        Ok(ProviderResponse { status, text })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
