//! HTTP client for the bot backend
//!
//! All dashboard traffic goes through [`BackendClient`] so transport and
//! application failures are told apart in exactly one place.

use super::error::ApiError;
use super::retry::{with_replay, Replay};
use crate::config::{Config, RetryConfig};
use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Backend endpoint paths
pub struct Endpoints;

impl Endpoints {
    pub const CONFIG: &'static str = "/config";
    pub const CONFIG_STRATEGY: &'static str = "/config/strategy";
    pub const CONFIG_RISK: &'static str = "/config/risk";
    pub const CONFIG_PROFIT: &'static str = "/config/profit";
    pub const BOT_START: &'static str = "/bot/start";
    pub const BOT_STOP: &'static str = "/bot/stop";
    pub const BOT_OPTIMIZE: &'static str = "/bot/optimize";
    pub const BOT_BACKTEST: &'static str = "/bot/backtest";
    pub const WALLETS: &'static str = "/wallets";
    pub const WALLET_RESTORE: &'static str = "/wallet/restore";
    pub const TRADES: &'static str = "/trades";
    pub const PROFIT: &'static str = "/profit";

    pub fn qr(wallet_name: &str) -> String {
        format!("/qr/{}", urlencoding::encode(wallet_name))
    }

    pub fn wallet_backup(wallet_name: &str) -> String {
        format!("/wallet/backup/{}", urlencoding::encode(wallet_name))
    }
}

/// Shared, cheaply cloneable backend client
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            retry: config.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON snapshot, retrying transient failures
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path, &[], Replay::Safe).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.get(path, query, Replay::Safe).await
    }

    /// GET that starts work on the backend, sent exactly once
    pub async fn get_json_once<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path, &[], Replay::Once).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        replay: Replay,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let url = url.as_str();
        let this = self;
        with_replay(&self.retry, replay, path, || async move {
            debug!("GET {}", url);
            let response = this.send(this.client.get(url).query(query)).await?;
            response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
        })
        .await
    }

    /// POST a JSON body, sent once
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.send(self.client.post(&url).json(body)).await?;
        Ok(Self::ack_body(response).await)
    }

    /// POST without a body, sent once
    pub async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.send(self.client.post(&url)).await?;
        Ok(Self::ack_body(response).await)
    }

    /// POST a multipart form, sent once
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("POST {} (multipart)", url);
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Ok(Self::ack_body(response).await)
    }

    /// POST without a body and return the raw response bytes
    pub async fn post_for_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path);
        debug!("POST {} (download)", url);
        let response = self.send(self.client.post(&url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_network_error(&e))?;
        Ok(bytes.to_vec())
    }

    /// Send a request and split failures into transport vs application
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_network_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(response)
    }

    /// Acks are opaque; keep whatever JSON came back, `Null` otherwise
    async fn ack_body(response: Response) -> Value {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str(&text).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_backend::{spawn_backend, unreachable_url, FakeState};
    use crate::types::BotConfig;

    #[test]
    fn test_endpoint_paths_are_encoded() {
        assert_eq!(Endpoints::qr("wallet-7"), "/qr/wallet-7");
        assert_eq!(Endpoints::qr("Paper Trading Wallet"), "/qr/Paper%20Trading%20Wallet");
        assert_eq!(Endpoints::wallet_backup("a/b"), "/wallet/backup/a%2Fb");
    }

    #[tokio::test]
    async fn test_get_json() {
        let backend = spawn_backend(FakeState::default()).await;
        let client = BackendClient::new(&Config::with_api_url(&backend.base_url)).unwrap();

        let config: BotConfig = client.get_json(Endpoints::CONFIG).await.unwrap();
        assert_eq!(config.strategy.level1, 9);
        assert_eq!(backend.hits("GET /config"), 1);
    }

    #[tokio::test]
    async fn test_application_error_carries_detail() {
        let backend = spawn_backend(FakeState {
            reject_config_writes: Some("invalid levels".to_string()),
            ..Default::default()
        })
        .await;
        let client = BackendClient::new(&Config::with_api_url(&backend.base_url)).unwrap();

        let err = client
            .post_json(Endpoints::CONFIG_RISK, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "invalid levels");
    }

    #[tokio::test]
    async fn test_transport_error() {
        let mut config = Config::with_api_url(&unreachable_url().await);
        config.retry.max_retries = 0;
        let client = BackendClient::new(&config).unwrap();

        let err = client.post_empty(Endpoints::BOT_START).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
