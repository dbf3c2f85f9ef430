use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Client;
use serde_json::Value;

use super::types::PriceQuote;
use crate::config::Config;
use crate::error::{ColesListsError, Result};

/// The two remote services an export talks to
#[async_trait]
pub trait ShoppingApi: Send + Sync {
    /// Raw lists response; normalization happens in the caller
    async fn fetch_lists(&self, subscription_key: &str) -> Result<Value>;

    async fn fetch_price(&self, product_id: &str) -> Result<PriceQuote>;
}

/// HTTP client for the lists and price APIs
pub struct ColesClient {
    client: Client,
    lists_url: String,
    price_url: String,
    cookie: Option<String>,
}

impl ColesClient {
    /// Create a new client from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| {
            ColesListsError::Other(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            lists_url: config.api.lists_url.clone(),
            price_url: config.api.price_url.trim_end_matches('/').to_string(),
            cookie: config.api.cookie.clone().filter(|c| !c.trim().is_empty()),
        })
    }

    /// Attach the session cookie, the way a browser sends ambient cookies
    fn with_cookie(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self
            .cookie
            .as_deref()
            .and_then(|c| HeaderValue::from_str(c).ok())
        {
            Some(value) => req.header(COOKIE, value),
            None => req,
        }
    }

    pub fn price_url_for(&self, product_id: &str) -> String {
        format!("{}/{}", self.price_url, urlencoding::encode(product_id))
    }

    /// Fetch a page's HTML with the session cookie
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::info!("Fetching page {}", url);
        let response = self.with_cookie(self.client.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ColesListsError::HttpError(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ShoppingApi for ColesClient {
    async fn fetch_lists(&self, subscription_key: &str) -> Result<Value> {
        tracing::info!("Fetching shopping lists from {}", self.lists_url);

        let request = self
            .client
            .get(&self.lists_url)
            .query(&[("type", "SHOPPING_LIST"), ("subscription-key", subscription_key)])
            .header(CONTENT_TYPE, "application/json");

        let response = self.with_cookie(request).send().await?;

        let status = response.status();
        tracing::info!("Shopping lists API response status: {}", status);

        if !status.is_success() {
            return Err(ColesListsError::HttpError(status.as_u16()));
        }

        let data: Value = response.json().await?;
        tracing::debug!("Shopping lists API response data: {}", data);
        Ok(data)
    }

    async fn fetch_price(&self, product_id: &str) -> Result<PriceQuote> {
        let url = self.price_url_for(product_id);
        tracing::debug!("Fetching price for product {} from {}", product_id, url);

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Price API response status for {}: {}", product_id, status);

        if !status.is_success() {
            return Err(ColesListsError::HttpError(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
