use crate::config::toml_config::StockServiceConfig;
use crate::domain::model::{ProductDetails, ProductId, Stock};
use crate::domain::ports::StockService;
use crate::utils::error::{CartError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_STOCK_PATH: &str = "/stock/{id}";
pub const DEFAULT_PRODUCT_PATH: &str = "/products/{id}";

/// Stock service backed by a JSON HTTP API (json-server style).
#[derive(Debug, Clone)]
pub struct HttpStockService {
    client: Client,
    base_url: String,
    stock_path: String,
    product_path: String,
}

impl HttpStockService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            stock_path: DEFAULT_STOCK_PATH.to_string(),
            product_path: DEFAULT_PRODUCT_PATH.to_string(),
        }
    }

    pub fn from_config(config: &StockServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(headers) = &config.headers {
            builder = builder.default_headers(build_headers(headers)?);
        }

        let client = builder.build()?;
        Ok(Self::with_client(client, config.base_url.clone())
            .with_paths(config.stock_path.clone(), config.product_path.clone()))
    }

    pub fn with_paths(mut self, stock_path: impl Into<String>, product_path: impl Into<String>) -> Self {
        self.stock_path = stock_path.into();
        self.product_path = product_path.into();
        self
    }

    pub fn stock_url(&self, product_id: ProductId) -> String {
        self.url_for(&self.stock_path, product_id)
    }

    pub fn product_url(&self, product_id: ProductId) -> String {
        self.url_for(&self.product_path, product_id)
    }

    fn url_for(&self, template: &str, product_id: ProductId) -> String {
        format!(
            "{}{}",
            self.base_url,
            template.replace("{id}", &product_id.to_string())
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(CartError::ApiStatusError {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

fn build_headers(headers: &std::collections::HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            CartError::InvalidConfigValueError {
                field: "stock_service.headers".to_string(),
                value: name.clone(),
                reason: e.to_string(),
            }
        })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| CartError::InvalidConfigValueError {
                field: format!("stock_service.headers.{}", name),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[async_trait::async_trait]
impl StockService for HttpStockService {
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
        self.get_json(self.stock_url(product_id)).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductDetails> {
        self.get_json(self.product_url(product_id)).await
    }
}
