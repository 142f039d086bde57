use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::de::DeserializeOwned;

use crate::{config::ShopifyConfig, OrderCount, OrderCountQuery, ShopifyApiError};

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
    use_basic_auth: bool,
}

impl ShopifyApi {
    /// Builds a client for the configured shop. An admin access token takes precedence; without one, the API key and
    /// secret are sent as basic auth credentials on every request.
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let use_basic_auth = if !config.admin_access_token.is_empty() {
            false
        } else if config.has_private_app_credentials() {
            true
        } else {
            return Err(ShopifyApiError::MissingCredentials);
        };
        let mut headers = HeaderMap::with_capacity(2);
        if !use_basic_auth {
            let mut val = HeaderValue::from_str(config.admin_access_token.reveal().trim())
                .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
            val.set_sensitive(true);
            headers.insert("X-Shopify-Access-Token", val);
        }
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        debug!("Shopify client ready for {}", config.base_url());
        Ok(Self { config, client: Arc::new(client), use_basic_auth })
    }

    /// Sends a `GET` to an Admin REST endpoint and deserializes the JSON reply.
    pub async fn rest_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ShopifyApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.get(url);
        if self.use_basic_auth {
            req = req.basic_auth(&self.config.api_key, Some(self.config.api_secret.reveal()));
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/admin/api/{}{path}", self.config.base_url(), self.config.api_version)
    }

    /// Counts the orders matching `query`. Shopify answers with a single aggregate, so there is nothing to page
    /// through.
    pub async fn order_count(&self, query: &OrderCountQuery) -> Result<u64, ShopifyApiError> {
        let params = query.to_params();
        let params = params.iter().map(|(k, v)| (*k, v.as_str())).collect::<Vec<(&str, &str)>>();
        debug!("Fetching order count. {params:?}");
        let result = self.rest_query::<OrderCount>("/orders/count.json", &params).await?;
        trace!("Order count: {}", result.count);
        Ok(result.count)
    }
}
