use std::time::Duration;

use crate::Secret;

pub const DEFAULT_API_VERSION: &str = "2024-04";

#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// The shop to query. One of
    /// * a bare shop name, e.g. "my-shop", which expands to `https://my-shop.myshopify.com`,
    /// * a domain, e.g. "my-shop.myshopify.com" or "shop.example.com", which is queried over https,
    /// * a full base URL, e.g. "http://127.0.0.1:8080", which is used as is.
    pub shop: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    pub admin_access_token: Secret<String>,
    pub api_version: String,
    /// Applied to every request. `None` leaves the transport default (no timeout) in place.
    pub request_timeout: Option<Duration>,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            shop: String::default(),
            api_key: String::default(),
            api_secret: Secret::default(),
            admin_access_token: Secret::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: None,
        }
    }
}

impl ShopifyConfig {
    pub fn new(shop: &str, admin_access_token: Secret<String>) -> Self {
        Self { shop: shop.to_string(), admin_access_token, ..Default::default() }
    }

    /// The scheme and host that all Admin API paths hang off, without a trailing slash.
    pub fn base_url(&self) -> String {
        let shop = self.shop.trim().trim_end_matches('/');
        if shop.starts_with("http://") || shop.starts_with("https://") {
            shop.to_string()
        } else if shop.contains('.') {
            format!("https://{shop}")
        } else {
            format!("https://{shop}.myshopify.com")
        }
    }

    /// Private apps authenticate with their API key and secret over basic auth.
    pub fn has_private_app_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.is_empty()
    }
}
