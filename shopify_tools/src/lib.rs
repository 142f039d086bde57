//! # Shopify tools
//! A thin client for the parts of the Shopify Admin REST API that `order_bar` needs: authenticating with either an
//! admin access token or private-app credentials, and counting the orders created in a time window.

mod api;
mod config;
mod error;
mod secret;

pub mod data_objects;

pub use api::ShopifyApi;
pub use config::{ShopifyConfig, DEFAULT_API_VERSION};
pub use data_objects::{OrderCount, OrderCountQuery, OrderStatus};
pub use error::ShopifyApiError;
pub use secret::Secret;
