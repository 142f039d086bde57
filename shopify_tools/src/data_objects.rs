use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::ShopifyApiError;

/// The body returned by `/orders/count.json`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct OrderCount {
    pub count: u64,
}

/// The `status` filter accepted by the orders endpoints. When no status is given, Shopify only counts open orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Cancelled,
    Any,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
            Self::Any => "any",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = ShopifyApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "any" => Ok(Self::Any),
            _ => Err(ShopifyApiError::InvalidOrderStatus(s.to_string())),
        }
    }
}

/// Filters for an order count request.
#[derive(Debug, Clone, Default)]
pub struct OrderCountQuery {
    pub created_at_min: Option<DateTime<FixedOffset>>,
    pub created_at_max: Option<DateTime<FixedOffset>>,
    pub status: Option<OrderStatus>,
}

impl OrderCountQuery {
    pub fn created_between(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { created_at_min: Some(start), created_at_max: Some(end), status: None }
    }

    pub fn with_status(mut self, status: Option<OrderStatus>) -> Self {
        self.status = status;
        self
    }

    /// Query string parameters. Timestamps keep their UTC offset, e.g. `2024-03-10T00:00:00+02:00`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(min) = &self.created_at_min {
            params.push(("created_at_min", min.to_rfc3339_opts(SecondsFormat::Secs, false)));
        }
        if let Some(max) = &self.created_at_max {
            params.push(("created_at_max", max.to_rfc3339_opts(SecondsFormat::Secs, false)));
        }
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        params
    }
}
