use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use log::*;
use shopify_tools::{OrderCountQuery, OrderStatus, ShopifyApi};

use crate::errors::FetchError;

/// The half-open interval `[start, end)` that today's orders are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl OrderWindow {
    /// From midnight of `now`'s calendar day, in `now`'s time zone, up to `now`.
    pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let start = start_of_day(&now.timezone(), now.date_naive()).unwrap_or_else(|| now.clone());
        Self { start: start.fixed_offset(), end: now.fixed_offset() }
    }
}

/// Midnight of `date` in `tz`, the earlier one if it occurs twice. Where a DST change skips midnight, the first hour
/// of the day that exists.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
}

/// Anything that can count the orders created in a window.
#[allow(async_fn_in_trait)]
pub trait OrderCountSource {
    async fn count_orders_in(&self, window: &OrderWindow) -> Result<u64, FetchError>;
}

/// Counts orders through the Shopify Admin API, optionally restricted to orders with the given status.
#[derive(Clone)]
pub struct ShopifyOrderCounter {
    api: ShopifyApi,
    status: Option<OrderStatus>,
}

impl ShopifyOrderCounter {
    pub fn new(api: ShopifyApi, status: Option<OrderStatus>) -> Self {
        Self { api, status }
    }
}

impl OrderCountSource for ShopifyOrderCounter {
    async fn count_orders_in(&self, window: &OrderWindow) -> Result<u64, FetchError> {
        let query = OrderCountQuery::created_between(window.start, window.end).with_status(self.status);
        let count = self.api.order_count(&query).await?;
        Ok(count)
    }
}

pub async fn fetch_today_order_count<S, Tz>(source: &S, now: &DateTime<Tz>) -> Result<u64, FetchError>
where
    S: OrderCountSource,
    Tz: TimeZone,
{
    let window = OrderWindow::today(now);
    debug!("📊️ Counting orders created between {} and {}", window.start, window.end);
    let count = source.count_orders_in(&window).await?;
    debug!("📊️ {count} orders today");
    Ok(count)
}
