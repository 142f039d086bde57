use std::{future::Future, time::Duration};

use log::*;
use reqwest::Client;
use shopify_tools::ShopifyApi;

use crate::{
    config::BarConfig,
    errors::{BarError, CycleError},
    favicon::FaviconResolver,
    metrics::ShopifyOrderCounter,
    notifier::WidgetNotifier,
    scheduler::{UpdateCycle, UpdateScheduler},
};

pub fn http_client(timeout: Duration) -> Result<Client, BarError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("order_bar/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| BarError::InitializeError(format!("Could not create the HTTP client. {e}")))
}

/// Resolves the shop icon once, then keeps the widget up to date until the schedule ends, an update fails under the
/// `Exit` policy, or the process is interrupted.
pub async fn run(config: BarConfig) -> Result<(), BarError> {
    config.validate()?;
    let api = ShopifyApi::new(config.shopify_api_config())?;
    let client = http_client(config.request_timeout)?;

    let resolver = FaviconResolver::new(client.clone(), &config.favicon_service_url, &config.icon_dir);
    let icon = resolver.resolve_or_empty(&config.domain).await;
    match icon.path() {
        Some(path) => info!("🖼️ Using icon {}", path.display()),
        None => info!("🖼️ No icon available. The widget will show text only."),
    }

    let counter = ShopifyOrderCounter::new(api, config.order_status);
    let notifier = WidgetNotifier::new(client, config.widget.clone());
    let mut scheduler = UpdateScheduler::new(UpdateCycle::new(counter, notifier, icon), config.schedule);
    run_until_interrupted(scheduler.run(), tokio::signal::ctrl_c()).await
}

/// Drives `updates` to completion unless `interrupt` fires first. If the interrupt listener itself fails, the updates
/// carry on and only they can end the run.
async fn run_until_interrupted<U, I>(updates: U, interrupt: I) -> Result<(), BarError>
where
    U: Future<Output = Result<(), CycleError>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(updates);
    let signal = tokio::select! {
        result = &mut updates => return result.map_err(BarError::from),
        signal = interrupt => signal,
    };
    match signal {
        Ok(()) => {
            info!("👋️ Interrupted. Shutting down");
            Ok(())
        },
        Err(e) => {
            warn!("👋️ Could not listen for Ctrl-C. Updates continue until the schedule ends. {e}");
            updates.await.map_err(BarError::from)
        },
    }
}
