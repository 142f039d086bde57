use std::{path::PathBuf, time::Duration};

use cucumber::World;
use log::*;
use order_bar::{
    config::BarConfig,
    notifier::WidgetTarget,
    runner::run,
    scheduler::CycleErrorPolicy,
    test_utils::{MockServices, WidgetUpdate, MOCK_ACCESS_TOKEN},
};
use shopify_tools::{Secret, ShopifyConfig};
use tempfile::TempDir;

pub const SHOP_DOMAIN: &str = "shop.example.com";
pub const WIDGET_UUID: &str = "E2E-WIDGET-0001";

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct BarWorld {
    pub services: Option<MockServices>,
    pub icon_dir: TempDir,
    pub error_policy: CycleErrorPolicy,
    // The result of the last run of the order bar, with the error rendered as a string
    pub outcome: Option<Result<(), String>>,
}

impl BarWorld {
    fn new() -> Self {
        let _ = env_logger::try_init().ok();
        let icon_dir = TempDir::new().expect("Could not create a temporary icon directory");
        Self { services: None, icon_dir, error_policy: CycleErrorPolicy::SkipCycle, outcome: None }
    }

    pub async fn start_services(&mut self) {
        let services = MockServices::start().await.expect("Could not start the mock services");
        info!("🌍️ Mock services running at {}", services.url);
        self.services = Some(services);
    }

    pub fn services(&self) -> &MockServices {
        self.services.as_ref().expect("Mock services not started")
    }

    pub fn config(&self, updates: u64) -> BarConfig {
        let services = self.services();
        let shopify = ShopifyConfig::new(&services.url, Secret::new(MOCK_ACCESS_TOKEN.to_string()));
        let widget = WidgetTarget::new("127.0.0.1", services.addr.port(), WIDGET_UUID);
        let mut config = BarConfig::new(SHOP_DOMAIN, shopify, widget);
        config.favicon_service_url = services.favicon_service_url();
        config.icon_dir = self.icon_dir.path().to_path_buf();
        config.request_timeout = Duration::from_secs(5);
        config.schedule.interval = Duration::from_millis(25);
        config.schedule.error_policy = self.error_policy;
        config.schedule.max_updates = Some(updates);
        config
    }

    pub async fn run_order_bar(&mut self, updates: u64) {
        let config = self.config(updates);
        debug!("🌍️ Running the order bar for {updates} updates");
        let outcome = run(config).await.map_err(|e| e.to_string());
        debug!("🌍️ Order bar finished: {outcome:?}");
        self.outcome = Some(outcome);
    }

    pub fn widget_updates(&self) -> Vec<WidgetUpdate> {
        self.services().widget_updates()
    }

    pub fn expected_icon_path(&self) -> PathBuf {
        self.icon_dir.path().join(format!("{SHOP_DOMAIN}.png"))
    }
}
