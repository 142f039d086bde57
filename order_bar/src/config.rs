use std::{path::PathBuf, time::Duration};

use log::*;
use shopify_tools::{OrderStatus, Secret, ShopifyConfig};

use crate::{
    cli::Arguments,
    errors::BarError,
    favicon::DEFAULT_FAVICON_SERVICE,
    notifier::WidgetTarget,
    scheduler::{CycleErrorPolicy, ScheduleConfig},
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the order bar needs to run. Built once at startup and never modified afterwards.
#[derive(Clone, Debug)]
pub struct BarConfig {
    /// The shop's public domain. Used to find the shop icon, and as the Shopify shop unless `shopify.shop` says
    /// otherwise.
    pub domain: String,
    pub shopify: ShopifyConfig,
    pub order_status: Option<OrderStatus>,
    pub widget: WidgetTarget,
    pub favicon_service_url: String,
    pub icon_dir: PathBuf,
    /// Applied to every outbound request, including the Shopify API.
    pub request_timeout: Duration,
    pub schedule: ScheduleConfig,
}

impl BarConfig {
    pub fn new(domain: &str, shopify: ShopifyConfig, widget: WidgetTarget) -> Self {
        Self {
            domain: domain.to_string(),
            shopify,
            order_status: None,
            widget,
            favicon_service_url: DEFAULT_FAVICON_SERVICE.to_string(),
            icon_dir: PathBuf::from("."),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            schedule: ScheduleConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), BarError> {
        if self.domain.trim().is_empty() {
            return Err(BarError::ConfigurationError("The shop domain is required.".to_string()));
        }
        if self.widget.uuid.trim().is_empty() {
            return Err(BarError::ConfigurationError("The widget UUID is required.".to_string()));
        }
        if self.schedule.interval.is_zero() {
            return Err(BarError::ConfigurationError("The update interval must be at least one second.".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(BarError::ConfigurationError("The request timeout must be at least one second.".to_string()));
        }
        if self.shopify.admin_access_token.is_empty() && !self.shopify.has_private_app_credentials() {
            return Err(BarError::ConfigurationError(
                "No Shopify credentials. Set an access token, or both the API key and the API secret.".to_string(),
            ));
        }
        Ok(())
    }

    /// The Shopify configuration with the request timeout applied, unless it already has one of its own.
    pub fn shopify_api_config(&self) -> ShopifyConfig {
        let mut config = self.shopify.clone();
        config.request_timeout.get_or_insert(self.request_timeout);
        config
    }
}

impl TryFrom<Arguments> for BarConfig {
    type Error = BarError;

    fn try_from(args: Arguments) -> Result<Self, Self::Error> {
        let domain = args.domain.trim().to_string();
        let shop = args.shop_url.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| domain.clone());
        let shopify = ShopifyConfig {
            shop,
            api_key: args.api_key,
            api_secret: Secret::new(args.api_secret),
            admin_access_token: Secret::new(args.access_token),
            api_version: args.api_version,
            request_timeout: None,
        };
        let error_policy = if args.exit_on_error { CycleErrorPolicy::Exit } else { CycleErrorPolicy::SkipCycle };
        let config = Self {
            domain,
            shopify,
            order_status: args.order_status,
            widget: WidgetTarget::new(&args.ip, args.port, &args.uuid),
            favicon_service_url: args.favicon_service,
            icon_dir: args.icon_dir,
            request_timeout: Duration::from_secs(args.timeout),
            schedule: ScheduleConfig {
                interval: Duration::from_secs(args.interval),
                error_policy,
                max_updates: args.max_updates,
            },
        };
        config.validate()?;
        info!("🪛️ Shopify shop: {} (API version {})", config.shopify.base_url(), config.shopify.api_version);
        info!("🪛️ Widget endpoint: {}", config.widget.endpoint());
        info!("🪛️ Update interval: {}s. On failure: {:?}", args.interval, config.schedule.error_policy);
        if let Some(status) = config.order_status {
            info!("🪛️ Only counting {status} orders");
        }
        if config.shopify.admin_access_token.is_empty() {
            warn!("🪛️ No access token was given. Falling back to API key and secret authentication.");
        }
        Ok(config)
    }
}
