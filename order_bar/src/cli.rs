use std::path::PathBuf;

use clap::Parser;
use shopify_tools::OrderStatus;

use crate::{
    favicon::DEFAULT_FAVICON_SERVICE,
    notifier::{DEFAULT_WIDGET_HOST, DEFAULT_WIDGET_PORT},
};

/// Every flag can also be set through the environment variable listed in `--help`, or in a `.env` file.
#[derive(Parser, Debug)]
#[command(version, about = "Shows today's Shopify order count on a touch bar widget")]
pub struct Arguments {
    /// Shopify API key
    #[arg(long = "api_key", env = "ORDER_BAR_SHOPIFY_API_KEY", default_value = "")]
    pub api_key: String,
    /// Shopify API secret
    #[arg(long = "api_secret", env = "ORDER_BAR_SHOPIFY_API_SECRET", default_value = "", hide_env_values = true)]
    pub api_secret: String,
    /// Shopify domain, e.g. my-shop.myshopify.com
    #[arg(long, env = "ORDER_BAR_DOMAIN")]
    pub domain: String,
    /// Shopify admin access token
    #[arg(long = "access_token", env = "ORDER_BAR_SHOPIFY_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,
    /// Widget host IP
    #[arg(long, env = "ORDER_BAR_WIDGET_IP", default_value = DEFAULT_WIDGET_HOST)]
    pub ip: String,
    /// Widget host port
    #[arg(long, env = "ORDER_BAR_WIDGET_PORT", default_value_t = DEFAULT_WIDGET_PORT)]
    pub port: u16,
    /// The widget's UUID
    #[arg(long, env = "ORDER_BAR_WIDGET_UUID")]
    pub uuid: String,
    /// Query the Admin API here instead of at the domain, e.g. http://127.0.0.1:8080
    #[arg(long = "shop_url", env = "ORDER_BAR_SHOP_URL")]
    pub shop_url: Option<String>,
    /// Shopify Admin API version
    #[arg(long = "api_version", env = "ORDER_BAR_SHOPIFY_API_VERSION", default_value = shopify_tools::DEFAULT_API_VERSION)]
    pub api_version: String,
    /// Only count orders with this status (open, closed, cancelled or any). Shopify counts open orders by default.
    #[arg(long = "order_status", env = "ORDER_BAR_ORDER_STATUS")]
    pub order_status: Option<OrderStatus>,
    /// Seconds between updates
    #[arg(long, env = "ORDER_BAR_INTERVAL", default_value_t = 60)]
    pub interval: u64,
    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "ORDER_BAR_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,
    /// Favicon lookup service. The domain is appended to this URL.
    #[arg(long = "favicon_service", env = "ORDER_BAR_FAVICON_SERVICE", default_value = DEFAULT_FAVICON_SERVICE)]
    pub favicon_service: String,
    /// Directory the shop icon is saved in
    #[arg(long = "icon_dir", env = "ORDER_BAR_ICON_DIR", default_value = ".")]
    pub icon_dir: PathBuf,
    /// Exit when an update fails, instead of trying again at the next tick
    #[arg(long = "exit_on_error", env = "ORDER_BAR_EXIT_ON_ERROR")]
    pub exit_on_error: bool,
    /// Stop after this many updates
    #[arg(long = "max_updates", env = "ORDER_BAR_MAX_UPDATES")]
    pub max_updates: Option<u64>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let args = Arguments::try_parse_from(["order_bar", "--domain", "shop.example.com", "--uuid", "ABC"]).unwrap();
        assert_eq!(args.ip, "127.0.0.1");
        assert_eq!(args.port, 56234);
        assert_eq!(args.interval, 60);
        assert_eq!(args.favicon_service, "http://favicongrabber.com/api/grab");
        assert!(args.order_status.is_none());
        assert!(!args.exit_on_error);
    }

    #[test]
    fn snake_case_flag_names() {
        let args = Arguments::try_parse_from([
            "order_bar",
            "--api_key",
            "key",
            "--api_secret",
            "secret",
            "--access_token",
            "shpat_1",
            "--domain",
            "shop.example.com",
            "--ip",
            "10.0.0.2",
            "--port",
            "1234",
            "--uuid",
            "ABC",
            "--order_status",
            "any",
            "--exit_on_error",
        ])
        .unwrap();
        assert_eq!(args.api_key, "key");
        assert_eq!(args.access_token, "shpat_1");
        assert_eq!(args.port, 1234);
        assert_eq!(args.order_status, Some(OrderStatus::Any));
        assert!(args.exit_on_error);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = ["order_bar", "--domain", "shop.example.com", "--uuid", "ABC"];
        assert!(Arguments::try_parse_from(base.iter().chain(["--port", "70000"].iter())).is_err());
        assert!(Arguments::try_parse_from(base.iter().chain(["--order_status", "paid"].iter())).is_err());
    }
}
