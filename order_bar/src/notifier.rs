use log::*;
use reqwest::Client;
use urlencoding::encode;

use crate::errors::NotifyError;

pub const DEFAULT_WIDGET_HOST: &str = "127.0.0.1";
pub const DEFAULT_WIDGET_PORT: u16 = 56234;
const UPDATE_PATH: &str = "/update_touch_bar_widget/";

/// The widget host process and the widget on it that displays the order count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetTarget {
    pub host: String,
    pub port: u16,
    pub uuid: String,
}

impl WidgetTarget {
    pub fn new(host: &str, port: u16, uuid: &str) -> Self {
        Self { host: host.to_string(), port, uuid: uuid.to_string() }
    }

    pub fn endpoint(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}{UPDATE_PATH}", self.host, self.port)
        } else {
            format!("http://{}:{}{UPDATE_PATH}", self.host, self.port)
        }
    }
}

pub fn status_text(count: u64) -> String {
    format!("Orders today: {count}")
}

/// Anything that can display a status line with an icon.
#[allow(async_fn_in_trait)]
pub trait StatusSink {
    async fn push_status(&self, text: &str, icon_path: &str) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct WidgetNotifier {
    client: Client,
    target: WidgetTarget,
}

impl WidgetNotifier {
    pub fn new(client: Client, target: WidgetTarget) -> Self {
        Self { client, target }
    }

    /// Every value is percent-encoded, so `&`, `=` and friends in the text or path survive the trip and distinct
    /// inputs always give distinct URLs.
    pub fn update_url(&self, text: &str, icon_path: &str) -> String {
        format!(
            "{}?uuid={}&text={}&icon_path={}",
            self.target.endpoint(),
            encode(&self.target.uuid),
            encode(text),
            encode(icon_path)
        )
    }

    /// Sends a single update. There are no retries; the next tick sends a fresh one anyway.
    pub async fn notify(&self, text: &str, icon_path: &str) -> Result<(), NotifyError> {
        let url = self.update_url(text, icon_path);
        trace!("📟️ GET {url}");
        let response = self.client.get(&url).send().await.map_err(|e| NotifyError::RequestFailed(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            debug!("📟️ Widget updated: {text}");
            Ok(())
        } else {
            Err(NotifyError::BadStatus { status: status.as_u16(), url })
        }
    }
}

impl StatusSink for WidgetNotifier {
    async fn push_status(&self, text: &str, icon_path: &str) -> Result<(), NotifyError> {
        self.notify(text, icon_path).await
    }
}
