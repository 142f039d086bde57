use shopify_tools::ShopifyApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarError {
    #[error("Could not initialize the order bar. {0}")]
    InitializeError(String),
    #[error("Invalid configuration. {0}")]
    ConfigurationError(String),
    #[error("Widget update failed. {0}")]
    CycleError(#[from] CycleError),
}

impl From<ShopifyApiError> for BarError {
    fn from(e: ShopifyApiError) -> Self {
        match e {
            ShopifyApiError::MissingCredentials => Self::ConfigurationError(e.to_string()),
            e => Self::InitializeError(e.to_string()),
        }
    }
}

/// Failures while finding or saving the shop's icon. Neither is fatal; the widget simply shows no icon.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("Could not find an icon. {0}")]
    LookupError(String),
    #[error("Could not download the icon. {0}")]
    DownloadError(String),
}

#[derive(Debug, Error)]
#[error("Could not fetch today's order count. {0}")]
pub struct FetchError(#[from] pub ShopifyApiError);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Could not reach the widget host. {0}")]
    RequestFailed(String),
    #[error("The widget host rejected the update. Response status: {status}, {url}")]
    BadStatus { status: u16, url: String },
}

/// Aborts a single fetch-and-notify cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    FetchFailed(#[from] FetchError),
    #[error(transparent)]
    NotifyFailed(#[from] NotifyError),
}
