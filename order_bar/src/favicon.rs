//! Finds the shop's favicon through a favicon lookup service and saves a copy next to the binary (or in the
//! configured icon directory), so the widget host can display it from a local path.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use log::*;
use reqwest::{Client, Response};
use serde::Deserialize;
use tokio::{fs::File, io::AsyncWriteExt};
use url::Url;

use crate::errors::IconError;

pub const DEFAULT_FAVICON_SERVICE: &str = "http://favicongrabber.com/api/grab";

#[derive(Debug, Deserialize)]
struct FaviconResponse {
    icons: Vec<FaviconCandidate>,
}

#[derive(Debug, Deserialize)]
struct FaviconCandidate {
    src: String,
}

/// The local path of the downloaded icon, or nothing if it could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconPath(Option<PathBuf>);

impl IconPath {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn path(&self) -> Option<&Path> {
        self.0.as_deref()
    }
}

impl From<PathBuf> for IconPath {
    fn from(path: PathBuf) -> Self {
        Self(Some(path))
    }
}

impl Display for IconPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(p) => write!(f, "{}", p.to_string_lossy()),
            None => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct FaviconResolver {
    client: Client,
    lookup_url: String,
    icon_dir: PathBuf,
}

impl FaviconResolver {
    pub fn new<P: Into<PathBuf>>(client: Client, lookup_url: &str, icon_dir: P) -> Self {
        let lookup_url = lookup_url.trim_end_matches('/').to_string();
        Self { client, lookup_url, icon_dir: icon_dir.into() }
    }

    /// Asks the lookup service for the domain's icons and returns the `src` of the first one, exactly as listed.
    pub async fn discover_icon_url(&self, domain: &str) -> Result<String, IconError> {
        let url = format!("{}/{domain}", self.lookup_url);
        debug!("🖼️ Looking up icons for {domain} at {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IconError::LookupError(format!("Request to {url} failed. {e}")))?;
        if !response.status().is_success() {
            return Err(IconError::LookupError(format!("{url} responded with {}", response.status())));
        }
        let result = response
            .json::<FaviconResponse>()
            .await
            .map_err(|e| IconError::LookupError(format!("Unexpected response from {url}. {e}")))?;
        trace!("🖼️ {} icon candidates for {domain}", result.icons.len());
        result
            .icons
            .into_iter()
            .next()
            .map(|icon| icon.src)
            .ok_or_else(|| IconError::LookupError(format!("Icon not found for {domain}")))
    }

    /// Where the icon for `domain` is stored. Always the same file for a given domain and extension, so later runs
    /// overwrite it.
    pub fn icon_file_path(&self, domain: &str, icon_url: &Url) -> Result<PathBuf, IconError> {
        let ext = Path::new(icon_url.path())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let file_name = format!("{}{ext}", file_stem(domain));
        std::path::absolute(self.icon_dir.join(file_name))
            .map_err(|e| IconError::DownloadError(format!("Could not determine the icon path. {e}")))
    }

    pub async fn download_icon(&self, domain: &str, icon_url: &str) -> Result<PathBuf, IconError> {
        let url = absolute_icon_url(domain, icon_url)?;
        let path = self.icon_file_path(domain, &url)?;
        debug!("🖼️ Downloading {url} to {}", path.display());
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| IconError::DownloadError(format!("Request for {url} failed. {e}")))?;
        if !response.status().is_success() {
            return Err(IconError::DownloadError(format!("bad status: {}", response.status())));
        }
        let mut file = File::create(&path)
            .await
            .map_err(|e| IconError::DownloadError(format!("Could not create {}. {e}", path.display())))?;
        match stream_to_file(&mut response, &mut file).await {
            Ok(bytes) => {
                info!("🖼️ Saved {bytes} byte icon to {}", path.display());
                Ok(path)
            },
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    warn!("🖼️ Could not remove partial icon {}. {rm}", path.display());
                }
                Err(IconError::DownloadError(format!("Could not save the icon to {}. {e}", path.display())))
            },
        }
    }

    pub async fn resolve(&self, domain: &str) -> Result<PathBuf, IconError> {
        let icon_url = self.discover_icon_url(domain).await?;
        self.download_icon(domain, &icon_url).await
    }

    /// Resolves the icon once at startup. Any failure is logged and leaves the widget without an icon.
    pub async fn resolve_or_empty(&self, domain: &str) -> IconPath {
        match self.resolve(domain).await {
            Ok(path) => IconPath::from(path),
            Err(e) => {
                warn!("🖼️ Can not get logo: {e}");
                IconPath::empty()
            },
        }
    }
}

async fn stream_to_file(response: &mut Response, file: &mut File) -> Result<usize, String> {
    let mut bytes = 0;
    while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
        file.write_all(&chunk).await.map_err(|e| e.to_string())?;
        bytes += chunk.len();
    }
    file.flush().await.map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// Lookup services sometimes list relative or protocol-relative sources; those are resolved against the shop.
fn absolute_icon_url(domain: &str, src: &str) -> Result<Url, IconError> {
    match Url::parse(src) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{domain}/"))
            .and_then(|base| base.join(src))
            .map_err(|e| IconError::DownloadError(format!("Invalid icon URL {src}. {e}"))),
        Err(e) => Err(IconError::DownloadError(format!("Invalid icon URL {src}. {e}"))),
    }
}

fn file_stem(domain: &str) -> String {
    domain.trim().chars().map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c }).collect()
}
