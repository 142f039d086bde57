//! In-process stand-ins for every HTTP service the order bar talks to: the favicon lookup service, the icon host,
//! the Shopify order count endpoint and the widget host. They all share one actix-web server on a random local port,
//! so a single base URL can be plugged into each part of a [`BarConfig`](crate::config::BarConfig).

use std::{collections::HashMap, net::SocketAddr, sync::Mutex};

use actix_web::{dev::ServerHandle, web, App, HttpRequest, HttpResponse, HttpServer};
use log::*;
use serde_json::json;

pub const MOCK_ACCESS_TOKEN: &str = "shpat_mock_token";

/// The query parameters the widget host received in one update request, percent-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetUpdate {
    pub uuid: String,
    pub text: String,
    pub icon_path: String,
    pub raw_query: String,
}

pub struct MockState {
    favicon: Mutex<(u16, String)>,
    icon: Mutex<(u16, Vec<u8>)>,
    order_count: Mutex<Result<u64, u16>>,
    widget_status: Mutex<u16>,
    favicon_lookups: Mutex<Vec<String>>,
    icon_downloads: Mutex<usize>,
    count_queries: Mutex<Vec<HashMap<String, String>>>,
    widget_updates: Mutex<Vec<WidgetUpdate>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            favicon: Mutex::new((200, json!({ "icons": [] }).to_string())),
            icon: Mutex::new((200, b"\x89PNG\r\n\x1a\nmock-icon".to_vec())),
            order_count: Mutex::new(Ok(0)),
            widget_status: Mutex::new(200),
            favicon_lookups: Mutex::new(Vec::new()),
            icon_downloads: Mutex::new(0),
            count_queries: Mutex::new(Vec::new()),
            widget_updates: Mutex::new(Vec::new()),
        }
    }
}

pub struct MockServices {
    pub url: String,
    pub addr: SocketAddr,
    state: web::Data<MockState>,
    handle: ServerHandle,
}

impl std::fmt::Debug for MockServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockServices").field("url", &self.url).finish_non_exhaustive()
    }
}

impl MockServices {
    pub async fn start() -> std::io::Result<Self> {
        let state = web::Data::new(MockState::default());
        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/api/grab/{domain}", web::get().to(grab_favicon))
                .route("/icons/{name}", web::get().to(serve_icon))
                .route("/admin/api/{version}/orders/count.json", web::get().to(count_orders))
                .route("/update_touch_bar_widget/", web::get().to(update_widget))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))?;
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        tokio::spawn(async move {
            if let Err(e) = server.await {
                warn!("🧪️ Mock services stopped with an error. {e}");
            }
        });
        info!("🧪️ Mock services listening on {addr}");
        Ok(Self { url: format!("http://{addr}"), addr, state, handle })
    }

    pub async fn stop(&self) {
        self.handle.stop(true).await;
    }

    /// The base URL to use as the favicon lookup service.
    pub fn favicon_service_url(&self) -> String {
        format!("{}/api/grab", self.url)
    }

    /// A URL served by the mock icon host.
    pub fn icon_url(&self, name: &str) -> String {
        format!("{}/icons/{name}", self.url)
    }

    /// Makes the favicon service list the given icon sources, in order.
    pub fn list_icons(&self, sources: &[&str]) {
        let icons = sources.iter().map(|src| json!({ "src": src, "sizes": "32x32" })).collect::<Vec<_>>();
        self.set_favicon_reply(200, &json!({ "domain": "mock", "icons": icons }).to_string());
    }

    pub fn set_favicon_reply(&self, status: u16, body: &str) {
        *self.state.favicon.lock().unwrap() = (status, body.to_string());
    }

    pub fn set_icon(&self, status: u16, bytes: &[u8]) {
        *self.state.icon.lock().unwrap() = (status, bytes.to_vec());
    }

    pub fn set_order_count(&self, count: u64) {
        *self.state.order_count.lock().unwrap() = Ok(count);
    }

    /// Makes the order count endpoint fail with the given HTTP status.
    pub fn fail_order_count(&self, status: u16) {
        *self.state.order_count.lock().unwrap() = Err(status);
    }

    pub fn set_widget_status(&self, status: u16) {
        *self.state.widget_status.lock().unwrap() = status;
    }

    pub fn favicon_lookups(&self) -> Vec<String> {
        self.state.favicon_lookups.lock().unwrap().clone()
    }

    pub fn icon_downloads(&self) -> usize {
        *self.state.icon_downloads.lock().unwrap()
    }

    pub fn count_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.count_queries.lock().unwrap().clone()
    }

    pub fn widget_updates(&self) -> Vec<WidgetUpdate> {
        self.state.widget_updates.lock().unwrap().clone()
    }
}

fn status(code: u16) -> actix_web::http::StatusCode {
    actix_web::http::StatusCode::from_u16(code).unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
}

async fn grab_favicon(state: web::Data<MockState>, domain: web::Path<String>) -> HttpResponse {
    state.favicon_lookups.lock().unwrap().push(domain.into_inner());
    let (code, body) = state.favicon.lock().unwrap().clone();
    HttpResponse::build(status(code)).content_type("application/json").body(body)
}

async fn serve_icon(state: web::Data<MockState>) -> HttpResponse {
    *state.icon_downloads.lock().unwrap() += 1;
    let (code, bytes) = state.icon.lock().unwrap().clone();
    HttpResponse::build(status(code)).content_type("image/png").body(bytes)
}

async fn count_orders(
    req: HttpRequest,
    state: web::Data<MockState>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let token = req.headers().get("X-Shopify-Access-Token").and_then(|v| v.to_str().ok());
    if token != Some(MOCK_ACCESS_TOKEN) {
        return HttpResponse::Unauthorized().json(json!({ "errors": "[API] Invalid API key or access token" }));
    }
    state.count_queries.lock().unwrap().push(query.into_inner());
    let reply = *state.order_count.lock().unwrap();
    match reply {
        Ok(count) => HttpResponse::Ok().json(json!({ "count": count })),
        Err(code) => HttpResponse::build(status(code)).json(json!({ "errors": "Mock failure" })),
    }
}

async fn update_widget(
    req: HttpRequest,
    state: web::Data<MockState>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let param = |name: &str| query.get(name).cloned().unwrap_or_default();
    let update = WidgetUpdate {
        uuid: param("uuid"),
        text: param("text"),
        icon_path: param("icon_path"),
        raw_query: req.query_string().to_string(),
    };
    debug!("🧪️ Widget update received: {update:?}");
    state.widget_updates.lock().unwrap().push(update);
    let code = *state.widget_status.lock().unwrap();
    HttpResponse::build(status(code)).finish()
}
