//! HTTP surface: page renders, uploads and the channel upgrade.
//!
//! Paths are exact-match. Anything else gets an empty `200`.

use crate::dispatch::CommandDispatcher;
use crate::domain::config::WebAccessConfig;
use crate::middleware::TracingLayer;
use crate::network::NetworkConfigStore;
use crate::ports::HostPorts;
use crate::render::{
    config_page, console_page, fixture_stored_page, loading_page, system_page, TreeRenderer,
};
use crate::ws::{NotificationRegistry, PushChannel, WebSocketHandler};
use axum::{
    extract::{
        multipart::{Multipart, MultipartError},
        ws::WebSocketUpgrade,
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, error, info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ports: HostPorts,
    pub registry: Arc<NotificationRegistry>,
    pub channel: Arc<PushChannel>,
    pub dispatcher: Arc<CommandDispatcher>,
    pub network: Arc<NetworkConfigStore>,
    pub config: Arc<WebAccessConfig>,
}

impl AppState {
    /// Wire the shared components for one gateway instance
    pub fn new(config: WebAccessConfig, ports: HostPorts) -> Self {
        let registry = Arc::new(NotificationRegistry::new());
        let channel = Arc::new(PushChannel::new());
        let network = Arc::new(NetworkConfigStore::new(&config.system.interfaces_file));
        let dispatcher = Arc::new(CommandDispatcher::new(
            ports.clone(),
            Arc::clone(&channel),
            Arc::clone(&network),
            config.system.clone(),
        ));

        Self {
            ports,
            registry,
            channel,
            dispatcher,
            network,
            config: Arc::new(config),
        }
    }

    fn ws_path(&self) -> &str {
        &self.config.websocket.path
    }
}

/// Rejected upload
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Body is not readable as multipart form data
    #[error("unreadable multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// No part carries a file name
    #[error("upload carries no file")]
    MissingFile,

    /// File name that cannot be stored as-is
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        warn!(error = %self, "Upload rejected");
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// One uploaded file
#[derive(Debug)]
struct Upload {
    file_name: String,
    content: String,
}

/// First file part of a multipart body
async fn read_upload(mut multipart: Multipart) -> Result<Upload, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!(field = ?field.name(), "Skipping non-file form field");
            continue;
        };
        let content = field.text().await?;
        return Ok(Upload { file_name, content });
    }
    Err(UploadError::MissingFile)
}

/// Build the router for one gateway instance
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config.http.max_upload_size;
    let ws_path = state.config.websocket.path.clone();

    Router::new()
        .route("/", get(console))
        .route("/config", get(config))
        .route("/system", get(system))
        .route("/loadProject", post(load_project))
        .route("/loadFixture", post(load_fixture))
        .route(&ws_path, get(channel_upgrade))
        .fallback(not_handled)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_size))
        .layer(TracingLayer::new())
        .with_state(state)
}

async fn console(State(state): State<AppState>) -> Html<String> {
    let root = state.ports.tree.root();
    let ctx = TreeRenderer::new(state.ports.tree.as_ref(), &state.registry).render(root.as_ref());
    debug!(
        kinds = ctx.ledger().len(),
        subscribed = state.registry.len(),
        "Console rendered"
    );
    Html(console_page(&ctx, root.as_ref(), state.ws_path()))
}

async fn config(State(state): State<AppState>) -> Html<String> {
    Html(config_page(
        state.ports.io.as_ref(),
        state.ports.audio.as_ref(),
        state.ports.fixtures.as_ref(),
        state.ws_path(),
        state.config.system.embedded,
    ))
}

async fn system(State(state): State<AppState>) -> Html<String> {
    let interfaces = match state.network.load() {
        Ok(records) => Some(records),
        Err(e) => {
            warn!(
                path = %state.network.path().display(),
                error = %e,
                "Cannot read network interfaces"
            );
            None
        }
    };
    Html(system_page(interfaces.as_deref(), state.ws_path()))
}

async fn load_project(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, UploadError> {
    let upload = read_upload(multipart).await?;
    info!(
        file_name = %upload.file_name,
        size = upload.content.len(),
        "Project uploaded"
    );

    // Host loads after the reply; the browser comes back on the URL push
    let console = Arc::clone(&state.ports.console);
    tokio::task::spawn_blocking(move || console.load_project(upload.content));

    Ok(Html(loading_page(state.ws_path())))
}

async fn load_fixture(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, UploadError> {
    let upload = read_upload(multipart).await?;
    let name = upload.file_name.as_str();
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
        return Err(UploadError::InvalidFileName(upload.file_name));
    }

    match state.ports.fixtures.store_definition(name, &upload.content) {
        Ok(()) => {
            info!(file_name = %name, "Fixture definition stored");
            Ok(Html(fixture_stored_page()).into_response())
        }
        Err(e) => {
            error!(file_name = %name, error = %e, "Cannot store fixture definition");
            Ok((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
        }
    }
}

async fn channel_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let handler = WebSocketHandler::new(
        Arc::clone(&state.channel),
        Arc::clone(&state.dispatcher),
        state.config.websocket.clone(),
    );
    // Oversized frames are dropped by the handler, not by the protocol layer
    ws.on_upgrade(move |socket| handler.handle(socket))
}

async fn not_handled() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{ConsoleAction, InMemoryConsole, ROOT_ID};
    use crate::domain::widget::{Widget, WidgetId, WidgetKind};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    const BOUNDARY: &str = "vcBoundary";

    fn setup(configure: impl FnOnce(&mut WebAccessConfig)) -> (Router, Arc<InMemoryConsole>, AppState) {
        let mut config = WebAccessConfig::default();
        configure(&mut config);
        let console = Arc::new(InMemoryConsole::new());
        let state = AppState::new(config, HostPorts::from_host(Arc::clone(&console)));
        (build_router(state.clone()), console, state)
    }

    async fn get_page(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn multipart_request(uri: &str, field: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/xml\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_console_page_subscribes_widgets() {
        let (router, console, state) = setup(|_| {});
        console.insert_widget(Widget::new(2, WidgetKind::Button { on: false }).with_parent(ROOT_ID));

        let (status, html) = get_page(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("href=\"javascript:buttonClick(2);\""));
        assert!(html.contains("/qlcplusWS"));
        assert!(state.registry.is_subscribed(WidgetId(2)));
    }

    #[tokio::test]
    async fn test_config_page_system_button() {
        let (router, _, _) = setup(|_| {});
        let (_, html) = get_page(router, "/config").await;
        assert!(html.contains("Universes configuration"));
        assert!(!html.contains("href=\"/system\""));

        let (router, _, _) = setup(|c| c.system.embedded = true);
        let (_, html) = get_page(router, "/config").await;
        assert!(html.contains("href=\"/system\""));
    }

    #[tokio::test]
    async fn test_system_page_reads_interfaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces");
        std::fs::write(&path, "iface wlan0 inet dhcp\n").unwrap();

        let (router, _, state) = setup(|c| c.system.interfaces_file = path.clone());
        let (status, html) = get_page(router, "/system").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Network interface: wlan0"));
        assert_eq!(state.network.records().len(), 1);
    }

    #[tokio::test]
    async fn test_system_page_without_interfaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");

        let (router, _, _) = setup(|c| c.system.interfaces_file = path.clone());
        let (status, html) = get_page(router, "/system").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Network configuration"));
        assert!(!html.contains("Network interface:"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_empty_ok() {
        let (router, _, _) = setup(|_| {});
        let (status, body) = get_page(router, "/favicon.ico").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_load_project_replies_then_loads() {
        let (router, console, _) = setup(|_| {});
        let response = router
            .oneshot(multipart_request(
                "/loadProject",
                "qlcprj",
                "show.qxw",
                "<Workspace/>",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Loading project..."));

        let loaded = ConsoleAction::LoadProject("<Workspace/>".to_string());
        for _ in 0..100 {
            if console.actions().contains(&loaded) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(console.actions().contains(&loaded));
        assert_eq!(console.project().as_deref(), Some("<Workspace/>"));
    }

    #[tokio::test]
    async fn test_load_fixture_stores_definition() {
        let (router, console, _) = setup(|_| {});
        let response = router
            .oneshot(multipart_request(
                "/loadFixture",
                "qlcfxi",
                "Acme-Spot.qxf",
                "<FixtureDefinition/>",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            console.fixture_definition("Acme-Spot.qxf").as_deref(),
            Some("<FixtureDefinition/>")
        );
    }

    #[tokio::test]
    async fn test_upload_errors_are_bad_request() {
        let (router, _, _) = setup(|_| {});
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/loadFixture")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from("garbage"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(multipart_request(
                "/loadFixture",
                "qlcfxi",
                "../escape.qxf",
                "<FixtureDefinition/>",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_without_file_part() {
        let (router, _, _) = setup(|_| {});
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n--{BOUNDARY}--\r\n"
        );
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/loadProject")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_limit_rejected() {
        let (router, console, _) = setup(|c| c.http.max_upload_size = 64);
        let response = router
            .oneshot(multipart_request(
                "/loadFixture",
                "qlcfxi",
                "Big.qxf",
                &"x".repeat(512),
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert!(console.fixture_definition("Big.qxf").is_none());
    }
}
