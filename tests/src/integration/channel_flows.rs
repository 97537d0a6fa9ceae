//! # Push Channel Flows
//!
//! Real WebSocket connections against a served router:
//!
//! 1. **Greeting**: first frame on every connection
//! 2. **Round trips**: widget command in, state change pushed back out
//! 3. **Last connection wins**: a newer browser takes over the pushes
//! 4. **Reconnect**: pushes without a connection are dropped, a new
//!    connection resumes them
//! 5. **Host signals**: project reload navigates the browser, autostart alerts

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use futures::{SinkExt, StreamExt};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
    use tower::ServiceExt;
    use vc_webaccess::domain::widget::WidgetId;
    use vc_webaccess::{
        build_router, AppState, EventSink, HostPorts, InMemoryConsole, WebAccessConfig,
    };

    type Browser = WebSocketStream<MaybeTlsStream<TcpStream>>;

    const GREETING: &str = "QLC+ is ready";
    const WAIT: Duration = Duration::from_secs(2);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Served {
        addr: SocketAddr,
        router: Router,
        state: AppState,
        console: Arc<InMemoryConsole>,
    }

    async fn serve(configure: impl FnOnce(&mut WebAccessConfig)) -> Served {
        let mut config = WebAccessConfig::default();
        configure(&mut config);
        let console = Arc::new(InMemoryConsole::demo());
        let state = AppState::new(config, HostPorts::from_host(Arc::clone(&console)));
        console.attach_events(EventSink::new(
            Arc::clone(&state.registry),
            Arc::clone(&state.channel),
        ));
        let router = build_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router.clone();
        tokio::spawn(async move { axum::serve(listener, app).await });

        Served {
            addr,
            router,
            state,
            console,
        }
    }

    /// Render the console page so its widgets are subscribed
    async fn open_console(served: &Served) {
        let response = served
            .router
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn connect(served: &Served) -> Browser {
        let url = format!("ws://{}/qlcplusWS", served.addr);
        let (mut browser, _) = tokio_tungstenite::connect_async(url).await.unwrap();
        assert_eq!(next_text(&mut browser).await, GREETING);
        browser
    }

    async fn next_text(browser: &mut Browser) -> String {
        loop {
            let msg = timeout(WAIT, browser.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .expect("websocket error");
            if msg.is_text() {
                return msg.to_text().unwrap().to_string();
            }
        }
    }

    async fn send(browser: &mut Browser, frame: &str) {
        browser.send(Message::text(frame)).await.unwrap();
    }

    async fn assert_silent(browser: &mut Browser) {
        let result = timeout(Duration::from_millis(200), browser.next()).await;
        assert!(result.is_err(), "unexpected frame: {:?}", result);
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    // =============================================================================
    // ROUND TRIPS
    // =============================================================================

    #[tokio::test]
    async fn test_widget_round_trips() {
        let served = serve(|_| {}).await;
        open_console(&served).await;
        let mut browser = connect(&served).await;

        send(&mut browser, "10").await;
        assert_eq!(next_text(&mut browser).await, "10|BUTTON|1");

        send(&mut browser, "20|300").await;
        assert_eq!(next_text(&mut browser).await, "20|SLIDER|44");

        send(&mut browser, "50|STEP|2").await;
        assert_eq!(next_text(&mut browser).await, "50|CUE|2");
    }

    #[tokio::test]
    async fn test_bad_frames_keep_channel_open() {
        let served = serve(|_| {}).await;
        open_console(&served).await;
        let mut browser = connect(&served).await;

        for frame in ["QLC+IO|INPUT|3", "QLC+NOPE|x", "999|1", "20|STEP|4", "30|1", ""] {
            send(&mut browser, frame).await;
        }
        assert_silent(&mut browser).await;

        send(&mut browser, "11").await;
        assert_eq!(next_text(&mut browser).await, "11|BUTTON|1");
    }

    #[tokio::test]
    async fn test_unsubscribed_widget_not_pushed() {
        let served = serve(|_| {}).await;
        let mut browser = connect(&served).await;

        // No page rendered yet: the press lands but nothing is pushed
        send(&mut browser, "10").await;
        assert_silent(&mut browser).await;
        assert!(!served.state.registry.is_subscribed(WidgetId(10)));
    }

    #[tokio::test]
    async fn test_ping_answered() {
        let served = serve(|_| {}).await;
        let mut browser = connect(&served).await;

        browser
            .send(Message::Ping(vec![7, 7].into()))
            .await
            .unwrap();
        loop {
            let msg = timeout(WAIT, browser.next()).await.unwrap().unwrap().unwrap();
            if let Message::Pong(payload) = msg {
                assert_eq!(&payload[..], &[7u8, 7][..]);
                break;
            }
        }
    }

    // =============================================================================
    // CONNECTION LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_newest_connection_receives_pushes() {
        let served = serve(|_| {}).await;
        open_console(&served).await;
        let mut first = connect(&served).await;
        let mut second = connect(&served).await;

        // Commands from the superseded browser still apply
        send(&mut first, "12").await;
        assert_eq!(next_text(&mut second).await, "12|BUTTON|1");
        assert_silent(&mut first).await;
    }

    #[tokio::test]
    async fn test_reconnect_resumes_notifications() {
        let served = serve(|_| {}).await;
        open_console(&served).await;

        let mut browser = connect(&served).await;
        browser.close(None).await.unwrap();
        let channel = Arc::clone(&served.state.channel);
        wait_until(|| !channel.is_connected()).await;

        // Change with nobody listening
        let dropped = channel.frames_dropped();
        served.state.dispatcher.handle("10");
        assert_eq!(channel.frames_dropped(), dropped + 1);

        let mut browser = connect(&served).await;
        send(&mut browser, "10").await;
        assert_eq!(next_text(&mut browser).await, "10|BUTTON|0");
    }

    // =============================================================================
    // HOST SIGNALS
    // =============================================================================

    #[tokio::test]
    async fn test_project_upload_navigates_browser() {
        let served = serve(|_| {}).await;
        open_console(&served).await;
        let mut browser = connect(&served).await;

        let boundary = "flowBoundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"qlcprj\"; filename=\"gig.qxw\"\r\n\r\n\
             <Workspace/>\r\n\
             --{boundary}--\r\n"
        );
        let response = served
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/loadProject")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(next_text(&mut browser).await, "URL|/");
        assert_eq!(served.console.project().as_deref(), Some("<Workspace/>"));
        // Widget ids of the old console no longer push
        assert!(served.state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_autostart_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = dir.path().join("autostart.qxw");
        let served = serve(|c| c.system.autostart_file = autostart.clone()).await;
        let mut browser = connect(&served).await;

        send(&mut browser, "QLC+SYS|AUTOSTART|current").await;
        assert_eq!(
            next_text(&mut browser).await,
            "ALERT|Autostart configuration changed"
        );
        assert!(autostart.exists());

        send(&mut browser, "QLC+SYS|AUTOSTART|none").await;
        assert_eq!(
            next_text(&mut browser).await,
            "ALERT|Autostart configuration changed"
        );
        assert!(!autostart.exists());
    }
}
