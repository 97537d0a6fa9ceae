//! # HTTP Flows
//!
//! Page renders driven through the full router, combined with commands
//! applied by the dispatcher in between:
//!
//! 1. **Console page**: every widget kind of the demo console, one-time assets
//! 2. **Config page**: patching and fixture uploads reflected on the next render
//! 3. **System page**: network updates rewrite the interfaces file

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;
    use vc_webaccess::domain::widget::WidgetId;
    use vc_webaccess::{
        build_router, AppState, Effect, HostPorts, InMemoryConsole, WebAccessConfig,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Gateway {
        router: Router,
        state: AppState,
        console: Arc<InMemoryConsole>,
    }

    fn gateway(configure: impl FnOnce(&mut WebAccessConfig)) -> Gateway {
        let mut config = WebAccessConfig::default();
        configure(&mut config);
        let console = Arc::new(InMemoryConsole::demo());
        let state = AppState::new(config, HostPorts::from_host(Arc::clone(&console)));
        console.attach_events(vc_webaccess::EventSink::new(
            Arc::clone(&state.registry),
            Arc::clone(&state.channel),
        ));
        Gateway {
            router: build_router(state.clone()),
            state,
            console,
        }
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn upload(uri: &str, field: &str, file_name: &str, content: &str) -> Request<Body> {
        let boundary = "integrationBoundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    // =============================================================================
    // CONSOLE PAGE
    // =============================================================================

    #[tokio::test]
    async fn test_demo_console_renders_every_kind_once() {
        let gw = gateway(|_| {});
        let (status, html) = get(&gw.router, "/").await;
        assert_eq!(status, StatusCode::OK);

        // Three buttons in the stage frame and one in the solo frame
        assert_eq!(html.matches(".vcbutton {").count(), 1);
        assert_eq!(html.matches("function buttonClick(").count(), 1);
        assert_eq!(html.matches("function slVchange(").count(), 1);
        assert_eq!(html.matches(".vcsoloframeHeader").count(), 1);

        assert!(html.contains("Blackout"));
        assert!(html.contains("Main show"));
        assert!(html.contains("Widget not supported (yet) for web access"));
        assert!(html.contains("&#8734;"));

        for id in [10, 11, 12, 20, 21, 32, 40, 50] {
            assert!(
                gw.state.registry.is_subscribed(WidgetId(id)),
                "widget {} not subscribed",
                id
            );
        }
        assert!(!gw.state.registry.is_subscribed(WidgetId(30)));
        assert!(!gw.state.registry.is_subscribed(WidgetId(60)));
    }

    #[tokio::test]
    async fn test_concurrent_renders_are_isolated() {
        let gw = gateway(|_| {});
        let renders = (0..8).map(|_| {
            let router = gw.router.clone();
            tokio::spawn(async move { get(&router, "/").await.1 })
        });
        let pages = futures::future::join_all(renders).await;

        let first = pages[0].as_ref().unwrap();
        for page in &pages {
            let page = page.as_ref().unwrap();
            assert_eq!(page, first);
            assert_eq!(page.matches("function buttonClick(").count(), 1);
        }
    }

    // =============================================================================
    // CONFIG PAGE
    // =============================================================================

    #[tokio::test]
    async fn test_patch_then_config_page_shows_selection() {
        let gw = gateway(|_| {});
        assert_eq!(
            gw.state.dispatcher.handle("QLC+IO|OUTPUT|2|ArtNet|1"),
            Effect::ConfigMutated
        );

        let (_, html) = get(&gw.router, "/config").await;
        assert!(html.contains("ioChanged('OUTPUT', 2, this.value);"));
        assert!(html.contains("<option value=\"ArtNet|1\" selected>[ArtNet] 192.168.0.255</option>"));
    }

    #[tokio::test]
    async fn test_fixture_upload_listed_on_config_page() {
        let gw = gateway(|_| {});
        let response = gw
            .router
            .clone()
            .oneshot(upload(
                "/loadFixture",
                "qlcfxi",
                "Acme-Wash.QXF",
                "<FixtureDefinition/>",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("window.location = \"/config\""));

        let (_, html) = get(&gw.router, "/config").await;
        assert!(html.contains("Acme-Wash.QXF"));
        assert!(html.contains("Generic-Par.qxf"));
    }

    // =============================================================================
    // SYSTEM PAGE
    // =============================================================================

    #[tokio::test]
    async fn test_network_update_round_trip_through_system_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces");
        std::fs::write(
            &path,
            "auto lo\niface lo inet loopback\nallow-hotplug eth0\niface eth0 inet dhcp\n",
        )
        .unwrap();

        let gw = gateway(|c| {
            c.system.interfaces_file = path.clone();
            c.system.embedded = true;
        });

        let (_, html) = get(&gw.router, "/system").await;
        assert!(html.contains("id=\"eth0StaticFields\" style=\"padding: 5px 30px; visibility:hidden;\""));

        assert_eq!(
            gw.state
                .dispatcher
                .handle("QLC+SYS|NETWORK|eth0|static|192.168.1.50|255.255.255.0|192.168.1.1"),
            Effect::ConfigMutated
        );

        let (_, html) = get(&gw.router, "/system").await;
        assert!(html.contains("id=\"eth0StaticFields\" style=\"padding: 5px 30px; visibility:visible;\""));
        assert!(html.contains("value=\"192.168.1.50\""));

        // Unknown interface: file untouched
        let before = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            gw.state
                .dispatcher
                .handle("QLC+SYS|NETWORK|eth1|static|10.0.0.5|255.255.255.0|10.0.0.1"),
            Effect::NoOp
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_unhandled_paths_are_empty() {
        let gw = gateway(|_| {});
        for uri in ["/favicon.ico", "/config/extra", "/qlcplusWS2"] {
            let (status, body) = get(&gw.router, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.is_empty(), "{} returned a body", uri);
        }
    }
}
