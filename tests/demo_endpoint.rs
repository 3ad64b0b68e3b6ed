use serde_json::{Value, json};

mod test_helpers {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use tokio::net::TcpListener;

    use parley::api::{self, AppState};
    use parley::config::Config;
    use parley::discovery::DiscoveryClient;

    pub fn test_config() -> Config {
        Config {
            project_id: "test-project".to_string(),
            location: "global".to_string(),
            collection_id: "default_collection".to_string(),
            datastore_id: "test-store".to_string(),
            serving_config_id: "default_search".to_string(),
            engine_id: "test-engine".to_string(),
            port: 0,
            generative_model: None,
        }
    }

    /// Serve `status` + `body` for any POST and return the base URL.
    pub async fn spawn_backend(status: u16, body: serde_json::Value) -> String {
        let status = StatusCode::from_u16(status).unwrap();
        let handler = move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        };
        let router = Router::new().route("/*path", post(handler));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Spawn the app wired to the given backend and return its base URL.
    pub async fn spawn_app(backend_url: String) -> String {
        let discovery = DiscoveryClient::new(backend_url).unwrap();
        let state = AppState::new(test_config(), discovery, None);
        let router = api::create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}

fn backend_body(summary: &str) -> Value {
    json!({
        "results": [
            {
                "document": {
                    "name": "projects/p/locations/global/dataStores/d/branches/0/documents/doc-1",
                    "derivedStructData": {
                        "title": "Refund Policy",
                        "link": "https://support.example.com/refunds",
                        "snippets": [ { "snippet": "Refunds are issued within 30 days." } ]
                    }
                }
            }
        ],
        "summary": { "summaryText": summary }
    })
}

#[tokio::test]
async fn demo_returns_summary_and_chips() {
    let backend = test_helpers::spawn_backend(
        200,
        backend_body("Refunds are available within 30 days of purchase."),
    )
    .await;
    let app = test_helpers::spawn_app(backend).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/demo"))
        .json(&json!({ "text": "refund policy" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let messages = &body["fulfillment_response"]["messages"];
    assert_eq!(messages.as_array().unwrap().len(), 2);
    assert_eq!(
        messages[0]["text"]["text"][0],
        "Refunds are available within 30 days of purchase."
    );
    assert_eq!(
        messages[1]["payload"]["richContent"][0][0]["options"],
        json!([
            { "text": "Option 1" },
            { "text": "Option 2" },
            { "text": "Option 3" }
        ])
    );
    assert_eq!(body["sessionInfo"]["parameters"]["userAuthenticated"], "y");
}

#[tokio::test]
async fn demo_with_no_summary_still_returns_envelope() {
    let backend = test_helpers::spawn_backend(200, json!({ "results": [] })).await;
    let app = test_helpers::spawn_app(backend).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/demo"))
        .json(&json!({ "text": "something obscure" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let messages = &body["fulfillment_response"]["messages"];
    assert_eq!(messages.as_array().unwrap().len(), 2);
    assert_eq!(messages[0]["text"]["text"][0], "");
    assert_eq!(
        messages[1]["payload"]["richContent"][0][0]["options"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn demo_missing_text_is_bad_request() {
    let backend = test_helpers::spawn_backend(200, backend_body("unused")).await;
    let app = test_helpers::spawn_app(backend).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/demo"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let message = response.text().await.unwrap();
    assert!(message.contains("text"));
}

#[tokio::test]
async fn demo_blank_text_is_bad_request() {
    let backend = test_helpers::spawn_backend(200, backend_body("unused")).await;
    let app = test_helpers::spawn_app(backend).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/demo"))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn demo_backend_failure_degrades_gracefully() {
    let backend = test_helpers::spawn_backend(500, json!({ "error": "boom" })).await;
    let app = test_helpers::spawn_app(backend).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/demo"))
        .json(&json!({ "text": "refund policy" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);

    // The envelope keeps its normal shape so the platform degrades gracefully,
    // and nothing from the backend error leaks through.
    let body: Value = response.json().await.unwrap();
    let messages = &body["fulfillment_response"]["messages"];
    assert_eq!(messages.as_array().unwrap().len(), 2);
    assert_eq!(messages[0]["text"]["text"][0], "");
    assert!(body.to_string().find("boom").is_none());
}
