use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use carevoice_search::{SearchConfig, SearchError, SnippetSearch, VespaClient};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
struct FakeVespa {
    calls: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_doc_path: Arc<Mutex<Option<(String, String, String)>>>,
    search_status: StatusCode,
    search_response: Value,
    document_response: Value,
}

impl FakeVespa {
    fn new(search_response: Value) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            last_body: Arc::new(Mutex::new(None)),
            last_doc_path: Arc::new(Mutex::new(None)),
            search_status: StatusCode::OK,
            search_response,
            document_response: json!({}),
        }
    }
}

async fn search_handler(
    State(state): State<FakeVespa>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_body.lock().unwrap() = Some(body);
    (state.search_status, Json(state.search_response.clone()))
}

async fn document_handler(
    State(state): State<FakeVespa>,
    Path((namespace, schema, id)): Path<(String, String, String)>,
) -> Json<Value> {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_doc_path.lock().unwrap() = Some((namespace, schema, id));
    Json(state.document_response.clone())
}

async fn spawn_vespa(state: FakeVespa) -> SocketAddr {
    let app = Router::new()
        .route("/search/", post(search_handler))
        .route(
            "/document/v1/{namespace}/{schema}/docid/{id}",
            get(document_handler),
        )
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> VespaClient {
    let config = SearchConfig::new("http://127.0.0.1", addr.port(), "asset");
    VespaClient::new(config).expect("client should build")
}

#[tokio::test]
async fn test_query_returns_full_text_of_each_hit() {
    let vespa = FakeVespa::new(json!({
        "root": {
            "children": [
                { "fields": { "full_text": "Drink plenty of fluids" } },
                { "fields": { "title": "no body" } },
                { "fields": { "full_text": "Rest is important" } }
            ]
        }
    }));
    let last_body = vespa.last_body.clone();
    let addr = spawn_vespa(vespa).await;

    let snippets = client_for(addr)
        .lookup(None, Some("flu recovery"))
        .await
        .expect("query should succeed");

    assert_eq!(snippets, vec!["Drink plenty of fluids", "Rest is important"]);

    let body = last_body.lock().unwrap().clone().expect("body recorded");
    assert!(body["yql"]
        .as_str()
        .unwrap()
        .contains(r#"title contains "flu recovery""#));
    assert_eq!(body["input.query(q)"], r#"embed(mini, "flu recovery")"#);
    assert_eq!(body["ranking.profile"], "transformer");
    assert_eq!(body["hits"], 1);
}

#[tokio::test]
async fn test_query_without_children_is_empty() {
    let addr = spawn_vespa(FakeVespa::new(json!({ "root": { "fields": { "totalCount": 0 } } }))).await;

    let snippets = client_for(addr)
        .search("rare condition")
        .await
        .expect("empty result is not an error");

    assert!(snippets.is_empty());
}

#[tokio::test]
async fn test_lookup_by_id_fetches_document_directly() {
    let mut vespa = FakeVespa::new(json!({}));
    vespa.document_response = json!({
        "id": "id:asset:asset::doc-42",
        "fields": { "full_text": "Wash hands for twenty seconds." }
    });
    let doc_path = vespa.last_doc_path.clone();
    let last_body = vespa.last_body.clone();
    let addr = spawn_vespa(vespa).await;

    let snippets = client_for(addr)
        .lookup(Some("doc-42"), Some("ignored when an id is present"))
        .await
        .expect("fetch should succeed");

    assert_eq!(snippets, vec!["Wash hands for twenty seconds."]);
    assert_eq!(
        doc_path.lock().unwrap().clone(),
        Some(("asset".to_string(), "asset".to_string(), "doc-42".to_string()))
    );
    assert!(last_body.lock().unwrap().is_none(), "no query should be issued");
}

#[tokio::test]
async fn test_lookup_without_input_makes_no_request() {
    let vespa = FakeVespa::new(json!({}));
    let calls = vespa.calls.clone();
    let addr = spawn_vespa(vespa).await;
    let client = client_for(addr);

    assert!(client.lookup(None, None).await.unwrap().is_empty());
    assert!(client.lookup(Some(""), Some("")).await.unwrap().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_backend_error_status_propagates() {
    let mut vespa = FakeVespa::new(json!({ "root": { "errors": [{ "message": "overloaded" }] } }));
    vespa.search_status = StatusCode::SERVICE_UNAVAILABLE;
    let addr = spawn_vespa(vespa).await;

    let err = client_for(addr).search("headache").await.unwrap_err();
    match err {
        SearchError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_propagates() {
    // Bind and drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).search("dizziness").await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_blank_query_makes_no_request() {
    let vespa = FakeVespa::new(json!({}));
    let calls = vespa.calls.clone();
    let addr = spawn_vespa(vespa).await;

    let snippets = client_for(addr)
        .lookup(None, Some("   "))
        .await
        .expect("blank query is treated as absent");

    assert!(snippets.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_control_characters_in_retrieved_text_do_not_break_next_query() {
    let vespa = FakeVespa::new(json!({
        "root": { "children": [{ "fields": { "full_text": "Page 1\u{0C}Hydration guide" } }] }
    }));
    let last_body = vespa.last_body.clone();
    let addr = spawn_vespa(vespa).await;
    let client = client_for(addr);

    let first = client.search("I feel dizzy").await.expect("first turn");
    assert_eq!(first, vec!["Page 1\u{0C}Hydration guide"]);

    // The next turn's query carries the retrieved text along with the history.
    let history = format!("I feel dizzy {} how much water", first.join(". "));
    let second = client.search(&history).await.expect("second turn");
    assert_eq!(second, first);

    let body = last_body.lock().unwrap().clone().expect("body recorded");
    assert_eq!(
        body["input.query(q)"],
        r#"embed(mini, "I feel dizzy Page 1 Hydration guide how much water")"#
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let app = Router::new().route(
        "/search/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "root": {} }))
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SearchConfig {
        timeout_secs: 1,
        ..SearchConfig::new("http://127.0.0.1", addr.port(), "asset")
    };
    let client = VespaClient::new(config).expect("client should build");

    let err = client.search("chest pain").await.unwrap_err();
    match err {
        SearchError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
        other => panic!("expected Http error, got {:?}", other),
    }
}
