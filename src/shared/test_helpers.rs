//! Fixtures and an in-process mock of the catalog backend for tests.
//!
//! The mock speaks the same envelope conventions as the real backend and
//! records every request so tests can assert on call order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};

use crate::core::config::ApiConfig;
use crate::core::http::ApiClient;
use crate::features::categories::models::Category;
use crate::shared::constants::REQUEST_ID_HEADER;

pub const TEST_PASSWORD: &str = "secret";

// =============================================================================
// FIXTURES
// =============================================================================

pub fn category(id: &str, name: &str, parent_id: Option<&str>, sort_order: i32) -> Category {
    Category {
        slug: name.to_lowercase().replace(' ', "-"),
        parent_id: parent_id.map(str::to_string),
        sort_order,
        ..Category::new(id, name)
    }
}

pub fn inactive(mut category: Category) -> Category {
    category.is_active = false;
    category
}

/// Clothing > (Shirts, Pants[inactive])
pub fn clothing_fixture() -> Vec<Category> {
    vec![
        category("1", "Clothing", None, 0),
        category("2", "Shirts", Some("1"), 0),
        inactive(category("3", "Pants", Some("1"), 1)),
    ]
}

/// Unsigned JWT-shaped token whose payload carries `exp`
pub fn make_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": "u1", "exp": exp }).to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn test_api_client(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        user_agent: "catalog-admin/test".to_string(),
    })
    .expect("Failed to build test client")
}

// =============================================================================
// MOCK BACKEND
// =============================================================================

#[derive(Debug, Default)]
pub struct MockState {
    pub categories: Vec<Value>,
    pub colors: Vec<Value>,
    /// Answer list endpoints with a bare array instead of the envelope
    pub raw_lists: bool,
    pub fail_lists: bool,
    /// Serve this many list requests per collection, then fail the rest
    pub fail_lists_after: Option<usize>,
    pub fail_mutations: bool,
    /// `"<METHOD> <path>"` in arrival order, without the `/api` prefix
    pub requests: Vec<String>,
    pub request_ids: Vec<String>,
    pub last_authorization: Option<String>,
}

impl MockState {
    fn items(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Categories => &mut self.categories,
            Collection::Colors => &mut self.colors,
        }
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests.iter().filter(|r| *r == request).count()
    }
}

pub type SharedState = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: SharedState,
}

#[derive(Debug, Clone, Copy)]
enum Collection {
    Categories,
    Colors,
}

impl Collection {
    fn path(self) -> &'static str {
        match self {
            Collection::Categories => "/categories",
            Collection::Colors => "/colors",
        }
    }

    fn not_found(self) -> &'static str {
        match self {
            Collection::Categories => "Category not found",
            Collection::Colors => "Item not found",
        }
    }
}

type Reply = (StatusCode, Json<Value>);

/// Start the mock on an ephemeral port; the base URL includes the `/api` prefix
pub async fn spawn_mock_backend(categories: Vec<Category>) -> MockBackend {
    let state: SharedState = Arc::new(Mutex::new(MockState {
        categories: categories
            .iter()
            .map(|c| serde_json::to_value(c).expect("Failed to serialize fixture"))
            .collect(),
        colors: vec![
            json!({ "id": "c1", "name": "Red", "hexCode": "#FF0000", "isActive": true, "sortOrder": 0 }),
            json!({ "id": "c2", "name": "Navy", "hexCode": "#000080", "isActive": true, "sortOrder": 1 }),
        ],
        ..Default::default()
    }));

    let app = Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/api/colors", get(list_colors).post(create_color))
        .route(
            "/api/colors/{id}",
            axum::routing::put(update_color).delete(delete_color),
        )
        .route("/api/auth/login", post(login))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend failed");
    });

    MockBackend {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

fn record(state: &mut MockState, request: String, headers: &HeaderMap) {
    if let Some(id) = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        state.request_ids.push(id.to_string());
    }
    state.last_authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.push(request);
}

fn ok(data: Value) -> Reply {
    (StatusCode::OK, Json(json!({ "success": true, "data": data })))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "success": false, "message": message })))
}

fn list(shared: &SharedState, collection: Collection, headers: &HeaderMap) -> Reply {
    let mut state = shared.lock().unwrap();
    let request = format!("GET {}", collection.path());
    let served = state.count(&request);
    record(&mut state, request, headers);

    if state.fail_lists || state.fail_lists_after.is_some_and(|limit| served >= limit) {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }

    let items = Value::Array(state.items(collection).clone());
    if state.raw_lists {
        (StatusCode::OK, Json(items))
    } else {
        ok(items)
    }
}

fn find(shared: &SharedState, collection: Collection, id: &str, headers: &HeaderMap) -> Reply {
    let mut state = shared.lock().unwrap();
    record(&mut state, format!("GET {}/{}", collection.path(), id), headers);

    match state.items(collection).iter().find(|item| item["id"] == id) {
        Some(item) => ok(item.clone()),
        None => fail(StatusCode::NOT_FOUND, collection.not_found()),
    }
}

fn create(shared: &SharedState, collection: Collection, headers: &HeaderMap, body: Value) -> Reply {
    let mut state = shared.lock().unwrap();
    record(&mut state, format!("POST {}", collection.path()), headers);

    if state.fail_mutations {
        return fail(StatusCode::BAD_REQUEST, "Slug already exists");
    }

    let mut item = body;
    item["id"] = json!(uuid::Uuid::new_v4().to_string());
    if item.get("isActive").is_none() {
        item["isActive"] = json!(true);
    }
    state.items(collection).push(item.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": item })),
    )
}

fn update(
    shared: &SharedState,
    collection: Collection,
    id: &str,
    headers: &HeaderMap,
    body: Value,
) -> Reply {
    let mut state = shared.lock().unwrap();
    record(&mut state, format!("PUT {}/{}", collection.path(), id), headers);

    if state.fail_mutations {
        return fail(StatusCode::BAD_REQUEST, "Update rejected");
    }

    let Some(item) = state
        .items(collection)
        .iter_mut()
        .find(|item| item["id"] == id)
    else {
        return fail(StatusCode::NOT_FOUND, collection.not_found());
    };

    if let (Some(target), Value::Object(fields)) = (item.as_object_mut(), body) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
    ok(item.clone())
}

fn remove(shared: &SharedState, collection: Collection, id: &str, headers: &HeaderMap) -> Reply {
    let mut state = shared.lock().unwrap();
    record(&mut state, format!("DELETE {}/{}", collection.path(), id), headers);

    if state.fail_mutations {
        return fail(StatusCode::CONFLICT, "Category has products");
    }

    let items = state.items(collection);
    let before = items.len();
    items.retain(|item| item["id"] != id);
    if items.len() == before {
        return fail(StatusCode::NOT_FOUND, collection.not_found());
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Deleted" })),
    )
}

async fn list_categories(State(s): State<SharedState>, headers: HeaderMap) -> Reply {
    list(&s, Collection::Categories, &headers)
}

async fn get_category(
    State(s): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    find(&s, Collection::Categories, &id, &headers)
}

async fn create_category(
    State(s): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    create(&s, Collection::Categories, &headers, body)
}

async fn update_category(
    State(s): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    update(&s, Collection::Categories, &id, &headers, body)
}

async fn delete_category(
    State(s): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    remove(&s, Collection::Categories, &id, &headers)
}

async fn list_colors(State(s): State<SharedState>, headers: HeaderMap) -> Reply {
    list(&s, Collection::Colors, &headers)
}

async fn create_color(
    State(s): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    create(&s, Collection::Colors, &headers, body)
}

async fn update_color(
    State(s): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    update(&s, Collection::Colors, &id, &headers, body)
}

async fn delete_color(
    State(s): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    remove(&s, Collection::Colors, &id, &headers)
}

async fn login(
    State(s): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = s.lock().unwrap();
    record(&mut state, "POST /auth/login".to_string(), &headers);

    if body["password"] != TEST_PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let exp = chrono::Utc::now().timestamp() + 3600;
    ok(json!({
        "token": make_token(exp),
        "user": {
            "id": "u1",
            "email": body["email"],
            "name": "Store Admin",
            "role": "admin"
        }
    }))
}
