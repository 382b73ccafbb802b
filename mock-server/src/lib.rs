use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateWidget {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateWidget {
    pub name: Option<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    widgets: BTreeMap<u64, Widget>,
}

pub type Db = Arc<RwLock<Store>>;

/// Routes mounted under `/v1`:
/// - `/widgets`, `/widgets/{id}`: an in-memory CRUD resource
/// - `/echo/...`: reflects method, path, query, headers, and body as JSON
/// - `/text`, `/broken`, `/empty`: fixed content-type fixtures
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let v1 = Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route(
            "/widgets/{id}",
            get(get_widget)
                .put(replace_widget)
                .patch(update_widget)
                .delete(delete_widget),
        )
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/text", get(text))
        .route("/broken", get(broken))
        .route("/empty", get(empty))
        .with_state(db);
    Router::new().nest("/v1", v1)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_widgets(State(db): State<Db>) -> Json<Vec<Widget>> {
    let store = db.read().await;
    Json(store.widgets.values().cloned().collect())
}

async fn create_widget(
    State(db): State<Db>,
    Json(input): Json<CreateWidget>,
) -> (StatusCode, Json<Widget>) {
    let mut store = db.write().await;
    store.next_id += 1;
    let widget = Widget {
        id: store.next_id,
        name: input.name,
    };
    store.widgets.insert(widget.id, widget.clone());
    tracing::info!(id = widget.id, "widget created");
    (StatusCode::CREATED, Json(widget))
}

async fn get_widget(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Widget>, StatusCode> {
    let store = db.read().await;
    store.widgets.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_widget(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<CreateWidget>,
) -> Result<Json<Widget>, StatusCode> {
    let mut store = db.write().await;
    let widget = store.widgets.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    widget.name = input.name;
    Ok(Json(widget.clone()))
}

async fn update_widget(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateWidget>,
) -> Result<Json<Widget>, StatusCode> {
    let mut store = db.write().await;
    let widget = store.widgets.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        widget.name = name;
    }
    Ok(Json(widget.clone()))
}

async fn delete_widget(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let mut store = db.write().await;
    store
        .widgets
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or((StatusCode::NOT_FOUND, "no such widget"))
}

async fn echo(
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_string(), Value::String(value.to_string())))
        })
        .collect();
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "pong")
}

async fn broken() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{\"unterminated\": ")
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
