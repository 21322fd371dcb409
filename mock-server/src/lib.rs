use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListFilter {
    pub completed: Option<bool>,
}

/// Body of every error response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

/// What `/echo` saw of the request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

#[derive(Deserialize)]
pub struct Delay {
    #[serde(default)]
    pub ms: u64,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Todo>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(replace_todo).patch(update_todo).delete(delete_todo),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/text", get(text))
        .route("/broken-json", get(broken_json))
        .route("/slow", get(slow))
        .route("/empty", any(empty))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            message: "not found".to_string(),
        }),
    )
}

async fn list_todos(State(db): State<Db>, Query(filter): Query<ListFilter>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    let mut matching: Vec<Todo> = todos
        .values()
        .filter(|todo| filter.completed.map_or(true, |completed| todo.completed == completed))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.title.cmp(&b.title));
    Json(matching)
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> (StatusCode, Json<Todo>) {
    let todo = Todo {
        id: Uuid::new_v4(),
        title: input.title,
        completed: input.completed,
    };
    db.write().await.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<Json<Todo>> {
    let todos = db.read().await;
    todos.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn replace_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateTodo>,
) -> ApiResult<Json<Todo>> {
    let mut todos = db.write().await;
    let todo = todos.get_mut(&id).ok_or_else(not_found)?;
    todo.title = input.title;
    todo.completed = input.completed;
    Ok(Json(todo.clone()))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> ApiResult<Json<Todo>> {
    let mut todos = db.write().await;
    let todo = todos.get_mut(&id).ok_or_else(not_found)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let mut todos = db.write().await;
    todos.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

async fn echo(method: Method, Query(query): Query<Vec<(String, String)>>, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.as_str().to_string(),
        query,
        headers,
        body: (!body.is_empty()).then_some(body),
    })
}

async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: format!("unsupported status {code}"),
            }),
        )
            .into_response();
    };
    let message = status.canonical_reason().unwrap_or("unknown").to_lowercase();
    (status, Json(ErrorBody { message })).into_response()
}

async fn text() -> &'static str {
    "hello from the mock server"
}

async fn broken_json() -> Response {
    ([(header::CONTENT_TYPE, "application/json")], "{\"message\": ").into_response()
}

async fn slow(Query(delay): Query<Delay>) -> Json<ErrorBody> {
    tokio::time::sleep(Duration::from_millis(delay.ms)).await;
    Json(ErrorBody {
        message: format!("slept {}ms", delay.ms),
    })
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
