use lambda_http::{Body, Request, Response};
use serde_json::json;

use crate::error::ApiError;
use crate::models::{CreateTodoRequest, UpdateTodoRequest};
use crate::service::TodoService;
use crate::store::TodoStore;

fn json_response(status: u16, body: &impl serde::Serialize) -> Result<Response<Body>, ApiError> {
    let json = serde_json::to_string(body).map_err(|e| ApiError::Store(e.to_string()))?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(json))
        .unwrap())
}

fn body_text(req: &Request) -> Result<String, ApiError> {
    match req.body() {
        Body::Text(s) => Ok(s.clone()),
        Body::Binary(b) => String::from_utf8(b.to_vec())
            .map_err(|_| ApiError::BadRequest("Invalid UTF-8".to_string())),
        Body::Empty => Err(ApiError::BadRequest("Empty body".to_string())),
    }
}

pub async fn create_todo<S: TodoStore>(
    req: Request,
    service: &TodoService<S>,
    user_id: &str,
) -> Result<Response<Body>, ApiError> {
    let input: CreateTodoRequest = serde_json::from_str(&body_text(&req)?)?;
    let item = service.create(user_id, input).await?;
    json_response(201, &json!({ "item": item }))
}

pub async fn list_todos<S: TodoStore>(
    service: &TodoService<S>,
    user_id: &str,
) -> Result<Response<Body>, ApiError> {
    let items = service.list_all(user_id).await?;
    json_response(200, &json!({ "items": items }))
}

pub async fn update_todo<S: TodoStore>(
    req: Request,
    service: &TodoService<S>,
    user_id: &str,
    todo_id: &str,
) -> Result<Response<Body>, ApiError> {
    let input: UpdateTodoRequest = serde_json::from_str(&body_text(&req)?)?;
    service.update(user_id, todo_id, input).await?;
    json_response(200, &json!({}))
}

pub async fn delete_todo<S: TodoStore>(
    service: &TodoService<S>,
    user_id: &str,
    todo_id: &str,
) -> Result<Response<Body>, ApiError> {
    service.delete(user_id, todo_id).await?;
    json_response(200, &json!({}))
}

pub async fn generate_upload_url<S: TodoStore>(
    service: &TodoService<S>,
    todo_id: &str,
) -> Result<Response<Body>, ApiError> {
    let upload_url = service.issue_upload_url(todo_id).await?;
    json_response(200, &json!({ "uploadUrl": upload_url }))
}
