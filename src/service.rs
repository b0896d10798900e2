use chrono::Utc;
use tracing::info;
use ulid::Ulid;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{CreateTodoRequest, TodoItem, TodoUpdate, UpdateTodoRequest};
use crate::store::TodoStore;

/// Lifecycle rules over the store: id and timestamp stamping at create,
/// resolve-key-then-mutate for update and delete, NotFound shaping.
pub struct TodoService<S: TodoStore> {
    store: S,
    config: AppConfig,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Self { store, config }
    }

    pub async fn create(
        &self,
        user_id: &str,
        request: CreateTodoRequest,
    ) -> Result<TodoItem, ApiError> {
        if request.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Name cannot be empty".to_string()));
        }

        let todo_id = Ulid::new().to_string();
        let attachment_url = self.config.attachment_url(&todo_id);

        let item = TodoItem {
            todo_id,
            user_id: user_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
            name: request.name,
            due_date: request.due_date,
            done: false,
            attachment_url,
        };

        self.store.create(&item).await?;

        info!(todo_id = %item.todo_id, user_id, "todo created");

        Ok(item)
    }

    pub async fn list_all(&self, user_id: &str) -> Result<Vec<TodoItem>, ApiError> {
        self.store.get_all(user_id).await
    }

    pub async fn update(
        &self,
        user_id: &str,
        todo_id: &str,
        request: UpdateTodoRequest,
    ) -> Result<(), ApiError> {
        if request.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Name cannot be empty".to_string()));
        }

        // the update is keyed by (userId, createdAt); resolve the range key
        // first, which doubles as the ownership check
        let existing = self
            .store
            .get_one(user_id, todo_id)
            .await?
            .ok_or(ApiError::NotFound)?;

        let update = TodoUpdate {
            name: request.name,
            due_date: request.due_date,
            done: request.done,
        };

        self.store.update(user_id, &existing.created_at, &update).await?;

        info!(todo_id, user_id, "todo updated");

        Ok(())
    }

    pub async fn delete(&self, user_id: &str, todo_id: &str) -> Result<(), ApiError> {
        let existing = self
            .store
            .get_one(user_id, todo_id)
            .await?
            .ok_or(ApiError::NotFound)?;

        self.store.delete(user_id, &existing.created_at).await?;

        info!(todo_id, user_id, "todo deleted");

        Ok(())
    }

    /// Issues a presigned upload URL for the attachment slot. There is no
    /// ownership lookup here: any authenticated caller can obtain a write
    /// URL for any todo id. Known gap, kept as-is.
    pub async fn issue_upload_url(&self, todo_id: &str) -> Result<String, ApiError> {
        self.store.issue_upload_url(todo_id).await
    }
}
