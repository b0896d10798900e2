use std::sync::Mutex;

use async_trait::async_trait;

use serverless_todo_backend::config::AppConfig;
use serverless_todo_backend::error::ApiError;
use serverless_todo_backend::models::{TodoItem, TodoUpdate};
use serverless_todo_backend::service::TodoService;
use serverless_todo_backend::store::TodoStore;

/// In-memory stand-in for the DynamoDB/S3 store, mirroring its contract:
/// newest-first queries, no-op delete on absent keys, overwrite on repeated
/// primary keys.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<TodoItem>>,
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, item: &TodoItem) -> Result<(), ApiError> {
        let mut items = self.items.lock().unwrap();
        items.retain(|i| !(i.user_id == item.user_id && i.created_at == item.created_at));
        items.push(item.clone());
        Ok(())
    }

    async fn get_one(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>, ApiError> {
        let items = self.items.lock().unwrap();
        let mut matches: Vec<&TodoItem> = items
            .iter()
            .filter(|i| i.user_id == user_id && i.todo_id == todo_id)
            .collect();
        matches.sort_by(|a, b| b.todo_id.cmp(&a.todo_id));
        Ok(matches.first().map(|i| (*i).clone()))
    }

    async fn get_all(&self, user_id: &str) -> Result<Vec<TodoItem>, ApiError> {
        let items = self.items.lock().unwrap();
        let mut matches: Vec<TodoItem> = items
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn update(
        &self,
        user_id: &str,
        created_at: &str,
        update: &TodoUpdate,
    ) -> Result<(), ApiError> {
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items
            .iter_mut()
            .find(|i| i.user_id == user_id && i.created_at == created_at)
        {
            item.name = update.name.clone();
            item.due_date = update.due_date.clone();
            item.done = update.done;
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, created_at: &str) -> Result<(), ApiError> {
        let mut items = self.items.lock().unwrap();
        items.retain(|i| !(i.user_id == user_id && i.created_at == created_at));
        Ok(())
    }

    async fn issue_upload_url(&self, todo_id: &str) -> Result<String, ApiError> {
        Ok(format!(
            "https://todo-attachments.s3.amazonaws.com/{todo_id}?X-Amz-Signature=test"
        ))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        todos_table: "todos-test".to_string(),
        todos_id_index: "todoIdIndex".to_string(),
        attachments_bucket: "todo-attachments-test".to_string(),
        upload_url_expiration_secs: 300,
        aws_region: None,
    }
}

pub fn test_service() -> TodoService<MemoryStore> {
    TodoService::new(MemoryStore::default(), test_config())
}
