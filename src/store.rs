use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_s3::presigning::PresigningConfig;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{TodoItem, TodoUpdate};

/// The only seam allowed to talk to the persistent store. Implemented by
/// [`DynamoStore`] in production and by an in-memory double in tests.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persists a full item. Overwrite semantics on a repeated key.
    async fn create(&self, item: &TodoItem) -> Result<(), ApiError>;

    /// Looks up one item by `(user_id, todo_id)` through the id index.
    /// Returns `None` as the not-found sentinel; `Err` is a store failure.
    async fn get_one(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>, ApiError>;

    /// All items for one owner, newest first. Empty vec when none exist.
    async fn get_all(&self, user_id: &str) -> Result<Vec<TodoItem>, ApiError>;

    /// Field-level replace of the mutable subset, addressed by primary key.
    async fn update(
        &self,
        user_id: &str,
        created_at: &str,
        update: &TodoUpdate,
    ) -> Result<(), ApiError>;

    /// Removes by primary key. Deleting an absent key is a no-op.
    async fn delete(&self, user_id: &str, created_at: &str) -> Result<(), ApiError>;

    /// Time-limited presigned PUT URL for the attachment slot `todo_id`.
    async fn issue_upload_url(&self, todo_id: &str) -> Result<String, ApiError>;
}

/// DynamoDB record table plus S3 attachment bucket.
///
/// Table: PK `userId`, SK `createdAt`. Id index: PK `userId`, SK `todoId`.
/// Ids are ULIDs, so descending `todoId` order on the index is creation
/// order, newest first.
#[derive(Clone)]
pub struct DynamoStore {
    dynamodb: aws_sdk_dynamodb::Client,
    s3: aws_sdk_s3::Client,
    config: AppConfig,
}

impl DynamoStore {
    pub async fn new(config: AppConfig) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            dynamodb: aws_sdk_dynamodb::Client::new(&sdk_config),
            s3: aws_sdk_s3::Client::new(&sdk_config),
            config,
        }
    }
}

#[async_trait]
impl TodoStore for DynamoStore {
    async fn create(&self, item: &TodoItem) -> Result<(), ApiError> {
        self.dynamodb
            .put_item()
            .table_name(&self.config.todos_table)
            .item("userId", AttributeValue::S(item.user_id.clone()))
            .item("createdAt", AttributeValue::S(item.created_at.clone()))
            .item("todoId", AttributeValue::S(item.todo_id.clone()))
            .item("name", AttributeValue::S(item.name.clone()))
            .item("dueDate", AttributeValue::S(item.due_date.clone()))
            .item("done", AttributeValue::Bool(item.done))
            .item("attachmentUrl", AttributeValue::S(item.attachment_url.clone()))
            .send()
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?;

        Ok(())
    }

    async fn get_one(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>, ApiError> {
        let result = self
            .dynamodb
            .query()
            .table_name(&self.config.todos_table)
            .index_name(&self.config.todos_id_index)
            .key_condition_expression("userId = :userId AND todoId = :todoId")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .expression_attribute_values(":todoId", AttributeValue::S(todo_id.to_string()))
            .scan_index_forward(false)
            .send()
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?;

        // at most one match given id uniqueness; newest wins if not
        Ok(result.items().iter().filter_map(item_to_todo).next())
    }

    async fn get_all(&self, user_id: &str) -> Result<Vec<TodoItem>, ApiError> {
        let result = self
            .dynamodb
            .query()
            .table_name(&self.config.todos_table)
            .index_name(&self.config.todos_id_index)
            .key_condition_expression("userId = :userId")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .scan_index_forward(false)
            .send()
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?;

        Ok(result.items().iter().filter_map(item_to_todo).collect())
    }

    async fn update(
        &self,
        user_id: &str,
        created_at: &str,
        update: &TodoUpdate,
    ) -> Result<(), ApiError> {
        self.dynamodb
            .update_item()
            .table_name(&self.config.todos_table)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("createdAt", AttributeValue::S(created_at.to_string()))
            // `name` is a DynamoDB reserved word
            .update_expression("SET #name = :name, dueDate = :dueDate, done = :done")
            .expression_attribute_names("#name", "name")
            .expression_attribute_values(":name", AttributeValue::S(update.name.clone()))
            .expression_attribute_values(":dueDate", AttributeValue::S(update.due_date.clone()))
            .expression_attribute_values(":done", AttributeValue::Bool(update.done))
            .send()
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, user_id: &str, created_at: &str) -> Result<(), ApiError> {
        self.dynamodb
            .delete_item()
            .table_name(&self.config.todos_table)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("createdAt", AttributeValue::S(created_at.to_string()))
            .send()
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?;

        Ok(())
    }

    async fn issue_upload_url(&self, todo_id: &str) -> Result<String, ApiError> {
        let expires_in = Duration::from_secs(self.config.upload_url_expiration_secs);
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| ApiError::Store(e.to_string()))?;

        let presigned = self
            .s3
            .put_object()
            .bucket(&self.config.attachments_bucket)
            .key(todo_id)
            .presigned(presigning)
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}

fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Option<TodoItem> {
    Some(TodoItem {
        todo_id: item.get("todoId")?.as_s().ok()?.clone(),
        user_id: item.get("userId")?.as_s().ok()?.clone(),
        created_at: item.get("createdAt")?.as_s().ok()?.clone(),
        name: item.get("name")?.as_s().ok()?.clone(),
        due_date: item.get("dueDate")?.as_s().ok()?.clone(),
        done: *item.get("done")?.as_bool().ok()?,
        attachment_url: item.get("attachmentUrl")?.as_s().ok()?.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_item(todo_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("todoId".to_string(), AttributeValue::S(todo_id.to_string())),
            ("userId".to_string(), AttributeValue::S("u1".to_string())),
            (
                "createdAt".to_string(),
                AttributeValue::S("2024-01-01T00:00:00+00:00".to_string()),
            ),
            ("name".to_string(), AttributeValue::S("buy milk".to_string())),
            ("dueDate".to_string(), AttributeValue::S("2024-01-01".to_string())),
            ("done".to_string(), AttributeValue::Bool(false)),
            (
                "attachmentUrl".to_string(),
                AttributeValue::S(format!("https://b.s3.amazonaws.com/{todo_id}")),
            ),
        ])
    }

    #[test]
    fn item_to_todo_maps_all_attributes() {
        let todo = item_to_todo(&raw_item("01ARZ3NDEKTSV4RRFFQ69G5FAV")).unwrap();
        assert_eq!(todo.todo_id, "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(todo.user_id, "u1");
        assert_eq!(todo.name, "buy milk");
        assert!(!todo.done);
    }

    #[test]
    fn item_to_todo_rejects_incomplete_record() {
        let mut item = raw_item("01ARZ3NDEKTSV4RRFFQ69G5FAV");
        item.remove("dueDate");
        assert!(item_to_todo(&item).is_none());
    }
}
