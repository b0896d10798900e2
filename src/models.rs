use serde::{Deserialize, Serialize};

/// One user's task. `(user_id, created_at)` is the primary key in the record
/// table; `todo_id` is the secondary lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub todo_id: String,
    pub user_id: String,
    pub created_at: String,
    pub name: String,
    pub due_date: String,
    pub done: bool,
    pub attachment_url: String,
}

/// The mutable subset of a todo, applied wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub name: String,
    pub due_date: String,
    pub done: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub due_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub name: String,
    pub due_date: String,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_item_serializes_with_camel_case_field_names() {
        let item = TodoItem {
            todo_id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            user_id: "u1".to_string(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            name: "buy milk".to_string(),
            due_date: "2024-01-01".to_string(),
            done: false,
            attachment_url: "https://b.s3.amazonaws.com/01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&item).unwrap();
        assert_eq!(json["todoId"], "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00+00:00");
        assert_eq!(json["dueDate"], "2024-01-01");
        assert_eq!(json["done"], false);
        assert!(json["attachmentUrl"].as_str().unwrap().ends_with(&item.todo_id));
    }

    #[test]
    fn update_request_parses_camel_case_body() {
        let body = r#"{"name":"buy milk","dueDate":"2024-01-01","done":true}"#;
        let request: UpdateTodoRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.name, "buy milk");
        assert_eq!(request.due_date, "2024-01-01");
        assert!(request.done);
    }
}
