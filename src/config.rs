use std::env;

/// Environment-supplied settings, resolved once at startup and passed to the
/// store and service at construction time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub todos_table: String,
    pub todos_id_index: String,
    pub attachments_bucket: String,
    pub upload_url_expiration_secs: u64,
    pub aws_region: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            todos_table: env::var("TODOS_TABLE").unwrap_or_else(|_| "todos".to_string()),
            todos_id_index: env::var("TODOS_ID_INDEX")
                .unwrap_or_else(|_| "todoIdIndex".to_string()),
            attachments_bucket: env::var("TODOS_ATTACHMENTS_BUCKET")
                .unwrap_or_else(|_| "todo-attachments".to_string()),
            upload_url_expiration_secs: env::var("SIGNED_URL_EXPIRATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            aws_region: env::var("AWS_REGION").ok(),
        }
    }

    /// Public URL of the attachment slot for a todo. Derived once at create
    /// time; says nothing about whether the blob exists.
    pub fn attachment_url(&self, todo_id: &str) -> String {
        match &self.aws_region {
            Some(region) => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.attachments_bucket, region, todo_id
            ),
            None => format!("https://{}.s3.amazonaws.com/{}", self.attachments_bucket, todo_id),
        }
    }
}
