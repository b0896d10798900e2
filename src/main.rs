use std::sync::Arc;

use lambda_http::{run, service_fn, Error, Request};
use tracing_subscriber::EnvFilter;

use serverless_todo_backend::config::AppConfig;
use serverless_todo_backend::router;
use serverless_todo_backend::service::TodoService;
use serverless_todo_backend::store::DynamoStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env();
    let store = DynamoStore::new(config.clone()).await;
    let service = Arc::new(TodoService::new(store, config));

    run(service_fn(move |req: Request| {
        let service = Arc::clone(&service);
        async move { router::route(req, service.as_ref()).await }
    }))
    .await
}
