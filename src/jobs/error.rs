#[derive(thiserror::Error, Debug)]
pub enum JobError {
    #[error("limit order failed validation: {0}")]
    ValidationFailure(String),
    #[error("key/value store error")]
    Store(#[from] redis::RedisError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
