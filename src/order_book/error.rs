#[derive(thiserror::Error, Debug)]
pub enum OrderBookError {
    #[error("Order book not found")]
    RegistryMiss(String),
}
