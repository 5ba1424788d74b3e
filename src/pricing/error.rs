#[derive(thiserror::Error, Debug)]
pub enum PricingError {
    #[error("quantity must be positive")]
    BadRequest,
}
