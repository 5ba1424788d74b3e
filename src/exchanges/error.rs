/// Everything an adapter fetch can fail with. `BadRequest` lives in
/// `pricing::error` instead, since it is a client-request concern, not an
/// exchange one.
#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
    #[error("upstream response did not match the expected order book shape")]
    BadResponseShape,
    #[error("upstream returned a non-2xx response")]
    UpstreamHTTPError(#[source] reqwest::Error),
    #[error("transport error talking to upstream")]
    UpstreamIOError(#[source] reqwest::Error),
    #[error("upstream request timed out")]
    UpstreamTimeout(#[source] reqwest::Error),
}
