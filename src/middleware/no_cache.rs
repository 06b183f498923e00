//! No-cache response middleware
//!
//! Wraps a hyper service and appends the cache-defeating header trio to
//! every response it returns, whatever the status or content type.

use std::future::Future;
use std::pin::Pin;

use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::service::Service;
use hyper::{Request, Response};

pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";
pub const PRAGMA_VALUE: &str = "no-cache";
pub const EXPIRES_VALUE: &str = "0";

/// Append `Cache-Control`, `Pragma` and `Expires`, in that order.
///
/// Values are appended, never inserted: a header of the same name that is
/// already present stays, and the no-cache value follows it.
pub fn apply_no_cache_headers(headers: &mut HeaderMap) {
    headers.append(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.append(PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
    headers.append(EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}

/// Service decorator applying [`apply_no_cache_headers`] to each response
#[derive(Debug, Clone)]
pub struct NoCache<S> {
    inner: S,
}

impl<S> NoCache<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for NoCache<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        let response = self.inner.call(req);
        Box::pin(async move {
            let mut response = response.await?;
            apply_no_cache_headers(response.headers_mut());
            Ok(response)
        })
    }
}
