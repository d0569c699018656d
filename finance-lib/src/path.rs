use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::uri::{PathAndQuery, Uri};
use actix_web::Error;
use tracing::warn;

/// Lowercases the request path before routing so `/Transactions/Summary` reaches the same
/// handler as `/transactions/summary`. The query string is left untouched.
pub struct LowercasePath;

impl<S, B> Transform<S, ServiceRequest> for LowercasePath
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LowercasePathMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LowercasePathMiddleware { service }))
    }
}

pub struct LowercasePathMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LowercasePathMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if let Some(uri) = lowercase_uri(&req.head().uri) {
            req.match_info_mut().get_mut().update(&uri);
            req.head_mut().uri = uri;
        }
        self.service.call(req)
    }
}

/// `None` when the path is already lowercase.
fn lowercase_uri(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    if !path.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let path = path.to_ascii_lowercase();
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = match PathAndQuery::try_from(path_and_query) {
        Ok(path_and_query) => Some(path_and_query),
        Err(e) => {
            warn!(error = %e, "unable to rebuild lowercased path");
            return None;
        }
    };
    Uri::from_parts(parts).ok()
}
