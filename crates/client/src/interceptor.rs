//! Per-request middleware applied to every outgoing call.

use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use uuid::Uuid;

use wms_auth::Session;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Decorates a request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Attaches the session's bearer token.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    session: Session,
}

impl BearerAuth {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.session.authorization_header())
    }
}

/// Tags each request with a fresh time-ordered id for log correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

impl RequestInterceptor for RequestId {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(REQUEST_ID_HEADER, Uuid::now_v7().to_string())
    }
}
