//! Access guard
//!
//! Protected routes run an ordered pipeline of [`RequestInterceptor`]s
//! before the handler. Each interceptor either enriches the
//! [`RequestContext`] and passes it on, or short-circuits with a response,
//! in which case the handler never runs. The final context is stored in the
//! request extensions and read back by the [`AuthenticatedUser`] extractor.

use crate::auth::{TokenCodec, TokenError};
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authenticated identity (the token subject, i.e. the user's email)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(pub String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// State accumulated while a request passes through the pipeline
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub subject: Option<Subject>,
}

/// Outcome of a single interceptor
pub enum Interception {
    Continue(RequestContext),
    ShortCircuit(Response),
}

/// One step of the request pipeline
pub trait RequestInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn intercept(&self, headers: &HeaderMap, context: RequestContext) -> Interception;
}

/// Assigns a request id, keeping a well-formed one supplied by the client
pub struct RequestIdInterceptor;

impl RequestIdInterceptor {
    fn incoming(headers: &HeaderMap) -> Option<String> {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty() && id.len() <= 128)
            .map(str::to_string)
    }
}

impl RequestInterceptor for RequestIdInterceptor {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn intercept(&self, headers: &HeaderMap, mut context: RequestContext) -> Interception {
        let id = Self::incoming(headers).unwrap_or_else(|| Uuid::new_v4().to_string());
        context.request_id = Some(id);
        Interception::Continue(context)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[source] TokenError),
}

/// Verifies the `Authorization: Bearer <token>` header
pub struct BearerGuard {
    codec: Arc<TokenCodec>,
}

impl BearerGuard {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<Subject, GuardError> {
        let token = bearer_token(headers).ok_or(GuardError::MissingToken)?;
        let claims = self.codec.verify(token).map_err(GuardError::InvalidToken)?;
        Ok(Subject(claims.sub))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl RequestInterceptor for BearerGuard {
    fn name(&self) -> &'static str {
        "bearer_guard"
    }

    fn intercept(&self, headers: &HeaderMap, mut context: RequestContext) -> Interception {
        match self.authorize(headers) {
            Ok(subject) => {
                debug!(subject = subject.as_str(), "Bearer token accepted");
                context.subject = Some(subject);
                Interception::Continue(context)
            }
            Err(e) => {
                warn!(
                    request_id = context.request_id.as_deref().unwrap_or("-"),
                    reason = %e,
                    "Rejected unauthenticated request"
                );
                Interception::ShortCircuit(ApiError::from(e).into_response())
            }
        }
    }
}

/// Ordered list of interceptors
#[derive(Default)]
pub struct InterceptorPipeline {
    interceptors: Vec<Box<dyn RequestInterceptor>>,
}

impl InterceptorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Request id assignment followed by bearer verification
    pub fn protected(codec: Arc<TokenCodec>) -> Self {
        Self::new()
            .with(RequestIdInterceptor)
            .with(BearerGuard::new(codec))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run every interceptor in order, stopping at the first short-circuit.
    /// A short-circuit response still carries the request id if one was
    /// assigned by then.
    pub fn run(&self, headers: &HeaderMap) -> Interception {
        let mut context = RequestContext::default();
        for interceptor in &self.interceptors {
            match interceptor.intercept(headers, context.clone()) {
                Interception::Continue(next) => context = next,
                Interception::ShortCircuit(mut response) => {
                    if let Some(id) = &context.request_id {
                        set_request_id(&mut response, id);
                    }
                    return Interception::ShortCircuit(response);
                }
            }
        }
        Interception::Continue(context)
    }
}

fn set_request_id(response: &mut Response, id: &str) {
    if let Ok(value) = HeaderValue::from_str(id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
}

/// Runs the state's interceptor pipeline in front of protected routes
pub async fn guard_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.pipeline.run(request.headers()) {
        Interception::ShortCircuit(response) => response,
        Interception::Continue(context) => {
            let request_id = context.request_id.clone();
            request.extensions_mut().insert(context);

            let mut response = next.run(request).await;
            if let Some(id) = request_id {
                set_request_id(&mut response, &id);
            }
            response
        }
    }
}

/// Handler-side view of a request that passed the guard
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: Subject,
    pub request_id: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<RequestContext>()
            .ok_or(GuardError::MissingToken)?;
        let subject = context.subject.clone().ok_or(GuardError::MissingToken)?;

        Ok(Self {
            subject,
            request_id: context.request_id.clone().unwrap_or_default(),
        })
    }
}
