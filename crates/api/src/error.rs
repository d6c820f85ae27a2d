//! API error types with HTTP response mapping.
//!
//! Every failure leaves the server as a problem-details body
//! `{type, title, status, detail}`. For unexpected errors the detail and the
//! source chain are attached by [`expose_diagnostics`] outside production.

use application::ApplicationError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use serde::Serialize;

use crate::config::Environment;

/// Problem-details response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

impl ProblemDetails {
    fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            kind,
            title,
            status: status.as_u16(),
            detail: None,
            trace: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Diagnostics of an unexpected error, carried as a response extension so
/// they can be attached or dropped depending on the environment.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    problem: ProblemDetails,
    detail: String,
    trace: Vec<String>,
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path, query string or body that never reached a use case.
    BadRequest(String),
    /// Failure returned by a use case.
    Application(ApplicationError),
}

impl ApiError {
    fn problem(&self) -> ProblemDetails {
        match self {
            ApiError::BadRequest(msg) => {
                ProblemDetails::new(StatusCode::BAD_REQUEST, "BadRequest", "Bad Request")
                    .detail(msg.clone())
            }
            ApiError::Application(err) => match err {
                ApplicationError::Validation(_) => ProblemDetails::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UnprocessableEntity",
                    "One or more validation errors occurred",
                )
                .detail(err.to_string()),
                ApplicationError::NotFound { .. } => {
                    ProblemDetails::new(StatusCode::NOT_FOUND, "NotFound", "Not Found")
                        .detail(err.to_string())
                }
                ApplicationError::RelatedAggregate(_) => ProblemDetails::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UnprocessableEntity",
                    "Invalid Related Aggregate",
                )
                .detail(err.to_string()),
                ApplicationError::Cancelled | ApplicationError::Unexpected(_) => {
                    ProblemDetails::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "UnexpectedError",
                        "An unexpected error occurred",
                    )
                }
            },
        }
    }
}

/// Messages of every error in `err`'s source chain, outermost first.
fn source_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    std::iter::successors(err.source(), |e| e.source())
        .map(ToString::to_string)
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.problem();

        match self {
            ApiError::Application(err) if problem.status_code().is_server_error() => {
                tracing::error!(error = %err, kind = err.kind(), "unexpected error");

                let diagnostics = Diagnostics {
                    problem: problem.clone(),
                    detail: err.to_string(),
                    trace: source_chain(&err),
                };
                let mut response = problem.into_response();
                response.extensions_mut().insert(diagnostics);
                response
            }
            _ => problem.into_response(),
        }
    }
}

/// Re-renders unexpected errors with their detail and source chain when not
/// running in production.
pub async fn expose_diagnostics(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if environment.is_production() {
        return response;
    }

    match response.extensions().get::<Diagnostics>().cloned() {
        Some(diagnostics) => {
            let mut problem = diagnostics.problem;
            problem.detail = Some(diagnostics.detail);
            problem.trace = Some(diagnostics.trace);
            problem.into_response()
        }
        None => response,
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Application(ApplicationError::Validation(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
