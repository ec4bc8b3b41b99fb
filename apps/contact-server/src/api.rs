//! HTTP handlers for the contact server
//!
//! - `/submit` - contact form endpoint (POST only)
//! - CORS wrapper applied to every route, including the fallback

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use contact_mailer::{Submission, SubmitResponse};
use tracing::info;

use crate::error::ServerError;
use crate::AppState;

/// Handler: /submit
///
/// Non-POST → 405, undecodable body → 400, delivery failure → 500,
/// otherwise the fixed success acknowledgement. The body is read only
/// after the method check and without a size limit.
pub async fn handle_submit(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ServerError> {
    if request.method() != Method::POST {
        return Err(ServerError::MethodNotAllowed);
    }

    let body = to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(ServerError::UnreadableBody)?;
    let submission = Submission::from_json(&body)?;
    state.service.submit(&submission).await?;

    info!("Contact form submission relayed");

    let body = SubmitResponse::success().to_json()?;
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}

/// Fallback for unknown paths
pub async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found")
}

/// CORS middleware
///
/// Adds the allow headers to every response and answers `OPTIONS` with
/// 200 before the request reaches any handler.
pub async fn with_cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    response
}
