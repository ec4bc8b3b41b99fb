//! AWS Lambda handler for the contact relay
//!
//! Serverless twin of `contact-server`: API Gateway hands over the HTTP
//! method and body, and the function answers with the same status codes
//! and bodies as the standalone server. CORS preflight is left to the
//! gateway configuration.
//!
//! ## Deployment
//!
//! ```bash
//! # Install cargo-lambda
//! cargo install cargo-lambda
//!
//! # Build for ARM64
//! cargo lambda build --release --arm64 -p contact-lambda
//!
//! # Deploy with the relay settings
//! cargo lambda deploy contact-lambda \
//!   --env-var SMTP_USER=... --env-var SMTP_PASS=... \
//!   --env-var ADMIN_EMAIL=... --env-var CC_EMAILS=...
//! ```

use contact_mailer::{ContactService, DeliveryConfig, Submission, SubmitResponse};
use lambda_http::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    run, service_fn, Body, Error, Request, Response,
};
use tracing::{error, info, instrument, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch adds its own timestamps and does not render ANSI colours
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_current_span(false)
        .without_time()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contact_lambda=info".parse()?)
                .add_directive("contact_mailer=info".parse()?),
        )
        .init();

    info!(
        version = contact_mailer::VERSION,
        "Starting contact relay Lambda"
    );

    let config = DeliveryConfig::from_env();
    for key in config.missing_values() {
        warn!(variable = key, "Environment variable is unset or empty");
    }

    // Built once per cold start, borrowed by every invocation
    let service = ContactService::smtp(config)?;

    run(service_fn(|event: Request| handler(&service, event))).await
}

/// Main Lambda handler
#[instrument(skip(service, event), fields(method = %event.method()))]
async fn handler(service: &ContactService, event: Request) -> Result<Response<Body>, Error> {
    if event.method() != Method::POST {
        return text_response(StatusCode::METHOD_NOT_ALLOWED, "Invalid request method");
    }

    let submission = match Submission::from_json(event.body().as_ref()) {
        Ok(submission) => submission,
        Err(e) => {
            error!(error = %e, "Failed to decode JSON");
            return text_response(StatusCode::BAD_REQUEST, "Failed to parse request body");
        }
    };

    if let Err(e) = service.submit(&submission).await {
        error!(error = %e, "Failed to send email");
        return text_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email");
    }

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(SubmitResponse::success().to_json()?))?)
}

/// Create a plain-text response
fn text_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(message.to_string()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_mailer::testing::{FailingTransport, RecordingTransport};
    use contact_mailer::MailTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn service(transport: Arc<dyn MailTransport>) -> ContactService {
        let config = DeliveryConfig::new(
            "relay@example.com",
            "pw",
            "admin@example.com",
            "cc1@example.com,cc2@example.com",
        );
        ContactService::new(config, transport)
    }

    fn request(method: &str, body: impl Into<Body>) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri("/.netlify/functions/contact")
            .body(body.into())
            .unwrap()
    }

    fn body_text(response: &Response<Body>) -> String {
        String::from_utf8(response.body().as_ref().to_vec()).unwrap()
    }

    fn valid_body() -> String {
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello" }).to_string()
    }

    #[tokio::test]
    async fn test_post_delivers_and_acknowledges() {
        let transport = RecordingTransport::new();
        let service = service(Arc::new(transport.clone()));

        let response = handler(&service, request("POST", valid_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(&response),
            r#"{"status":"success","message":"Thank you for your message! We will get back to you soon."}"#
        );
        let deliveries = transport.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(
            deliveries[0].envelope.recipients,
            vec!["admin@example.com", "cc1@example.com", "cc2@example.com"]
        );
    }

    #[tokio::test]
    async fn test_non_post_is_rejected_without_sending() {
        let transport = RecordingTransport::new();
        let service = service(Arc::new(transport.clone()));

        for method in ["GET", "PUT", "DELETE", "OPTIONS"] {
            let response = handler(&service, request(method, valid_body())).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body_text(&response), "Invalid request method");
        }
        assert_eq!(transport.delivery_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_body_is_rejected_without_sending() {
        let transport = RecordingTransport::new();
        let service = service(Arc::new(transport.clone()));

        let bodies = [
            "not json".to_string(),
            String::new(),
            json!({ "name": "Ada", "email": "ada@example.com" }).to_string(),
        ];
        for body in bodies {
            let response = handler(&service, request("POST", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_text(&response), "Failed to parse request body");
        }
        assert_eq!(transport.delivery_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_server_error() {
        let transport = FailingTransport::new();
        let service = service(Arc::new(transport.clone()));

        let response = handler(&service, request("POST", valid_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(&response), "Failed to send email");
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_no_cors_headers_added() {
        let service = service(Arc::new(RecordingTransport::new()));

        let response = handler(&service, request("POST", valid_body())).await.unwrap();

        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
