//! Notification email composition
//!
//! Renders the fixed HTML template with the submitted fields and prefixes
//! it with RFC 822 style headers. Field values only ever reach the body,
//! and askama escapes them there; headers are built from configuration.
//!
//! Every line of the result ends in CRLF, so the relay's dot-stuffing sees
//! each line start, including a submitted line holding a lone `.`.

use askama::Template;
use tracing::debug;

use crate::error::ContactError;
use crate::types::Submission;
use crate::DeliveryConfig;

/// Subject line of every notification
pub const EMAIL_SUBJECT: &str = "Contact Form Submission";

/// Content type of the rendered body
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=\"utf-8\"";

const CRLF: &str = "\r\n";

#[derive(Template)]
#[template(path = "contact_submission.html")]
struct SubmissionEmail<'a> {
    subject: &'a str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// A rendered message: ordered headers plus an HTML body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl ComposedMessage {
    /// Headers in wire order
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Rendered HTML body, CRLF line endings
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Headers and body joined into the blob handed to the relay
    pub fn formatted(&self) -> String {
        let headers = self
            .headers
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join(CRLF);
        format!("{headers}{CRLF}{CRLF}{}", self.body)
    }
}

/// Rewrite bare `\n` and bare `\r` as `\r\n`
pub fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str(CRLF);
            }
            '\n' => out.push_str(CRLF),
            other => out.push(other),
        }
    }
    out
}

/// Compose the notification for one submission
pub fn compose(
    submission: &Submission,
    config: &DeliveryConfig,
) -> Result<ComposedMessage, ContactError> {
    let body = SubmissionEmail {
        subject: EMAIL_SUBJECT,
        name: &submission.name,
        email: &submission.email,
        message: &submission.message,
    }
    .render()?;
    let body = to_crlf(&body);

    let headers = vec![
        ("From", config.smtp_user.clone()),
        ("To", config.admin_recipients.clone()),
        ("Cc", config.cc_recipients.clone()),
        ("Subject", EMAIL_SUBJECT.to_string()),
        ("Content-Type", CONTENT_TYPE_HTML.to_string()),
    ];

    debug!(body_len = body.len(), "Composed contact notification");

    Ok(ComposedMessage { headers, body })
}
