//! Contact Server
//!
//! Standalone HTTP front end for the contact relay. Accepts the contact
//! form's JSON payload on `POST /submit` and forwards it as an HTML email
//! through the SMTP relay configured in the environment:
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SMTP_USER` | Relay username, also the `From` address |
//! | `SMTP_PASS` | Relay password |
//! | `ADMIN_EMAIL` | Comma-separated `To` recipients |
//! | `CC_EMAILS` | Comma-separated `Cc` recipients |
//!
//! Every route is wrapped in a permissive CORS layer so the form can be
//! hosted on a different origin.

use std::net::SocketAddr;

use axum::{middleware, routing::any, Router};
use clap::Parser;
use contact_mailer::{ContactService, DeliveryConfig, SMTP_HOST, SMTP_PORT};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{handle_not_found, handle_submit, with_cors};

/// Command-line arguments for the contact server
#[derive(Parser, Debug)]
#[command(name = "contact-server")]
#[command(about = "Relays contact form submissions to an SMTP inbox")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ContactService,
}

/// Assemble the router: `/submit`, a 404 fallback, tracing and CORS
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/submit", any(handle_submit))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(with_cors))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DeliveryConfig::from_env();
    for key in config.missing_values() {
        warn!(variable = key, "Environment variable is unset or empty");
    }

    let service = ContactService::smtp(config)?;
    let app = build_router(AppState { service });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server started at http://{}", addr);
    info!("Relay: {}:{}", SMTP_HOST, SMTP_PORT);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
