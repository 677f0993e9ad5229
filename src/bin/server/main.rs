#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for sending notification emails

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notification_service::{
    domain::{notifications::NotificationServiceImpl, verification::InMemoryVerificationStore},
    infrastructure::{
        config::NotificationConfig,
        http::{state::AppState, HttpServer, HttpServerConfig},
    },
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The notification configuration
    #[clap(flatten)]
    pub notifications: NotificationConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mailer = args
        .notifications
        .mailer()
        .context("failed to configure mail transport")?;

    info!(
        transport = mailer.transport_name(),
        mode = ?mailer.mode(),
        sender = %mailer.sender().mailbox(),
        "mail dispatcher ready"
    );

    warn!(
        "verification codes are kept in process memory: they are lost on restart and \
         not shared between instances, so run a single instance"
    );

    let notifications = NotificationServiceImpl::new(
        Arc::new(InMemoryVerificationStore::new()),
        Arc::new(mailer),
        args.notifications.settings(),
    );

    HttpServer::new(AppState::new(notifications), &args.server)?
        .run()
        .await
}
