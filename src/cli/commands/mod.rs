//! CLI command implementations

pub mod init;
pub mod list;
pub mod query;
pub mod report;
pub mod sync;
pub mod validate;

use crate::adapters::deputy::{Credentials, DeputyClient, HttpTransport};
use crate::config::RollcallConfig;
use crate::domain::RollcallError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Map an error to the process exit code convention:
/// 2 configuration, 4 API/connection, 5 everything else
pub(crate) fn exit_code_for(error: &RollcallError) -> i32 {
    match error {
        RollcallError::Configuration(_) | RollcallError::MissingObligation { .. } => 2,
        RollcallError::Api(_) => 4,
        _ => 5,
    }
}

/// Build an API client from loaded configuration
pub(crate) fn build_client(
    config: &RollcallConfig,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<DeputyClient> {
    let credentials = Credentials::new(
        config.api.endpoint.clone(),
        config.api.token.clone(),
        Duration::from_secs(config.api.timeout_seconds),
    );
    let transport = HttpTransport::new(&credentials)?.with_shutdown(shutdown_signal);
    Ok(DeputyClient::new(Arc::new(transport)))
}
