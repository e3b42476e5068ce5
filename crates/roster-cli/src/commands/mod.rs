pub mod batch;
pub mod run;
pub mod serve;

use std::sync::Arc;

use roster_client::{ApiClient, LmsGateway, RosterGateway};
use roster_core::RosterConfig;

/// LMS-backed gateway for the configured instance.
pub fn gateway(config: &RosterConfig) -> anyhow::Result<Arc<dyn RosterGateway>> {
    let client = ApiClient::new(config)?;
    Ok(Arc::new(LmsGateway::new(client, config.drop_mode)))
}
