//! Platform service construction

use super::{GitHubService, PlatformService};
use crate::auth::get_github_auth;
use crate::error::Result;
use crate::types::PlatformConfig;
use tracing::debug;

/// Create the platform service for a repository, resolving a token first
pub async fn create_platform_service(config: &PlatformConfig) -> Result<Box<dyn PlatformService>> {
    let auth = get_github_auth(config.host.as_deref()).await?;
    debug!(source = ?auth.source, "resolved GitHub token");
    let service = GitHubService::new(
        &auth.token,
        config.owner.clone(),
        config.repo.clone(),
        config.host.clone(),
    )?;
    Ok(Box::new(service))
}
