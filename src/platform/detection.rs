//! GitHub repository detection from git remote URLs

use crate::error::{Error, Result};
use crate::types::{GitRemote, PlatformConfig};
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// Check whether a host looks like GitHub or GitHub Enterprise
pub fn is_github_host(host: &str) -> bool {
    host.eq_ignore_ascii_case(GITHUB_HOST) || host.to_ascii_lowercase().contains("github")
}

/// Split a remote URL into host and path.
///
/// Handles `https://`, `ssh://` and scp-like `git@host:owner/repo` forms.
fn split_remote_url(url: &str) -> Option<(String, String)> {
    let url = url.trim().trim_end_matches('/');

    if url.contains("://") {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        return Some((host, parsed.path().trim_matches('/').to_string()));
    }

    let (user_host, path) = url.split_once(':')?;
    let host = user_host.rsplit('@').next()?;
    if host.is_empty() || path.is_empty() {
        return None;
    }
    Some((host.to_string(), path.trim_matches('/').to_string()))
}

/// Parse `owner/repo` (and the host for GitHub Enterprise) from a remote URL
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let (host, path) = split_remote_url(url).ok_or(Error::NoSupportedRemotes)?;

    if !is_github_host(&host) {
        return Err(Error::Platform(format!("unsupported host: {host}")));
    }

    let path = path.trim_end_matches(".git");
    let (owner, repo) = path.split_once('/').ok_or(Error::NoSupportedRemotes)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(Error::NoSupportedRemotes);
    }

    Ok(PlatformConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (!host.eq_ignore_ascii_case(GITHUB_HOST)).then_some(host),
    })
}

/// Pick the remote to use.
///
/// An explicitly requested remote must exist. Otherwise `origin` is preferred,
/// then the first remote.
pub fn select_remote(remotes: &[GitRemote], requested: Option<&str>) -> Result<String> {
    if let Some(name) = requested {
        return remotes
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.name.clone())
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()));
    }

    remotes
        .iter()
        .find(|r| r.name == "origin")
        .or_else(|| remotes.first())
        .map(|r| r.name.clone())
        .ok_or(Error::NoSupportedRemotes)
}
