//! Repository identity from git

use crate::aws::cli::CommandRunner;
use crate::core::error::{PolgenError, Result};

/// `owner/repo` from an ssh or https remote URL
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let path = if let Some((_, rest)) = url.split_once("://") {
        // https://host/owner/repo.git
        rest.split_once('/')?.1
    } else {
        // git@host:owner/repo.git
        url.rsplit_once(':')?.1
    };
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.rsplitn(2, '/');
    let repo = parts.next()?;
    let owner = parts.next()?.rsplit('/').next()?;
    let name = format!("{owner}/{repo}");
    validate_repo_name(&name).ok()?;
    Some(name)
}

/// Name of the `origin` remote's repository, `None` if git cannot tell
pub fn detect_repo_name(runner: &dyn CommandRunner, git_program: &str) -> Option<String> {
    let args = ["remote", "get-url", "origin"].map(String::from);
    let output = match runner.run(git_program, &args) {
        Ok(output) if output.success() => output,
        Ok(output) => {
            tracing::debug!("Unable to get git repo name: {}", output.stderr.trim());
            return None;
        }
        Err(e) => {
            tracing::debug!("Unable to run {}: {}", git_program, e);
            return None;
        }
    };
    let url = output.stdout.trim();
    tracing::debug!("git repo url: {}", url);
    repo_name_from_url(url)
}

/// Accept exactly `<owner>/<repo>` with both parts non-empty
pub fn validate_repo_name(name: &str) -> Result<()> {
    match name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => Ok(()),
        _ => Err(PolgenError::InvalidRepoName(name.to_string())),
    }
}
