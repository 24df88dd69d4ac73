//! GitHub token resolution.
//!
//! Priority:
//! 1. explicit token (`--token`)
//! 2. `GITHUB_TOKEN` environment variable
//! 3. `gh auth token` from an authenticated GitHub CLI

use crate::error::{IssuePackError, Result};
use std::process::Command;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Explicit,
    Environment,
    GhCli,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub token: String,
    pub source: TokenSource,
}

/// Resolve a token from the process environment and the `gh` CLI.
pub fn resolve_token(explicit: Option<&str>) -> Result<ResolvedToken> {
    resolve_token_with(explicit, |key| std::env::var(key).ok(), gh_auth_token)
}

/// Resolution with injectable lookups.
pub fn resolve_token_with<E, H>(explicit: Option<&str>, env: E, helper: H) -> Result<ResolvedToken>
where
    E: Fn(&str) -> Option<String>,
    H: FnOnce() -> Option<String>,
{
    let non_empty = |s: String| {
        let trimmed = s.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    let resolved = if let Some(token) = explicit.map(str::to_string).and_then(non_empty) {
        ResolvedToken {
            token,
            source: TokenSource::Explicit,
        }
    } else if let Some(token) = env(TOKEN_ENV).and_then(non_empty) {
        ResolvedToken {
            token,
            source: TokenSource::Environment,
        }
    } else if let Some(token) = helper().and_then(non_empty) {
        ResolvedToken {
            token,
            source: TokenSource::GhCli,
        }
    } else {
        return Err(IssuePackError::MissingCredentials);
    };

    tracing::debug!(source = ?resolved.source, "resolved GitHub token");
    Ok(resolved)
}

/// `gh auth token`, if `gh` is installed and logged in.
pub fn gh_auth_token() -> Option<String> {
    let gh = which::which("gh").ok()?;
    let output = Command::new(gh).args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        tracing::debug!(status = %output.status, "gh auth token failed");
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(token: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| {
            assert_eq!(key, TOKEN_ENV);
            token.map(str::to_string)
        }
    }

    #[test]
    fn explicit_token_wins() {
        let resolved = resolve_token_with(Some("flag"), env_with(Some("env")), || {
            panic!("helper must not run")
        })
        .unwrap();
        assert_eq!(resolved.token, "flag");
        assert_eq!(resolved.source, TokenSource::Explicit);
    }

    #[test]
    fn environment_before_helper() {
        let resolved =
            resolve_token_with(None, env_with(Some("env")), || panic!("helper must not run"))
                .unwrap();
        assert_eq!(resolved.token, "env");
        assert_eq!(resolved.source, TokenSource::Environment);
    }

    #[test]
    fn helper_output_is_trimmed() {
        let resolved =
            resolve_token_with(Some("  "), env_with(Some("")), || Some("gho_abc\n".into())).unwrap();
        assert_eq!(resolved.token, "gho_abc");
        assert_eq!(resolved.source, TokenSource::GhCli);
    }

    #[test]
    fn nothing_found_is_missing_credentials() {
        let err = resolve_token_with(None, env_with(None), || None).unwrap_err();
        assert!(matches!(err, IssuePackError::MissingCredentials));
    }
}
