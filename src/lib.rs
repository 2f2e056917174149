//! # Goldenlock (account console)
//!
//! `goldenlock` is a session-gated client for the goldenlock accounts API. It
//! covers login, registration, profile management and an admin panel (user CRUD
//! and the login-activity audit log).
//!
//! ## Sessions
//!
//! The real session lives server-side behind an `HttpOnly` cookie. The client
//! keeps that cookie in an in-memory jar and never reads it. Only a minimal
//! `{email, username, role}` cache is kept in a [`session::SessionContext`],
//! which is created on login and cleared on logout.
//!
//! ## Errors and notifications
//!
//! Every service call goes through [`pipeline::with_error_handling`], which turns
//! a failure into exactly one toast in the [`notify::NotificationStore`] and then
//! hands the original error back to the caller for local recovery.
//!
//! ## Navigation
//!
//! Protected views are gated by a [`guard::Guard`] that fetches the profile once
//! per mount. All redirects, including the HTTP client's 401 hook, go through a
//! single [`navigation::Navigator`].

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod features;
pub mod guard;
pub mod navigation;
pub mod notify;
pub mod pipeline;
pub mod service;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
