//! Outbound user existence check used before a flight is committed.
//!
//! A check starts pending while the directory is awaited and ends either
//! `Validated` or `Rejected`. The awaited future is owned by the request
//! handler, so dropping the inbound request drops the outbound call too.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::errors::{DirectoryError, ServiceError};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(true)` if the user exists, `Ok(false)` if the directory says it
    /// does not, `Err` if the directory could not give an answer.
    async fn check_exists(&self, id: u64) -> Result<bool, DirectoryError>;
}

/// Talks to the user service over HTTP: `GET {base_url}/users/{id}`.
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    /// `timeout` bounds the whole exchange; connecting gets the same budget.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ServiceError::internal)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str { &self.base_url }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn check_exists(&self, id: u64) -> Result<bool, DirectoryError> {
        let url = format!("{}/users/{}", self.base_url, id);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            let kind = if e.is_timeout() { "timeout" } else if e.is_connect() { "connect" } else { "request" };
            warn!(%url, kind, error = %e, "user service call failed");
            DirectoryError::Unavailable(format!("{kind} error calling {url}: {e}"))
        })?;

        let status = resp.status();
        debug!(%url, status = status.as_u16(), "user service responded");
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            warn!(%url, status = status.as_u16(), "unexpected status from user service");
            Err(DirectoryError::UnexpectedStatus(status.as_u16()))
        }
    }
}

/// Why a user reference was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownUser(u64),
    Upstream(DirectoryError),
}

/// Terminal state of one existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCheck {
    Validated,
    Rejected(Rejection),
}

/// Run one existence check and settle it into a `UserCheck`.
pub async fn verify_user(directory: &dyn UserDirectory, user_id: u64) -> UserCheck {
    let check = match directory.check_exists(user_id).await {
        Ok(true) => UserCheck::Validated,
        Ok(false) => UserCheck::Rejected(Rejection::UnknownUser(user_id)),
        Err(e) => UserCheck::Rejected(Rejection::Upstream(e)),
    };
    let outcome = match &check {
        UserCheck::Validated => "validated",
        UserCheck::Rejected(Rejection::UnknownUser(_)) => "unknown_user",
        UserCheck::Rejected(Rejection::Upstream(_)) => "upstream_error",
    };
    common::metrics::user_check(outcome);
    debug!(user_id, outcome, "user check settled");
    check
}

impl From<Rejection> for ServiceError {
    fn from(r: Rejection) -> Self {
        match r {
            Rejection::UnknownUser(_) => ServiceError::not_found("User"),
            Rejection::Upstream(e) => ServiceError::UpstreamUnavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedDirectory;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Router};
    use tokio::net::TcpListener;

    async fn spawn_fake_users(router: Router) -> Result<String, anyhow::Error> {
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(format!("http://{addr}"))
    }

    #[tokio::test]
    async fn verify_user_maps_directory_answers() {
        assert_eq!(verify_user(&FixedDirectory::exists(), 1).await, UserCheck::Validated);
        assert_eq!(
            verify_user(&FixedDirectory::missing(), 2).await,
            UserCheck::Rejected(Rejection::UnknownUser(2))
        );
        let failing = FixedDirectory::failing(DirectoryError::UnexpectedStatus(503));
        assert_eq!(
            verify_user(&failing, 3).await,
            UserCheck::Rejected(Rejection::Upstream(DirectoryError::UnexpectedStatus(503)))
        );
        assert_eq!(failing.call_count(), 1);
    }

    #[tokio::test]
    async fn rejection_maps_to_service_errors() {
        assert!(matches!(
            ServiceError::from(Rejection::UnknownUser(1)),
            ServiceError::NotFound(m) if m == "User not found"
        ));
        assert!(matches!(
            ServiceError::from(Rejection::Upstream(DirectoryError::Unavailable("x".into()))),
            ServiceError::UpstreamUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn http_directory_reads_status_codes() -> Result<(), anyhow::Error> {
        let router = Router::new().route(
            "/users/:id",
            get(|Path(id): Path<u64>| async move {
                match id {
                    1 => AxumStatus::OK,
                    2 => AxumStatus::NOT_FOUND,
                    _ => AxumStatus::INTERNAL_SERVER_ERROR,
                }
            }),
        );
        let base = spawn_fake_users(router).await?;
        let dir = HttpUserDirectory::new(format!("{base}/"), Duration::from_secs(2))?;
        assert_eq!(dir.base_url(), base);

        assert_eq!(dir.check_exists(1).await, Ok(true));
        assert_eq!(dir.check_exists(2).await, Ok(false));
        assert_eq!(dir.check_exists(3).await, Err(DirectoryError::UnexpectedStatus(500)));
        Ok(())
    }

    #[tokio::test]
    async fn http_directory_times_out_on_slow_service() -> Result<(), anyhow::Error> {
        let router = Router::new().route(
            "/users/:id",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                AxumStatus::OK
            }),
        );
        let base = spawn_fake_users(router).await?;
        let dir = HttpUserDirectory::new(base, Duration::from_millis(200))?;
        assert!(matches!(dir.check_exists(1).await, Err(DirectoryError::Unavailable(_))));
        Ok(())
    }

    #[tokio::test]
    async fn http_directory_reports_refused_connection() -> Result<(), anyhow::Error> {
        // bind then drop to get a port nothing listens on
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        drop(listener);
        let dir = HttpUserDirectory::new(format!("http://{addr}"), Duration::from_millis(500))?;
        assert!(matches!(dir.check_exists(1).await, Err(DirectoryError::Unavailable(_))));
        Ok(())
    }
}
