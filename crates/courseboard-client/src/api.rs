#![forbid(unsafe_code)]

//! The course persistence API: trait, errors, and the REST implementation.
//!
//! The reconciliation layer is written against [`CourseApi`] so tests can
//! substitute an in-memory recording fake; [`RestApi`] is the production
//! implementation over a blocking reqwest client. Calls run on dispatcher
//! threads (see the `sync` module), never on the drag hot path.

use std::time::Duration;

use courseboard_core::{Board, Container, ContainerId, ItemId};
use thiserror::Error;

use crate::wire::{ContainerPatch, MoveItemBody, ReorderContainersBody, ReorderItemsBody};

/// Errors produced by persistence calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection/transport-level failure (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },
    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// The persistence seam consumed by the reconciliation layer.
///
/// Every method maps 1:1 to a REST endpoint. Implementations must be safe
/// to call from detached dispatcher threads.
pub trait CourseApi: Send + Sync {
    /// `GET /containers` — fetch the full container→items tree. The sole
    /// source of truth for initial load and rollback reload.
    fn fetch_tree(&self) -> Result<Board, ApiError>;

    /// `PUT /containers/reorder` — persist the full top-level order.
    fn reorder_containers(&self, order: &[ContainerId]) -> Result<(), ApiError>;

    /// `PUT /containers/{id}` — rename/metadata update (CRUD dialogs).
    fn update_container(&self, id: &ContainerId, patch: &ContainerPatch) -> Result<(), ApiError>;

    /// `PATCH /containers/{containerId}/items/reorder` — persist one
    /// container's full item order.
    fn reorder_items(&self, container: &ContainerId, order: &[ItemId]) -> Result<(), ApiError>;

    /// `PATCH /containers/{sourceContainerId}/items/{itemId}/move` — move an
    /// item across containers. `None` index appends at the target's end.
    fn move_item(
        &self,
        source: &ContainerId,
        item: &ItemId,
        target: &ContainerId,
        index: Option<u32>,
    ) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for [`RestApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are joined onto.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a configuration with default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// REST implementation
// ---------------------------------------------------------------------------

/// Blocking REST client for the course persistence API.
pub struct RestApi {
    http: reqwest::blocking::Client,
    base: String,
}

impl RestApi {
    /// Build a client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    fn ensure_success(
        resp: reqwest::blocking::Response,
        endpoint: &str,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            })
        }
    }
}

impl CourseApi for RestApi {
    fn fetch_tree(&self) -> Result<Board, ApiError> {
        let endpoint = self.url("containers");
        tracing::debug!(target: "courseboard.api", %endpoint, "GET tree");
        let resp = Self::ensure_success(self.http.get(&endpoint).send()?, &endpoint)?;
        let containers: Vec<Container> = resp.json().map_err(|err| ApiError::Decode {
            endpoint: endpoint.clone(),
            message: err.to_string(),
        })?;
        Ok(Board::new(containers))
    }

    fn reorder_containers(&self, order: &[ContainerId]) -> Result<(), ApiError> {
        let endpoint = self.url("containers/reorder");
        tracing::debug!(target: "courseboard.api", %endpoint, count = order.len(), "PUT container order");
        let body = ReorderContainersBody {
            container_ids: order.to_vec(),
        };
        Self::ensure_success(self.http.put(&endpoint).json(&body).send()?, &endpoint)?;
        Ok(())
    }

    fn update_container(&self, id: &ContainerId, patch: &ContainerPatch) -> Result<(), ApiError> {
        let endpoint = self.url(&format!("containers/{id}"));
        tracing::debug!(target: "courseboard.api", %endpoint, "PUT container");
        Self::ensure_success(self.http.put(&endpoint).json(patch).send()?, &endpoint)?;
        Ok(())
    }

    fn reorder_items(&self, container: &ContainerId, order: &[ItemId]) -> Result<(), ApiError> {
        let endpoint = self.url(&format!("containers/{container}/items/reorder"));
        tracing::debug!(target: "courseboard.api", %endpoint, count = order.len(), "PATCH item order");
        let body = ReorderItemsBody {
            item_ids: order.to_vec(),
        };
        Self::ensure_success(self.http.patch(&endpoint).json(&body).send()?, &endpoint)?;
        Ok(())
    }

    fn move_item(
        &self,
        source: &ContainerId,
        item: &ItemId,
        target: &ContainerId,
        index: Option<u32>,
    ) -> Result<(), ApiError> {
        let endpoint = self.url(&format!("containers/{source}/items/{item}/move"));
        tracing::debug!(
            target: "courseboard.api",
            %endpoint,
            to = %target,
            ?index,
            "PATCH item move"
        );
        let body = MoveItemBody {
            target_container_id: target.clone(),
            target_index: index,
        };
        Self::ensure_success(self.http.patch(&endpoint).json(&body).send()?, &endpoint)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_builder() {
        let config = ApiConfig::new("https://lms.example/api/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        let config = config.timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = RestApi::new(ApiConfig::new("https://lms.example/api/")).unwrap();
        assert_eq!(api.url("containers"), "https://lms.example/api/containers");
        assert_eq!(
            api.url("containers/ch1/items/l1/move"),
            "https://lms.example/api/containers/ch1/items/l1/move"
        );
    }
}
