#![forbid(unsafe_code)]

//! Request bodies for the course persistence REST endpoints.
//!
//! Field names follow the server's camelCase JSON convention. A `null`
//! `targetIndex` on a move means "append at the end of the target", so
//! [`MoveItemBody::target_index`] is serialized even when `None`.

use courseboard_core::{ContainerId, ItemId};
use serde::{Deserialize, Serialize};

/// Body of `PUT /containers/reorder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderContainersBody {
    pub container_ids: Vec<ContainerId>,
}

/// Body of `PATCH /containers/{containerId}/items/reorder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItemsBody {
    pub item_ids: Vec<ItemId>,
}

/// Body of `PATCH /containers/{sourceContainerId}/items/{itemId}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemBody {
    pub target_container_id: ContainerId,
    /// Insertion position in the target; `null` appends at the end.
    pub target_index: Option<u32>,
}

/// Body of `PUT /containers/{id}` — rename/metadata updates issued by the
/// CRUD dialogs, outside the drag engine but part of the same interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
