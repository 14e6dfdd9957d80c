#![forbid(unsafe_code)]

//! Ordered collection model for the chapter board.
//!
//! Chapters ([`Container`]) hold ordered lesson [`Item`]s. Array position is
//! the authoritative render and persistence order; the `sort_order` fields
//! mirror what the server last persisted and are advisory only — they are
//! never consulted while a drag is in progress.
//!
//! # Invariants
//!
//! 1. Every item belongs to exactly one container at any instant; a
//!    cross-container transfer is a single atomic splice (remove + insert).
//! 2. Container ids are unique board-wide; item ids are unique board-wide.
//! 3. The engine only repositions entities — it never creates or destroys
//!    them. Creation and deletion belong to the CRUD layer, which replaces
//!    the tree wholesale.
//!
//! All mutation helpers are bounds-checked and return [`BoardError`] instead
//! of panicking; callers that have already resolved indices treat an error
//! as a silent no-op.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable server-issued identifier for a container (chapter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a container id from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Stable server-issued identifier for a lesson item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an item id from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ---------------------------------------------------------------------------
// Items and containers
// ---------------------------------------------------------------------------

/// Content kind of a lesson item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    File,
    Video,
    Quiz,
    Lecture,
    Note,
    Flashcard,
}

/// Optional storage metadata attached to file-backed items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMeta {
    /// Size in bytes, when the item is a stored file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Backing storage URL, when the item is a stored file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,
}

/// A lesson/content unit belonging to exactly one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "itemType")]
    pub kind: ItemKind,
    /// Server-side ordinal. Advisory; array position is truth.
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub meta: ItemMeta,
}

/// A chapter: an ordered grouping that owns a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: ContainerId,
    pub title: String,
    /// Server-side ordinal. Advisory; array position is truth.
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub items: Vec<Item>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Where an item currently lives: container index and position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLocation {
    pub container: usize,
    pub index: usize,
}

/// The top-level ordered sequence of containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub containers: Vec<Container>,
}

impl Board {
    /// Create a board from an ordered container list.
    #[must_use]
    pub fn new(containers: Vec<Container>) -> Self {
        Self { containers }
    }

    /// Position of a container in the top-level sequence.
    #[must_use]
    pub fn container_index(&self, id: &ContainerId) -> Option<usize> {
        self.containers.iter().position(|c| &c.id == id)
    }

    /// Look up a container by id.
    #[must_use]
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| &c.id == id)
    }

    /// Look up a container by id, mutably.
    pub fn container_mut(&mut self, id: &ContainerId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| &c.id == id)
    }

    /// Whether a raw adapter id names a container.
    #[must_use]
    pub fn is_container_id(&self, raw: &str) -> bool {
        self.containers.iter().any(|c| c.id.as_str() == raw)
    }

    /// Whether a raw adapter id names an item.
    #[must_use]
    pub fn is_item_id(&self, raw: &str) -> bool {
        self.containers
            .iter()
            .any(|c| c.items.iter().any(|i| i.id.as_str() == raw))
    }

    /// Locate an item across all containers.
    #[must_use]
    pub fn locate_item(&self, id: &ItemId) -> Option<ItemLocation> {
        for (ci, container) in self.containers.iter().enumerate() {
            if let Some(ii) = container.items.iter().position(|i| &i.id == id) {
                return Some(ItemLocation {
                    container: ci,
                    index: ii,
                });
            }
        }
        None
    }

    /// The id of the container currently owning an item.
    #[must_use]
    pub fn owner_of(&self, id: &ItemId) -> Option<&ContainerId> {
        self.locate_item(id)
            .map(|loc| &self.containers[loc.container].id)
    }

    /// Total item count across all containers.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.containers.iter().map(|c| c.items.len()).sum()
    }

    /// The current top-level order as an id list.
    #[must_use]
    pub fn container_order(&self) -> Vec<ContainerId> {
        self.containers.iter().map(|c| c.id.clone()).collect()
    }

    /// The current item order of one container as an id list.
    #[must_use]
    pub fn item_order(&self, container: &ContainerId) -> Option<Vec<ItemId>> {
        self.container(container)
            .map(|c| c.items.iter().map(|i| i.id.clone()).collect())
    }

    /// Move a container from one position to another.
    ///
    /// Array-move semantics: the container is removed first, then inserted
    /// at `to` (interpreted against the shortened list, clamped to its end).
    pub fn move_container(&mut self, from: usize, to: usize) -> Result<(), BoardError> {
        let len = self.containers.len();
        if from >= len {
            return Err(BoardError::ContainerIndexOutOfBounds { index: from, len });
        }
        let container = self.containers.remove(from);
        let to = to.min(self.containers.len());
        self.containers.insert(to, container);
        Ok(())
    }

    /// Reorder one item within a container, with array-move semantics.
    pub fn reorder_items(
        &mut self,
        container: &ContainerId,
        from: usize,
        to: usize,
    ) -> Result<(), BoardError> {
        let id = container.clone();
        let Some(c) = self.container_mut(container) else {
            return Err(BoardError::UnknownContainer { id });
        };
        let len = c.items.len();
        if from >= len {
            return Err(BoardError::ItemIndexOutOfBounds {
                container: id,
                index: from,
                len,
            });
        }
        let item = c.items.remove(from);
        let to = to.min(c.items.len());
        c.items.insert(to, item);
        Ok(())
    }

    /// Splice an item out of its current owner and into `target` at `index`
    /// (clamped to the target's end).
    ///
    /// The transfer is atomic: both endpoints are resolved before either
    /// list is touched, so a failure leaves the board unchanged.
    pub fn transfer_item(
        &mut self,
        item: &ItemId,
        target: &ContainerId,
        index: usize,
    ) -> Result<(), BoardError> {
        let Some(loc) = self.locate_item(item) else {
            return Err(BoardError::UnknownItem { id: item.clone() });
        };
        let Some(target_idx) = self.container_index(target) else {
            return Err(BoardError::UnknownContainer { id: target.clone() });
        };
        if loc.container == target_idx {
            // Same-container "transfer" degrades to a reorder splice.
            let id = self.containers[loc.container].id.clone();
            return self.reorder_items(&id, loc.index, index);
        }
        let moved = self.containers[loc.container].items.remove(loc.index);
        let slot = index.min(self.containers[target_idx].items.len());
        self.containers[target_idx].items.insert(slot, moved);
        Ok(())
    }

    /// Reject trees with duplicate container ids or duplicate item ids.
    ///
    /// Item uniqueness is board-wide: an item id appearing in two containers
    /// violates exclusive ownership even though each list looks locally
    /// consistent.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut container_ids = HashSet::new();
        let mut item_ids = HashSet::new();
        for container in &self.containers {
            if !container_ids.insert(&container.id) {
                return Err(BoardError::DuplicateContainerId {
                    id: container.id.clone(),
                });
            }
            for item in &container.items {
                if !item_ids.insert(&item.id) {
                    return Err(BoardError::DuplicateItemId {
                        id: item.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Collection-model violations surfaced by board helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    DuplicateContainerId {
        id: ContainerId,
    },
    DuplicateItemId {
        id: ItemId,
    },
    UnknownContainer {
        id: ContainerId,
    },
    UnknownItem {
        id: ItemId,
    },
    ContainerIndexOutOfBounds {
        index: usize,
        len: usize,
    },
    ItemIndexOutOfBounds {
        container: ContainerId,
        index: usize,
        len: usize,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateContainerId { id } => write!(f, "duplicate container id {id}"),
            Self::DuplicateItemId { id } => write!(f, "duplicate item id {id}"),
            Self::UnknownContainer { id } => write!(f, "unknown container {id}"),
            Self::UnknownItem { id } => write!(f, "unknown item {id}"),
            Self::ContainerIndexOutOfBounds { index, len } => {
                write!(f, "container index {index} out of bounds (len {len})")
            }
            Self::ItemIndexOutOfBounds {
                container,
                index,
                len,
            } => write!(
                f,
                "item index {index} out of bounds in container {container} (len {len})"
            ),
        }
    }
}

impl std::error::Error for BoardError {}
