#![forbid(unsafe_code)]

//! Drop-target decoding and insertion resolution.
//!
//! The rendering adapter reports the raw id under the pointer, which takes
//! one of three shapes: a container id, an item id, or the synthetic
//! whitespace-zone id `container-droppable-<containerId>` the adapter
//! registers over each container's empty area. The string-shaped dispatch is
//! decoded exactly once, here, into [`DropTarget`]; everything downstream
//! works on the tagged union.

use crate::board::{Board, ContainerId, ItemId};

/// Key prefix of the synthetic whitespace drop zone registered per container.
pub const EMPTY_ZONE_PREFIX: &str = "container-droppable-";

/// Build the synthetic whitespace-zone key for a container.
///
/// The adapter registers one of these per container so empty chapters (and
/// the slack space below a chapter's last item) still accept drops.
#[must_use]
pub fn empty_zone_key(container: &ContainerId) -> String {
    format!("{EMPTY_ZONE_PREFIX}{container}")
}

/// A decoded drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The pointer is over a container element itself.
    Container(ContainerId),
    /// The pointer is over an item; drops insert at that item's position.
    Item(ItemId),
    /// The pointer is over a container's synthetic whitespace zone.
    EmptyZone(ContainerId),
}

impl DropTarget {
    /// Decode a raw adapter id against the current board.
    ///
    /// Resolution order: container id, then item id, then the synthetic
    /// zone pattern (only if it references a known container). Anything
    /// else is an unresolvable target and decodes to `None` — callers
    /// treat that as a silent no-op.
    #[must_use]
    pub fn decode(raw: &str, board: &Board) -> Option<Self> {
        if board.is_container_id(raw) {
            return Some(Self::Container(ContainerId::new(raw)));
        }
        if board.is_item_id(raw) {
            return Some(Self::Item(ItemId::new(raw)));
        }
        if let Some(rest) = raw.strip_prefix(EMPTY_ZONE_PREFIX) {
            let id = ContainerId::new(rest);
            if board.container_index(&id).is_some() {
                return Some(Self::EmptyZone(id));
            }
        }
        None
    }

    /// The container this target belongs to.
    #[must_use]
    pub fn container_id(&self, board: &Board) -> Option<ContainerId> {
        match self {
            Self::Container(id) | Self::EmptyZone(id) => Some(id.clone()),
            Self::Item(item) => board.owner_of(item).cloned(),
        }
    }
}

/// An insertion point resolved from a [`DropTarget`] for an item drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Container receiving the item.
    pub container: ContainerId,
    /// Position the item is spliced in at (clamped to the list end).
    pub index: usize,
}

impl ResolvedTarget {
    /// Resolve the insertion point for an item drag.
    ///
    /// A container or whitespace zone inserts at the end of its list; an
    /// item inserts at that item's current position.
    #[must_use]
    pub fn for_item_drag(target: &DropTarget, board: &Board) -> Option<Self> {
        match target {
            DropTarget::Container(id) | DropTarget::EmptyZone(id) => {
                let container = board.container(id)?;
                Some(Self {
                    container: id.clone(),
                    index: container.items.len(),
                })
            }
            DropTarget::Item(item) => {
                let loc = board.locate_item(item)?;
                Some(Self {
                    container: board.containers[loc.container].id.clone(),
                    index: loc.index,
                })
            }
        }
    }
}
