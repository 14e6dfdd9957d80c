#![forbid(unsafe_code)]

//! Drag session state machine and cross-container move tracking.
//!
//! A session is `Idle` or `Dragging` exactly one entity (a container or an
//! item); no second drag can start until the session returns to `Idle`.
//! Every transition invoked from the wrong state is a silent no-op.
//!
//! # Invariants
//!
//! 1. A drag sequence is well-formed: one `drag_start`, zero or more
//!    `drag_over` ticks, then exactly one `drag_end` or `drag_cancel`.
//! 2. `drag_over` mutates the board only for cross-container item targets
//!    (the optimistic splice); same-container reordering is computed once,
//!    at drop, directly from the final hovered target.
//! 3. At most one board mutation and one [`DropOutcome`] per `drag_end`.
//! 4. The move intent records the *original* source container; hovering
//!    through intermediate containers only overwrites the target.
//!
//! `drag_cancel` discards the intent but does not undo hover splices —
//! cancel without a drop is rare, and the next drop or tree reload corrects
//! any residual drift. Only a failed move persistence rolls back (by
//! reload), never the cancel path.

use crate::board::{Board, ContainerId, ItemId};
use crate::target::{DropTarget, ResolvedTarget};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Which shape of entity a drag session is carrying.
///
/// Keys the collision strategy: item drags use pointer containment,
/// container drags use closest-corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Container,
    Item,
}

/// The entity being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveDrag {
    Container(ContainerId),
    Item(ItemId),
}

impl ActiveDrag {
    /// The drag kind of this entity.
    #[must_use]
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Container(_) => DragKind::Container,
            Self::Item(_) => DragKind::Item,
        }
    }

    /// The raw id of the dragged entity.
    #[must_use]
    pub fn raw_id(&self) -> &str {
        match self {
            Self::Container(id) => id.as_str(),
            Self::Item(id) => id.as_str(),
        }
    }
}

/// The single authoritative cross-container move recorded for persistence.
///
/// `source` is fixed when the item first leaves its owner (the server's
/// belief of where the item lives); `target` is overwritten every time the
/// pointer splices the item into yet another container. However many
/// containers the pointer passes through, the server sees one move: the
/// original source to the final target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub item: ItemId,
    pub source: ContainerId,
    pub target: ContainerId,
}

/// The at-most-one persistence instruction produced by a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing to persist: no recognized target, or no position change.
    None,
    /// A container changed position; persist the full top-level id order.
    ContainerReorder { order: Vec<ContainerId> },
    /// An item moved within one container; persist that container's order.
    ItemReorder {
        container: ContainerId,
        order: Vec<ItemId>,
    },
    /// An item changed owner; persist the tracked source/target pair.
    ItemMove {
        source: ContainerId,
        item: ItemId,
        target: ContainerId,
        index: usize,
    },
}

impl DropOutcome {
    /// Whether the drop requires no persistence.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Tracks whether a drag is idle or active and owns the pending move intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    active: Option<ActiveDrag>,
    pending_move: Option<MoveIntent>,
}

impl DragSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The entity being dragged, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// The active drag kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<DragKind> {
        self.active.as_ref().map(ActiveDrag::kind)
    }

    /// The tracked cross-container move, if any.
    #[must_use]
    pub fn pending_move(&self) -> Option<&MoveIntent> {
        self.pending_move.as_ref()
    }

    /// Begin a drag on the entity with the given raw id.
    ///
    /// Looks the id up among containers first, then among all items; an id
    /// matching neither fails silently and the session stays `Idle`. A drag
    /// already in progress also refuses a second start. Returns whether a
    /// drag began.
    pub fn drag_start(&mut self, board: &Board, raw: &str) -> bool {
        if self.active.is_some() {
            tracing::debug!(target: "courseboard.session", raw, "drag_start ignored: already dragging");
            return false;
        }
        let active = if board.is_container_id(raw) {
            ActiveDrag::Container(ContainerId::new(raw))
        } else if board.is_item_id(raw) {
            ActiveDrag::Item(ItemId::new(raw))
        } else {
            tracing::debug!(target: "courseboard.session", raw, "drag_start ignored: unknown id");
            return false;
        };
        tracing::debug!(target: "courseboard.session", raw, kind = ?active.kind(), "drag started");
        self.active = Some(active);
        self.pending_move = None;
        true
    }

    /// Hover tick: resolve the target under the pointer and apply the
    /// optimistic cross-container splice.
    ///
    /// Only item drags mutate during hover, and only when the resolved
    /// container differs from the item's current owner. Same-container
    /// targets defer to `drag_end` (no cross-list bookkeeping risk, and no
    /// flicker). Idle sessions, container drags, and unresolvable ids are
    /// no-ops.
    pub fn drag_over(&mut self, board: &mut Board, over: Option<&str>) {
        let Some(ActiveDrag::Item(item)) = &self.active else {
            return;
        };
        let item = item.clone();
        let Some(raw) = over else {
            return;
        };
        if raw == item.as_str() {
            return;
        }
        let Some(target) = DropTarget::decode(raw, board) else {
            return;
        };
        let Some(resolved) = ResolvedTarget::for_item_drag(&target, board) else {
            return;
        };
        let Some(owner) = board.owner_of(&item).cloned() else {
            return;
        };
        if resolved.container == owner {
            return;
        }
        if board
            .transfer_item(&item, &resolved.container, resolved.index)
            .is_err()
        {
            return;
        }
        tracing::debug!(
            target: "courseboard.session",
            item = %item,
            from = %owner,
            to = %resolved.container,
            index = resolved.index,
            "optimistic cross-container splice"
        );
        match &mut self.pending_move {
            Some(intent) if intent.item == item => {
                intent.target = resolved.container;
            }
            _ => {
                self.pending_move = Some(MoveIntent {
                    item,
                    source: owner,
                    target: resolved.container,
                });
            }
        }
    }

    /// Drop: compute the authoritative outcome, apply any final local
    /// mutation, and return to `Idle` unconditionally.
    pub fn drag_end(&mut self, board: &mut Board, over: Option<&str>) -> DropOutcome {
        let Some(active) = self.active.take() else {
            return DropOutcome::None;
        };
        let intent = self.pending_move.take();
        let outcome = match active {
            ActiveDrag::Container(id) => end_container_drag(board, &id, over),
            ActiveDrag::Item(id) => end_item_drag(board, &id, over, intent),
        };
        tracing::debug!(target: "courseboard.session", outcome = ?outcome, "drag ended");
        outcome
    }

    /// Abort the drag: return to `Idle`, discarding the intent.
    ///
    /// No persistence happens, and hover splices are intentionally left in
    /// place (see module docs).
    pub fn drag_cancel(&mut self) {
        if self.active.is_some() {
            tracing::debug!(target: "courseboard.session", "drag cancelled");
        }
        self.active = None;
        self.pending_move = None;
    }
}

// ---------------------------------------------------------------------------
// Drop resolution
// ---------------------------------------------------------------------------

fn end_container_drag(board: &mut Board, id: &ContainerId, over: Option<&str>) -> DropOutcome {
    let Some(from) = board.container_index(id) else {
        return DropOutcome::None;
    };
    let Some(raw) = over else {
        return DropOutcome::None;
    };
    let Some(target) = DropTarget::decode(raw, board) else {
        return DropOutcome::None;
    };
    let Some(target_container) = target.container_id(board) else {
        return DropOutcome::None;
    };
    let Some(to) = board.container_index(&target_container) else {
        return DropOutcome::None;
    };
    if from == to || board.move_container(from, to).is_err() {
        return DropOutcome::None;
    }
    DropOutcome::ContainerReorder {
        order: board.container_order(),
    }
}

fn end_item_drag(
    board: &mut Board,
    item: &ItemId,
    over: Option<&str>,
    intent: Option<MoveIntent>,
) -> DropOutcome {
    // A tracked cross-container move is authoritative: the splice already
    // happened during hover, and the recorded source/target pair — not a
    // re-resolution at drop — is what the server must see.
    if let Some(intent) = intent {
        if intent.target != intent.source {
            let Some(loc) = board.locate_item(item) else {
                return DropOutcome::None;
            };
            return DropOutcome::ItemMove {
                source: intent.source,
                item: item.clone(),
                target: intent.target,
                index: loc.index,
            };
        }
        // The pointer drifted back home before the drop. Ownership never
        // changed from the server's point of view; persist the source
        // container's current order instead of a no-op move.
        let Some(order) = board.item_order(&intent.source) else {
            return DropOutcome::None;
        };
        return DropOutcome::ItemReorder {
            container: intent.source,
            order,
        };
    }

    let Some(raw) = over else {
        return DropOutcome::None;
    };
    let Some(target) = DropTarget::decode(raw, board) else {
        return DropOutcome::None;
    };
    let Some(resolved) = ResolvedTarget::for_item_drag(&target, board) else {
        return DropOutcome::None;
    };
    let Some(loc) = board.locate_item(item) else {
        return DropOutcome::None;
    };
    let owner = board.containers[loc.container].id.clone();

    if resolved.container != owner {
        // The drop landed cross-container without a hover tick in between.
        // Apply the splice now and persist it as a move.
        if board
            .transfer_item(item, &resolved.container, resolved.index)
            .is_err()
        {
            return DropOutcome::None;
        }
        let Some(new_loc) = board.locate_item(item) else {
            return DropOutcome::None;
        };
        return DropOutcome::ItemMove {
            source: owner,
            item: item.clone(),
            target: resolved.container,
            index: new_loc.index,
        };
    }

    // Same-container reorder, computed once from the final hovered target.
    let len = board.containers[loc.container].items.len();
    let from = loc.index;
    let to = resolved.index.min(len.saturating_sub(1));
    if from == to || board.reorder_items(&owner, from, to).is_err() {
        return DropOutcome::None;
    }
    let Some(order) = board.item_order(&owner) else {
        return DropOutcome::None;
    };
    DropOutcome::ItemReorder {
        container: owner,
        order,
    }
}
