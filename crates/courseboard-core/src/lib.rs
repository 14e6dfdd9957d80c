#![forbid(unsafe_code)]

//! Drag-reordering engine for the courseboard chapter editor.
//!
//! Chapters (containers) hold ordered lesson items. A user can reorder
//! chapters, reorder items within a chapter, or move an item across chapters,
//! entirely via pointer drag. This crate is the pure half of that feature:
//! the in-memory collection model, the geometric collision strategies, and
//! the drag session state machine. It performs no I/O — a rendering adapter
//! feeds it element rects and pointer ids, and it answers with at most one
//! local mutation and one [`DropOutcome`](session::DropOutcome) per drop.
//!
//! # Architecture
//!
//! - [`board`] — ordered collection model and invariant-preserving mutation
//!   helpers. Array position is the authoritative order.
//! - [`geometry`] — points and rects in layout coordinates.
//! - [`collision`] — the zone registry and the two collision strategies:
//!   pointer-within for item drags, closest-corner for container drags.
//! - [`target`] — the three drop-target id shapes, decoded once at the
//!   boundary into a tagged union.
//! - [`session`] — the `Idle`/`Dragging` state machine, the cross-container
//!   move intent tracker, and drop outcome computation.
//!
//! # Adapter contract
//!
//! The rendering adapter must: register each container and item as a
//! draggable keyed by its id, register each container plus a synthetic
//! whitespace zone (`container-droppable-<id>`) as a drop target, drive the
//! session with the ids it observes under the pointer, and re-render from
//! the board after every mutation.

pub mod board;
pub mod collision;
pub mod geometry;
pub mod session;
pub mod target;

pub use board::{
    Board, BoardError, Container, ContainerId, Item, ItemId, ItemKind, ItemLocation, ItemMeta,
};
pub use collision::{DropZone, ZoneMap};
pub use geometry::{Point, Rect};
pub use session::{ActiveDrag, DragKind, DragSession, DropOutcome, MoveIntent};
pub use target::{DropTarget, EMPTY_ZONE_PREFIX, ResolvedTarget, empty_zone_key};
