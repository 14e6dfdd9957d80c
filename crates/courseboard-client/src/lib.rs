#![forbid(unsafe_code)]

//! Persistence seam and reconciliation driver for the courseboard editor.
//!
//! The pure engine in `courseboard-core` answers every drop with at most one
//! [`DropOutcome`](courseboard_core::DropOutcome); this crate turns those
//! outcomes into REST calls and reconciles their results:
//!
//! - [`api`] — the [`CourseApi`](api::CourseApi) trait and its blocking
//!   reqwest implementation.
//! - [`wire`] — serde request bodies for the REST endpoints.
//! - [`sync`] — fire-and-forget dispatch: one detached thread per request,
//!   one [`SyncEvent`](sync::SyncEvent) back per request. No queue, no
//!   retries; out-of-order completion is accepted because every request is
//!   self-describing.
//! - [`editor`] — [`ChapterEditor`](editor::ChapterEditor), the integration
//!   a rendering adapter drives: pointer events in, optimistic mutations and
//!   dispatches out, notices for the toast layer.
//!
//! # Failure policy
//!
//! Reorder failures surface a notice and leave local state standing (the
//! operation is idempotent and user-retryable). A failed cross-container
//! move surfaces a notice and forces a full tree reload — the one true
//! rollback path, because a half-applied move can leave two lists mutually
//! inconsistent. This asymmetry is deliberate; see the editor docs before
//! "fixing" it.

pub mod api;
pub mod editor;
pub mod sync;
pub mod wire;

pub use api::{ApiConfig, ApiError, CourseApi, RestApi};
pub use editor::{ChapterEditor, Notice, Severity};
pub use sync::{Dispatcher, PersistOp, SyncEvent, SyncRequest};
pub use wire::{ContainerPatch, MoveItemBody, ReorderContainersBody, ReorderItemsBody};
