#![forbid(unsafe_code)]

//! Fire-and-forget persistence dispatch.
//!
//! Each request runs on its own detached thread and reports back exactly one
//! [`SyncEvent`] over an mpsc channel the editor drains on its tick. There
//! is no request queue and no mutex: a second drag may begin while earlier
//! calls are in flight, and completions may arrive out of order. That is
//! acceptable because every request is self-describing — a full ordered id
//! list, or an explicit source/item/target/index — so the latest-issued
//! request's eventual success is the one that matters, and failures recover
//! by re-fetching ground truth rather than patching.
//!
//! No request is retried automatically; retries are user-initiated (drag
//! again, or reload the page).

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use courseboard_core::{Board, ContainerId, ItemId};

use crate::api::{ApiError, CourseApi};

/// A persistence instruction derived from a drop outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOp {
    /// Persist the full top-level container order.
    ContainerOrder(Vec<ContainerId>),
    /// Persist one container's full item order.
    ItemOrder {
        container: ContainerId,
        order: Vec<ItemId>,
    },
    /// Persist a cross-container move.
    Move {
        source: ContainerId,
        item: ItemId,
        target: ContainerId,
        index: usize,
    },
}

impl PersistOp {
    /// Short human label used in notices and logs.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ContainerOrder(_) => "chapter order",
            Self::ItemOrder { .. } => "lesson order",
            Self::Move { .. } => "lesson move",
        }
    }

    /// Whether this op is a cross-container move (the rollback-on-failure
    /// class).
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move { .. })
    }
}

/// Work submitted to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncRequest {
    Persist(PersistOp),
    /// Fetch the full tree (initial load, or rollback after a failed move).
    Reload,
}

/// The single completion event a request reports back.
#[derive(Debug)]
pub enum SyncEvent {
    Persisted(PersistOp),
    PersistFailed { op: PersistOp, error: ApiError },
    TreeLoaded(Board),
    ReloadFailed(ApiError),
}

/// Spawns one detached thread per request and funnels completions into a
/// channel.
pub struct Dispatcher {
    api: Arc<dyn CourseApi>,
    tx: Sender<SyncEvent>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiver its completions arrive on.
    pub fn new(api: Arc<dyn CourseApi>) -> (Self, Receiver<SyncEvent>) {
        let (tx, rx) = channel();
        (Self { api, tx }, rx)
    }

    /// Launch a request. Returns immediately; the completion arrives as a
    /// [`SyncEvent`] on the receiver.
    pub fn dispatch(&self, request: SyncRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tracing::debug!(target: "courseboard.sync", ?request, "dispatch");
        let spawned = thread::Builder::new()
            .name("courseboard-sync".into())
            .spawn(move || {
                let event = execute(api.as_ref(), request);
                // A closed receiver means the editor is gone; nothing left
                // to deliver the completion to.
                let _ = tx.send(event);
            });
        if let Err(err) = spawned {
            tracing::warn!(target: "courseboard.sync", %err, "failed to spawn sync thread");
        }
    }
}

fn execute(api: &dyn CourseApi, request: SyncRequest) -> SyncEvent {
    match request {
        SyncRequest::Reload => match api.fetch_tree() {
            Ok(board) => SyncEvent::TreeLoaded(board),
            Err(error) => SyncEvent::ReloadFailed(error),
        },
        SyncRequest::Persist(op) => {
            let result = match &op {
                PersistOp::ContainerOrder(order) => api.reorder_containers(order),
                PersistOp::ItemOrder { container, order } => api.reorder_items(container, order),
                PersistOp::Move {
                    source,
                    item,
                    target,
                    index,
                } => api.move_item(source, item, target, Some(*index as u32)),
            };
            match result {
                Ok(()) => SyncEvent::Persisted(op),
                Err(error) => SyncEvent::PersistFailed { op, error },
            }
        }
    }
}
