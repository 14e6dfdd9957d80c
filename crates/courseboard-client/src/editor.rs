#![forbid(unsafe_code)]

//! The chapter editor: optimistic mutation + reconciliation driver.
//!
//! [`ChapterEditor`] is what a rendering adapter talks to. The adapter's
//! contract:
//!
//! - register each container and item (and each container's synthetic
//!   whitespace zone) with its bounds via [`ChapterEditor::set_layout`]
//!   after every render;
//! - forward pointer events to [`pointer_down`](ChapterEditor::pointer_down),
//!   [`pointer_move`](ChapterEditor::pointer_move),
//!   [`pointer_up`](ChapterEditor::pointer_up) and
//!   [`cancel_drag`](ChapterEditor::cancel_drag);
//! - pump [`poll_sync`](ChapterEditor::poll_sync) every tick and re-render
//!   from [`board`](ChapterEditor::board) after every call;
//! - drain [`take_notices`](ChapterEditor::take_notices) into the toast
//!   layer.
//!
//! # Failure policy
//!
//! Reorder failures (container order, same-container item order) surface a
//! notice and leave the optimistic state standing: the operation is
//! idempotent, safe to leave, and user-retryable, and reloading would cause
//! visible flicker for no consistency gain. A failed cross-container move
//! surfaces a notice and forces a full tree reload, because a move the
//! server rejected can leave the two affected lists mutually inconsistent.
//! This asymmetry is deliberate; re-derive the consistency argument before
//! changing either side of it.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use courseboard_core::{Board, DragKind, DragSession, DropOutcome, Point, ZoneMap};

use crate::api::CourseApi;
use crate::sync::{Dispatcher, PersistOp, SyncEvent, SyncRequest};

/// Notice severity for the toast layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A user-facing notification produced by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Drives the drag engine against the persistence API.
pub struct ChapterEditor {
    board: Board,
    session: DragSession,
    zones: ZoneMap,
    dispatcher: Dispatcher,
    events: Receiver<SyncEvent>,
    notices: Vec<Notice>,
}

impl ChapterEditor {
    /// Create an editor with an empty board. Call [`reload`](Self::reload)
    /// at mount to fetch the initial tree.
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self::with_board(api, Board::default())
    }

    /// Create an editor over a preloaded board.
    pub fn with_board(api: Arc<dyn CourseApi>, board: Board) -> Self {
        let (dispatcher, events) = Dispatcher::new(api);
        Self {
            board,
            session: DragSession::new(),
            zones: ZoneMap::new(),
            dispatcher,
            events,
            notices: Vec::new(),
        }
    }

    /// The current board state. Render from this after every call.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The drag session (for rendering ghost/highlight state).
    #[must_use]
    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Republish element bounds after a layout pass.
    pub fn set_layout(&mut self, zones: ZoneMap) {
        self.zones = zones;
    }

    /// Fetch the full tree. Used at mount and as the rollback path.
    pub fn reload(&self) {
        self.dispatcher.dispatch(SyncRequest::Reload);
    }

    /// Pointer pressed: start a drag on the element under the pointer.
    /// Returns whether a drag began.
    pub fn pointer_down(&mut self, p: Point) -> bool {
        let Some(key) = self.zones.hit_pointer_within(p, |_| true) else {
            return false;
        };
        self.session.drag_start(&self.board, key)
    }

    /// Pointer moved: resolve the hover target with the strategy for the
    /// active drag kind and feed the session.
    pub fn pointer_move(&mut self, p: Point) {
        let Some(kind) = self.session.kind() else {
            return;
        };
        let key = self.hover_key(p, kind);
        self.session.drag_over(&mut self.board, key.as_deref());
    }

    /// Pointer released: complete the drop and dispatch at most one
    /// persistence request.
    pub fn pointer_up(&mut self, p: Point) {
        let Some(kind) = self.session.kind() else {
            return;
        };
        let key = self.hover_key(p, kind);
        let outcome = self.session.drag_end(&mut self.board, key.as_deref());
        self.apply_outcome(outcome);
    }

    /// Abort the active drag. Nothing is dispatched.
    pub fn cancel_drag(&mut self) {
        self.session.drag_cancel();
    }

    /// Drain completed persistence calls and apply the failure policy.
    pub fn poll_sync(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_sync_event(event);
        }
    }

    /// Take the accumulated notices for the toast layer.
    #[must_use]
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn hover_key(&self, p: Point, kind: DragKind) -> Option<String> {
        let key = match kind {
            // Items insert between precise siblings: exact containment,
            // smallest zone wins.
            DragKind::Item => self.zones.hit_pointer_within(p, |_| true),
            // Columns are large regions; nearest corner among containers.
            DragKind::Container => self
                .zones
                .hit_closest_corner(p, |k| self.board.is_container_id(k)),
        };
        key.map(str::to_string)
    }

    fn apply_outcome(&mut self, outcome: DropOutcome) {
        let op = match outcome {
            DropOutcome::None => return,
            DropOutcome::ContainerReorder { order } => PersistOp::ContainerOrder(order),
            DropOutcome::ItemReorder { container, order } => {
                PersistOp::ItemOrder { container, order }
            }
            DropOutcome::ItemMove {
                source,
                item,
                target,
                index,
            } => PersistOp::Move {
                source,
                item,
                target,
                index,
            },
        };
        self.dispatcher.dispatch(SyncRequest::Persist(op));
    }

    fn handle_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Persisted(op) => {
                tracing::debug!(target: "courseboard.editor", op = op.describe(), "persisted");
            }
            SyncEvent::PersistFailed { op, error } => {
                tracing::warn!(
                    target: "courseboard.editor",
                    op = op.describe(),
                    %error,
                    "persistence failed"
                );
                if op.is_move() {
                    // The one true rollback path: discard all optimistic
                    // state and re-fetch ground truth.
                    self.notices
                        .push(Notice::error("Failed to move lesson; reloading chapters"));
                    self.reload();
                } else {
                    self.notices
                        .push(Notice::error(format!("Failed to save {}", op.describe())));
                }
            }
            SyncEvent::TreeLoaded(board) => {
                if let Err(err) = board.validate() {
                    tracing::warn!(target: "courseboard.editor", %err, "rejected invalid tree");
                    self.notices
                        .push(Notice::error("Server returned an invalid chapter tree"));
                    return;
                }
                // The loaded tree supersedes any in-flight drag; its
                // entities may no longer exist.
                self.session.drag_cancel();
                self.board = board;
            }
            SyncEvent::ReloadFailed(error) => {
                tracing::warn!(target: "courseboard.editor", %error, "reload failed");
                self.notices.push(Notice::error("Failed to load chapters"));
            }
        }
    }
}
