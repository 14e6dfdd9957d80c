//! End-to-end drag scenarios against a recording fake API.
//!
//! Each test plays the rendering adapter: it publishes a layout computed
//! from the current board (columns side by side, item cards stacked inside,
//! a whitespace zone under each column's last card), feeds pointer events,
//! pumps `poll_sync`, and asserts on the exact persistence traffic.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use courseboard_client::api::{ApiError, CourseApi};
use courseboard_client::editor::{ChapterEditor, Severity};
use courseboard_client::wire::ContainerPatch;
use courseboard_core::{
    Board, Container, ContainerId, Item, ItemId, ItemKind, ItemMeta, Point, Rect, ZoneMap,
    empty_zone_key,
};

// ── Recording fake API ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    FetchTree,
    ReorderContainers(Vec<String>),
    ReorderItems(String, Vec<String>),
    MoveItem {
        source: String,
        item: String,
        target: String,
        index: Option<u32>,
    },
}

#[derive(Default)]
struct FakeApi {
    /// The tree served on fetch — the server's ground truth.
    server_board: Mutex<Board>,
    fail_moves: bool,
    fail_reorders: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    fn with_server_board(board: Board) -> Self {
        Self {
            server_board: Mutex::new(board),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn rejected(&self) -> ApiError {
        ApiError::Status {
            status: 500,
            endpoint: "fake".into(),
        }
    }
}

impl CourseApi for FakeApi {
    fn fetch_tree(&self) -> Result<Board, ApiError> {
        self.calls.lock().unwrap().push(Call::FetchTree);
        Ok(self.server_board.lock().unwrap().clone())
    }

    fn reorder_containers(&self, order: &[ContainerId]) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(Call::ReorderContainers(
            order.iter().map(|c| c.as_str().to_string()).collect(),
        ));
        if self.fail_reorders {
            return Err(self.rejected());
        }
        Ok(())
    }

    fn update_container(&self, _id: &ContainerId, _patch: &ContainerPatch) -> Result<(), ApiError> {
        Ok(())
    }

    fn reorder_items(&self, container: &ContainerId, order: &[ItemId]) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(Call::ReorderItems(
            container.as_str().to_string(),
            order.iter().map(|i| i.as_str().to_string()).collect(),
        ));
        if self.fail_reorders {
            return Err(self.rejected());
        }
        Ok(())
    }

    fn move_item(
        &self,
        source: &ContainerId,
        item: &ItemId,
        target: &ContainerId,
        index: Option<u32>,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(Call::MoveItem {
            source: source.as_str().to_string(),
            item: item.as_str().to_string(),
            target: target.as_str().to_string(),
            index,
        });
        if self.fail_moves {
            return Err(self.rejected());
        }
        Ok(())
    }
}

// ── Adapter simulation ──────────────────────────────────────────────────

const COLUMN_WIDTH: f32 = 100.0;
const COLUMN_GAP: f32 = 20.0;
const COLUMN_HEIGHT: f32 = 400.0;
const CARD_TOP: f32 = 30.0;
const CARD_PITCH: f32 = 50.0;
const CARD_HEIGHT: f32 = 40.0;

/// Compute the layout a renderer would produce for the current board.
fn layout_for(board: &Board) -> ZoneMap {
    let mut zones = ZoneMap::new();
    for (ci, container) in board.containers.iter().enumerate() {
        let x0 = ci as f32 * (COLUMN_WIDTH + COLUMN_GAP);
        zones.insert(
            container.id.as_str(),
            Rect::new(x0, 0.0, COLUMN_WIDTH, COLUMN_HEIGHT),
        );
        for (ii, item) in container.items.iter().enumerate() {
            zones.insert(
                item.id.as_str(),
                Rect::new(
                    x0 + 10.0,
                    CARD_TOP + ii as f32 * CARD_PITCH,
                    COLUMN_WIDTH - 20.0,
                    CARD_HEIGHT,
                ),
            );
        }
        let slack_top = CARD_TOP + container.items.len() as f32 * CARD_PITCH;
        zones.insert(
            empty_zone_key(&container.id),
            Rect::new(
                x0 + 10.0,
                slack_top,
                COLUMN_WIDTH - 20.0,
                COLUMN_HEIGHT - slack_top - 10.0,
            ),
        );
    }
    zones
}

fn publish_layout(ed: &mut ChapterEditor) {
    let zones = layout_for(ed.board());
    ed.set_layout(zones);
}

/// Center of a zone in the editor's current layout.
fn center_of(ed: &ChapterEditor, key: &str) -> Point {
    layout_for(ed.board())
        .rect_of(key)
        .unwrap_or_else(|| panic!("no zone for {key}"))
        .center()
}

/// Where a drag on this element grabs it. Cards are grabbed at their
/// center; columns at their header chrome, above the first card (the
/// column center would land in the whitespace drop zone, which is not
/// draggable).
fn grab_point(ed: &ChapterEditor, key: &str) -> Point {
    let rect = layout_for(ed.board())
        .rect_of(key)
        .unwrap_or_else(|| panic!("no zone for {key}"));
    if ed.board().is_container_id(key) {
        Point::new(rect.x + rect.width / 2.0, rect.y + 10.0)
    } else {
        rect.center()
    }
}

/// Simulate a full drag: press on `from`, hover each waypoint (re-rendering
/// after every tick, as a real adapter would), release over the last one.
fn drag(ed: &mut ChapterEditor, from: &str, waypoints: &[&str]) {
    publish_layout(ed);
    let start = grab_point(ed, from);
    assert!(ed.pointer_down(start), "drag should start on {from}");
    let mut last = start;
    for key in waypoints {
        last = center_of(ed, key);
        ed.pointer_move(last);
        publish_layout(ed);
    }
    ed.pointer_up(last);
}

/// Pump `poll_sync` until the predicate holds or the deadline passes.
fn pump_until(ed: &mut ChapterEditor, pred: impl Fn(&ChapterEditor) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        ed.poll_sync();
        if pred(ed) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for sync");
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Give in-flight dispatch threads time to land, then drain events.
fn settle(ed: &mut ChapterEditor) {
    std::thread::sleep(Duration::from_millis(150));
    ed.poll_sync();
}

// ── Fixtures ────────────────────────────────────────────────────────────

fn item(id: &str) -> Item {
    Item {
        id: ItemId::new(id),
        title: id.to_string(),
        kind: ItemKind::Lecture,
        sort_order: 0,
        meta: ItemMeta::default(),
    }
}

fn container(id: &str, items: &[&str]) -> Container {
    Container {
        id: ContainerId::new(id),
        title: id.to_string(),
        sort_order: 0,
        items: items.iter().map(|i| item(i)).collect(),
    }
}

fn item_order(board: &Board, c: &str) -> Vec<String> {
    board
        .item_order(&ContainerId::new(c))
        .unwrap()
        .into_iter()
        .map(|i| i.as_str().to_string())
        .collect()
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn same_container_reorder_issues_one_reorder_call() {
    // Ch1 holds [L1, L2, L3]; drag L3 over L1; drop.
    let board = Board::new(vec![container("ch1", &["l1", "l2", "l3"])]);
    let api = Arc::new(FakeApi::default());
    let mut ed = ChapterEditor::with_board(api.clone(), board);

    drag(&mut ed, "l3", &["l1"]);

    assert_eq!(item_order(ed.board(), "ch1"), ["l3", "l1", "l2"]);
    pump_until(&mut ed, |_| !api.calls().is_empty());
    assert_eq!(
        api.calls(),
        [Call::ReorderItems(
            "ch1".into(),
            vec!["l3".into(), "l1".into(), "l2".into()],
        )]
    );
}

#[test]
fn cross_container_move_issues_one_move_call() {
    // Ch1:[L1], Ch2:[L2]; drag L1 in front of L2; drop.
    let board = Board::new(vec![container("ch1", &["l1"]), container("ch2", &["l2"])]);
    let api = Arc::new(FakeApi::default());
    let mut ed = ChapterEditor::with_board(api.clone(), board);

    drag(&mut ed, "l1", &["l2"]);

    assert!(item_order(ed.board(), "ch1").is_empty());
    assert_eq!(item_order(ed.board(), "ch2"), ["l1", "l2"]);
    pump_until(&mut ed, |_| !api.calls().is_empty());
    assert_eq!(
        api.calls(),
        [Call::MoveItem {
            source: "ch1".into(),
            item: "l1".into(),
            target: "ch2".into(),
            index: Some(0),
        }]
    );
}

#[test]
fn container_reorder_issues_one_reorder_call() {
    // [Ch1, Ch2, Ch3]; drag Ch3 before Ch1; drop.
    let board = Board::new(vec![
        container("ch1", &[]),
        container("ch2", &[]),
        container("ch3", &[]),
    ]);
    let api = Arc::new(FakeApi::default());
    let mut ed = ChapterEditor::with_board(api.clone(), board);

    drag(&mut ed, "ch3", &["ch1"]);

    let order: Vec<_> = ed
        .board()
        .container_order()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();
    assert_eq!(order, ["ch3", "ch1", "ch2"]);
    pump_until(&mut ed, |_| !api.calls().is_empty());
    assert_eq!(
        api.calls(),
        [Call::ReorderContainers(vec![
            "ch3".into(),
            "ch1".into(),
            "ch2".into(),
        ])]
    );
}

#[test]
fn move_intent_dedups_to_the_final_container() {
    // The pointer passes over X, then Y, then Z before dropping: exactly
    // one move request, addressed to Z.
    let board = Board::new(vec![
        container("ch1", &["l1"]),
        container("chx", &[]),
        container("chy", &[]),
        container("chz", &[]),
    ]);
    let api = Arc::new(FakeApi::default());
    let mut ed = ChapterEditor::with_board(api.clone(), board);

    drag(&mut ed, "l1", &["chx", "chy", "chz"]);

    assert_eq!(item_order(ed.board(), "chz"), ["l1"]);
    pump_until(&mut ed, |_| !api.calls().is_empty());
    settle(&mut ed);
    assert_eq!(
        api.calls(),
        [Call::MoveItem {
            source: "ch1".into(),
            item: "l1".into(),
            target: "chz".into(),
            index: Some(0),
        }]
    );
}

#[test]
fn failed_move_rolls_back_via_full_reload() {
    // A:[item1], B:[] — the move is rejected; the post-reload state must
    // equal the server's, not the failed optimistic state.
    let server = Board::new(vec![container("a", &["item1"]), container("b", &[])]);
    let api = Arc::new(FakeApi {
        fail_moves: true,
        ..FakeApi::with_server_board(server.clone())
    });
    let mut ed = ChapterEditor::with_board(api.clone(), server.clone());

    drag(&mut ed, "item1", &["b"]);
    // Optimistic state first: the item appears moved.
    assert_eq!(item_order(ed.board(), "b"), ["item1"]);

    pump_until(&mut ed, |ed| ed.board() == &server);
    assert_eq!(item_order(ed.board(), "a"), ["item1"]);
    assert!(item_order(ed.board(), "b").is_empty());

    let calls = api.calls();
    assert!(matches!(calls[0], Call::MoveItem { .. }));
    assert!(calls.contains(&Call::FetchTree));

    let notices = ed.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[test]
fn failed_reorder_keeps_local_state_and_does_not_reload() {
    let board = Board::new(vec![container("ch1", &["l1", "l2", "l3"])]);
    let api = Arc::new(FakeApi {
        fail_reorders: true,
        ..FakeApi::default()
    });
    let mut ed = ChapterEditor::with_board(api.clone(), board);

    drag(&mut ed, "l3", &["l1"]);
    pump_until(&mut ed, |ed| !ed.session().is_dragging() && !api.calls().is_empty());
    settle(&mut ed);

    // The optimistic order stands and no tree fetch was issued.
    assert_eq!(item_order(ed.board(), "ch1"), ["l3", "l1", "l2"]);
    assert!(!api.calls().contains(&Call::FetchTree));
    let notices = ed.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[test]
fn drop_on_nothing_is_a_pure_noop() {
    let board = Board::new(vec![container("ch1", &["l1", "l2"]), container("ch2", &[])]);
    let api = Arc::new(FakeApi::default());
    let mut ed = ChapterEditor::with_board(api.clone(), board.clone());
    publish_layout(&mut ed);

    ed.pointer_down(center_of(&ed, "l1"));
    // Release far outside every registered zone.
    ed.pointer_up(Point::new(5000.0, 5000.0));

    settle(&mut ed);
    assert_eq!(ed.board(), &board);
    assert!(api.calls().is_empty());
    assert!(ed.take_notices().is_empty());
}

#[test]
fn no_change_drop_issues_no_call() {
    let board = Board::new(vec![container("ch1", &["l1", "l2", "l3"])]);
    let api = Arc::new(FakeApi::default());
    let mut ed = ChapterEditor::with_board(api.clone(), board.clone());
    publish_layout(&mut ed);

    // Drop the last item onto its own column chrome: resolves to "end",
    // which is where it already is.
    ed.pointer_down(center_of(&ed, "l3"));
    ed.pointer_up(Point::new(50.0, 10.0));

    settle(&mut ed);
    assert_eq!(ed.board(), &board);
    assert!(api.calls().is_empty());
}

#[test]
fn initial_reload_populates_the_board() {
    let server = Board::new(vec![container("ch1", &["l1"])]);
    let api = Arc::new(FakeApi::with_server_board(server.clone()));
    let mut ed = ChapterEditor::new(api);
    ed.reload();
    pump_until(&mut ed, |ed| ed.board() == &server);
}
