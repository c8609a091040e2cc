//! End-to-end scenarios for the session actor.
//!
//! Each test drives a real [`InputSession`] against the recording
//! [`MockHost`] on a paused tokio clock, so every timer and stroke duration
//! is exact and the tests run instantly.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use touchbridge_agent::application::host::FocusKind;
use touchbridge_agent::infrastructure::{
    host::mock::{MockHost, MockNode},
    session::{InputSession, SessionHandle, SessionSettings},
};
use touchbridge_core::{
    domain::stroke::MIN_STROKE_DURATION, protocol::messages::mask, GlobalAction,
    KeyEventMessage, KeyboardMode, Point,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Long enough for every queued stroke and timer to play out.
const SETTLE: Duration = Duration::from_secs(2);

async fn finish(handle: SessionHandle, task: tokio::task::JoinHandle<()>) {
    sleep(SETTLE).await;
    handle.shutdown().await.expect("session must still be running");
    task.await.expect("session task must not panic");
}

fn start(host: &Arc<MockHost>) -> (SessionHandle, tokio::task::JoinHandle<()>) {
    InputSession::spawn(host.clone(), SessionSettings::default())
}

// ── Gestures ──────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_drag_with_three_moves_plays_five_strokes_one_at_a_time() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    // Act
    handle.pointer(mask::PRIMARY_DOWN, 100, 100).await.unwrap();
    for x in [120, 140, 160] {
        sleep(ms(16)).await;
        handle.pointer(mask::PRIMARY_MOVE, x, 100).await.unwrap();
    }
    sleep(ms(16)).await;
    handle.pointer(mask::PRIMARY_UP, 160, 100).await.unwrap();
    finish(handle, task).await;

    // Assert
    let played = host.dispatched();
    assert_eq!(played.len(), 5, "start + 3 continuations + end");
    assert_eq!(host.max_concurrent_strokes(), 1);
    for pair in played.windows(2) {
        assert!(pair[1].started >= pair[0].finished, "strokes must not overlap");
    }
    assert_eq!(played[0].stroke.path.first(), Point::new(100, 100));
    assert!(played[..4].iter().all(|r| r.stroke.will_continue));
    assert!(!played[4].stroke.will_continue);
    // The release flings one step further along the last movement.
    assert_eq!(played[4].stroke.path.last(), Point::new(180, 100));
    assert_eq!(played[4].stroke.duration, ms(48));
}

#[tokio::test(start_paused = true)]
async fn test_tap_plays_start_and_one_minimal_end_stroke() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    // Act
    handle.pointer(mask::PRIMARY_DOWN, 50, 50).await.unwrap();
    sleep(ms(30)).await;
    handle.pointer(mask::PRIMARY_UP, 50, 50).await.unwrap();
    finish(handle, task).await;

    // Assert
    let played = host.dispatched();
    assert_eq!(played.len(), 2);
    let end = &played[1].stroke;
    assert!(!end.will_continue);
    assert_eq!(end.duration, MIN_STROKE_DURATION);
    assert_eq!(end.path.first(), Point::new(50, 50));
    assert_eq!(end.path.last(), Point::new(50, 50));
}

#[tokio::test(start_paused = true)]
async fn test_held_press_ends_itself_and_later_release_is_ignored() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);
    let t0 = Instant::now();

    // Act
    handle.pointer(mask::PRIMARY_DOWN, 70, 70).await.unwrap();
    sleep(ms(900)).await;
    handle.pointer(mask::PRIMARY_UP, 70, 70).await.unwrap();
    finish(handle, task).await;

    // Assert
    let played = host.dispatched();
    assert_eq!(played.len(), 2, "the late release adds nothing");
    let ended_after = played[1].started - t0;
    assert!(ended_after >= ms(600) && ended_after < ms(650));
    assert!(!played[1].stroke.will_continue);
}

#[tokio::test(start_paused = true)]
async fn test_small_jitter_during_press_stays_a_tap() {
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    handle.pointer(mask::PRIMARY_DOWN, 200, 200).await.unwrap();
    sleep(ms(10)).await;
    handle.pointer(mask::PRIMARY_MOVE, 203, 202).await.unwrap();
    sleep(ms(10)).await;
    handle.pointer(mask::PRIMARY_UP, 203, 202).await.unwrap();
    finish(handle, task).await;

    let played = host.dispatched();
    assert_eq!(played.len(), 2);
    assert_eq!(played[1].stroke.duration, MIN_STROKE_DURATION);
}

#[tokio::test(start_paused = true)]
async fn test_display_scale_multiplies_pointer_coordinates() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let settings = SessionSettings {
        display_scale: 2,
        ..SessionSettings::default()
    };
    let (handle, task) = InputSession::spawn(host.clone(), settings);

    // Act
    handle.pointer(mask::PRIMARY_DOWN, 10, 15).await.unwrap();
    sleep(ms(20)).await;
    handle.pointer(mask::PRIMARY_UP, 10, 15).await.unwrap();
    finish(handle, task).await;

    // Assert
    assert_eq!(host.dispatched()[0].stroke.path.first(), Point::new(20, 30));
}

#[tokio::test(start_paused = true)]
async fn test_touch_pan_subtracts_deltas_and_ends_the_gesture() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    // Act
    handle.touch(mask::TOUCH_PAN_START, 300, 300).await.unwrap();
    sleep(ms(16)).await;
    handle.touch(mask::TOUCH_PAN_UPDATE, 10, 0).await.unwrap();
    sleep(ms(16)).await;
    handle.touch(mask::TOUCH_PAN_END, 290, 300).await.unwrap();
    finish(handle, task).await;

    // Assert
    let played = host.dispatched();
    assert_eq!(played.len(), 3);
    assert_eq!(played[1].stroke.path.last(), Point::new(290, 300));
    assert!(!played[2].stroke.will_continue);
}

#[tokio::test(start_paused = true)]
async fn test_extreme_coordinates_leave_the_session_running() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let settings = SessionSettings {
        display_scale: 2,
        ..SessionSettings::default()
    };
    let (handle, task) = InputSession::spawn(host.clone(), settings);

    // Act – a huge pan delta, an oversized scaled move and a drag to the edge
    handle.touch(mask::TOUCH_PAN_START, 100, 100).await.unwrap();
    handle.touch(mask::TOUCH_PAN_UPDATE, i32::MIN, 0).await.unwrap();
    handle.touch(mask::TOUCH_PAN_END, 0, 0).await.unwrap();
    sleep(ms(200)).await;
    handle.pointer(mask::MOVE, 1_500_000_000, 10).await.unwrap();
    handle.pointer(mask::PRIMARY_DOWN, 1_000_000_000, 10).await.unwrap();
    sleep(ms(16)).await;
    handle.pointer(mask::PRIMARY_MOVE, i32::MAX, 10).await.unwrap();
    sleep(ms(16)).await;
    handle.pointer(mask::PRIMARY_UP, i32::MAX, 10).await.unwrap();
    handle.pointer(mask::SECONDARY_DOWN, 0, 0).await.unwrap();
    handle.pointer(mask::SECONDARY_UP, 0, 0).await.unwrap();
    finish(handle, task).await;

    // Assert – every event was handled, including the click after them
    assert_eq!(host.actions(), vec![GlobalAction::Back]);
    let played = host.dispatched();
    assert_eq!(played.len(), 6, "pan: start, update, end; drag: start, move, end");
    assert_eq!(played[5].stroke.path.last(), Point::new(i32::MAX, 20));
}

// ── Wheel ─────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_wheel_burst_is_played_one_swipe_per_settle_delay() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);
    handle.pointer(mask::MOVE, 300, 500).await.unwrap();

    // Act
    for _ in 0..3 {
        handle.pointer(mask::WHEEL_SCROLL_DOWN, 300, 500).await.unwrap();
    }
    finish(handle, task).await;

    // Assert
    let played = host.dispatched();
    assert_eq!(played.len(), 3);
    for pair in played.windows(2) {
        assert!(pair[1].started - pair[0].started >= ms(60));
    }
    // Wheel-down moves the content up: the finger travels up the screen.
    assert_eq!(played[0].stroke.path.first(), Point::new(300, 500));
    assert_eq!(played[0].stroke.path.last(), Point::new(300, 380));
}

#[tokio::test(start_paused = true)]
async fn test_upward_swipe_near_top_edge_is_dropped() {
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    handle.pointer(mask::MOVE, 300, 40).await.unwrap();
    handle.pointer(mask::WHEEL_SCROLL_DOWN, 300, 40).await.unwrap();
    handle.pointer(mask::WHEEL_SCROLL_UP, 300, 40).await.unwrap();
    finish(handle, task).await;

    let played = host.dispatched();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].stroke.path.last(), Point::new(300, 160));
}

// ── Global actions ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_buttons_map_to_back_home_and_recents() {
    // Arrange
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    // Act
    handle.pointer(mask::SECONDARY_DOWN, 0, 0).await.unwrap();
    handle.pointer(mask::SECONDARY_UP, 0, 0).await.unwrap();
    handle.pointer(mask::WHEEL_BUTTON_DOWN, 0, 0).await.unwrap();
    sleep(ms(50)).await;
    handle.pointer(mask::WHEEL_BUTTON_UP, 0, 0).await.unwrap();
    handle.pointer(mask::WHEEL_BUTTON_DOWN, 0, 0).await.unwrap();
    sleep(ms(300)).await;
    handle.pointer(mask::WHEEL_BUTTON_UP, 0, 0).await.unwrap();
    finish(handle, task).await;

    // Assert – the long wheel hold fires Recents once and its release is silent
    assert_eq!(
        host.actions(),
        vec![GlobalAction::Back, GlobalAction::Home, GlobalAction::Recents]
    );
}

#[tokio::test(start_paused = true)]
async fn test_secondary_click_during_primary_press_is_ignored() {
    let host = Arc::new(MockHost::new());
    let (handle, task) = start(&host);

    handle.pointer(mask::PRIMARY_DOWN, 5, 5).await.unwrap();
    handle.pointer(mask::SECONDARY_DOWN, 5, 5).await.unwrap();
    handle.pointer(mask::SECONDARY_UP, 5, 5).await.unwrap();
    sleep(ms(20)).await;
    handle.pointer(mask::PRIMARY_UP, 5, 5).await.unwrap();
    finish(handle, task).await;

    assert!(host.actions().is_empty());
}

// ── Keys ──────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_typed_text_lands_in_editable_child_of_focused_container() {
    // Arrange
    let field = MockNode::new(3)
        .with_text("")
        .with_selection(0, 0)
        .edit_target()
        .into_ref();
    let wrapper = MockNode::container(2, vec![field.clone()]);
    let root = MockNode::new(1)
        .with_text("")
        .with_selection(0, 0)
        .edit_target()
        .with_children(vec![wrapper.clone()])
        .into_ref();
    let host = Arc::new(
        MockHost::new()
            .with_focus(FocusKind::Input, wrapper)
            .with_root(root.clone()),
    );
    let (handle, task) = start(&host);

    // Act
    for c in ['h', 'i'] {
        handle
            .key(KeyEventMessage {
                mode: KeyboardMode::Legacy,
                chr: Some(c as u32),
                seq: None,
                key_code: 0,
                down: true,
            })
            .await
            .unwrap();
    }
    finish(handle, task).await;

    // Assert
    assert_eq!(field.text_value(), Some("hi".to_string()));
    assert_eq!(field.selection_value(), (2, 2));
    assert!(root.actions().is_empty(), "root must not be touched");
}
