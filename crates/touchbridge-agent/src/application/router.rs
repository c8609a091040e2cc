//! InputRouter: decodes pointer and touch events and drives the gesture
//! components.
//!
//! The router is the only place raw mask codes are looked at.  Each event is
//! decoded once into a [`PointerMask`] or [`TouchMask`] and then handed to
//! exactly one component: the press disambiguator and gesture engine for the
//! primary button, the wheel batcher for scroll ticks, or a global action for
//! the secondary and wheel buttons.
//!
//! # Effects
//!
//! The router never calls the host or the clock itself.  Everything it wants
//! done (dispatch a stroke, perform a global action, arm or cancel a timer)
//! goes through an [`InputEffects`] implementation supplied by the caller.
//! The session actor implements it with the real host and timer service;
//! tests implement it with a recorder.

use std::time::Duration;

use tokio::time::Instant;
use touchbridge_core::{
    protocol::DispatchTicket, GlobalAction, Point, PointerMask, ScrollDirection, Stroke,
    StrokeOutcome, TouchMask,
};
use tracing::{debug, warn};

use super::gesture::{EndPolicy, GestureEngine};
use super::press::{DownDecision, MoveDecision, PressDisambiguator};
use super::stroke_queue::Dispatch;
use super::tuning::{GestureTuning, WheelTuning};
use super::wheel::{ScrollDecision, WheelBatcher};

/// The one-shot timers the router relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// A held press stops being a tap.
    TapWindow,
    /// A held press ends as a long-press.
    LongPress,
    /// A held wheel button becomes "recents" instead of "home".
    Recents,
    /// The last scroll swipe has settled.
    WheelSettle,
}

/// Side effects requested by the router.
pub trait InputEffects {
    /// Hands a gesture stroke to the host.  The outcome must be reported back
    /// through [`InputRouter::on_stroke_finished`].
    fn dispatch_stroke(&mut self, dispatch: Dispatch);

    /// Hands a scroll swipe to the host.  Its outcome is not tracked.
    fn dispatch_wheel(&mut self, stroke: Stroke);

    fn perform_global_action(&mut self, action: GlobalAction);

    /// Arms `kind`, replacing any pending timer of the same kind.
    fn schedule_timer(&mut self, kind: TimerKind, delay: Duration);

    fn cancel_timer(&mut self, kind: TimerKind);
}

/// Routes decoded pointer and touch events.
pub struct InputRouter {
    engine: GestureEngine,
    press: PressDisambiguator,
    wheel: WheelBatcher,
    tuning: GestureTuning,
    display_scale: i32,
    recents_armed: bool,
}

impl InputRouter {
    pub fn new(display_scale: i32, gesture: GestureTuning, wheel: WheelTuning) -> Self {
        Self {
            engine: GestureEngine::new(gesture.fling_duration_multiplier),
            press: PressDisambiguator::new(gesture),
            wheel: WheelBatcher::new(wheel),
            tuning: gesture,
            display_scale: display_scale.max(1),
            recents_armed: false,
        }
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn press(&self) -> &PressDisambiguator {
        &self.press
    }

    pub fn wheel(&self) -> &WheelBatcher {
        &self.wheel
    }

    fn scaled(&self, x: i32, y: i32) -> Point {
        Point::new(
            x.max(0).saturating_mul(self.display_scale),
            y.max(0).saturating_mul(self.display_scale),
        )
    }

    // ── Pointer events ────────────────────────────────────────────────────────

    /// Handles one pointer event.  Unknown masks are ignored.
    pub fn on_pointer_event(
        &mut self,
        mask: i32,
        x: i32,
        y: i32,
        now: Instant,
        fx: &mut dyn InputEffects,
    ) {
        let mask = match PointerMask::try_from(mask) {
            Ok(m) => m,
            Err(e) => {
                debug!("ignoring pointer event: {e}");
                return;
            }
        };
        debug!(?mask, x, y, "pointer event");

        match mask {
            PointerMask::Move => {
                let at = self.scaled(x, y);
                self.engine.pointer_mut().move_to(at);
                self.on_move(at, now, fx);
            }
            PointerMask::PrimaryDown => {
                let at = self.scaled(x, y);
                self.engine.pointer_mut().move_to(at);
                self.on_primary_down(at, now, fx);
            }
            PointerMask::PrimaryUp => {
                let at = self.scaled(x, y);
                self.engine.pointer_mut().move_to(at);
                self.on_primary_up(now, fx);
            }
            // Secondary-down has no effect of its own; the action fires on release.
            PointerMask::SecondaryDown => {}
            PointerMask::SecondaryUp => {
                if self.press.is_long_press_armed() {
                    debug!("secondary up ignored while a press is held");
                } else {
                    fx.perform_global_action(GlobalAction::Back);
                }
            }
            PointerMask::WheelButtonDown => {
                self.recents_armed = true;
                fx.schedule_timer(TimerKind::Recents, self.tuning.recents_delay);
            }
            PointerMask::WheelButtonUp => {
                if self.recents_armed {
                    self.recents_armed = false;
                    fx.cancel_timer(TimerKind::Recents);
                    fx.perform_global_action(GlobalAction::Home);
                }
            }
            // Content follows the wheel: wheel-down means the finger travels up.
            PointerMask::WheelScrollDown => self.on_scroll(ScrollDirection::Up, fx),
            PointerMask::WheelScrollUp => self.on_scroll(ScrollDirection::Down, fx),
        }
    }

    fn on_move(&mut self, at: Point, now: Instant, fx: &mut dyn InputEffects) {
        match self.press.on_move(at) {
            MoveDecision::Hover | MoveDecision::Hold => {}
            MoveDecision::BeginDrag => {
                fx.cancel_timer(TimerKind::TapWindow);
                fx.cancel_timer(TimerKind::LongPress);
                self.continue_gesture(at, now, fx);
            }
            MoveDecision::Drag => self.continue_gesture(at, now, fx),
        }
    }

    fn on_primary_down(&mut self, at: Point, now: Instant, fx: &mut dyn InputEffects) {
        match self.press.on_down(at, now) {
            DownDecision::Dropped => {}
            DownDecision::Arm => {
                self.engine.pointer_mut().button_down = true;
                if let Some(dispatch) = self.engine.start(at, now) {
                    fx.dispatch_stroke(dispatch);
                }
                fx.schedule_timer(TimerKind::TapWindow, self.tuning.tap_window);
                fx.schedule_timer(TimerKind::LongPress, self.tuning.long_press_timeout);
            }
        }
    }

    fn on_primary_up(&mut self, now: Instant, fx: &mut dyn InputEffects) {
        let Some(policy) = self.press.on_up(now) else {
            debug!("primary up with no press in progress");
            return;
        };
        fx.cancel_timer(TimerKind::TapWindow);
        fx.cancel_timer(TimerKind::LongPress);
        self.end_gesture(policy, fx);
    }

    fn on_scroll(&mut self, direction: ScrollDirection, fx: &mut dyn InputEffects) {
        let at = self.engine.pointer().position();
        match self.wheel.enqueue(direction, at) {
            ScrollDecision::Dispatch(stroke) => {
                fx.dispatch_wheel(stroke);
                fx.schedule_timer(TimerKind::WheelSettle, self.wheel.settle_delay());
            }
            ScrollDecision::Queued | ScrollDecision::Dropped => {}
        }
    }

    // ── Touch events ──────────────────────────────────────────────────────────

    /// Handles one touch event.  Pan updates carry deltas; the other phases
    /// carry absolute positions.  Unknown masks are ignored.
    pub fn on_touch_event(
        &mut self,
        mask: i32,
        x: i32,
        y: i32,
        now: Instant,
        fx: &mut dyn InputEffects,
    ) {
        let mask = match TouchMask::try_from(mask) {
            Ok(m) => m,
            Err(e) => {
                debug!("ignoring touch event: {e}");
                return;
            }
        };
        debug!(?mask, x, y, "touch event");

        match mask {
            TouchMask::PanStart => {
                let at = self.scaled(x, y);
                self.engine.pointer_mut().seat_at(at);
                if let Some(dispatch) = self.engine.start(at, now) {
                    fx.dispatch_stroke(dispatch);
                }
            }
            TouchMask::PanUpdate => {
                let current = self.engine.pointer().position();
                let at = Point::new(
                    current.x.saturating_sub(x.saturating_mul(self.display_scale)),
                    current.y.saturating_sub(y.saturating_mul(self.display_scale)),
                );
                self.engine.pointer_mut().move_to(at);
                self.continue_gesture(at, now, fx);
            }
            TouchMask::PanEnd => {
                self.end_gesture(EndPolicy::Fling, fx);
                let at = self.scaled(x, y);
                self.engine.pointer_mut().seat_at(at);
            }
            TouchMask::ScaleStart | TouchMask::Scale | TouchMask::ScaleEnd => {
                debug!(?mask, "pinch phases are not synthesized");
            }
        }
    }

    // ── Timers and host callbacks ─────────────────────────────────────────────

    /// Handles an expired timer.  Only timers that were not cancelled or
    /// replaced reach the router.
    pub fn on_timer(&mut self, kind: TimerKind, fx: &mut dyn InputEffects) {
        match kind {
            TimerKind::TapWindow => self.press.on_tap_window_elapsed(),
            TimerKind::LongPress => {
                if let Some(policy) = self.press.on_long_press_timeout() {
                    self.end_gesture(policy, fx);
                }
            }
            TimerKind::Recents => {
                if self.recents_armed {
                    self.recents_armed = false;
                    fx.perform_global_action(GlobalAction::Recents);
                }
            }
            TimerKind::WheelSettle => {
                if let Some(stroke) = self.wheel.on_settled() {
                    fx.dispatch_wheel(stroke);
                    fx.schedule_timer(TimerKind::WheelSettle, self.wheel.settle_delay());
                }
            }
        }
    }

    /// Handles the host's outcome for a dispatched gesture stroke.
    pub fn on_stroke_finished(
        &mut self,
        ticket: DispatchTicket,
        outcome: StrokeOutcome,
        fx: &mut dyn InputEffects,
    ) {
        if let Some(next) = self.engine.on_stroke_finished(ticket, outcome) {
            fx.dispatch_stroke(next);
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn continue_gesture(&mut self, at: Point, now: Instant, fx: &mut dyn InputEffects) {
        match self.engine.continue_to(at, now) {
            Ok(Some(dispatch)) => fx.dispatch_stroke(dispatch),
            Ok(None) => {}
            Err(e) => debug!("continue dropped: {e}"),
        }
    }

    fn end_gesture(&mut self, policy: EndPolicy, fx: &mut dyn InputEffects) {
        let at = self.engine.pointer().position();
        match self.engine.end(at, policy) {
            Ok(Some(dispatch)) => fx.dispatch_stroke(dispatch),
            Ok(None) => {}
            Err(e) => warn!("end gesture error: {e}"),
        }
        self.engine.pointer_mut().button_down = false;
        self.press.reset();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::press::PressState;
    use touchbridge_core::protocol::messages::mask;

    // ── Recording effects ─────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingEffects {
        strokes: Vec<Dispatch>,
        wheel: Vec<Stroke>,
        actions: Vec<GlobalAction>,
        scheduled: Vec<(TimerKind, Duration)>,
        cancelled: Vec<TimerKind>,
    }

    impl InputEffects for RecordingEffects {
        fn dispatch_stroke(&mut self, dispatch: Dispatch) {
            self.strokes.push(dispatch);
        }
        fn dispatch_wheel(&mut self, stroke: Stroke) {
            self.wheel.push(stroke);
        }
        fn perform_global_action(&mut self, action: GlobalAction) {
            self.actions.push(action);
        }
        fn schedule_timer(&mut self, kind: TimerKind, delay: Duration) {
            self.scheduled.push((kind, delay));
        }
        fn cancel_timer(&mut self, kind: TimerKind) {
            self.cancelled.push(kind);
        }
    }

    fn router() -> InputRouter {
        InputRouter::new(1, GestureTuning::default(), WheelTuning::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Acknowledges every dispatched stroke until the queue drains.
    fn complete_all(router: &mut InputRouter, fx: &mut RecordingEffects) {
        let mut acked = 0;
        while acked < fx.strokes.len() {
            let ticket = fx.strokes[acked].ticket;
            acked += 1;
            router.on_stroke_finished(ticket, StrokeOutcome::Completed, fx);
        }
    }

    // ── Primary button ────────────────────────────────────────────────────────

    #[test]
    fn test_tap_dispatches_start_and_one_minimal_end_stroke() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();

        // Act
        r.on_pointer_event(mask::MOVE, 200, 300, t0, &mut fx);
        r.on_pointer_event(mask::PRIMARY_DOWN, 200, 300, t0, &mut fx);
        r.on_pointer_event(mask::PRIMARY_UP, 200, 300, t0 + ms(30), &mut fx);
        complete_all(&mut r, &mut fx);

        // Assert
        assert_eq!(fx.strokes.len(), 2);
        let ends: Vec<_> = fx.strokes.iter().filter(|d| !d.stroke.will_continue).collect();
        assert_eq!(ends.len(), 1, "exactly one tap-ending stroke");
        assert_eq!(ends[0].stroke.duration, ms(1));
        assert_eq!(ends[0].stroke.path.last(), Point::new(200, 300));
        assert!(!r.engine().pointer().button_down);
        assert!(fx.cancelled.contains(&TimerKind::LongPress));
    }

    #[test]
    fn test_down_arms_tap_and_long_press_timers() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());

        r.on_pointer_event(mask::PRIMARY_DOWN, 10, 10, Instant::now(), &mut fx);

        assert_eq!(
            fx.scheduled,
            vec![
                (TimerKind::TapWindow, ms(120)),
                (TimerKind::LongPress, ms(600)),
            ]
        );
        assert!(r.engine().pointer().button_down);
    }

    #[test]
    fn test_bounced_down_is_dropped_without_state_change() {
        // Arrange – a complete click
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::PRIMARY_DOWN, 10, 10, t0, &mut fx);
        r.on_pointer_event(mask::PRIMARY_UP, 10, 10, t0 + ms(40), &mut fx);
        let strokes_before = fx.strokes.len();

        // Act – a second down 3 ms after the up
        r.on_pointer_event(mask::PRIMARY_DOWN, 10, 10, t0 + ms(43), &mut fx);

        // Assert
        assert_eq!(fx.strokes.len(), strokes_before);
        assert!(!r.engine().pointer().button_down);
        assert!(!r.press().is_long_press_armed());
    }

    #[test]
    fn test_drag_continues_per_move_and_flings_on_up() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::MOVE, 100, 100, t0, &mut fx);
        r.on_pointer_event(mask::PRIMARY_DOWN, 100, 100, t0, &mut fx);

        // Act
        r.on_pointer_event(mask::PRIMARY_MOVE, 120, 100, t0 + ms(10), &mut fx);
        r.on_pointer_event(mask::PRIMARY_MOVE, 140, 100, t0 + ms(20), &mut fx);
        r.on_pointer_event(mask::PRIMARY_UP, 140, 100, t0 + ms(25), &mut fx);
        complete_all(&mut r, &mut fx);

        // Assert – start, two segments, fling
        let paths: Vec<Vec<Point>> =
            fx.strokes.iter().map(|d| d.stroke.path.points().to_vec()).collect();
        assert_eq!(
            paths,
            vec![
                vec![Point::new(100, 100)],
                vec![Point::new(100, 100), Point::new(120, 100)],
                vec![Point::new(120, 100), Point::new(140, 100)],
                vec![Point::new(140, 100), Point::new(160, 100)],
            ]
        );
        assert_eq!(fx.strokes[3].stroke.duration, ms(30));
        assert!(fx.cancelled.contains(&TimerKind::TapWindow));
    }

    #[test]
    fn test_jitter_below_threshold_does_not_draw() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::PRIMARY_DOWN, 100, 100, t0, &mut fx);

        r.on_pointer_event(mask::PRIMARY_MOVE, 103, 102, t0 + ms(5), &mut fx);

        assert_eq!(fx.strokes.len(), 1, "only the start stroke");
        assert_eq!(r.engine().pointer().position(), Point::new(103, 102));
    }

    #[test]
    fn test_long_press_timeout_ends_gesture_and_up_is_noop() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::PRIMARY_DOWN, 50, 50, t0, &mut fx);

        // Act
        r.on_timer(TimerKind::TapWindow, &mut fx);
        r.on_timer(TimerKind::LongPress, &mut fx);
        complete_all(&mut r, &mut fx);
        let after_timeout = fx.strokes.len();
        r.on_pointer_event(mask::PRIMARY_UP, 50, 50, t0 + ms(900), &mut fx);

        // Assert
        assert_eq!(after_timeout, 2);
        assert!(!fx.strokes[1].stroke.will_continue);
        assert_eq!(fx.strokes[1].stroke.duration, ms(1));
        assert_eq!(fx.strokes.len(), after_timeout, "up after timeout adds nothing");
        assert!(!r.engine().pointer().button_down);
    }

    #[test]
    fn test_scale_factor_applies_to_pointer_coordinates() {
        let mut r = InputRouter::new(2, GestureTuning::default(), WheelTuning::default());
        let mut fx = RecordingEffects::default();

        r.on_pointer_event(mask::PRIMARY_DOWN, 100, -5, Instant::now(), &mut fx);

        assert_eq!(fx.strokes[0].stroke.path.first(), Point::new(200, 0));
    }

    #[test]
    fn test_move_after_tap_window_cancels_armed_long_press() {
        // Arrange – the press outlived the tap window and is long-press armed
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::PRIMARY_DOWN, 100, 100, t0, &mut fx);
        r.on_timer(TimerKind::TapWindow, &mut fx);
        assert!(matches!(r.press().state(), PressState::LongPressArmed { .. }));

        // Act
        r.on_pointer_event(mask::PRIMARY_MOVE, 120, 100, t0 + ms(200), &mut fx);
        r.on_timer(TimerKind::LongPress, &mut fx);
        complete_all(&mut r, &mut fx);

        // Assert – the move became a drag and the late timeout ended nothing
        assert!(fx.cancelled.contains(&TimerKind::LongPress));
        assert_eq!(r.press().state(), PressState::Dragging);
        assert_eq!(fx.strokes.len(), 2);
        assert!(fx.strokes.iter().all(|d| d.stroke.will_continue));
    }

    #[test]
    fn test_huge_coordinates_saturate_when_scaled() {
        let (mut r, mut fx) = (
            InputRouter::new(2, GestureTuning::default(), WheelTuning::default()),
            RecordingEffects::default(),
        );

        r.on_pointer_event(mask::MOVE, 1_500_000_000, 10, Instant::now(), &mut fx);

        assert_eq!(r.engine().pointer().position(), Point::new(i32::MAX, 20));
    }

    #[test]
    fn test_extreme_pan_delta_saturates() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_touch_event(mask::TOUCH_PAN_START, 100, 100, t0, &mut fx);

        // Act
        r.on_touch_event(mask::TOUCH_PAN_UPDATE, i32::MIN, 0, t0 + ms(16), &mut fx);
        r.on_touch_event(mask::TOUCH_PAN_UPDATE, 0, i32::MAX, t0 + ms(32), &mut fx);

        // Assert
        assert_eq!(r.engine().pointer().position(), Point::new(i32::MAX, 0));
    }

    #[test]
    fn test_drag_released_at_far_edge_flings_to_the_edge() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::PRIMARY_DOWN, i32::MAX - 50, 10, t0, &mut fx);
        r.on_pointer_event(mask::PRIMARY_MOVE, i32::MAX, 10, t0 + ms(16), &mut fx);

        // Act
        r.on_pointer_event(mask::PRIMARY_UP, i32::MAX, 10, t0 + ms(32), &mut fx);
        complete_all(&mut r, &mut fx);

        // Assert
        let end = fx.strokes.last().unwrap();
        assert!(!end.stroke.will_continue);
        assert_eq!(end.stroke.path.last(), Point::new(i32::MAX, 10));
    }

    #[test]
    fn test_unknown_mask_changes_nothing() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());

        r.on_pointer_event(4242, 10, 10, Instant::now(), &mut fx);

        assert!(fx.strokes.is_empty());
        assert_eq!(r.engine().pointer().position(), Point::new(0, 0));
    }

    // ── Secondary and wheel buttons ───────────────────────────────────────────

    #[test]
    fn test_secondary_up_performs_back() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());

        r.on_pointer_event(mask::SECONDARY_DOWN, 0, 0, Instant::now(), &mut fx);
        r.on_pointer_event(mask::SECONDARY_UP, 0, 0, Instant::now(), &mut fx);

        assert_eq!(fx.actions, vec![GlobalAction::Back]);
    }

    #[test]
    fn test_secondary_up_suppressed_while_press_held() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        r.on_pointer_event(mask::PRIMARY_DOWN, 5, 5, Instant::now(), &mut fx);

        r.on_pointer_event(mask::SECONDARY_UP, 5, 5, Instant::now(), &mut fx);

        assert!(fx.actions.is_empty());
    }

    #[test]
    fn test_wheel_button_click_goes_home() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());

        r.on_pointer_event(mask::WHEEL_BUTTON_DOWN, 0, 0, Instant::now(), &mut fx);
        r.on_pointer_event(mask::WHEEL_BUTTON_UP, 0, 0, Instant::now(), &mut fx);

        assert_eq!(fx.actions, vec![GlobalAction::Home]);
        assert_eq!(fx.scheduled, vec![(TimerKind::Recents, ms(200))]);
        assert_eq!(fx.cancelled, vec![TimerKind::Recents]);
    }

    #[test]
    fn test_wheel_button_hold_opens_recents_and_release_does_nothing() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        r.on_pointer_event(mask::WHEEL_BUTTON_DOWN, 0, 0, Instant::now(), &mut fx);

        r.on_timer(TimerKind::Recents, &mut fx);
        r.on_pointer_event(mask::WHEEL_BUTTON_UP, 0, 0, Instant::now(), &mut fx);

        assert_eq!(fx.actions, vec![GlobalAction::Recents]);
    }

    // ── Wheel scroll ──────────────────────────────────────────────────────────

    #[test]
    fn test_wheel_ticks_are_paced_by_settle_timer() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();
        r.on_pointer_event(mask::MOVE, 400, 700, t0, &mut fx);

        // Act – three ticks in a burst
        r.on_pointer_event(mask::WHEEL_SCROLL_DOWN, 0, 0, t0, &mut fx);
        r.on_pointer_event(mask::WHEEL_SCROLL_DOWN, 0, 0, t0, &mut fx);
        r.on_pointer_event(mask::WHEEL_SCROLL_UP, 0, 0, t0, &mut fx);
        let immediate = fx.wheel.len();
        r.on_timer(TimerKind::WheelSettle, &mut fx);
        r.on_timer(TimerKind::WheelSettle, &mut fx);
        r.on_timer(TimerKind::WheelSettle, &mut fx);

        // Assert
        assert_eq!(immediate, 1);
        assert_eq!(fx.wheel.len(), 3);
        assert_eq!(fx.wheel[0].path.last(), Point::new(400, 580));
        assert_eq!(fx.wheel[2].path.last(), Point::new(400, 820));
        let settles = fx
            .scheduled
            .iter()
            .filter(|(k, _)| *k == TimerKind::WheelSettle)
            .count();
        assert_eq!(settles, 3);
        assert!(!r.wheel().is_polling());
    }

    #[test]
    fn test_wheel_down_near_top_edge_is_dropped() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        r.on_pointer_event(mask::MOVE, 400, 50, Instant::now(), &mut fx);

        r.on_pointer_event(mask::WHEEL_SCROLL_DOWN, 0, 0, Instant::now(), &mut fx);

        assert!(fx.wheel.is_empty());
        assert!(fx.scheduled.is_empty());
    }

    // ── Touch pan ─────────────────────────────────────────────────────────────

    #[test]
    fn test_pan_subtracts_deltas_and_flings_on_end() {
        // Arrange
        let (mut r, mut fx) = (router(), RecordingEffects::default());
        let t0 = Instant::now();

        // Act
        r.on_touch_event(mask::TOUCH_PAN_START, 300, 300, t0, &mut fx);
        r.on_touch_event(mask::TOUCH_PAN_UPDATE, 10, -20, t0 + ms(16), &mut fx);
        r.on_touch_event(mask::TOUCH_PAN_END, 0, 0, t0 + ms(32), &mut fx);
        complete_all(&mut r, &mut fx);

        // Assert
        assert_eq!(fx.strokes.len(), 3);
        assert_eq!(fx.strokes[1].stroke.path.last(), Point::new(290, 320));
        assert_eq!(fx.strokes[2].stroke.path.last(), Point::new(280, 340));
        assert_eq!(fx.strokes[2].stroke.duration, ms(48));
        assert_eq!(r.engine().pointer().position(), Point::new(0, 0));
    }

    #[test]
    fn test_pan_end_without_start_is_absorbed() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());

        r.on_touch_event(mask::TOUCH_PAN_END, 5, 5, Instant::now(), &mut fx);

        assert!(fx.strokes.is_empty());
        assert_eq!(r.engine().pointer().position(), Point::new(5, 5));
    }

    #[test]
    fn test_pinch_phases_are_ignored() {
        let (mut r, mut fx) = (router(), RecordingEffects::default());

        r.on_touch_event(mask::TOUCH_SCALE_START, 5, 5, Instant::now(), &mut fx);

        assert!(fx.strokes.is_empty());
    }
}
