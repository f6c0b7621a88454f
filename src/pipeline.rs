use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel::{select, Receiver};
use tracing::{debug, error, info};

use crate::dispatcher::{ActionDispatcher, PointerAction};
use crate::feature_extractor::{extract_angles, index_fingertip, FeatureError, FingerAngles};
use crate::gesture_classifier::classify;
use crate::hid::{OutputError, PointerOutput};
use crate::mouse_filter::CursorSmoother;
use crate::screen::ScreenCapture;
use crate::types::{GestureLabel, Landmark, LandmarkSet, ScreenBounds};

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// A previous action's cooldown is still running; frame ignored.
    CoolingDown,
    /// No complete hand in the frame.
    NoHand,
    Classified {
        label: GestureLabel,
        angles: FingerAngles,
        /// Action actually sent, if any.
        action: Option<PointerAction>,
    },
}

fn action_for(label: GestureLabel) -> Option<PointerAction> {
    match label {
        GestureLabel::LeftClick => Some(PointerAction::LeftClick),
        GestureLabel::RightClick => Some(PointerAction::RightClick),
        GestureLabel::DoubleClick => Some(PointerAction::DoubleClick),
        GestureLabel::Screenshot => Some(PointerAction::Screenshot),
        GestureLabel::Move | GestureLabel::LockedIdle => None,
    }
}

/// landmarks -> angles -> label -> smoother or dispatcher, one frame at a time.
pub struct GesturePipeline<P, S> {
    bounds: ScreenBounds,
    smoother: CursorSmoother,
    dispatcher: ActionDispatcher<P, S>,
}

impl<P: PointerOutput, S: ScreenCapture> GesturePipeline<P, S> {
    pub fn new(bounds: ScreenBounds, dispatcher: ActionDispatcher<P, S>) -> Self {
        Self {
            bounds,
            smoother: CursorSmoother::new(),
            dispatcher,
        }
    }

    #[cfg(test)]
    pub fn smoother(&self) -> &CursorSmoother {
        &self.smoother
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &ActionDispatcher<P, S> {
        &self.dispatcher
    }

    /// Drops the cursor anchor, e.g. after the frame source was reopened.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn process_frame(&mut self, landmarks: &[Landmark], now: Instant) -> Result<FrameOutcome, OutputError> {
        if self.dispatcher.is_cooling_down(now) {
            return Ok(FrameOutcome::CoolingDown);
        }

        let angles = match extract_angles(landmarks) {
            Ok(angles) => angles,
            Err(FeatureError::InsufficientLandmarks { actual, .. }) => {
                if actual > 0 {
                    debug!("Frame descartado con {} landmarks", actual);
                }
                return Ok(FrameOutcome::NoHand);
            }
        };

        let label = classify(&angles);
        debug!(
            "thumb={:.1} index={:.1} middle={:.1} ring={:.1} -> {}",
            angles.thumb, angles.index, angles.middle, angles.ring, label
        );

        let action = match label {
            GestureLabel::Move => {
                // Arity was checked by extract_angles
                let tip = match index_fingertip(landmarks) {
                    Ok(tip) => tip,
                    Err(_) => return Ok(FrameOutcome::NoHand),
                };
                let bounds = self.bounds;
                // The fingertip may leave the image; the cursor stays on screen
                self.smoother
                    .smooth_move(tip.x, tip.y, bounds)
                    .map(|(x, y)| bounds.clamp(x, y))
                    .map(|(x, y)| PointerAction::Move { x, y })
            }
            other => action_for(other),
        };

        let sent = match action {
            Some(action) => self.dispatcher.dispatch(action, now)?.then_some(action),
            None => None,
        };

        Ok(FrameOutcome::Classified {
            label,
            angles,
            action: sent,
        })
    }
}

/// Feeds frames from `rx_frames` through the pipeline until one of:
/// - a message on `rx_quit` (checked between frames) -> `Ok`
/// - the frame sender is dropped (end of stream) -> `Ok`
/// - a stream error or an output failure -> `Err`, nothing is retried
pub fn run_frame_loop<P, S>(
    pipeline: &mut GesturePipeline<P, S>,
    rx_frames: &Receiver<anyhow::Result<LandmarkSet>>,
    rx_quit: &Receiver<()>,
) -> Result<()>
where
    P: PointerOutput,
    S: ScreenCapture,
{
    let mut frames = 0u64;

    loop {
        select! {
            recv(rx_quit) -> _ => {
                info!("👋 Salida solicitada tras {} frames", frames);
                return Ok(());
            }
            recv(rx_frames) -> msg => {
                let landmarks = match msg {
                    Ok(frame) => frame.context("Fallo en el flujo de landmarks")?,
                    Err(_) => {
                        info!("🏁 Flujo de landmarks terminado tras {} frames", frames);
                        return Ok(());
                    }
                };
                frames += 1;

                match pipeline.process_frame(&landmarks, Instant::now()) {
                    Ok(FrameOutcome::Classified { label, action: Some(action), .. }) => {
                        if !matches!(action, PointerAction::Move { .. }) {
                            info!("✋ {} -> {:?}", label, action);
                        }
                    }
                    Ok(outcome) => debug!("Frame {}: {:?}", frames, outcome),
                    Err(e) => {
                        error!("❌ Error en la salida: {}", e);
                        return Err(e.into());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dispatcher::fakes::{Call, RecordingCapture, RecordingPointer};
    use crate::dispatcher::CLICK_COOLDOWN;
    use crate::feature_extractor::fixtures::hand;
    use crate::hid::MouseButton;

    fn pipeline() -> GesturePipeline<RecordingPointer, RecordingCapture> {
        GesturePipeline::new(
            ScreenBounds::new(1000, 1000),
            ActionDispatcher::new(RecordingPointer::default(), RecordingCapture::default(), "."),
        )
    }

    fn moving_hand(tip_x: f32, tip_y: f32) -> Vec<Landmark> {
        // Folded thumb is all that MOVE needs; the tip can go anywhere
        let mut landmarks = hand(false, true, true, true);
        landmarks[8] = Landmark::new(tip_x, tip_y);
        landmarks
    }

    #[test]
    fn empty_frame_is_no_hand() {
        let mut p = pipeline();
        assert_eq!(p.process_frame(&[], Instant::now()).unwrap(), FrameOutcome::NoHand);
        assert!(p.dispatcher().pointer().calls.is_empty());
    }

    #[test]
    fn moving_hand_follows_index_tip_after_seeding() {
        let mut p = pipeline();
        let t0 = Instant::now();

        let first = p.process_frame(&moving_hand(0.1, 0.1), t0).unwrap();
        assert!(matches!(
            first,
            FrameOutcome::Classified {
                label: GestureLabel::Move,
                action: None,
                ..
            }
        ));

        let second = p.process_frame(&moving_hand(0.2, 0.4), t0).unwrap();
        assert!(matches!(
            second,
            FrameOutcome::Classified {
                label: GestureLabel::Move,
                action: Some(PointerAction::Move { x: 130, y: 190 }),
                ..
            }
        ));
        assert_eq!(p.dispatcher().pointer().calls, vec![Call::MoveTo(130, 190)]);
    }

    #[test]
    fn left_click_pose_clicks_once_then_pauses_frames() {
        let mut p = pipeline();
        let t0 = Instant::now();
        let pose = hand(true, false, true, true);

        let outcome = p.process_frame(&pose, t0).unwrap();
        assert!(matches!(
            outcome,
            FrameOutcome::Classified {
                label: GestureLabel::LeftClick,
                action: Some(PointerAction::LeftClick),
                ..
            }
        ));

        // Held gesture during the cooldown is not re-triggered
        assert_eq!(
            p.process_frame(&pose, t0 + Duration::from_millis(100)).unwrap(),
            FrameOutcome::CoolingDown
        );
        assert_eq!(
            p.dispatcher().pointer().calls,
            vec![Call::Press(MouseButton::Left), Call::Release(MouseButton::Left)]
        );

        p.process_frame(&pose, t0 + CLICK_COOLDOWN).unwrap();
        assert_eq!(p.dispatcher().pointer().calls.len(), 4);
    }

    #[test]
    fn cooldown_does_not_touch_cursor_state() {
        let mut p = pipeline();
        let t0 = Instant::now();
        p.process_frame(&hand(true, false, true, true), t0).unwrap();
        p.process_frame(&moving_hand(0.5, 0.5), t0 + Duration::from_millis(10)).unwrap();
        assert!(!p.smoother().state().initialized);
    }

    #[test]
    fn command_poses_map_to_actions() {
        let cases = [
            (hand(true, true, false, true), GestureLabel::RightClick),
            (hand(true, false, false, false), GestureLabel::DoubleClick),
            (hand(true, true, true, true), GestureLabel::Screenshot),
            (hand(true, true, true, false), GestureLabel::LockedIdle),
        ];
        for (pose, expected) in cases {
            let mut p = pipeline();
            match p.process_frame(&pose, Instant::now()).unwrap() {
                FrameOutcome::Classified { label, action, .. } => {
                    assert_eq!(label, expected);
                    assert_eq!(action, action_for(expected));
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn screenshot_pose_reaches_capture() {
        let mut p = pipeline();
        p.process_frame(&hand(true, true, true, true), Instant::now()).unwrap();
        assert_eq!(p.dispatcher().capture().paths.len(), 1);
    }

    #[test]
    fn fingertip_outside_the_image_is_kept_on_screen() {
        let mut p = pipeline();
        let t0 = Instant::now();
        p.process_frame(&moving_hand(0.0, 0.5), t0).unwrap();
        // 0 + 0.3 * -50 = -15, clamped to the left edge
        p.process_frame(&moving_hand(-0.05, 0.5), t0).unwrap();
        assert_eq!(p.dispatcher().pointer().calls, vec![Call::MoveTo(0, 500)]);

        // State keeps the raw -15; -15 + 0.3 * 2015 = 589
        p.process_frame(&moving_hand(2.0, 0.5), t0).unwrap();
        assert_eq!(p.dispatcher().pointer().calls.last(), Some(&Call::MoveTo(589, 500)));
    }

    mod frame_loop {
        use super::*;
        use crossbeam_channel::{bounded, unbounded};

        fn failing_pipeline() -> GesturePipeline<RecordingPointer, RecordingCapture> {
            GesturePipeline::new(
                ScreenBounds::new(1000, 1000),
                ActionDispatcher::new(
                    RecordingPointer {
                        fail: true,
                        ..Default::default()
                    },
                    RecordingCapture::default(),
                    ".",
                ),
            )
        }

        #[test]
        fn end_of_stream_returns_ok_after_all_frames() {
            let mut p = pipeline();
            let (tx, rx) = unbounded();
            let (_tx_quit, rx_quit) = bounded::<()>(1);
            tx.send(Ok(hand(true, false, true, true))).unwrap();
            tx.send(Ok(Vec::new())).unwrap();
            drop(tx);

            assert!(run_frame_loop(&mut p, &rx, &rx_quit).is_ok());
            assert_eq!(
                p.dispatcher().pointer().calls,
                vec![Call::Press(MouseButton::Left), Call::Release(MouseButton::Left)]
            );
        }

        #[test]
        fn stream_error_ends_the_loop_with_error() {
            let mut p = pipeline();
            let (tx, rx) = unbounded();
            let (_tx_quit, rx_quit) = bounded::<()>(1);
            tx.send(Err(anyhow::anyhow!("camera unplugged"))).unwrap();
            tx.send(Ok(hand(true, false, true, true))).unwrap();

            let err = run_frame_loop(&mut p, &rx, &rx_quit).unwrap_err();
            assert!(format!("{:#}", err).contains("camera unplugged"));
            // Frames after the error are never processed
            assert!(p.dispatcher().pointer().calls.is_empty());
        }

        #[test]
        fn output_failure_ends_the_loop_with_error() {
            let mut p = failing_pipeline();
            let (tx, rx) = unbounded();
            let (_tx_quit, rx_quit) = bounded::<()>(1);
            tx.send(Ok(hand(true, false, true, true))).unwrap();

            let err = run_frame_loop(&mut p, &rx, &rx_quit).unwrap_err();
            assert!(err.downcast_ref::<OutputError>().is_some());
        }

        #[test]
        fn quit_message_stops_while_the_stream_is_open() {
            let mut p = pipeline();
            let (_tx, rx) = unbounded::<anyhow::Result<LandmarkSet>>();
            let (tx_quit, rx_quit) = bounded(1);
            tx_quit.send(()).unwrap();

            assert!(run_frame_loop(&mut p, &rx, &rx_quit).is_ok());
            assert!(p.dispatcher().pointer().calls.is_empty());
        }
    }
}
