use std::collections::VecDeque;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::capture_state::{transition, CaptureEffect, CaptureEvent, CaptureState};
use crate::capture::domain::facing::Facing;
use crate::capture::domain::still_image::StillImage;
use crate::capture::domain::video_source::{LiveFeed, VideoSource};
use crate::shared::frame::Frame;

/// Sole owner of the camera feed.
///
/// Every operation is fed through [`transition`]; the controller only
/// carries out the resulting effects. `stop` works from any state, and
/// dropping the controller stops it.
pub struct CaptureController {
    source: Box<dyn VideoSource>,
    state: CaptureState,
    feed: Option<Box<dyn LiveFeed>>,
    facing: Facing,
    flash: bool,
    last_error: Option<CaptureError>,
}

impl CaptureController {
    pub fn new(source: Box<dyn VideoSource>) -> Self {
        Self {
            source,
            state: CaptureState::Idle,
            feed: None,
            facing: Facing::default(),
            flash: false,
            last_error: None,
        }
    }

    /// Preferred facing and flash used by the next `start`.
    pub fn with_preferences(mut self, facing: Facing, flash: bool) -> Self {
        self.facing = facing;
        self.flash = flash;
        self
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn flash_enabled(&self) -> bool {
        self.flash
    }

    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }

    /// Opens the camera with the given facing.
    ///
    /// A second call while already active returns `Ok` without touching the
    /// device.
    pub fn start(&mut self, facing: Facing) -> Result<(), CaptureError> {
        if self.is_active() {
            log::debug!("Camera already active ({}), start ignored", self.facing);
            return Ok(());
        }
        self.facing = facing;
        log::info!("Requesting camera access ({})", facing.label());
        self.dispatch(CaptureEvent::StartRequested(facing))?;
        if self.flash {
            self.apply_torch(true);
        }
        Ok(())
    }

    /// Releases the camera. Safe to call in any state, any number of times.
    pub fn stop(&mut self) {
        // Release effects never report errors.
        let _ = self.dispatch(CaptureEvent::StopRequested);
    }

    /// Restarts the session with the opposite facing.
    ///
    /// When nothing is running only the preference flips. If the restart
    /// fails the session is left `Stopped` with no device held.
    pub fn switch_facing(&mut self) -> Result<Facing, CaptureError> {
        let next = self.facing.opposite();
        if !self.is_active() {
            self.facing = next;
            return Ok(next);
        }
        self.stop();
        self.start(next)?;
        Ok(next)
    }

    /// Flips the torch. Without an active session only the preference changes.
    pub fn toggle_flash(&mut self) -> Result<bool, CaptureError> {
        let wanted = !self.flash;
        match self.feed.as_mut() {
            Some(feed) if self.state.is_active() => {
                if !feed.supports_torch() {
                    self.last_error = Some(CaptureError::TorchUnsupported);
                    return Err(CaptureError::TorchUnsupported);
                }
                feed.set_torch(wanted)?;
            }
            _ => {}
        }
        self.flash = wanted;
        Ok(wanted)
    }

    /// Borrows the current frame for reading.
    pub fn current_frame(&self) -> Result<Frame, CaptureError> {
        if !self.is_active() {
            return Err(CaptureError::NotActive);
        }
        let feed = self.feed.as_ref().ok_or(CaptureError::NotActive)?;
        match feed.latest_frame() {
            Some(frame) if !frame.is_empty() => Ok(frame),
            _ => Err(CaptureError::NotReady),
        }
    }

    /// Copies the current frame into a still image.
    pub fn capture_photo(&self) -> Result<StillImage, CaptureError> {
        let frame = self.current_frame()?;
        log::debug!(
            "Captured still {}x{} from {}",
            frame.width(),
            frame.height(),
            self.facing.label()
        );
        Ok(StillImage::from_camera(frame, self.facing))
    }

    fn dispatch(&mut self, event: CaptureEvent) -> Result<(), CaptureError> {
        let mut queue = VecDeque::from([event]);
        let mut outcome = Ok(());

        while let Some(event) = queue.pop_front() {
            let previous = self.state;
            let (next, effects) = transition(previous, event);
            if next != previous {
                log::debug!("Capture state {} -> {}", previous.name(), next.name());
            }
            self.state = next;

            for effect in effects {
                match effect {
                    CaptureEffect::Acquire(facing) => match self.source.acquire(facing) {
                        Ok(feed) => {
                            self.release_feed();
                            self.feed = Some(feed);
                            queue.push_back(CaptureEvent::Acquired);
                        }
                        Err(err) => queue.push_back(CaptureEvent::AcquireFailed(err)),
                    },
                    CaptureEffect::Release => self.release_feed(),
                    CaptureEffect::Report(err) => {
                        log::warn!("{}", err.user_message());
                        self.last_error = Some(err.clone());
                        outcome = Err(err);
                    }
                }
            }
        }

        if self.is_active() {
            self.last_error = None;
        }
        outcome
    }

    fn release_feed(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.release();
            log::info!("Camera released ({})", feed.facing().label());
        }
    }

    fn apply_torch(&mut self, on: bool) {
        if let Some(feed) = self.feed.as_mut() {
            if let Err(e) = feed.set_torch(on) {
                log::warn!("Flash preference not applied: {e}");
            }
        }
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::infrastructure::memory_source::{AcquisitionLog, MemorySource};

    fn clip() -> Vec<Frame> {
        vec![Frame::solid(64, 48, [120, 120, 120], 0)]
    }

    fn controller(source: MemorySource) -> (CaptureController, AcquisitionLog) {
        let log = source.log();
        (CaptureController::new(Box::new(source)), log)
    }

    fn both_facings() -> MemorySource {
        MemorySource::new()
            .with_clip(Facing::User, clip())
            .with_clip(Facing::Environment, clip())
    }

    #[test]
    fn test_start_then_capture_photo() {
        let (mut ctl, _) = controller(both_facings());
        ctl.start(Facing::Environment).unwrap();
        assert_eq!(ctl.state(), CaptureState::Active { facing: Facing::Environment });

        let still = ctl.capture_photo().unwrap();
        assert_eq!(still.dimensions(), (64, 48));
        assert_eq!(still.facing(), Some(Facing::Environment));
    }

    #[test]
    fn test_denied_start_stays_idle_and_can_retry() {
        let source = both_facings().fail_next(CaptureError::ResourceUnavailable);
        let (mut ctl, log) = controller(source);

        let err = ctl.start(Facing::Environment).unwrap_err();
        assert_eq!(err, CaptureError::ResourceUnavailable);
        assert_eq!(ctl.state(), CaptureState::Idle);
        assert_eq!(ctl.last_error(), Some(&CaptureError::ResourceUnavailable));
        assert_eq!(log.held(), 0);

        ctl.start(Facing::Environment).unwrap();
        assert!(ctl.is_active());
        assert!(ctl.last_error().is_none());
    }

    #[test]
    fn test_missing_device_reported() {
        let source = MemorySource::new().with_clip(Facing::User, clip());
        let (mut ctl, _) = controller(source);
        assert_eq!(
            ctl.start(Facing::Environment),
            Err(CaptureError::DeviceNotFound)
        );
        assert_eq!(ctl.state(), CaptureState::Idle);
    }

    #[test]
    fn test_unsupported_environment_reported() {
        let source = both_facings().fail_next(CaptureError::UnsupportedEnvironment);
        let (mut ctl, _) = controller(source);
        assert_eq!(
            ctl.start(Facing::User),
            Err(CaptureError::UnsupportedEnvironment)
        );
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_second_start_is_noop() {
        let (mut ctl, log) = controller(both_facings());
        ctl.start(Facing::User).unwrap();
        ctl.start(Facing::Environment).unwrap();
        assert_eq!(log.acquires(), 1);
        assert_eq!(ctl.facing(), Facing::User);
    }

    #[test]
    fn test_stop_releases_and_is_idempotent() {
        let (mut ctl, log) = controller(both_facings());
        ctl.stop();
        ctl.start(Facing::User).unwrap();
        ctl.stop();
        ctl.stop();
        assert_eq!(ctl.state(), CaptureState::Stopped);
        assert_eq!(log.acquires(), 1);
        assert_eq!(log.releases(), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let (mut ctl, log) = controller(both_facings());
        for _ in 0..3 {
            ctl.start(Facing::User).unwrap();
            ctl.stop();
        }
        assert_eq!(log.acquires(), 3);
        assert_eq!(log.releases(), 3);
    }

    #[test]
    fn test_switch_facing_reacquires_without_leak() {
        let (mut ctl, log) = controller(both_facings());
        ctl.start(Facing::User).unwrap();

        let facing = ctl.switch_facing().unwrap();

        assert_eq!(facing, Facing::Environment);
        assert_eq!(ctl.state(), CaptureState::Active { facing: Facing::Environment });
        assert_eq!(log.acquires(), log.releases() + 1);
        assert_eq!(log.acquires(), 2);
    }

    #[test]
    fn test_switch_facing_failure_ends_stopped() {
        let source = MemorySource::new().with_clip(Facing::User, clip());
        let (mut ctl, log) = controller(source);
        ctl.start(Facing::User).unwrap();

        let err = ctl.switch_facing().unwrap_err();

        assert_eq!(err, CaptureError::DeviceNotFound);
        assert_eq!(ctl.state(), CaptureState::Stopped);
        assert_eq!(log.held(), 0);
    }

    #[test]
    fn test_switch_facing_while_idle_only_flips_preference() {
        let (mut ctl, log) = controller(both_facings());
        assert_eq!(ctl.switch_facing(), Ok(Facing::Environment));
        assert_eq!(ctl.state(), CaptureState::Idle);
        assert_eq!(log.acquires(), 0);
    }

    #[test]
    fn test_capture_requires_active_session() {
        let (ctl, _) = controller(both_facings());
        assert_eq!(ctl.capture_photo().err(), Some(CaptureError::NotActive));
    }

    #[test]
    fn test_capture_before_first_frame_is_not_ready() {
        let source = both_facings().with_warmup(1);
        let (mut ctl, _) = controller(source);
        ctl.start(Facing::User).unwrap();
        assert_eq!(ctl.capture_photo().err(), Some(CaptureError::NotReady));
        assert!(ctl.capture_photo().is_ok());
    }

    #[test]
    fn test_zero_sized_frame_is_not_ready() {
        let source = MemorySource::new().with_clip(
            Facing::User,
            vec![Frame::new(Vec::new(), 0, 0, 3, 0)],
        );
        let (mut ctl, _) = controller(source);
        ctl.start(Facing::User).unwrap();
        assert_eq!(ctl.current_frame().err(), Some(CaptureError::NotReady));
    }

    #[test]
    fn test_toggle_flash_unsupported_keeps_preference() {
        let (mut ctl, _) = controller(both_facings());
        ctl.start(Facing::User).unwrap();
        assert_eq!(ctl.toggle_flash(), Err(CaptureError::TorchUnsupported));
        assert!(!ctl.flash_enabled());
    }

    #[test]
    fn test_toggle_flash_on_supported_device() {
        let (mut ctl, _) = controller(both_facings().with_torch());
        ctl.start(Facing::User).unwrap();
        assert_eq!(ctl.toggle_flash(), Ok(true));
        assert_eq!(ctl.toggle_flash(), Ok(false));
    }

    #[test]
    fn test_toggle_flash_while_idle_flips_preference() {
        let (mut ctl, _) = controller(both_facings());
        assert_eq!(ctl.toggle_flash(), Ok(true));
        assert!(ctl.flash_enabled());
    }

    #[test]
    fn test_drop_releases_device() {
        let (mut ctl, log) = controller(both_facings());
        ctl.start(Facing::User).unwrap();
        drop(ctl);
        assert_eq!(log.held(), 0);
    }
}
