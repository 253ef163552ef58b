use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::facing::Facing;

/// Lifecycle of a capture session.
///
/// `Idle → Starting → Active → Stopped`, with `Starting` falling back to
/// where it came from when acquisition fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Starting { facing: Facing, from_stopped: bool },
    Active { facing: Facing },
    Stopped,
}

impl CaptureState {
    pub fn is_active(&self) -> bool {
        matches!(self, CaptureState::Active { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Starting { .. } => "starting",
            CaptureState::Active { .. } => "active",
            CaptureState::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    StartRequested(Facing),
    Acquired,
    AcquireFailed(CaptureError),
    StopRequested,
}

/// Side effects the controller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEffect {
    Acquire(Facing),
    Release,
    Report(CaptureError),
}

/// Computes the next state and the effects it requires.
///
/// Pure: the controller owns the device and carries out the effects.
pub fn transition(state: CaptureState, event: CaptureEvent) -> (CaptureState, Vec<CaptureEffect>) {
    use CaptureEffect::*;
    use CaptureState::*;

    match (state, event) {
        (Idle, CaptureEvent::StartRequested(facing)) => (
            Starting {
                facing,
                from_stopped: false,
            },
            vec![Acquire(facing)],
        ),
        (Stopped, CaptureEvent::StartRequested(facing)) => (
            Starting {
                facing,
                from_stopped: true,
            },
            vec![Acquire(facing)],
        ),
        // Already running or in flight: a second start is a no-op.
        (s @ (Starting { .. } | Active { .. }), CaptureEvent::StartRequested(_)) => (s, vec![]),

        (Starting { facing, .. }, CaptureEvent::Acquired) => (Active { facing }, vec![]),
        // A device that arrives when nobody is waiting for it goes straight back.
        (s, CaptureEvent::Acquired) => (s, vec![Release]),

        (Starting { from_stopped, .. }, CaptureEvent::AcquireFailed(err)) => {
            let fallback = if from_stopped { Stopped } else { Idle };
            (fallback, vec![Report(err)])
        }
        (s, CaptureEvent::AcquireFailed(_)) => (s, vec![]),

        (Starting { .. } | Active { .. }, CaptureEvent::StopRequested) => (Stopped, vec![Release]),
        (s @ (Idle | Stopped), CaptureEvent::StopRequested) => (s, vec![Release]),
    }
}
