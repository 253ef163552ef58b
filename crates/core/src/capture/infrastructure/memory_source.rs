use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::facing::Facing;
use crate::capture::domain::video_source::{LiveFeed, VideoSource};
use crate::shared::frame::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionEvent {
    Acquired(Facing),
    Released(Facing),
    Denied(Facing, CaptureError),
}

/// Shared record of every acquire/release a [`MemorySource`] performed.
///
/// Clones observe the same log, so a caller can keep one while the source
/// itself is owned by a controller on another thread.
#[derive(Debug, Clone, Default)]
pub struct AcquisitionLog {
    events: Arc<Mutex<Vec<AcquisitionEvent>>>,
}

impl AcquisitionLog {
    fn record(&self, event: AcquisitionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<AcquisitionEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn acquires(&self) -> usize {
        self.count(|e| matches!(e, AcquisitionEvent::Acquired(_)))
    }

    pub fn releases(&self) -> usize {
        self.count(|e| matches!(e, AcquisitionEvent::Released(_)))
    }

    /// Feeds acquired but not yet released.
    pub fn held(&self) -> usize {
        self.acquires().saturating_sub(self.releases())
    }

    fn count(&self, pred: impl Fn(&AcquisitionEvent) -> bool) -> usize {
        self.events
            .lock()
            .map(|e| e.iter().filter(|ev| pred(ev)).count())
            .unwrap_or(0)
    }
}

/// Video source that replays in-memory frames, one clip per facing.
///
/// Each read of the live feed advances through the clip and wraps around,
/// so a handful of frames behaves like a looping camera. Acquisition
/// failures can be scripted to simulate denied permissions or missing
/// hardware.
pub struct MemorySource {
    clips: HashMap<Facing, Arc<[Frame]>>,
    scripted_failures: VecDeque<CaptureError>,
    warmup_reads: usize,
    torch_supported: bool,
    log: AcquisitionLog,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            scripted_failures: VecDeque::new(),
            warmup_reads: 0,
            torch_supported: false,
            log: AcquisitionLog::default(),
        }
    }

    pub fn with_clip(mut self, facing: Facing, frames: Vec<Frame>) -> Self {
        if frames.is_empty() {
            self.clips.remove(&facing);
        } else {
            self.clips.insert(facing, frames.into());
        }
        self
    }

    /// The next acquisition fails with `err`. Queued failures are consumed in order.
    pub fn fail_next(mut self, err: CaptureError) -> Self {
        self.scripted_failures.push_back(err);
        self
    }

    /// Feeds report no frame for their first `reads` reads.
    pub fn with_warmup(mut self, reads: usize) -> Self {
        self.warmup_reads = reads;
        self
    }

    pub fn with_torch(mut self) -> Self {
        self.torch_supported = true;
        self
    }

    pub fn log(&self) -> AcquisitionLog {
        self.log.clone()
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSource for MemorySource {
    fn acquire(&mut self, facing: Facing) -> Result<Box<dyn LiveFeed>, CaptureError> {
        if let Some(err) = self.scripted_failures.pop_front() {
            self.log.record(AcquisitionEvent::Denied(facing, err.clone()));
            return Err(err);
        }
        let Some(clip) = self.clips.get(&facing) else {
            self.log
                .record(AcquisitionEvent::Denied(facing, CaptureError::DeviceNotFound));
            return Err(CaptureError::DeviceNotFound);
        };

        self.log.record(AcquisitionEvent::Acquired(facing));
        Ok(Box::new(MemoryFeed {
            facing,
            clip: clip.clone(),
            reads: AtomicUsize::new(0),
            warmup_reads: self.warmup_reads,
            torch_supported: self.torch_supported,
            torch_on: false,
            released: false,
            log: self.log.clone(),
        }))
    }
}

struct MemoryFeed {
    facing: Facing,
    clip: Arc<[Frame]>,
    reads: AtomicUsize,
    warmup_reads: usize,
    torch_supported: bool,
    torch_on: bool,
    released: bool,
    log: AcquisitionLog,
}

impl MemoryFeed {
    fn warming_up(&self) -> bool {
        self.reads.load(Ordering::Relaxed) < self.warmup_reads
    }
}

impl LiveFeed for MemoryFeed {
    fn facing(&self) -> Facing {
        self.facing
    }

    fn dimensions(&self) -> (u32, u32) {
        if self.released || self.warming_up() {
            return (0, 0);
        }
        self.clip[0].dimensions()
    }

    fn latest_frame(&self) -> Option<Frame> {
        if self.released {
            return None;
        }
        let read = self.reads.fetch_add(1, Ordering::Relaxed);
        if read < self.warmup_reads {
            return None;
        }
        let index = read - self.warmup_reads;
        Some(self.clip[index % self.clip.len()].with_index(index))
    }

    fn supports_torch(&self) -> bool {
        self.torch_supported
    }

    fn torch_enabled(&self) -> bool {
        self.torch_on
    }

    fn set_torch(&mut self, on: bool) -> Result<(), CaptureError> {
        if !self.torch_supported {
            return Err(CaptureError::TorchUnsupported);
        }
        self.torch_on = on;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.torch_on = false;
        self.log.record(AcquisitionEvent::Released(self.facing));
    }
}
