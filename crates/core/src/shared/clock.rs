use chrono::{DateTime, Utc};

/// Source of wall-clock timestamps for results and scans.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that advances a fixed step on every read.
#[cfg(test)]
pub(crate) struct SteppingClock {
    next: std::sync::Mutex<DateTime<Utc>>,
    step: chrono::Duration,
}

#[cfg(test)]
impl SteppingClock {
    pub(crate) fn new(step_ms: i64) -> Self {
        Self {
            next: std::sync::Mutex::new(
                DateTime::from_timestamp(1_700_000_000, 0).expect("valid epoch"),
            ),
            step: chrono::Duration::milliseconds(step_ms),
        }
    }
}

#[cfg(test)]
impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}
