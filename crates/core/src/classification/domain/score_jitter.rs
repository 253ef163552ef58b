/// Supplies the variation term of the color heuristic.
///
/// Each call yields a value in `[0, 1)`.
pub trait ScoreJitter: Send {
    fn next(&mut self) -> f64;
}

/// Always the middle of the range, so identical frames score identically.
pub struct MidpointJitter;

impl ScoreJitter for MidpointJitter {
    fn next(&mut self) -> f64 {
        0.5
    }
}

/// Replays a fixed sequence, wrapping at the end.
pub struct SequenceJitter {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceJitter {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        Self {
            values: values.into_iter().map(|v| v.clamp(0.0, 0.999_999)).collect(),
            pos: 0,
        }
    }
}

impl ScoreJitter for SequenceJitter {
    fn next(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
