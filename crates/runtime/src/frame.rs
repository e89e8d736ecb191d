/// Frame metadata handed to per-frame animation callbacks.
///
/// Times are milliseconds on whatever monotonic clock the host provides
/// (`performance.now()` in the browser, a synthetic clock in tests).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index since the clock was created or reset.
    pub index: u64,
    /// Timestamp of this frame.
    pub now_ms: f64,
    /// Time since the previous frame; 0 for the first frame.
    pub dt_ms: f64,
}

impl Frame {
    pub fn new(index: u64, now_ms: f64, dt_ms: f64) -> Self {
        Self {
            index,
            now_ms,
            dt_ms,
        }
    }
}

/// Turns raw host timestamps into [`Frame`]s.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    next_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose first frame measures its delta from `start_ms`.
    pub fn starting_at(start_ms: f64) -> Self {
        Self {
            last_ms: Some(start_ms),
            next_index: 0,
        }
    }

    pub fn advance(&mut self, now_ms: f64) -> Frame {
        let dt_ms = match self.last_ms {
            Some(last) if now_ms.is_finite() && last.is_finite() => now_ms - last,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        let frame = Frame::new(self.next_index, now_ms, dt_ms);
        self.next_index += 1;
        frame
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
