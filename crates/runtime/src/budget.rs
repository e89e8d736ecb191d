/// Frame budget for bounded animation runs.
///
/// Budgets are expressed in frames rather than wall-clock time, which keeps
/// test harnesses and offline renders deterministic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameBudget {
    remaining_frames: u32,
}

impl FrameBudget {
    pub fn new(frames: u32) -> Self {
        Self {
            remaining_frames: frames,
        }
    }

    pub fn remaining_frames(&self) -> u32 {
        self.remaining_frames
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_frames == 0
    }

    /// Attempts to consume one frame from the budget.
    ///
    /// Returns `true` if a frame was available.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining_frames == 0 {
            return false;
        }
        self.remaining_frames -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::FrameBudget;

    #[test]
    fn consumes_frames() {
        let mut b = FrameBudget::new(2);
        assert!(b.try_consume());
        assert_eq!(b.remaining_frames(), 1);
        assert!(b.try_consume());
        assert!(b.is_exhausted());
        assert!(!b.try_consume());
    }
}
