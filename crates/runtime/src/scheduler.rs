use crate::budget::FrameBudget;
use crate::frame::Frame;

/// Result of one animation callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

/// Identifies one run of an animation task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TaskTicket(u64);

/// Cooperative cancellation for a single animation task.
///
/// Starting a task or cancelling it bumps the generation, so a callback that
/// was scheduled before the bump sees a stale ticket and must not touch shared
/// state. Cancelling never aborts a callback that is already running.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskSlot {
    generation: u64,
    active: bool,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> TaskTicket {
        self.generation = self.generation.wrapping_add(1);
        self.active = true;
        TaskTicket(self.generation)
    }

    pub fn cancel(&mut self) {
        if self.active {
            self.generation = self.generation.wrapping_add(1);
        }
        self.active = false;
    }

    /// Marks the run identified by `ticket` as finished.
    pub fn finish(&mut self, ticket: TaskTicket) {
        if self.is_live(ticket) {
            self.active = false;
        }
    }

    pub fn is_live(&self, ticket: TaskTicket) -> bool {
        self.active && self.generation == ticket.0
    }

    /// Ticket of the current run, if any.
    pub fn current(&self) -> Option<TaskTicket> {
        self.active.then_some(TaskTicket(self.generation))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameRunSummary {
    pub frames: u32,
    pub finished: bool,
}

/// Synthetic frame driver.
///
/// Feeds evenly spaced frames to a callback until it reports
/// [`TaskStatus::Done`] or the budget runs out. Used by tests and offline
/// renders in place of the browser's animation-frame callback.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    now_ms: f64,
    step_ms: f64,
    index: u64,
}

impl FrameLoop {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            step_ms,
            index: 0,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn next_frame(&mut self) -> Frame {
        self.now_ms += self.step_ms;
        let frame = Frame::new(self.index, self.now_ms, self.step_ms);
        self.index += 1;
        frame
    }

    pub fn run<F>(&mut self, budget: &mut FrameBudget, mut task: F) -> FrameRunSummary
    where
        F: FnMut(Frame) -> TaskStatus,
    {
        let mut frames = 0u32;
        while budget.try_consume() {
            frames += 1;
            if task(self.next_frame()) == TaskStatus::Done {
                return FrameRunSummary {
                    frames,
                    finished: true,
                };
            }
        }
        FrameRunSummary {
            frames,
            finished: false,
        }
    }
}
