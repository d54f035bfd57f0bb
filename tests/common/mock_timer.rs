//! Recording timer service for testing the poll loop

use asterix_imu::TimerService;
use fugit::MillisDurationU32;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Calls made on the mock timer service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    /// A timer was allocated
    Create(u32),
    /// A timer was started as repeating
    Start {
        /// Timer handle
        timer: u32,
        /// Interval in milliseconds
        interval_ms: u32,
    },
    /// A timer was stopped
    Stop(u32),
    /// A timer was freed
    Delete(u32),
}

#[derive(Debug, Default)]
struct TimerState {
    next_id: u32,
    operations: Vec<TimerOp>,
    /// Live timers and their interval (None while stopped)
    timers: HashMap<u32, Option<u32>>,
    fail_create: bool,
    fail_start: bool,
}

/// Mock timer service
#[derive(Clone, Default)]
pub struct MockTimer {
    state: Rc<RefCell<TimerState>>,
}

impl MockTimer {
    /// Create a timer service with no timers
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` fail until disabled
    pub fn fail_create(&self, enable: bool) {
        self.state.borrow_mut().fail_create = enable;
    }

    /// Make `start_repeating` fail until disabled
    pub fn fail_start(&self, enable: bool) {
        self.state.borrow_mut().fail_start = enable;
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<TimerOp> {
        self.state.borrow().operations.clone()
    }

    /// Clear the operations log
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Count `start_repeating` calls
    pub fn start_count(&self) -> usize {
        self.count(|op| matches!(op, TimerOp::Start { .. }))
    }

    /// Count `stop` calls
    pub fn stop_count(&self) -> usize {
        self.count(|op| matches!(op, TimerOp::Stop(_)))
    }

    /// Count `delete` calls
    pub fn delete_count(&self) -> usize {
        self.count(|op| matches!(op, TimerOp::Delete(_)))
    }

    /// Running timers as (handle, interval in ms)
    pub fn running(&self) -> Vec<(u32, u32)> {
        let mut running: Vec<_> = self
            .state
            .borrow()
            .timers
            .iter()
            .filter_map(|(&id, &interval)| interval.map(|ms| (id, ms)))
            .collect();
        running.sort_unstable();
        running
    }

    /// Number of allocated (not yet deleted) timers
    pub fn allocated(&self) -> usize {
        self.state.borrow().timers.len()
    }

    fn count(&self, f: impl Fn(&TimerOp) -> bool) -> usize {
        self.state.borrow().operations.iter().filter(|op| f(op)).count()
    }
}

impl TimerService for MockTimer {
    type Timer = u32;

    fn create(&mut self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return None;
        }
        state.next_id += 1;
        let id = state.next_id;
        state.timers.insert(id, None);
        state.operations.push(TimerOp::Create(id));
        Some(id)
    }

    fn start_repeating(&mut self, timer: u32, interval: MillisDurationU32) -> bool {
        let mut state = self.state.borrow_mut();
        if state.fail_start {
            return false;
        }
        let interval_ms = interval.to_millis();
        state.operations.push(TimerOp::Start { timer, interval_ms });
        match state.timers.get_mut(&timer) {
            Some(slot) => {
                *slot = Some(interval_ms);
                true
            }
            None => panic!("start of unknown timer {timer}"),
        }
    }

    fn stop(&mut self, timer: u32) {
        let mut state = self.state.borrow_mut();
        state.operations.push(TimerOp::Stop(timer));
        if let Some(slot) = state.timers.get_mut(&timer) {
            *slot = None;
        }
    }

    fn delete(&mut self, timer: u32) {
        let mut state = self.state.borrow_mut();
        state.operations.push(TimerOp::Delete(timer));
        assert!(
            state.timers.remove(&timer).is_some(),
            "delete of unknown timer {timer}"
        );
    }
}
