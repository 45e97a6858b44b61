//! Frame clock and cancellable timers
//!
//! The host calls in once per display frame with a monotonic timestamp (ms).
//! [`FrameClock`] turns that into a clamped frame dt plus a count of fixed
//! 16 ms interval steps. [`Scheduler`] replaces fire-and-forget timeouts with
//! handles that are cancelled synchronously when the demo changes.

use crate::consts::{INTERVAL_MS, MAX_FRAME_DT, MAX_SUBSTEPS};

/// Timing for one host frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    /// Seconds since the previous frame, clamped to [`MAX_FRAME_DT`]
    pub dt: f32,
    /// Fixed interval steps due this frame
    pub interval_steps: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    accumulator: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next frame starts from dt = 0
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.accumulator = 0.0;
    }

    pub fn advance(&mut self, now_ms: f64) -> FrameTiming {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return FrameTiming::default();
        };

        let max_ms = f64::from(MAX_FRAME_DT) * 1000.0;
        let elapsed = (now_ms - last).clamp(0.0, max_ms);
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= INTERVAL_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= INTERVAL_MS;
            steps += 1;
        }
        // Drop backlog past the substep cap instead of spiralling
        self.accumulator = self.accumulator.min(INTERVAL_MS);

        FrameTiming {
            dt: (elapsed / 1000.0) as f32,
            interval_steps: steps,
        }
    }
}

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    epoch: u64,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    handle: TimerHandle,
    deadline_ms: f64,
    action: A,
}

/// One-shot timers carrying an action value
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    epoch: u64,
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            epoch: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `action` once `delay_ms` after `now_ms`
    pub fn after_ms(&mut self, now_ms: f64, delay_ms: u32, action: A) -> TimerHandle {
        let handle = TimerHandle {
            id: self.next_id,
            epoch: self.epoch,
        };
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            deadline_ms: now_ms + f64::from(delay_ms),
            action,
        });
        handle
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Drop every pending timer; handles from before this call are dead
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
        self.epoch += 1;
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        handle.epoch == self.epoch && self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every action due at `now_ms`, earliest first
    pub fn poll(&mut self, now_ms: f64) -> Vec<A> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.deadline_ms <= now_ms);
        self.pending = rest;

        due.sort_by(|a, b| {
            a.deadline_ms
                .total_cmp(&b.deadline_ms)
                .then(a.handle.id.cmp(&b.handle.id))
        });
        due.into_iter().map(|p| p.action).collect()
    }
}
