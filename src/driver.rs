//! Demo driver
//!
//! Owns the running demo: its state, frame clock, timers and RNG. The host
//! forwards input and calls [`DemoDriver::advance`] once per display frame.
//! Switching demos cancels every pending timer and replaces the state
//! wholesale before anything else can run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clock::{FrameClock, FrameTiming, Scheduler, TimerHandle};
use crate::render::Frame;
use crate::settings::Settings;
use crate::sim::hitstop::HITSTOP_MS;
use crate::sim::platformer::REST_MS;
use crate::sim::state::{DemoEvent, DemoKind, DemoState};
use crate::sim::tick::{self, TickInput};
use crate::sim::PointerEvent;

/// What a fired timer does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Clear the active flag (squash, flash, persistence, audio...)
    ReleaseActive,
    /// End the hitstop freeze
    ReleaseHitstop,
    /// Drop the buffer demo player again after resting
    RestartFall,
}

pub struct DemoDriver {
    state: DemoState,
    settings: Settings,
    clock: FrameClock,
    timers: Scheduler<TimerAction>,
    rng: Pcg32,
    seed: u64,
    /// Timestamp of the latest frame (ms)
    now_ms: f64,
    active_timer: Option<TimerHandle>,
    rest_timer: Option<TimerHandle>,
}

impl DemoDriver {
    pub fn new(kind: DemoKind, seed: u64) -> Self {
        Self::with_settings(kind, seed, Settings::default())
    }

    pub fn with_settings(kind: DemoKind, seed: u64, settings: Settings) -> Self {
        log::info!("Starting {} demo (seed {})", kind, seed);
        Self {
            state: DemoState::new(kind),
            settings,
            clock: FrameClock::new(),
            timers: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            now_ms: 0.0,
            active_timer: None,
            rest_timer: None,
        }
    }

    pub fn kind(&self) -> DemoKind {
        self.state.kind
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether the host should keep calling `advance` every display frame
    pub fn wants_frames(&self) -> bool {
        self.state.kind.is_frame_driven()
            || self.state.needs_interval()
            || !self.timers.is_empty()
    }

    /// Switch to another demo. Returns false if it is already running.
    pub fn switch(&mut self, kind: DemoKind) -> bool {
        if kind == self.state.kind {
            return false;
        }
        log::info!("Switching demo {} -> {}", self.state.kind, kind);
        self.reset_to(kind);
        true
    }

    /// Restart the current demo from its baseline
    pub fn reset(&mut self) {
        self.reset_to(self.state.kind);
    }

    fn reset_to(&mut self, kind: DemoKind) {
        // Cancel first: nothing scheduled by the old demo may touch the new state
        self.timers.cancel_all();
        self.active_timer = None;
        self.rest_timer = None;
        self.clock.reset();
        self.state = DemoState::new(kind);
    }

    pub fn input(&mut self, input: &TickInput) {
        tick::dispatch(&mut self.state, input, &self.settings, &mut self.rng);
        self.handle_events();
    }

    /// Click on the demo; `at` is the pointer in container percent
    pub fn click(&mut self, at: Option<Vec2>) {
        let input = match at {
            Some(pos) => TickInput::click_at(pos),
            None => TickInput::click(),
        };
        self.input(&input);
    }

    pub fn jump(&mut self) {
        self.input(&TickInput::jump());
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.input(&TickInput::pointer(event));
    }

    pub fn set_juice(&mut self, enabled: bool) {
        self.input(&TickInput::juice(enabled));
    }

    /// Run everything due by `now_ms`: timers, fixed interval steps, then one frame step
    pub fn advance(&mut self, now_ms: f64) -> FrameTiming {
        self.now_ms = self.now_ms.max(now_ms);
        let timing = self.clock.advance(now_ms);

        for action in self.timers.poll(now_ms) {
            self.fire(action);
        }

        for _ in 0..timing.interval_steps {
            if !self.state.needs_interval() {
                break;
            }
            tick::step_interval(&mut self.state, &mut self.rng);
            self.handle_events();
        }

        if self.state.kind.is_frame_driven() && timing.dt > 0.0 {
            tick::step_frame(&mut self.state, timing.dt, &mut self.rng);
            self.handle_events();
        }

        timing
    }

    /// Snapshot the style parameters for the current state
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state, &self.settings)
    }

    fn fire(&mut self, action: TimerAction) {
        log::debug!("{} timer fired: {:?}", self.state.kind, action);
        match action {
            TimerAction::ReleaseActive => {
                self.active_timer = None;
                tick::release_active(&mut self.state);
            }
            TimerAction::ReleaseHitstop => {
                self.active_timer = None;
                tick::release_hitstop(&mut self.state);
            }
            TimerAction::RestartFall => {
                self.rest_timer = None;
                tick::restart_fall(&mut self.state);
            }
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                DemoEvent::Activated { release_ms } => {
                    self.replace_active_timer(release_ms, TimerAction::ReleaseActive);
                }
                DemoEvent::HitstopStarted => {
                    self.replace_active_timer(HITSTOP_MS, TimerAction::ReleaseHitstop);
                }
                DemoEvent::Rested => {
                    if self.rest_timer.is_none() {
                        self.rest_timer =
                            Some(self.timers.after_ms(self.now_ms, REST_MS, TimerAction::RestartFall));
                    }
                }
                DemoEvent::Jumped | DemoEvent::BufferedJump => {
                    // Jumping off the floor interrupts the rest-then-restart loop
                    if let Some(handle) = self.rest_timer.take() {
                        self.timers.cancel(handle);
                    }
                }
                DemoEvent::TriggerIgnored
                | DemoEvent::ShakeSettled
                | DemoEvent::JumpBuffered
                | DemoEvent::JumpRejected
                | DemoEvent::Respawned => {
                    log::trace!("{} event: {:?}", self.state.kind, event);
                }
            }
        }
    }

    fn replace_active_timer(&mut self, delay_ms: u32, action: TimerAction) {
        if let Some(handle) = self.active_timer.take() {
            self.timers.cancel(handle);
        }
        self.active_timer = Some(self.timers.after_ms(self.now_ms, delay_ms, action));
    }
}
