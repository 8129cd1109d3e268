//! Plugin scheduler
//!
//! Owns the registry and the notion of "which plugin is active". The
//! process entry point calls [`Scheduler::start`] once and then
//! [`Scheduler::step`] once per control-loop iteration.
//!
//! Each step does exactly one of:
//!
//! - a **switch**: teardown of the old plugin, blank, setup of the new one.
//!   Nothing is committed; the new plugin draws its first frame next step.
//! - a **tick**: the active plugin draws into the staging frame, then the
//!   frame is committed to the panel once.
//!
//! Switch sources in order of precedence: remote request, button press,
//! auto-cycle timeout. At most one switch happens per step.
//!
//! Queued plugin input is dropped by a button or timeout switch. A remote
//! switch drops only what was queued before the request, so input sent
//! after a `SELECT` reaches the plugin it selected.

use core::fmt;

use heapless::Vec;
use matrixlamp_display::{Panel, PanelError, Surface};

use super::machine::{next_index, SchedulerState, SwitchCause, Transition};
use super::request::{CommandSink, RemoteRequest, RequestSlot};
use crate::config::SchedulerConfig;
use crate::input::AdvanceSource;
use crate::plugin::{
    InputSnapshot, Plugin, PluginDirectory, PluginInput, Registry, RegistryError, SelectError,
    MAX_PENDING_INPUT,
};

/// Millisecond time source
pub trait Clock {
    /// Monotonic milliseconds, allowed to wrap
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Errors from [`Scheduler::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError {
    /// No plugins registered
    EmptyRegistry,
    /// `start` called twice without `stop`
    AlreadyStarted,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::EmptyRegistry => f.write_str("no plugins registered"),
            StartError::AlreadyStarted => f.write_str("scheduler already started"),
        }
    }
}

/// Errors from [`Scheduler::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepError {
    /// `step` called before `start`
    NotStarted,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::NotStarted => f.write_str("scheduler not started"),
        }
    }
}

/// What happened to the frame in one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Tick ran and the frame reached the panel
    Committed,
    /// Tick ran but the panel rejected the frame
    Dropped(PanelError),
    /// Switch step, no tick and no commit
    Skipped,
}

/// Summary of one [`Scheduler::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Active plugin index after the step
    pub active: usize,
    /// Switch performed this step, if any
    pub transition: Option<Transition>,
    /// What happened to the frame
    pub frame: FrameOutcome,
    /// Time spent in the plugin's tick
    pub tick_ms: u32,
    /// Tick exceeded the configured budget
    pub over_budget: bool,
}

/// Plugin scheduler
pub struct Scheduler<'a> {
    registry: Registry<'a>,
    config: SchedulerConfig,
    state: SchedulerState,
    /// Active plugin's `setup` has run and its `teardown` has not
    setup_done: bool,
    remote: RequestSlot,
    pending_input: Vec<PluginInput, MAX_PENDING_INPUT>,
    /// Queued input posted before the pending remote request
    input_before_request: usize,
    /// Start of the current activation span, set on the first step
    span_start_ms: Option<u32>,
}

impl<'a> Scheduler<'a> {
    pub fn new(registry: Registry<'a>, config: SchedulerConfig) -> Self {
        Self {
            registry,
            config,
            state: SchedulerState::Unstarted,
            setup_done: false,
            remote: RequestSlot::new(),
            pending_input: Vec::new(),
            input_before_request: 0,
            span_start_ms: None,
        }
    }

    /// Add a plugin; fails with [`RegistryError::Sealed`] once started
    pub fn register(&mut self, plugin: &'a mut dyn Plugin) -> Result<usize, RegistryError> {
        self.registry.register(plugin)
    }

    /// Activate the first plugin
    ///
    /// Seals the registry. Requests and input posted before start are
    /// discarded.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.state.is_started() {
            return Err(StartError::AlreadyStarted);
        }
        if self.registry.is_empty() {
            error!("cannot start: no plugins registered");
            return Err(StartError::EmptyRegistry);
        }

        self.registry.seal();
        self.remote.clear();
        self.pending_input.clear();
        self.input_before_request = 0;
        self.span_start_ms = None;

        self.state = SchedulerState::Active(0);
        if let Some(plugin) = self.registry.at_mut(0) {
            plugin.setup();
        }
        self.setup_done = true;

        info!(
            "scheduler started: {} plugins, active {}",
            self.registry.count(),
            self.registry.id_at(0).unwrap_or("?")
        );
        Ok(())
    }

    /// Run one control-loop iteration
    pub fn step<A, P, C>(
        &mut self,
        input: &mut A,
        surface: &mut Surface<P>,
        clock: &C,
    ) -> Result<StepReport, StepError>
    where
        A: AdvanceSource + ?Sized,
        P: Panel,
        C: Clock + ?Sized,
    {
        let index = self.state.active().ok_or(StepError::NotStarted)?;
        let now = clock.now_ms();

        // Always poll so a press that loses to a remote request is consumed
        let advance = input.poll_advance(now);
        let held = input.is_held();
        let span_start = *self.span_start_ms.get_or_insert(now);

        let pending = self.pending_switch(index, advance, now, span_start);
        let input_before_request = core::mem::take(&mut self.input_before_request);
        if let Some((to, cause)) = pending {
            match cause {
                // Input sent after the request is addressed to the new plugin
                SwitchCause::RemoteSelect | SwitchCause::RemoteNext => {
                    self.discard_input_prefix(input_before_request)
                }
                SwitchCause::Button | SwitchCause::Timeout => self.pending_input.clear(),
            }
            self.switch(index, to, cause, surface, now);
            return Ok(StepReport {
                active: to,
                transition: Some(Transition {
                    from: index,
                    to,
                    cause,
                }),
                frame: FrameOutcome::Skipped,
                tick_ms: 0,
                over_budget: false,
            });
        }

        let frame = surface.begin_frame();
        let snapshot = InputSnapshot {
            now_ms: now,
            button_held: held,
            commands: &self.pending_input,
        };
        if let Some(plugin) = self.registry.at_mut(index) {
            plugin.tick(frame, &snapshot);
        }
        self.pending_input.clear();

        let tick_ms = clock.now_ms().wrapping_sub(now);
        let over_budget = tick_ms > self.config.tick_budget_ms;
        if over_budget {
            warn!(
                "plugin {} tick took {} ms (budget {} ms)",
                self.registry.id_at(index).unwrap_or("?"),
                tick_ms,
                self.config.tick_budget_ms
            );
        }

        let frame = match surface.commit_frame() {
            Ok(()) => FrameOutcome::Committed,
            Err(err) => {
                warn!("frame dropped: {}", err);
                FrameOutcome::Dropped(err)
            }
        };

        Ok(StepReport {
            active: index,
            transition: None,
            frame,
            tick_ms,
            over_budget,
        })
    }

    /// Pick this step's switch, if any
    fn pending_switch(
        &mut self,
        index: usize,
        advance: bool,
        now: u32,
        span_start: u32,
    ) -> Option<(usize, SwitchCause)> {
        let count = self.registry.count();
        let next = next_index(index, count);

        match self.remote.take() {
            // Remote wins over the button, even when it changes nothing
            Some(RemoteRequest::Select(to)) if to == index => {
                debug!("remote selected the active plugin, ignoring");
                return None;
            }
            Some(RemoteRequest::Select(to)) if to < count => {
                return Some((to, SwitchCause::RemoteSelect));
            }
            Some(RemoteRequest::Select(to)) => {
                warn!("remote selected out-of-range index {}", to);
            }
            Some(RemoteRequest::Next) => return Some((next, SwitchCause::RemoteNext)),
            None => {}
        }

        if advance {
            return Some((next, SwitchCause::Button));
        }

        let cycle_ms = self.config.auto_cycle_s.saturating_mul(1000);
        if cycle_ms > 0 && now.wrapping_sub(span_start) >= cycle_ms {
            return Some((next, SwitchCause::Timeout));
        }
        None
    }

    /// Teardown, blank, setup
    fn switch<P: Panel>(
        &mut self,
        from: usize,
        to: usize,
        cause: SwitchCause,
        surface: &mut Surface<P>,
        now: u32,
    ) {
        if self.setup_done {
            if let Some(plugin) = self.registry.at_mut(from) {
                plugin.teardown();
            }
        }
        self.setup_done = false;

        if let Err(err) = surface.clear() {
            warn!("panel blank failed: {}", err);
        }

        self.state = SchedulerState::Active(to);
        if let Some(plugin) = self.registry.at_mut(to) {
            plugin.setup();
        }
        self.setup_done = true;
        self.span_start_ms = Some(now);

        info!(
            "plugin {} -> {} ({})",
            self.registry.id_at(from).unwrap_or("?"),
            self.registry.id_at(to).unwrap_or("?"),
            cause
        );
    }

    /// Drop the oldest `count` queued inputs
    fn discard_input_prefix(&mut self, count: usize) {
        let count = count.min(self.pending_input.len());
        let keep = self.pending_input.len() - count;
        self.pending_input.rotate_left(count);
        self.pending_input.truncate(keep);
    }

    /// Park a remote request for the next step
    ///
    /// Input queued so far belongs to the current plugin and is dropped if
    /// the request switches; input queued afterwards follows the switch.
    pub fn submit(&mut self, request: RemoteRequest) {
        self.input_before_request = self.pending_input.len();
        if let Some(previous) = self.remote.post(request) {
            debug!("remote request {} replaced by {}", previous, request);
        }
    }

    /// Queue remote input for the active plugin's next tick
    ///
    /// Input beyond the queue capacity is dropped.
    pub fn post_input(&mut self, input: PluginInput) {
        if self.pending_input.push(input).is_err() {
            debug!("plugin input queue full, dropping {}", input);
        }
    }

    /// Tear down the active plugin and return to `Unstarted`
    pub fn stop(&mut self) {
        if let SchedulerState::Active(index) = self.state {
            if self.setup_done {
                if let Some(plugin) = self.registry.at_mut(index) {
                    plugin.teardown();
                }
            }
            info!("scheduler stopped");
        }
        self.state = SchedulerState::Unstarted;
        self.setup_done = false;
        self.remote.clear();
        self.pending_input.clear();
        self.input_before_request = 0;
        self.span_start_ms = None;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Index of the active plugin
    pub fn active(&self) -> Option<usize> {
        self.state.active()
    }

    /// Id of the active plugin
    pub fn active_id(&self) -> Option<&'static str> {
        self.active().and_then(|i| self.registry.id_at(i))
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    /// Id table for the remote link
    pub fn directory(&self) -> PluginDirectory {
        self.registry.directory()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Check if a remote request is waiting for the next step
    pub fn has_pending_request(&self) -> bool {
        self.remote.peek().is_some()
    }
}

impl CommandSink for Scheduler<'_> {
    fn select_plugin(&mut self, id: &str) -> Result<(), SelectError> {
        match self.registry.resolve(id) {
            Ok(index) => {
                self.submit(RemoteRequest::Select(index));
                Ok(())
            }
            Err(err) => {
                warn!("remote selected unknown plugin {}", id);
                Err(err)
            }
        }
    }

    fn request_next(&mut self) {
        self.submit(RemoteRequest::Next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Direction;
    use matrixlamp_display::{Frame, Rotation, PIXEL_ON};
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Setup(&'static str),
        Tick(&'static str),
        Teardown(&'static str),
    }

    type Log = Rc<RefCell<std::vec::Vec<Call>>>;

    /// Plugin that records every lifecycle call
    struct Recording {
        id: &'static str,
        log: Log,
        received: std::vec::Vec<PluginInput>,
    }

    impl Plugin for Recording {
        fn id(&self) -> &'static str {
            self.id
        }

        fn setup(&mut self) {
            self.log.borrow_mut().push(Call::Setup(self.id));
        }

        fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
            self.log.borrow_mut().push(Call::Tick(self.id));
            self.received.extend_from_slice(input.commands);
            frame.set(0, 0, PIXEL_ON);
        }

        fn teardown(&mut self) {
            self.log.borrow_mut().push(Call::Teardown(self.id));
        }
    }

    #[derive(Default)]
    struct CountingPanel {
        writes: u32,
        blanks: u32,
        fail: bool,
    }

    impl Panel for CountingPanel {
        fn write_frame(&mut self, _frame: &Frame) -> Result<(), PanelError> {
            if self.fail {
                return Err(PanelError::Communication);
            }
            self.writes += 1;
            Ok(())
        }

        fn blank(&mut self) -> Result<(), PanelError> {
            self.blanks += 1;
            Ok(())
        }
    }

    /// Button whose next poll result is set by the test
    #[derive(Default)]
    struct ScriptedButton {
        press: bool,
    }

    impl AdvanceSource for ScriptedButton {
        fn poll_advance(&mut self, _now_ms: u32) -> bool {
            core::mem::take(&mut self.press)
        }
    }

    /// Clock that advances by `step` on every read
    struct ManualClock {
        now: Cell<u32>,
        step: u32,
    }

    impl ManualClock {
        fn frozen(now: u32) -> Self {
            Self {
                now: Cell::new(now),
                step: 0,
            }
        }

        fn set(&self, now: u32) {
            self.now.set(now);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u32 {
            let now = self.now.get();
            self.now.set(now.wrapping_add(self.step));
            now
        }
    }

    const IDS: [&str; 6] = ["p0", "p1", "p2", "p3", "p4", "p5"];

    fn recorders(ids: &[&'static str], log: &Log) -> std::vec::Vec<Recording> {
        ids.iter()
            .map(|&id| Recording {
                id,
                log: log.clone(),
                received: std::vec::Vec::new(),
            })
            .collect()
    }

    fn scheduler_for(plugins: &mut [Recording], config: SchedulerConfig) -> Scheduler<'_> {
        let mut scheduler = Scheduler::new(Registry::new(), config);
        for plugin in plugins.iter_mut() {
            scheduler.register(plugin).unwrap();
        }
        scheduler
    }

    fn drain(log: &Log) -> std::vec::Vec<Call> {
        core::mem::take(&mut *log.borrow_mut())
    }

    struct Rig {
        button: ScriptedButton,
        surface: Surface<CountingPanel>,
        clock: ManualClock,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                button: ScriptedButton::default(),
                surface: Surface::new(CountingPanel::default(), Rotation::Deg0),
                clock: ManualClock::frozen(0),
            }
        }

        fn step(&mut self, scheduler: &mut Scheduler<'_>) -> StepReport {
            scheduler
                .step(&mut self.button, &mut self.surface, &self.clock)
                .unwrap()
        }

        fn press(&mut self, scheduler: &mut Scheduler<'_>) -> StepReport {
            self.button.press = true;
            self.step(scheduler)
        }

        fn writes(&self) -> u32 {
            self.surface.panel().writes
        }
    }

    #[test]
    fn test_three_plugin_scenario() {
        use Call::*;
        let log = Log::default();
        let mut plugins = recorders(&["a", "b", "c"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();

        scheduler.start().unwrap();
        assert_eq!(scheduler.active_id(), Some("a"));
        assert_eq!(drain(&log), [Setup("a")]);

        rig.press(&mut scheduler);
        assert_eq!(scheduler.active_id(), Some("b"));
        assert_eq!(drain(&log), [Teardown("a"), Setup("b")]);

        scheduler.select_plugin("c").unwrap();
        rig.step(&mut scheduler);
        assert_eq!(scheduler.active_id(), Some("c"));
        assert_eq!(drain(&log), [Teardown("b"), Setup("c")]);

        // Selecting the active plugin changes nothing; the step just ticks
        scheduler.select_plugin("c").unwrap();
        let report = rig.step(&mut scheduler);
        assert_eq!(report.transition, None);
        assert_eq!(scheduler.active_id(), Some("c"));
        assert_eq!(drain(&log), [Tick("c")]);

        let report = rig.press(&mut scheduler);
        assert_eq!(scheduler.active_id(), Some("a"));
        assert_eq!(drain(&log), [Teardown("c"), Setup("a")]);
        assert_eq!(
            report.transition,
            Some(Transition {
                from: 2,
                to: 0,
                cause: SwitchCause::Button
            })
        );
    }

    #[test]
    fn test_commit_once_per_tick_and_never_on_switch() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        scheduler.start().unwrap();

        let report = rig.step(&mut scheduler);
        assert_eq!(report.frame, FrameOutcome::Committed);
        assert_eq!(rig.writes(), 1);

        let report = rig.press(&mut scheduler);
        assert_eq!(report.frame, FrameOutcome::Skipped);
        assert_eq!(rig.writes(), 1);
        // Old plugin's frame does not bleed into the new one
        assert_eq!(rig.surface.panel().blanks, 1);
        assert!(rig.surface.frame().is_blank());

        rig.step(&mut scheduler);
        assert_eq!(rig.writes(), 2);
    }

    #[test]
    fn test_remote_beats_button() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b", "c"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        scheduler.start().unwrap();
        drain(&log);

        scheduler.select_plugin("c").unwrap();
        let report = rig.press(&mut scheduler);
        assert_eq!(scheduler.active_id(), Some("c"));
        assert_eq!(report.transition.map(|t| t.cause), Some(SwitchCause::RemoteSelect));
        assert_eq!(drain(&log), [Call::Teardown("a"), Call::Setup("c")]);

        // The press was consumed, not replayed
        rig.step(&mut scheduler);
        assert_eq!(scheduler.active_id(), Some("c"));
    }

    #[test]
    fn test_request_burst_coalesces_to_latest() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b", "c"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        scheduler.start().unwrap();
        drain(&log);

        scheduler.select_plugin("c").unwrap();
        scheduler.select_plugin("b").unwrap();
        scheduler.request_next();
        let report = rig.step(&mut scheduler);

        assert_eq!(report.transition.map(|t| t.cause), Some(SwitchCause::RemoteNext));
        assert_eq!(scheduler.active_id(), Some("b"));
        assert_eq!(drain(&log), [Call::Teardown("a"), Call::Setup("b")]);
        assert!(!scheduler.has_pending_request());
    }

    #[test]
    fn test_unknown_id_changes_nothing() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        scheduler.start().unwrap();
        drain(&log);

        assert_eq!(scheduler.select_plugin("tetris"), Err(SelectError::NotFound));
        assert!(!scheduler.has_pending_request());
        rig.step(&mut scheduler);
        assert_eq!(scheduler.active(), Some(0));
        assert_eq!(drain(&log), [Call::Tick("a")]);
    }

    #[test]
    fn test_start_errors() {
        let mut empty = Scheduler::new(Registry::new(), SchedulerConfig::default());
        assert_eq!(empty.start(), Err(StartError::EmptyRegistry));

        let log = Log::default();
        let mut plugins = recorders(&["a"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        scheduler.start().unwrap();
        assert_eq!(scheduler.start(), Err(StartError::AlreadyStarted));
    }

    #[test]
    fn test_register_after_start_is_sealed() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        let (first, second) = plugins.split_at_mut(1);
        let mut scheduler = scheduler_for(first, SchedulerConfig::default());
        scheduler.start().unwrap();

        assert_eq!(
            scheduler.register(&mut second[0]),
            Err(RegistryError::Sealed)
        );
        assert_eq!(scheduler.registry().count(), 1);
    }

    #[test]
    fn test_step_before_start() {
        let log = Log::default();
        let mut plugins = recorders(&["a"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();

        let result = scheduler.step(&mut rig.button, &mut rig.surface, &rig.clock);
        assert_eq!(result, Err(StepError::NotStarted));
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn test_commit_failure_drops_frame_and_continues() {
        let log = Log::default();
        let mut plugins = recorders(&["a"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        rig.surface.panel_mut().fail = true;
        scheduler.start().unwrap();

        let report = rig.step(&mut scheduler);
        assert_eq!(report.frame, FrameOutcome::Dropped(PanelError::Communication));

        rig.surface.panel_mut().fail = false;
        let report = rig.step(&mut scheduler);
        assert_eq!(report.frame, FrameOutcome::Committed);
        assert_eq!(drain(&log), [Call::Setup("a"), Call::Tick("a"), Call::Tick("a")]);
    }

    #[test]
    fn test_slow_tick_is_reported() {
        let log = Log::default();
        let mut plugins = recorders(&["a"], &log);
        let config = SchedulerConfig {
            tick_budget_ms: 5,
            ..SchedulerConfig::default()
        };
        let mut scheduler = scheduler_for(&mut plugins, config);
        let mut rig = Rig::new();
        rig.clock.step = 8;
        scheduler.start().unwrap();

        let report = rig.step(&mut scheduler);
        assert_eq!(report.tick_ms, 8);
        assert!(report.over_budget);
        // Never preempted
        assert_eq!(report.frame, FrameOutcome::Committed);
    }

    #[test]
    fn test_auto_cycle_timeout() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        let config = SchedulerConfig {
            auto_cycle_s: 1,
            ..SchedulerConfig::default()
        };
        let mut scheduler = scheduler_for(&mut plugins, config);
        let mut rig = Rig::new();
        scheduler.start().unwrap();

        rig.clock.set(100);
        assert_eq!(rig.step(&mut scheduler).transition, None);
        rig.clock.set(900);
        assert_eq!(rig.step(&mut scheduler).transition, None);

        rig.clock.set(1100);
        let report = rig.step(&mut scheduler);
        assert_eq!(report.transition.map(|t| t.cause), Some(SwitchCause::Timeout));
        assert_eq!(scheduler.active_id(), Some("b"));

        // Span restarts at the switch
        rig.clock.set(2000);
        assert_eq!(rig.step(&mut scheduler).transition, None);
        rig.clock.set(2100);
        assert!(rig.step(&mut scheduler).transition.is_some());
        assert_eq!(scheduler.active_id(), Some("a"));
    }

    #[test]
    fn test_button_beats_timeout() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b", "c"], &log);
        let config = SchedulerConfig {
            auto_cycle_s: 1,
            ..SchedulerConfig::default()
        };
        let mut scheduler = scheduler_for(&mut plugins, config);
        let mut rig = Rig::new();
        scheduler.start().unwrap();
        rig.step(&mut scheduler);

        rig.clock.set(5000);
        let report = rig.press(&mut scheduler);
        assert_eq!(report.transition.map(|t| t.cause), Some(SwitchCause::Button));
        // One switch per step
        assert_eq!(scheduler.active_id(), Some("b"));
    }

    #[test]
    fn test_plugin_input_delivered_then_dropped_on_switch() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        {
            let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
            let mut rig = Rig::new();
            scheduler.start().unwrap();

            scheduler.post_input(PluginInput::Steer(Direction::Left));
            scheduler.post_input(PluginInput::ClearCanvas);
            rig.step(&mut scheduler);

            // Pending input for "a" is discarded by the switch
            scheduler.post_input(PluginInput::ClearCanvas);
            rig.press(&mut scheduler);
            rig.step(&mut scheduler);
        }

        assert_eq!(
            plugins[0].received,
            [PluginInput::Steer(Direction::Left), PluginInput::ClearCanvas]
        );
        assert!(plugins[1].received.is_empty());
    }

    #[test]
    fn test_input_after_remote_select_reaches_new_plugin() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b", "c"], &log);
        {
            let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
            let mut rig = Rig::new();
            scheduler.start().unwrap();

            scheduler.post_input(PluginInput::Steer(Direction::Left));
            scheduler.select_plugin("c").unwrap();
            scheduler.post_input(PluginInput::ClearCanvas);

            let report = rig.step(&mut scheduler);
            assert_eq!(report.active, 2);
            rig.step(&mut scheduler);
        }

        assert!(plugins[0].received.is_empty());
        assert_eq!(plugins[2].received, [PluginInput::ClearCanvas]);
    }

    #[test]
    fn test_input_after_remote_next_reaches_new_plugin() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        {
            let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
            let mut rig = Rig::new();
            scheduler.start().unwrap();

            scheduler.post_input(PluginInput::ClearCanvas);
            scheduler.request_next();
            scheduler.post_input(PluginInput::Steer(Direction::Up));
            scheduler.post_input(PluginInput::ClearCanvas);
            rig.step(&mut scheduler);
            rig.step(&mut scheduler);
        }

        assert!(plugins[0].received.is_empty());
        assert_eq!(
            plugins[1].received,
            [PluginInput::Steer(Direction::Up), PluginInput::ClearCanvas]
        );
    }

    #[test]
    fn test_stop_tears_down_once() {
        let log = Log::default();
        let mut plugins = recorders(&["a", "b"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        scheduler.start().unwrap();
        rig.press(&mut scheduler);
        drain(&log);

        scheduler.stop();
        scheduler.stop();
        assert_eq!(drain(&log), [Call::Teardown("b")]);
        assert_eq!(scheduler.state(), SchedulerState::Unstarted);

        // Restart begins again from the first plugin
        scheduler.start().unwrap();
        assert_eq!(drain(&log), [Call::Setup("a")]);
    }

    #[test]
    fn test_single_plugin_advance_restarts_it() {
        let log = Log::default();
        let mut plugins = recorders(&["a"], &log);
        let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
        let mut rig = Rig::new();
        scheduler.start().unwrap();
        drain(&log);

        rig.press(&mut scheduler);
        assert_eq!(scheduler.active(), Some(0));
        assert_eq!(drain(&log), [Call::Teardown("a"), Call::Setup("a")]);
    }

    /// Check lifecycle ordering over a whole call log
    fn check_lifecycle(calls: &[Call]) {
        let mut live: HashSet<&'static str> = HashSet::new();
        for call in calls {
            match *call {
                Call::Setup(id) => {
                    assert!(live.is_empty(), "setup({id}) while {live:?} active");
                    live.insert(id);
                }
                Call::Tick(id) => assert!(live.contains(id), "tick({id}) outside setup/teardown"),
                Call::Teardown(id) => assert!(live.remove(id), "teardown({id}) without setup"),
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Action {
        Idle,
        Press,
        Select(usize),
        Next,
        Restart,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Idle),
            Just(Action::Press),
            (0..IDS.len()).prop_map(Action::Select),
            Just(Action::Next),
            Just(Action::Restart),
        ]
    }

    proptest! {
        #[test]
        fn prop_k_presses_land_on_k_mod_n(n in 1..=IDS.len(), k in 0usize..40) {
            let log = Log::default();
            let mut plugins = recorders(&IDS[..n], &log);
            let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
            let mut rig = Rig::new();
            scheduler.start().unwrap();

            for _ in 0..k {
                rig.press(&mut scheduler);
            }
            prop_assert_eq!(scheduler.active(), Some(k % n));
        }

        #[test]
        fn prop_setup_teardown_balanced(
            n in 1..=IDS.len(),
            actions in proptest::collection::vec(action(), 0..60),
        ) {
            let log = Log::default();
            let mut plugins = recorders(&IDS[..n], &log);
            let mut scheduler = scheduler_for(&mut plugins, SchedulerConfig::default());
            let mut rig = Rig::new();
            scheduler.start().unwrap();

            for action in actions {
                match action {
                    Action::Idle => {}
                    Action::Press => rig.button.press = true,
                    Action::Select(i) => {
                        let result = scheduler.select_plugin(IDS[i]);
                        prop_assert_eq!(result.is_ok(), i < n);
                    }
                    Action::Next => scheduler.request_next(),
                    Action::Restart => {
                        scheduler.stop();
                        scheduler.start().unwrap();
                    }
                }
                let before = scheduler.active();
                let report = rig.step(&mut scheduler);
                if report.transition.is_none() {
                    prop_assert_eq!(before, scheduler.active());
                }
                check_lifecycle(&log.borrow());
            }

            scheduler.stop();
            let calls = log.borrow();
            check_lifecycle(&calls);
            for id in &IDS[..n] {
                let setups = calls.iter().filter(|c| **c == Call::Setup(id)).count();
                let teardowns = calls.iter().filter(|c| **c == Call::Teardown(id)).count();
                prop_assert_eq!(setups, teardowns);
            }
        }
    }
}
