//! Control loop task
//!
//! Owns the scheduler, the display surface and the button. Runs one
//! scheduler step per frame period.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Instant, Ticker};

use matrixlamp_core::input::ButtonInput;
use matrixlamp_core::scheduler::{Clock, FrameOutcome, Scheduler, StepReport};
use matrixlamp_display::{ShiftRegisterPanel, Surface};
use matrixlamp_hal::{ActiveLow, EhPin};

use crate::channels::{publish_active, PLUGIN_INPUT, REMOTE_REQUEST};

pub type PanelPin = EhPin<Output<'static>>;

/// Panel on the board's DATA/CLOCK/LATCH/OE pins
pub type LampPanel = ShiftRegisterPanel<PanelPin, PanelPin, PanelPin, ActiveLow<PanelPin>>;

/// Push button to ground with the internal pull-up
pub type LampButton = ButtonInput<ActiveLow<EhPin<Input<'static>>>>;

/// Frames between statistics log lines
const STATS_INTERVAL: u32 = 500;

/// Milliseconds since the control task started
struct EmbassyClock {
    start: Instant,
}

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

#[derive(Default)]
struct FrameStats {
    frames: u32,
    committed: u32,
    dropped: u32,
    switches: u32,
    over_budget: u32,
    max_tick_ms: u32,
}

impl FrameStats {
    fn record(&mut self, report: &StepReport) {
        self.frames += 1;
        match report.frame {
            FrameOutcome::Committed => self.committed += 1,
            FrameOutcome::Dropped(_) => self.dropped += 1,
            FrameOutcome::Skipped => {}
        }
        if report.transition.is_some() {
            self.switches += 1;
        }
        if report.over_budget {
            self.over_budget += 1;
        }
        self.max_tick_ms = self.max_tick_ms.max(report.tick_ms);
    }
}

/// Control task - steps the scheduler once per frame period
///
/// `scheduler` must already be started.
#[embassy_executor::task]
pub async fn control_task(
    mut scheduler: Scheduler<'static>,
    mut surface: Surface<LampPanel>,
    mut button: LampButton,
) {
    info!("Control task started");

    let clock = EmbassyClock {
        start: Instant::now(),
    };
    let period = Duration::from_millis(scheduler.config().frame_interval_ms as u64);
    let mut ticker = Ticker::every(period);
    let mut stats = FrameStats::default();

    loop {
        ticker.next().await;

        if let Some(request) = REMOTE_REQUEST.try_take() {
            scheduler.submit(request);
        }
        while let Ok(input) = PLUGIN_INPUT.try_receive() {
            scheduler.post_input(input);
        }

        match scheduler.step(&mut button, &mut surface, &clock) {
            Ok(report) => stats.record(&report),
            Err(e) => error!("Scheduler step failed: {}", e),
        }
        publish_active(scheduler.active());

        if stats.frames >= STATS_INTERVAL {
            info!(
                "{} frames: {} committed, {} dropped, {} switches, {} over budget, max tick {}ms",
                stats.frames,
                stats.committed,
                stats.dropped,
                stats.switches,
                stats.over_budget,
                stats.max_tick_ms
            );
            stats = FrameStats::default();
        }
    }
}
