//! Matrixlamp - LED Matrix Lamp Firmware
//!
//! Main firmware binary for RP2040 boards driving a 16x16 shift-register
//! LED panel. One plugin owns the panel at a time; the button or the remote
//! link switches to another.
//!
//! # Board wiring
//!
//! | Signal  | GPIO |
//! |---------|------|
//! | UART TX | 0    |
//! | UART RX | 1    |
//! | DATA    | 2    |
//! | CLOCK   | 3    |
//! | LATCH   | 4    |
//! | OE (lo) | 5    |
//! | Button  | 15   |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use matrixlamp_core::input::ButtonInput;
use matrixlamp_core::plugin::{PluginDirectory, Registry};
use matrixlamp_core::Scheduler;
use matrixlamp_display::{ShiftRegisterPanel, Surface};
use matrixlamp_hal::{ActiveLow, EhPin};
use matrixlamp_plugins::PluginCatalog;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 128]> = StaticCell::new();

// Plugins are borrowed by the registry for the life of the program
static CATALOG: StaticCell<PluginCatalog> = StaticCell::new();
static DIRECTORY: StaticCell<PluginDirectory> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Matrixlamp firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Plugins
    let catalog = CATALOG.init(PluginCatalog::new(boot_seed()));
    let mut registry = Registry::new();
    match catalog.register_into(&mut registry, &config.plugins.order) {
        Ok(count) => info!("Registered {} plugins", count),
        Err(e) => panic!("Plugin registration failed: {}", e),
    }
    let directory: &'static PluginDirectory = DIRECTORY.init(registry.directory());

    let mut scheduler = Scheduler::new(registry, config.scheduler);
    if let Err(e) = scheduler.start() {
        panic!("Scheduler start failed: {}", e);
    }

    // Panel
    let panel = ShiftRegisterPanel::new(
        EhPin::new(Output::new(p.PIN_2, Level::Low)),
        EhPin::new(Output::new(p.PIN_3, Level::Low)),
        EhPin::new(Output::new(p.PIN_4, Level::Low)),
        ActiveLow(EhPin::new(Output::new(p.PIN_5, Level::High))),
        config.display.wiring,
    )
    .with_on_threshold(config.display.on_threshold);
    let surface = Surface::new(panel, config.display.rotation);
    info!("Panel initialized, rotation {}", config.display.rotation.degrees());

    // Button to ground
    let button = ButtonInput::new(
        ActiveLow(EhPin::new(Input::new(p.PIN_15, Pull::Up))),
        config.scheduler.debounce_ms,
    );

    // Remote link UART, 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 128]);
    let rx_buf = RX_BUF.init([0u8; 128]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for remote link");

    spawner
        .spawn(tasks::control_task(scheduler, surface, button))
        .unwrap();
    spawner.spawn(tasks::remote_rx_task(rx, directory)).unwrap();
    spawner.spawn(tasks::remote_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Seed for the random plugins
///
/// Microseconds since reset, which varies with flash timing and config
/// parsing. Plenty for visuals.
fn boot_seed() -> u32 {
    let ticks = embassy_time::Instant::now().as_ticks();
    (ticks as u32) ^ 0x9E37_79B9
}
