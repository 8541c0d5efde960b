//! Melos - Audio Appliance Controller Firmware
//!
//! Main firmware binary for RP2040-based audio appliances. Follows the
//! playback event feed, arbitrates sessions between sources, sequences
//! the amplifier power relays and renders the now-playing panel.
//!
//! Named after the Greek "melos" meaning "song" - the unit this firmware
//! exists to announce.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Duration};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use melos_core::power::Power;
use melos_drivers::{CharacterLcd, GpioSwitch, LcdPins, Polarity};

use crate::tasks::engine::ApplianceLcd;

mod boards;
mod channels;
mod tasks;

// Heap allocator for the unicode decomposition tables used by the
// display text folding
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// The panel is shared with the engine task by static reference
static DISPLAY: StaticCell<ApplianceLcd> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Melos firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Board preset; the GPIO claims below mirror its pin map
    let config = boards::pico_default();
    config.validate().unwrap();
    info!("Board preset validated");

    // Amplifier relays (GPIO14 on, GPIO15 standby). Construction parks
    // the appliance in standby.
    let power_config = config.power.clone().unwrap_or_default();
    let power = Power::new(
        GpioSwitch::new(Output::new(p.PIN_14, Level::Low), Polarity::ActiveHigh),
        GpioSwitch::new(Output::new(p.PIN_15, Level::Low), Polarity::ActiveHigh),
        Duration::from_secs(power_config.standby_duration_secs as u64),
    );
    info!("Power relays parked in standby");

    // Panel bus (GPIO8 RS, GPIO9 E, GPIO10..13 D4..D7)
    let display_config = config.display.clone().unwrap_or_default();
    let pins = LcdPins {
        register_select: Output::new(p.PIN_8, Level::Low),
        enable: Output::new(p.PIN_9, Level::Low),
        data: [
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
            Output::new(p.PIN_13, Level::Low),
        ],
    };
    let display = DISPLAY.init(CharacterLcd::new(pins, Delay, &display_config));
    info!("Display driver wired");

    // Event feed from the network bridge on UART0 (GPIO0 TX, GPIO1 RX)
    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    info!("UART initialized for the event feed");

    // Shutdown button (GPIO22, active low)
    let button = Input::new(p.PIN_22, Pull::Up);

    // Spawn tasks
    spawner.spawn(tasks::transport_task(rx)).unwrap();
    spawner.spawn(tasks::shutdown_task(button)).unwrap();
    spawner
        .spawn(tasks::engine_task(display, power, config))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
