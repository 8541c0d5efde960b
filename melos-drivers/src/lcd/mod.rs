//! HD44780 character display driver on a 4-bit parallel bus.
//!
//! The panel is wired write-only (R/W tied low), so the busy flag cannot
//! be polled and every instruction is followed by a fixed settle wait
//! instead. All waits are lower bounds from the controller datasheet with
//! margin on top; correctness only requires never going under them.
//!
//! Bus topology:
//!
//! ```text
//!             register_select ----> RS
//!             enable ------------> E      (latches on the falling edge)
//!             data[0..4] -------> D4..D7  (high nibble first)
//! ```
//!
//! Public operations serialize on an internal mutex. One logical operation
//! (init, clear, a full text render) holds the bus for its whole duration,
//! so concurrent callers can never interleave half-written frames.

pub mod text;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use melos_core::config::{DisplayConfig, FontHeight};
use melos_core::traits::{DisplayError, NowPlayingDisplay};
use melos_protocol::Song;

pub use text::Align;

// HD44780 instruction set, 4-bit bus
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_ADDRESS: u8 = 0x80;
const FLAG_TWO_LINES: u8 = 0x08;
const FLAG_FONT_5X10: u8 = 0x04;

/// Function-set nibble repeated while the controller may still be in
/// 8-bit mode.
const WAKE: u8 = 0x3;
/// Nibble that moves transfers to 4-bit mode.
const SET_4BIT: u8 = 0x2;

// Settle waits, all above the datasheet minimums. There is no busy-flag
// readback on a write-only bus, so these are the only pacing we have.
const WAKE_FIRST_SETTLE_US: u32 = 5_000;
const WAKE_SECOND_SETTLE_US: u32 = 110;
const COMMAND_SETTLE_US: u32 = 100;
const CLEAR_SETTLE_US: u32 = 2_000;
const CHAR_SETTLE_US: u32 = 1;
const ENABLE_PULSE_NS: u32 = 1_000;

fn bus_fault<E>(_: E) -> DisplayError {
    DisplayError::Bus
}

/// GPIO lines of the 4-bit bus.
///
/// `data[0]` is D4 (nibble bit 0) through `data[3]` as D7.
pub struct LcdPins<P> {
    pub register_select: P,
    pub enable: P,
    pub data: [P; 4],
}

/// Pins plus pacing, guarded by the driver mutex.
struct Bus<P, D> {
    pins: LcdPins<P>,
    delay: D,
    ready: bool,
}

impl<P: OutputPin, D: DelayNs> Bus<P, D> {
    /// Puts a nibble on the data lines and latches it with an enable pulse.
    async fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.pins.data.iter_mut().enumerate() {
            if (nibble >> bit) & 1 == 1 {
                pin.set_high()
            } else {
                pin.set_low()
            }
            .map_err(bus_fault)?;
        }
        self.pins.enable.set_high().map_err(bus_fault)?;
        self.delay.delay_ns(ENABLE_PULSE_NS).await;
        self.pins.enable.set_low().map_err(bus_fault)?;
        Ok(())
    }

    /// Sends a full byte, high nibble first, then waits out its settle time.
    async fn write_byte(&mut self, byte: u8, is_cmd: bool, settle_us: u32) -> Result<(), DisplayError> {
        if is_cmd {
            self.pins.register_select.set_low()
        } else {
            self.pins.register_select.set_high()
        }
        .map_err(bus_fault)?;
        self.write_nibble(byte >> 4).await?;
        self.write_nibble(byte & 0x0F).await?;
        self.delay.delay_us(settle_us).await;
        Ok(())
    }

    async fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_byte(byte, true, COMMAND_SETTLE_US).await
    }

    async fn character(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_byte(byte, false, CHAR_SETTLE_US).await
    }

    async fn clear_screen(&mut self) -> Result<(), DisplayError> {
        self.write_byte(CMD_CLEAR, true, CLEAR_SETTLE_US).await
    }

    /// Datasheet power-on dance: the function-set nibble three times with
    /// decreasing waits, then the switch to 4-bit transfers.
    async fn wake(&mut self) -> Result<(), DisplayError> {
        self.pins.register_select.set_low().map_err(bus_fault)?;
        self.write_nibble(WAKE).await?;
        self.delay.delay_us(WAKE_FIRST_SETTLE_US).await;
        self.write_nibble(WAKE).await?;
        self.delay.delay_us(WAKE_SECOND_SETTLE_US).await;
        self.write_nibble(WAKE).await?;
        self.delay.delay_us(COMMAND_SETTLE_US).await;
        self.write_nibble(SET_4BIT).await?;
        self.delay.delay_us(COMMAND_SETTLE_US).await;
        Ok(())
    }

    /// Moves the cursor to `address` and writes one fitted line.
    async fn render_line(&mut self, address: u8, line: &str) -> Result<(), DisplayError> {
        self.command(CMD_SET_ADDRESS | address).await?;
        for &byte in line.as_bytes() {
            self.character(byte).await?;
        }
        Ok(())
    }

    /// Drives every line low so a stopped panel sits in a quiet state.
    fn park(&mut self) -> Result<(), DisplayError> {
        self.pins.register_select.set_low().map_err(bus_fault)?;
        self.pins.enable.set_low().map_err(bus_fault)?;
        for pin in self.pins.data.iter_mut() {
            pin.set_low().map_err(bus_fault)?;
        }
        Ok(())
    }
}

/// HD44780 panel behind an async bus lock.
pub struct CharacterLcd<M: RawMutex, P, D> {
    width: usize,
    lines: usize,
    font: FontHeight,
    /// DDRAM base address of each panel line.
    addresses: [u8; 4],
    bus: Mutex<M, Bus<P, D>>,
}

impl<M: RawMutex, P: OutputPin, D: DelayNs> CharacterLcd<M, P, D> {
    /// Wires up the driver. The controller itself stays untouched until
    /// [`NowPlayingDisplay::init`] runs.
    pub fn new(pins: LcdPins<P>, delay: D, config: &DisplayConfig) -> Self {
        Self {
            width: config.width as usize,
            lines: config.lines as usize,
            font: config.font,
            addresses: [0x00, 0x40, config.width, 0x40 + config.width],
            bus: Mutex::new(Bus {
                pins,
                delay,
                ready: false,
            }),
        }
    }

    /// Renders an arbitrary newline-separated message.
    ///
    /// Same fold-and-fit path as the now-playing render. Lines past the
    /// panel's count are dropped, missing ones come out blank.
    pub async fn display_message(&self, message: &str, align: Align) -> Result<(), DisplayError> {
        let mut bus = self.bus.lock().await;
        if !bus.ready {
            return Err(DisplayError::NotReady);
        }
        let mut parts = message.split('\n');
        for index in 0..self.lines {
            let line = text::fit(parts.next().unwrap_or(""), self.width, align);
            bus.render_line(self.addresses[index], &line).await?;
        }
        Ok(())
    }

    /// Which song field lands on which panel line.
    fn line_source<'s>(&self, song: &'s Song, index: usize) -> &'s str {
        match (self.lines, index) {
            (1, 0) => &song.title,
            (2, 0) => &song.artist,
            (2, 1) => &song.title,
            (_, 0) => &song.artist,
            (_, 1) => &song.album,
            (_, 2) => &song.title,
            _ => "",
        }
    }
}

impl<M: RawMutex, P: OutputPin, D: DelayNs> NowPlayingDisplay for CharacterLcd<M, P, D> {
    async fn init(&self) -> Result<(), DisplayError> {
        let mut bus = self.bus.lock().await;
        if bus.ready {
            return Ok(());
        }
        bus.wake().await?;
        let mut function = CMD_FUNCTION_SET;
        if self.lines > 1 {
            function |= FLAG_TWO_LINES;
        }
        if self.font == FontHeight::Dots10 {
            function |= FLAG_FONT_5X10;
        }
        bus.command(function).await?;
        bus.command(CMD_DISPLAY_ON).await?;
        bus.command(CMD_ENTRY_MODE).await?;
        bus.clear_screen().await?;
        bus.ready = true;
        Ok(())
    }

    async fn clear(&self) -> Result<(), DisplayError> {
        let mut bus = self.bus.lock().await;
        if !bus.ready {
            return Err(DisplayError::NotReady);
        }
        bus.clear_screen().await
    }

    async fn display_now_playing(&self, song: &Song) -> Result<(), DisplayError> {
        let mut bus = self.bus.lock().await;
        if !bus.ready {
            return Err(DisplayError::NotReady);
        }
        for index in 0..self.lines {
            let line = text::fit(self.line_source(song, index), self.width, Align::Center);
            bus.render_line(self.addresses[index], &line).await?;
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), DisplayError> {
        let mut bus = self.bus.lock().await;
        if !bus.ready {
            return Ok(());
        }
        bus.clear_screen().await?;
        bus.park()?;
        bus.ready = false;
        Ok(())
    }
}
