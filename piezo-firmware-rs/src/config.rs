//! Deployment configuration: serial link, voice count, PWM clock.
//!
//! Pin and slice assignments live next to the peripheral setup in
//! `main.rs`; everything tunable without touching wiring is here.

/// Serial baud rate. Matches the host player's default.
pub const BAUD_RATE: u32 = 250_000;

/// Size of the UART receive ring, filled from the UART interrupt.
pub const RX_BUFFER_SIZE: usize = 256;

/// Size of the UART transmit ring. Only identify replies are sent.
pub const TX_BUFFER_SIZE: usize = 16;

/// Number of piezo channels in the pool.
#[cfg(not(feature = "six-voice"))]
pub const POOL_SIZE: usize = 2;

/// Number of piezo channels in the pool.
#[cfg(feature = "six-voice")]
pub const POOL_SIZE: usize = 6;

/// PWM clock settings shared by every tone channel.
#[derive(Debug, Clone, Copy)]
pub struct ToneConfig {
    /// Clock feeding the PWM slices, in Hz. On the RP2350 this is
    /// `clk_sys`, 150 MHz after `embassy_rp::init`.
    pub clock_hz: u32,
}

impl Default for ToneConfig {
    /// Reads `clk_sys`, so call it after `embassy_rp::init`.
    fn default() -> Self {
        Self {
            clock_hz: embassy_rp::clocks::clk_sys_freq(),
        }
    }
}
