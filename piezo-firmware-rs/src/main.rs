//! piezo-firmware
//!
//! Serial note player for the Raspberry Pi Pico 2. A host program parses a
//! MIDI file and streams note messages over UART0; this firmware decodes
//! them and drives one piezo per sounding note:
//!
//! 1. Bytes arrive on UART0 and are queued in the interrupt-fed RX ring.
//! 2. The player task waits on `fill_buf()`, then copies as many bytes as
//!    fit into the `Player`'s frame buffer and consumes only those.
//! 3. `Player::process()` decodes every complete frame, starts or stops a
//!    PWM slice per note, and compacts the buffer.
//! 4. Identify requests are answered with the 4-byte magic id.
//!
//! No timing happens here: every note sounds as soon as its bytes arrive.

#![no_std]
#![no_main]

mod config;
mod tone;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart, BufferedUartRx, BufferedUartTx};
use embedded_io_async::{BufRead, Write};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use piezo_midi::{PassState, Player, MAGIC_ID};

use config::{ToneConfig, BAUD_RATE, POOL_SIZE, RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use tone::PwmTone;

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the UART0 interrupt to the buffered driver's ring handler.
bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

static RX_BUFFER: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static TX_BUFFER: StaticCell<[u8; TX_BUFFER_SIZE]> = StaticCell::new();

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// The reactive loop. Owns the player, so the frame buffer and channel pool
/// are never shared.
///
/// The only suspension point is `fill_buf()`, which waits until UART data
/// is available. A pass that ends on a partial frame simply waits there
/// for the rest.
#[embassy_executor::task]
async fn player_task(
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
    mut player: Player<PwmTone, POOL_SIZE>,
) {
    info!("Player task started with {} channels", POOL_SIZE);

    loop {
        let pass = player.process();

        if pass.skipped > 0 {
            warn!("Skipped {} unrecognized byte(s)", pass.skipped);
        }
        if let PassState::AwaitingBytes { needed, held } = pass.state {
            trace!("Partial frame: {}/{} bytes", held, needed);
        }

        for _ in 0..pass.identify_requests {
            if let Err(e) = tx.write_all(&MAGIC_ID).await {
                warn!("Identify reply failed: {}", e);
            }
        }

        // Idle until the host sends more.
        match rx.fill_buf().await {
            Ok(bytes) => {
                let taken = player.feed(bytes);
                rx.consume(taken);
            }
            Err(e) => {
                // Overruns and framing errors lose bytes; decoding
                // resynchronises on the next valid tag.
                warn!("UART read error: {}", e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("piezo-firmware starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // UART0 TX → GP0   (p.PIN_0)
    // UART0 RX → GP1   (p.PIN_1)
    // Piezo 0  → GP2   (PWM slice 1, A)
    // Piezo 1  → GP4   (PWM slice 2, A)
    // six-voice only:
    // Piezo 2  → GP6   (PWM slice 3, A)
    // Piezo 3  → GP8   (PWM slice 4, A)
    // Piezo 4  → GP10  (PWM slice 5, A)
    // Piezo 5  → GP12  (PWM slice 6, A)
    // ———————————————————————————————————————————————————————————————————————

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = BAUD_RATE;

    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        TX_BUFFER.init([0; TX_BUFFER_SIZE]),
        RX_BUFFER.init([0; RX_BUFFER_SIZE]),
        uart_config,
    );
    let (tx, rx) = uart.split();
    info!("UART0 at {} baud", BAUD_RATE);

    let tone_config = ToneConfig::default();
    info!("PWM clock: {} Hz", tone_config.clock_hz);

    #[cfg(not(feature = "six-voice"))]
    let channels = [
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, pwm::Config::default()), &tone_config),
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE2, p.PIN_4, pwm::Config::default()), &tone_config),
    ];

    #[cfg(feature = "six-voice")]
    let channels = [
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, pwm::Config::default()), &tone_config),
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE2, p.PIN_4, pwm::Config::default()), &tone_config),
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, pwm::Config::default()), &tone_config),
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, pwm::Config::default()), &tone_config),
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, pwm::Config::default()), &tone_config),
        PwmTone::new(Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, pwm::Config::default()), &tone_config),
    ];

    // Player::new stops every channel, so all piezos start silent.
    let player = Player::new(channels);

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner.spawn(player_task(rx, tx, player)).unwrap();

    info!("All tasks spawned");
}
