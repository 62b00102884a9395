//! PWM-backed [`ToneChannel`] for one piezo.
//!
//! Each channel owns a whole PWM slice, because divider and `top` (and so
//! the frequency) are per slice. The piezo is wired to output A.

use defmt::*;
use embassy_rp::pwm::{Config, Pwm};
use piezo_midi::{PwmTiming, ToneChannel};

use crate::config::ToneConfig;

pub struct PwmTone {
    pwm: Pwm<'static>,
    config: Config,
    clock_hz: u32,
}

impl PwmTone {
    /// Take ownership of a configured slice. The output is silent until
    /// the pool starts it.
    pub fn new(pwm: Pwm<'static>, tone: &ToneConfig) -> Self {
        let mut config = Config::default();
        config.enable = false;
        config.compare_a = 0;

        Self {
            pwm,
            config,
            clock_hz: tone.clock_hz,
        }
    }
}

impl ToneChannel for PwmTone {
    fn start(&mut self, frequency: u16) {
        match PwmTiming::for_frequency(self.clock_hz, frequency) {
            Ok(timing) => {
                self.config.divider = timing.divider.into();
                self.config.top = timing.top;
                self.config.compare_a = timing.compare;
                self.config.enable = true;
                self.pwm.set_config(&self.config);
            }
            Err(e) => {
                // The pool still records the note so its note-off frees the slot.
                warn!("cannot play {} Hz: {}", frequency, e);
                self.stop();
            }
        }
    }

    fn stop(&mut self) {
        self.config.compare_a = 0;
        self.config.enable = false;
        self.pwm.set_config(&self.config);
    }
}
