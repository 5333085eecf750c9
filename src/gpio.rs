//! This module provides the GPIO functionality the comparator needs: putting its input
//! pins in analog mode, and plain outputs that are safe to drive from an interrupt handler.

use crate::pac::{self, p0::RegisterBlock};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Pin modes.
pub enum PinMode {
    Input,
    Output,
    /// Input buffer disconnected, as required for pins used by LPCOMP and SAADC.
    Analog,
}

impl PinMode {
    /// Values for `PIN_CNF`: DIR is bit 0, INPUT (1 = disconnect) is bit 1. Pulls,
    /// drive strength and sense are left at their reset values.
    fn val(&self) -> u32 {
        match self {
            Self::Input => 0b00,
            Self::Output => 0b11,
            Self::Analog => 0b10,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// GPIO port
pub enum Port {
    P0,
    #[cfg(gpio_p1)]
    P1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Represents a single GPIO pin.
pub struct Pin {
    pub port: Port,
    /// Pin number; 0 through 31.
    pub pin: u8,
}

impl Pin {
    /// Create a new pin, with a specific mode.
    pub fn new(port: Port, pin: u8, mode: PinMode) -> Self {
        assert!(pin < 32, "Pin must be 0 - 31.");

        let mut result = Self { port, pin };
        result.mode(mode);

        result
    }

    fn regs(&self) -> &'static RegisterBlock {
        match self.port {
            Port::P0 => unsafe { &*pac::P0::ptr() },
            #[cfg(gpio_p1)]
            Port::P1 => unsafe { &*pac::P1::ptr() },
        }
    }

    /// Set pin mode.
    pub fn mode(&mut self, value: PinMode) {
        self.regs().pin_cnf[self.pin as usize].write(|w| unsafe { w.bits(value.val()) });
    }

    /// Check if the pin's input voltage is high.
    pub fn is_high(&self) -> bool {
        self.regs().in_.read().bits() & (1 << self.pin) != 0
    }

    /// Check if the pin's input voltage is low.
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }

    // OUTSET and OUTCLR only act on the bits written, so these need no read-modify-write
    // and can be used from interrupt handlers.

    /// Set the pin's output voltage to high.
    pub fn set_high(&self) {
        self.regs().outset.write(|w| unsafe { w.bits(1 << self.pin) });
    }

    /// Set the pin's output voltage to low.
    pub fn set_low(&self) {
        self.regs().outclr.write(|w| unsafe { w.bits(1 << self.pin) });
    }

    /// Set the pin's output voltage.
    pub fn set_state(&self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}
