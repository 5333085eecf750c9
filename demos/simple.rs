//! Toggles the D7 LED each time the voltage on A1 crosses half the supply.
//!
//! Run with `--features nrf52840-rt,defmt`.

#![no_main]
#![no_std]

use core::sync::atomic::{AtomicBool, Ordering};

use cortex_m_rt::entry;
use defmt_rtt as _;
use lpcomp_gen3::{
    comp::{Comparator, Event, InterruptMode, ReferenceVoltage},
    gpio::{Pin, PinMode, Port},
    nrf,
    pac::interrupt,
    pins,
};
use panic_probe as _;

// D7 on Gen 3 boards.
const LED_PIN: u8 = 12;

static LED_ON: AtomicBool = AtomicBool::new(false);

/// Runs in the LPCOMP interrupt; keep it short.
fn comparator_callback(event: Event) {
    if event != Event::Cross {
        return;
    }
    let on = !LED_ON.fetch_xor(true, Ordering::Relaxed);
    Pin {
        port: Port::P1,
        pin: LED_PIN,
    }
    .set_state(on);
}

#[entry]
fn main() -> ! {
    Pin::new(Port::P1, LED_PIN, PinMode::Output).set_low();

    if let Err(e) = Comparator::instance()
        .with_reference_voltage(ReferenceVoltage::Ref1V7)
        .with_input(pins::A1)
        .with_interrupt_mode(InterruptMode::Change)
        .with_hysteresis(true)
        .with_event_callback(comparator_callback)
        .init()
    {
        defmt::error!("Comparator init failed: {}", e);
    }

    defmt::println!("Waiting for crossings on A1");

    loop {
        cortex_m::asm::wfi();
    }
}

// COMP and LPCOMP share this vector.
#[interrupt]
fn COMP_LPCOMP() {
    nrf::LPCOMP.on_interrupt();
}
