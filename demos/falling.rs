//! Counts downward crossings of half the supply on A1, and reports the count at most once
//! a second. The count is drained with a swap, so crossings that land while it's
//! being read are kept for the next report.
//!
//! Run with `--features nrf52840-rt,defmt`.

#![no_main]
#![no_std]

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::delay::Delay;
use cortex_m_rt::entry;
use defmt_rtt as _;
use lpcomp_gen3::{
    comp::{Comparator, Event, InterruptMode, ReferenceVoltage},
    nrf,
    pac::interrupt,
    pins,
};
use panic_probe as _;

const SYSCLK_HZ: u32 = 64_000_000;

static FALLING_EDGES: AtomicU32 = AtomicU32::new(0);

fn on_falling(_: Event) {
    FALLING_EDGES.fetch_add(1, Ordering::Relaxed);
}

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let mut delay = Delay::new(cp.SYST, SYSCLK_HZ);

    let comparator = Comparator::instance();
    comparator
        .with_reference_voltage(ReferenceVoltage::Ref1V7)
        .with_input(pins::A1)
        .with_interrupt_mode(InterruptMode::Falling)
        .with_hysteresis(false)
        .with_event_callback(on_falling);

    match comparator.init() {
        Ok(()) => defmt::info!("LPCOMP running: {}", comparator.config()),
        Err(e) => defmt::panic!("LPCOMP init failed: {}", e),
    }

    loop {
        delay.delay_ms(1_000);
        let edges = FALLING_EDGES.swap(0, Ordering::Relaxed);
        if edges != 0 {
            defmt::info!("Falling edges: {}", edges);
        }
    }
}

#[interrupt]
fn COMP_LPCOMP() {
    nrf::LPCOMP.on_interrupt();
}
