//! Controller for the nRF52 low-power comparator (LPCOMP).
//!
//! The LPCOMP compares an analog input against a reference and raises an interrupt when the
//! input crosses it. This crate wraps it as a single [`Comparator`]: configure it with a
//! chain of `with_*` calls, `init` it, and get a callback, in interrupt context, for each
//! crossing. See the [`comp`] module for the callback's rules.
//!
//! Select a chip with the `nrf52832`, `nrf52833` or `nrf52840` feature (or its `-rt`
//! variant when building firmware). Without one, the crate builds for the host, and a driver
//! must be bound with [`Comparator::with_hal`].

#![cfg_attr(not(test), no_std)]

#[cfg(any(
    all(feature = "nrf52832", feature = "nrf52833"),
    all(feature = "nrf52832", feature = "nrf52840"),
    all(feature = "nrf52833", feature = "nrf52840"),
))]
compile_error!("Select at most one of the `nrf52832`, `nrf52833` and `nrf52840` features.");

#[cfg(feature = "nrf52832")]
pub use nrf52832_pac as pac;

#[cfg(feature = "nrf52833")]
pub use nrf52833_pac as pac;

#[cfg(feature = "nrf52840")]
pub use nrf52840_pac as pac;

// Must stay first, so its macros are visible to the modules below.
mod fmt;

pub mod comp;
pub mod error;
#[cfg(nrf52)]
pub mod gpio;
#[cfg(nrf52)]
pub mod nrf;
pub mod pins;
pub mod traits;
mod util;

pub use comp::{Comparator, CompConfig, Detection, Event, InterruptMode, ReferenceVoltage};
pub use error::{Error, Result};
