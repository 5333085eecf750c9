//! Low-power comparator (LPCOMP)
//!
//! The chip has one LPCOMP and one interrupt line for it, so this module exposes a single
//! [`Comparator`]. Get it with [`Comparator::instance`], configure it with the `with_*`
//! methods, then call [`Comparator::init`]:
//!
//! ```ignore
//! Comparator::instance()
//!     .with_reference_voltage(ReferenceVoltage::Ref0V8)
//!     .with_input(pins::A1)
//!     .with_interrupt_mode(InterruptMode::Change)
//!     .with_hysteresis(true)
//!     .with_event_callback(comparator_callback)
//!     .init()?;
//! ```
//!
//! # The event callback runs in interrupt context
//!
//! The callback is called from the `COMP_LPCOMP` interrupt handler, once per crossing that
//! matches the detection mode. It must not block, allocate, lock a mutex, log, or do
//! anything lengthy. Share state with the rest of the program through atomics, and drain
//! counters with a read-and-clear (eg `AtomicU32::swap(0, ..)`) so increments that land
//! between the read and the reset aren't lost.
//!
//! The callback is a plain function pointer, published with a single atomic store. Set it
//! before `init` and leave it in place while the comparator is enabled; it's only removed
//! by [`Comparator::without_event_callback`].

use core::{
    cell::Cell,
    sync::atomic::{AtomicBool, Ordering},
};

use cfg_if::cfg_if;
use critical_section::{CriticalSection, Mutex};

use crate::{
    error::Result,
    pins::{AnalogInput, BoardPin},
    traits::LpcompHal,
    util::HandlerSlot,
};

/// Comparator reference voltage.
///
/// The supply-derived levels are named for a 3.3 V supply; they track VDD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReferenceVoltage {
    /// 1/16 VDD
    Ref0V2,
    /// 1/8 VDD
    Ref0V4,
    /// 3/16 VDD
    Ref0V6,
    /// 2/8 VDD
    Ref0V8,
    /// 5/16 VDD
    Ref1V0,
    /// 3/8 VDD
    Ref1V2,
    /// 7/16 VDD
    Ref1V4,
    /// 4/8 VDD
    Ref1V7,
    /// 9/16 VDD
    Ref1V9,
    /// 5/8 VDD
    Ref2V1,
    /// 11/16 VDD
    Ref2V3,
    /// 6/8 VDD
    Ref2V5,
    /// 13/16 VDD
    Ref2V7,
    /// 7/8 VDD
    Ref2V9,
    /// 15/16 VDD
    Ref3V1,
    /// External reference on A0 (AIN1).
    PinA0,
    /// External reference on A7 (AIN0).
    #[cfg(feature = "som")]
    PinA7,
}

impl ReferenceVoltage {
    /// Value for the `REFSEL` register.
    pub const fn refsel(self) -> u8 {
        match self {
            Self::Ref0V4 => 0,
            Self::Ref0V8 => 1,
            Self::Ref1V2 => 2,
            Self::Ref1V7 => 3,
            Self::Ref2V1 => 4,
            Self::Ref2V5 => 5,
            Self::Ref2V9 => 6,
            Self::PinA0 => 7,
            #[cfg(feature = "som")]
            Self::PinA7 => 7,
            Self::Ref0V2 => 8,
            Self::Ref0V6 => 9,
            Self::Ref1V0 => 10,
            Self::Ref1V4 => 11,
            Self::Ref1V9 => 12,
            Self::Ref2V3 => 13,
            Self::Ref2V7 => 14,
            Self::Ref3V1 => 15,
        }
    }

    /// Value for the `EXTREFSEL` register, for external references only.
    pub const fn extrefsel(self) -> Option<u8> {
        match self {
            Self::PinA0 => Some(1),
            #[cfg(feature = "som")]
            Self::PinA7 => Some(0),
            _ => None,
        }
    }
}

/// Which crossings generate events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Detection {
    /// Both upward and downward crossings. Events don't say which direction it was.
    Cross,
    /// Upward crossings only.
    Up,
    /// Downward crossings only.
    Down,
}

impl Detection {
    /// Value for the `ANADETECT` register.
    pub const fn anadetect(self) -> u8 {
        match self {
            Self::Cross => 0,
            Self::Up => 1,
            Self::Down => 2,
        }
    }

    /// The event kind this mode reports.
    pub const fn event(self) -> Event {
        match self {
            Self::Cross => Event::Cross,
            Self::Up => Event::Up,
            Self::Down => Event::Down,
        }
    }
}

/// Interrupt modes, in the style of `attachInterrupt`. The discriminants are the raw mode
/// codes accepted by `Detection::from(u8)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InterruptMode {
    Change = 0,
    Rising = 1,
    Falling = 2,
}

impl From<u8> for Detection {
    /// Rising and falling select one direction. Everything else, including `Change` and
    /// codes this crate doesn't know, detects both.
    fn from(mode: u8) -> Self {
        match mode {
            m if m == InterruptMode::Rising as u8 => Self::Up,
            m if m == InterruptMode::Falling as u8 => Self::Down,
            _ => Self::Cross,
        }
    }
}

impl From<InterruptMode> for Detection {
    fn from(mode: InterruptMode) -> Self {
        Self::from(mode as u8)
    }
}

/// An event delivered to the callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Up,
    Down,
    Cross,
}

/// Event callback and driver event handler signature.
pub type EventHandler = fn(Event);

/// Lifecycle of the comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Uninitialized,
    /// Initialized, with event generation off.
    Initialized,
    Enabled,
}

/// Lifecycle misuse.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LpcompError {
    /// `init` was called while already initialized. Call `uninit` first.
    AlreadyInitialized,
    /// `enable`, `disable` or `uninit` was called before `init`.
    NotInitialized,
    /// No driver is bound. See [`Comparator::with_hal`].
    NoHal,
}

/// Initial configuration data for the comparator peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompConfig {
    pub reference: ReferenceVoltage,
    pub input: AnalogInput,
    pub detection: Detection,
    /// Adds a ~50 mV hysteresis band.
    pub hysteresis: bool,
    /// NVIC priority of the `COMP_LPCOMP` interrupt.
    pub interrupt_priority: u8,
    /// Enable the comparator as part of `init`.
    pub enable_on_init: bool,
}

impl CompConfig {
    const DEFAULT: Self = Self {
        reference: ReferenceVoltage::Ref1V7,
        input: AnalogInput::Ain0,
        detection: Detection::Down,
        hysteresis: false,
        interrupt_priority: 6,
        enable_on_init: true,
    };

    /// `interrupt_priority` encoded for the NVIC `IPR` register of a core that implements
    /// `prio_bits` priority bits. Out of range priorities are clamped to the lowest urgency.
    pub const fn nvic_priority(&self, prio_bits: u8) -> u8 {
        let max = (1u8 << prio_bits) - 1;
        let priority = if self.interrupt_priority > max {
            max
        } else {
            self.interrupt_priority
        };
        priority << (8 - prio_bits)
    }
}

impl Default for CompConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The LPCOMP controller. There is exactly one; see [`Comparator::instance`].
pub struct Comparator {
    /// Set once the driver has accepted `init`, cleared before it's released. Read by the
    /// interrupt handler, which can't take the critical section.
    armed: AtomicBool,
    callback: HandlerSlot,
    config: Mutex<Cell<CompConfig>>,
    state: Mutex<Cell<State>>,
    hal: Mutex<Cell<Option<&'static dyn LpcompHal>>>,
    /// An input was selected before a driver was bound; its analog mode is set on bind.
    input_pending: Mutex<Cell<bool>>,
}

static COMPARATOR: Comparator = Comparator::new();

impl Comparator {
    const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            callback: HandlerSlot::new(),
            config: Mutex::new(Cell::new(CompConfig::DEFAULT)),
            state: Mutex::new(Cell::new(State::Uninitialized)),
            hal: Mutex::new(Cell::new(None)),
            input_pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Get the comparator. Every call returns the same instance.
    pub fn instance() -> &'static Self {
        &COMPARATOR
    }

    /// Bind the driver used by `init` and the rest of the lifecycle. With a chip feature
    /// enabled, the built-in [`crate::nrf::LPCOMP`] driver is used until this is called.
    ///
    /// Ignored while initialized.
    pub fn with_hal(&self, hal: &'static dyn LpcompHal) -> &Self {
        critical_section::with(|cs| {
            if self.state.borrow(cs).get() != State::Uninitialized {
                warn!("lpcomp: driver can't be rebound while initialized");
                return;
            }
            self.hal.borrow(cs).set(Some(hal));

            let pending = self.input_pending.borrow(cs);
            if pending.get() {
                hal.configure_analog_input(self.config.borrow(cs).get().input);
                pending.set(false);
            }
        });
        self
    }

    /// Select the reference voltage.
    pub fn with_reference_voltage(&self, reference: ReferenceVoltage) -> &Self {
        self.modify_config(|c| c.reference = reference);
        self
    }

    /// Select the analog input, by board pin. This also puts the pin in analog mode.
    ///
    /// Pins without a comparator input select `AIN0`; see [`AnalogInput::from_pin`].
    pub fn with_input(&self, pin: BoardPin) -> &Self {
        let input = AnalogInput::from_pin(pin);
        self.modify_config(|c| c.input = input);
        self.route_input(input);
        self
    }

    /// Set which crossings generate events. Takes an [`InterruptMode`], a raw mode code, or
    /// a [`Detection`].
    pub fn with_interrupt_mode(&self, mode: impl Into<Detection>) -> &Self {
        let detection = mode.into();
        self.modify_config(|c| c.detection = detection);
        self
    }

    /// Enable 50 mV hysteresis. Default is disabled.
    pub fn with_hysteresis(&self, enable: bool) -> &Self {
        self.modify_config(|c| c.hysteresis = enable);
        self
    }

    /// Set the interrupt priority. Default is 6.
    pub fn with_interrupt_priority(&self, priority: u8) -> &Self {
        self.modify_config(|c| c.interrupt_priority = priority);
        self
    }

    /// Whether `init` also enables the comparator. Default is true.
    pub fn with_enable_on_init(&self, enable: bool) -> &Self {
        self.modify_config(|c| c.enable_on_init = enable);
        self
    }

    /// Replace the whole configuration. Puts the configured input's pin in analog mode.
    pub fn with_config(&self, config: CompConfig) -> &Self {
        self.modify_config(|c| *c = config);
        self.route_input(config.input);
        self
    }

    /// Set the function called for each event. See the module docs: this runs in interrupt
    /// context.
    pub fn with_event_callback(&self, callback: EventHandler) -> &Self {
        self.callback.set(Some(callback));
        self
    }

    /// Remove the event callback. Events are dropped until a new one is set.
    pub fn without_event_callback(&self) -> &Self {
        self.callback.set(None);
        self
    }

    /// The current configuration. Changes made after `init` take effect on the next `init`.
    pub fn config(&self) -> CompConfig {
        critical_section::with(|cs| self.config.borrow(cs).get())
    }

    pub fn state(&self) -> State {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == State::Enabled
    }

    /// Initialize the comparator with a snapshot of the current configuration, and enable it
    /// unless `with_enable_on_init(false)` was set.
    ///
    /// If the driver refuses, the comparator stays uninitialized, with its interrupt detached.
    pub fn init(&self) -> Result<()> {
        critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            if state.get() != State::Uninitialized {
                warn!("lpcomp: init while already initialized");
                return Err(LpcompError::AlreadyInitialized.into());
            }
            let hal = self.hal_in(cs).ok_or(LpcompError::NoHal)?;
            let config = self.config.borrow(cs).get();

            // The interrupt line is routed to the driver before the driver arms it.
            hal.attach_interrupt();

            if let Err(e) = hal.init(&config, Self::event_handler) {
                hal.detach_interrupt();
                warn!("lpcomp: driver init failed: {}", e);
                return Err(e.into());
            }
            self.armed.store(true, Ordering::Release);
            state.set(State::Initialized);
            debug!("lpcomp: initialized: {}", config);

            if config.enable_on_init {
                hal.enable();
                state.set(State::Enabled);
                trace!("lpcomp: enabled");
            }
            Ok(())
        })
    }

    /// Enable the comparator's events. Calling this while enabled has no further effect.
    pub fn enable(&self) -> Result<()> {
        critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            if state.get() == State::Uninitialized {
                return Err(LpcompError::NotInitialized.into());
            }
            let hal = self.hal_in(cs).ok_or(LpcompError::NoHal)?;

            hal.enable();
            state.set(State::Enabled);
            trace!("lpcomp: enabled");
            Ok(())
        })
    }

    /// Stop generating events, without releasing the peripheral.
    pub fn disable(&self) -> Result<()> {
        critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            match state.get() {
                State::Uninitialized => Err(LpcompError::NotInitialized.into()),
                State::Initialized => Ok(()),
                State::Enabled => {
                    let hal = self.hal_in(cs).ok_or(LpcompError::NoHal)?;
                    hal.disable();
                    state.set(State::Initialized);
                    trace!("lpcomp: disabled");
                    Ok(())
                }
            }
        })
    }

    /// Disable the comparator, release it, and detach its interrupt.
    pub fn uninit(&self) -> Result<()> {
        critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            if state.get() == State::Uninitialized {
                return Err(LpcompError::NotInitialized.into());
            }
            let hal = self.hal_in(cs).ok_or(LpcompError::NoHal)?;

            self.armed.store(false, Ordering::Release);
            hal.uninit();
            hal.detach_interrupt();
            state.set(State::Uninitialized);
            debug!("lpcomp: uninitialized");
            Ok(())
        })
    }

    /// Passed to the driver's `init`; called from the `COMP_LPCOMP` interrupt.
    ///
    /// Events are dropped if the comparator isn't initialized (eg one left pending across
    /// `uninit`) or there's no callback. The event kind is passed through unchanged;
    /// filtering by direction is the driver's job.
    fn event_handler(event: Event) {
        let comparator = &COMPARATOR;
        if !comparator.armed.load(Ordering::Acquire) {
            return;
        }
        if let Some(callback) = comparator.callback.get() {
            callback(event);
        }
    }

    fn modify_config(&self, f: impl FnOnce(&mut CompConfig)) {
        critical_section::with(|cs| {
            let cell = self.config.borrow(cs);
            let mut config = cell.get();
            f(&mut config);
            cell.set(config);
        });
    }

    fn route_input(&self, input: AnalogInput) {
        critical_section::with(|cs| {
            let pending = self.input_pending.borrow(cs);
            match self.hal_in(cs) {
                Some(hal) => {
                    hal.configure_analog_input(input);
                    pending.set(false);
                }
                None => pending.set(true),
            }
        });
    }

    fn hal_in(&self, cs: CriticalSection) -> Option<&'static dyn LpcompHal> {
        self.hal.borrow(cs).get().or_else(default_hal)
    }
}

cfg_if! {
    if #[cfg(nrf52)] {
        fn default_hal() -> Option<&'static dyn LpcompHal> {
            Some(&crate::nrf::LPCOMP)
        }
    } else {
        fn default_hal() -> Option<&'static dyn LpcompHal> {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_modes_resolve_to_detection() {
        assert_eq!(Detection::from(InterruptMode::Rising), Detection::Up);
        assert_eq!(Detection::from(InterruptMode::Falling), Detection::Down);
        assert_eq!(Detection::from(InterruptMode::Change), Detection::Cross);
    }

    #[test]
    fn unknown_mode_codes_detect_both_directions() {
        for code in [3u8, 4, 0x7f, u8::MAX] {
            assert_eq!(Detection::from(code), Detection::Cross);
        }
    }

    #[test]
    fn detection_reports_matching_event() {
        assert_eq!(Detection::Up.event(), Event::Up);
        assert_eq!(Detection::Down.event(), Event::Down);
        assert_eq!(Detection::Cross.event(), Event::Cross);
    }

    #[test]
    fn reference_register_values() {
        assert_eq!(ReferenceVoltage::Ref0V4.refsel(), 0);
        assert_eq!(ReferenceVoltage::Ref2V9.refsel(), 6);
        assert_eq!(ReferenceVoltage::Ref0V2.refsel(), 8);
        assert_eq!(ReferenceVoltage::Ref3V1.refsel(), 15);
        assert_eq!(ReferenceVoltage::PinA0.refsel(), 7);
        assert_eq!(ReferenceVoltage::PinA0.extrefsel(), Some(1));
        assert_eq!(ReferenceVoltage::Ref1V7.extrefsel(), None);
    }

    #[test]
    fn detection_register_values() {
        assert_eq!(Detection::Cross.anadetect(), 0);
        assert_eq!(Detection::Up.anadetect(), 1);
        assert_eq!(Detection::Down.anadetect(), 2);
    }

    #[test]
    fn nvic_priority_uses_top_bits_and_clamps() {
        let with_priority = |interrupt_priority| CompConfig {
            interrupt_priority,
            ..CompConfig::default()
        };
        // nRF52: 3 priority bits.
        assert_eq!(with_priority(0).nvic_priority(3), 0);
        assert_eq!(with_priority(6).nvic_priority(3), 6 << 5);
        assert_eq!(with_priority(7).nvic_priority(3), 0xE0);
        assert_eq!(with_priority(8).nvic_priority(3), 0xE0);
        assert_eq!(with_priority(u8::MAX).nvic_priority(3), 0xE0);
    }

    #[test]
    fn defaults() {
        let config = CompConfig::default();
        assert_eq!(config.reference, ReferenceVoltage::Ref1V7);
        assert_eq!(config.input, AnalogInput::Ain0);
        assert_eq!(config.detection, Detection::Down);
        assert!(!config.hysteresis);
        assert_eq!(config.interrupt_priority, 6);
        assert!(config.enable_on_init);
    }
}
