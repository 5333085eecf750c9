//! LPCOMP driver for the nRF52 family.
//!
//! COMP and LPCOMP share the `COMP_LPCOMP` interrupt, and the vector belongs to the
//! application. Forward it to this driver:
//!
//! ```ignore
//! #[interrupt]
//! fn COMP_LPCOMP() {
//!     lpcomp_gen3::nrf::LPCOMP.on_interrupt();
//! }
//! ```
//!
//! [`LpcompHal::attach_interrupt`] routes that vector to the driver, and
//! [`LpcompHal::detach_interrupt`] stops routing it. While detached, `on_interrupt` does
//! nothing. Detaching leaves the NVIC line as it is, so an `init` refused because COMP owns
//! the peripheral doesn't mask COMP's interrupt. Only [`LpcompHal::uninit`], which releases
//! an LPCOMP this driver set up, masks the line.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use cortex_m::peripheral::NVIC;

use crate::{
    comp::{CompConfig, Detection, Event, EventHandler},
    error::DriverError,
    gpio::{Pin, PinMode, Port},
    pac::{self, Interrupt, lpcomp::RegisterBlock},
    pins::AnalogInput,
    traits::LpcompHal,
    util::HandlerSlot,
};

/// nRF52 NVIC priorities use the top 3 bits.
const NVIC_PRIO_BITS: u8 = 3;

// INTEN bits.
const INT_READY: u32 = 1 << 0;
const INT_DOWN: u32 = 1 << 1;
const INT_UP: u32 = 1 << 2;
const INT_CROSS: u32 = 1 << 3;
const INT_ALL: u32 = INT_READY | INT_DOWN | INT_UP | INT_CROSS;

const SHORT_READY_SAMPLE: u32 = 1 << 0;

#[derive(Clone, Copy, PartialEq)]
#[repr(u8)]
enum DriverState {
    Uninitialized = 0,
    Initialized = 1,
    PoweredOn = 2,
}

/// Clear an event if it's pending and its interrupt is enabled, then report it.
macro_rules! service_event {
    ($self:ident, $regs:ident, $inten:ident, $field:ident, $mask:expr, $event:expr) => {
        if $regs.$field.read().bits() != 0 && $inten & $mask != 0 {
            $regs.$field.write(|w| unsafe { w.bits(0) });
            if let Some(handler) = $self.handler.get() {
                handler($event);
            }
        }
    };
}

/// Driver for the LPCOMP peripheral. Use the [`LPCOMP`] static.
pub struct Nrf52Lpcomp {
    state: AtomicU8,
    attached: AtomicBool,
    handler: HandlerSlot,
}

/// The LPCOMP driver. This is what `Comparator` uses unless another driver is bound.
pub static LPCOMP: Nrf52Lpcomp = Nrf52Lpcomp::new();

impl Nrf52Lpcomp {
    const fn new() -> Self {
        Self {
            state: AtomicU8::new(DriverState::Uninitialized as u8),
            attached: AtomicBool::new(false),
            handler: HandlerSlot::new(),
        }
    }

    fn regs(&self) -> &'static RegisterBlock {
        unsafe { &*pac::LPCOMP::ptr() }
    }

    fn state(&self) -> DriverState {
        match self.state.load(Ordering::Acquire) {
            1 => DriverState::Initialized,
            2 => DriverState::PoweredOn,
            _ => DriverState::Uninitialized,
        }
    }

    fn set_state(&self, state: DriverState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Service the LPCOMP interrupt. Call this from the `COMP_LPCOMP` handler.
    pub fn on_interrupt(&self) {
        if !self.attached.load(Ordering::Acquire) {
            return;
        }
        let regs = self.regs();
        let inten = regs.intenset.read().bits();

        // `init` never enables READY, but clear it so it can't keep the line pending.
        if regs.events_ready.read().bits() != 0 && inten & INT_READY != 0 {
            regs.events_ready.write(|w| unsafe { w.bits(0) });
        }
        service_event!(self, regs, inten, events_down, INT_DOWN, Event::Down);
        service_event!(self, regs, inten, events_up, INT_UP, Event::Up);
        service_event!(self, regs, inten, events_cross, INT_CROSS, Event::Cross);
    }

    fn clear_events(&self) {
        let regs = self.regs();
        regs.events_ready.write(|w| unsafe { w.bits(0) });
        regs.events_down.write(|w| unsafe { w.bits(0) });
        regs.events_up.write(|w| unsafe { w.bits(0) });
        regs.events_cross.write(|w| unsafe { w.bits(0) });
    }
}

impl LpcompHal for Nrf52Lpcomp {
    fn init(&self, config: &CompConfig, handler: EventHandler) -> Result<(), DriverError> {
        if self.state() != DriverState::Uninitialized {
            return Err(DriverError::InvalidState);
        }
        // COMP and LPCOMP share one peripheral instance; only one may be enabled.
        let comp = unsafe { &*pac::COMP::ptr() };
        if comp.enable.read().bits() != 0 {
            return Err(DriverError::Busy);
        }

        self.handler.set(Some(handler));

        let regs = self.regs();
        regs.refsel
            .write(|w| unsafe { w.bits(config.reference.refsel() as u32) });
        if let Some(extref) = config.reference.extrefsel() {
            regs.extrefsel.write(|w| unsafe { w.bits(extref as u32) });
        }
        regs.anadetect
            .write(|w| unsafe { w.bits(config.detection.anadetect() as u32) });
        regs.hyst
            .write(|w| unsafe { w.bits(config.hysteresis as u32) });
        regs.psel
            .write(|w| unsafe { w.bits(config.input.psel() as u32) });
        regs.shorts.write(|w| unsafe { w.bits(SHORT_READY_SAMPLE) });

        let int = match config.detection {
            Detection::Up => INT_UP,
            Detection::Down => INT_DOWN,
            Detection::Cross => INT_CROSS,
        };
        regs.intenclr.write(|w| unsafe { w.bits(INT_ALL) });
        self.clear_events();
        regs.intenset.write(|w| unsafe { w.bits(int) });

        unsafe {
            let mut cp = cortex_m::Peripherals::steal();
            cp.NVIC
                .set_priority(Interrupt::COMP_LPCOMP, config.nvic_priority(NVIC_PRIO_BITS));
            NVIC::unpend(Interrupt::COMP_LPCOMP);
            NVIC::unmask(Interrupt::COMP_LPCOMP);
        }

        self.set_state(DriverState::Initialized);
        Ok(())
    }

    fn enable(&self) {
        let regs = self.regs();
        regs.enable.write(|w| unsafe { w.bits(1) });
        regs.tasks_start.write(|w| unsafe { w.bits(1) });
        self.set_state(DriverState::PoweredOn);
    }

    fn disable(&self) {
        let regs = self.regs();
        regs.tasks_stop.write(|w| unsafe { w.bits(1) });
        regs.enable.write(|w| unsafe { w.bits(0) });
        self.set_state(DriverState::Initialized);
    }

    fn uninit(&self) {
        NVIC::mask(Interrupt::COMP_LPCOMP);
        self.disable();

        let regs = self.regs();
        regs.intenclr.write(|w| unsafe { w.bits(INT_ALL) });
        regs.shorts.write(|w| unsafe { w.bits(0) });
        self.clear_events();

        self.handler.set(None);
        self.set_state(DriverState::Uninitialized);
    }

    fn attach_interrupt(&self) {
        self.attached.store(true, Ordering::Release);
    }

    fn detach_interrupt(&self) {
        self.attached.store(false, Ordering::Release);
    }

    fn configure_analog_input(&self, input: AnalogInput) {
        Pin::new(Port::P0, input.gpio_pin(), PinMode::Analog);
    }
}
