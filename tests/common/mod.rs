//! A mock LPCOMP driver, and setup shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use lpcomp_gen3::{
    comp::{CompConfig, Comparator, Event, EventHandler},
    error::DriverError,
    pins::AnalogInput,
    traits::LpcompHal,
};

/// A driver call, in the order the mock saw them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Init,
    Enable,
    Disable,
    Uninit,
    Attach,
    Detach,
    Analog(AnalogInput),
}

struct Inner {
    calls: Vec<Call>,
    config: Option<CompConfig>,
    handler: Option<EventHandler>,
    /// The handler from the last successful `init`, kept across `uninit`.
    last_handler: Option<EventHandler>,
    initialized: bool,
    enabled: bool,
    attached: bool,
    fail_init: Option<DriverError>,
}

impl Inner {
    const fn new() -> Self {
        Self {
            calls: Vec::new(),
            config: None,
            handler: None,
            last_handler: None,
            initialized: false,
            enabled: false,
            attached: false,
            fail_init: None,
        }
    }
}

/// Behaves like the hardware plus vendor driver: events only reach the handler while the
/// vector is attached, the peripheral is enabled, and the event matches the detection mode.
pub struct MockLpcomp {
    inner: Mutex<Inner>,
}

pub static MOCK: MockLpcomp = MockLpcomp::new();

impl MockLpcomp {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        *self.lock() = Inner::new();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    /// The configuration passed to the last successful `init`.
    pub fn config(&self) -> Option<CompConfig> {
        self.lock().config
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    pub fn fail_next_init(&self, error: DriverError) {
        self.lock().fail_init = Some(error);
    }

    /// Simulate the comparator seeing `event`. Returns whether the handler was called.
    pub fn raise(&self, event: Event) -> bool {
        let handler = {
            let inner = self.lock();
            let matches = inner.config.map(|c| c.detection.event()) == Some(event);
            if !(inner.attached && inner.enabled && matches) {
                return false;
            }
            inner.handler
        };
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Call the handler passed to `init` directly, as the driver's ISR does, with no
    /// filtering.
    pub fn deliver(&self, event: Event) {
        let handler = self.lock().handler;
        if let Some(handler) = handler {
            handler(event);
        }
    }

    /// Call the handler from the last `init` even if the driver has been released since, like
    /// an interrupt that was already pending when `uninit` ran.
    pub fn deliver_late(&self, event: Event) {
        let handler = self.lock().last_handler;
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

impl LpcompHal for MockLpcomp {
    fn init(&self, config: &CompConfig, handler: EventHandler) -> Result<(), DriverError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Init);
        if inner.initialized {
            return Err(DriverError::InvalidState);
        }
        if let Some(error) = inner.fail_init.take() {
            return Err(error);
        }
        inner.config = Some(*config);
        inner.handler = Some(handler);
        inner.last_handler = Some(handler);
        inner.initialized = true;
        Ok(())
    }

    fn enable(&self) {
        let mut inner = self.lock();
        inner.calls.push(Call::Enable);
        inner.enabled = inner.initialized;
    }

    fn disable(&self) {
        let mut inner = self.lock();
        inner.calls.push(Call::Disable);
        inner.enabled = false;
    }

    fn uninit(&self) {
        let mut inner = self.lock();
        inner.calls.push(Call::Uninit);
        inner.enabled = false;
        inner.initialized = false;
        inner.handler = None;
    }

    fn attach_interrupt(&self) {
        let mut inner = self.lock();
        inner.calls.push(Call::Attach);
        inner.attached = true;
    }

    fn detach_interrupt(&self) {
        let mut inner = self.lock();
        inner.calls.push(Call::Detach);
        inner.attached = false;
    }

    fn configure_analog_input(&self, input: AnalogInput) {
        self.lock().calls.push(Call::Analog(input));
    }
}

static TEST_LOCK: Mutex<()> = Mutex::new(());

/// The comparator is a process-wide singleton, so tests that use it take this lock. Returns
/// with the comparator uninitialized, on default config, with no callback, bound to [`MOCK`],
/// and the mock's call log cleared.
pub fn setup() -> MutexGuard<'static, ()> {
    let guard = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let comparator = Comparator::instance();
    let _ = comparator.uninit();
    comparator
        .without_event_callback()
        .with_hal(&MOCK)
        .with_config(CompConfig::default());
    MOCK.reset();

    guard
}
