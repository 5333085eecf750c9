// Traits used across the library.

use crate::{
    comp::{CompConfig, EventHandler},
    error::DriverError,
    pins::AnalogInput,
};

/// The hardware side of the comparator: the LPCOMP driver, the routing of its interrupt
/// line, and pin configuration. [`crate::comp::Comparator`] drives it from normal context.
///
/// Implementations are `'static` values, since the comparator holds a `&'static dyn LpcompHal`.
pub trait LpcompHal: Sync {
    /// Configure the peripheral from `config` and arm its interrupt. `handler` must be
    /// called from interrupt context for each event that matches `config.detection`.
    fn init(&self, config: &CompConfig, handler: EventHandler) -> Result<(), DriverError>;

    /// Start generating events.
    fn enable(&self);

    /// Stop generating events, keeping the configuration.
    fn disable(&self);

    /// Disable, disarm the interrupt, and forget the handler.
    fn uninit(&self);

    /// Route the `COMP_LPCOMP` interrupt to this driver.
    fn attach_interrupt(&self);

    /// Stop routing the `COMP_LPCOMP` interrupt to this driver.
    fn detach_interrupt(&self);

    /// Put the pin bonded to `input` in analog mode.
    fn configure_analog_input(&self, input: AnalogInput);
}
