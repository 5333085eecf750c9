//! Common error definitions.

use crate::{comp::LpcompError, pins::PinError};

macro_rules! impl_from_error {
    ($error:ident) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                Self::$error(error)
            }
        }
    };
}

/// Alias for Result<T, Error>.
pub type Result<T> = core::result::Result<T, Error>;

/// Status reported by an LPCOMP driver's `init`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The driver is already initialized.
    InvalidState,
    /// The peripheral instance is in use by COMP, which shares it with LPCOMP.
    Busy,
    /// Any other driver-specific status code.
    Other(u32),
}

impl DriverError {
    /// The numeric status code, using the Nordic SDK's `NRFX_ERROR_*` values.
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidState => 0x0BAD_0005,
            Self::Busy => 0x0BAD_000B,
            Self::Other(code) => *code,
        }
    }
}

/// Collection of all errors that can occur.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The driver refused to initialize.
    DriverError(DriverError),
    /// The call isn't valid in the comparator's current lifecycle state.
    LpcompError(LpcompError),
    /// Pin lookup errors.
    PinError(PinError),
}

impl_from_error!(DriverError);
impl_from_error!(LpcompError);
impl_from_error!(PinError);
