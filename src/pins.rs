//! Board pin names, and the LPCOMP input each one is wired to.
//!
//! The comparator's input multiplexer numbers its inputs `AIN0`-`AIN7` in die order,
//! which isn't the order the analog pins are labelled on the board:
//!
//! | Board pin | Input | nRF pin | Notes                                   |
//! |-----------|-------|---------|-----------------------------------------|
//! |           | AIN0  | P0.02   | A7 on SoMs                              |
//! | A0        | AIN1  | P0.03   |                                         |
//! | A1        | AIN2  | P0.04   |                                         |
//! |           | AIN3  | P0.05   | A6 on SoMs, battery sense on other boards |
//! | A2        | AIN4  | P0.28   |                                         |
//! | A3        | AIN5  | P0.29   |                                         |
//! | A4        | AIN6  | P0.30   |                                         |
//! | A5        | AIN7  | P0.31   |                                         |

use paste::paste;

/// A board-level pin number, eg [`A1`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardPin(pub u16);

/// One of the eight analog inputs of the LPCOMP input multiplexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AnalogInput {
    Ain0 = 0,
    Ain1 = 1,
    Ain2 = 2,
    Ain3 = 3,
    Ain4 = 4,
    Ain5 = 5,
    Ain6 = 6,
    Ain7 = 7,
}

/// A board pin that isn't connected to the comparator.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    Unmapped(BoardPin),
}

impl AnalogInput {
    pub const ALL: [Self; 8] = [
        Self::Ain0,
        Self::Ain1,
        Self::Ain2,
        Self::Ain3,
        Self::Ain4,
        Self::Ain5,
        Self::Ain6,
        Self::Ain7,
    ];

    /// Look up the comparator input for a board pin.
    ///
    /// Pins with no comparator input resolve to [`AnalogInput::Ain0`] rather than failing.
    /// Use `AnalogInput::try_from` to reject them instead.
    pub fn from_pin(pin: BoardPin) -> Self {
        Self::try_from(pin).unwrap_or(Self::Ain0)
    }

    /// Value for the `PSEL` register.
    pub const fn psel(self) -> u8 {
        self as u8
    }

    /// The port 0 pin this input is bonded to.
    pub const fn gpio_pin(self) -> u8 {
        match self {
            Self::Ain0 => 2,
            Self::Ain1 => 3,
            Self::Ain2 => 4,
            Self::Ain3 => 5,
            Self::Ain4 => 28,
            Self::Ain5 => 29,
            Self::Ain6 => 30,
            Self::Ain7 => 31,
        }
    }
}

impl TryFrom<BoardPin> for AnalogInput {
    type Error = PinError;

    fn try_from(pin: BoardPin) -> Result<Self, Self::Error> {
        ANALOG_PINS
            .iter()
            .find(|(board, _)| *board == pin)
            .map(|(_, input)| *input)
            .ok_or(PinError::Unmapped(pin))
    }
}

// Defines the `A<n>` constants and the lookup table from a single list, so the two
// can't drift apart.
macro_rules! analog_pins {
    ($($(#[$meta:meta])* ($num:literal, $id:expr, $ain:ident)),+ $(,)?) => {
        paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Analog pin A", stringify!($num), ".")]
                pub const [<A $num>]: BoardPin = BoardPin($id);
            )+

            /// Every analog pin on this board variant, with the comparator input it feeds.
            pub const ANALOG_PINS: &[(BoardPin, AnalogInput)] = &[
                $( $(#[$meta])* ([<A $num>], AnalogInput::$ain), )+
            ];
        }
    };
}

analog_pins! {
    (0, 19, Ain1),
    (1, 18, Ain2),
    (2, 17, Ain4),
    (3, 16, Ain5),
    (4, 15, Ain6),
    (5, 14, Ain7),
    #[cfg(feature = "som")]
    (6, 20, Ain3),
    #[cfg(feature = "som")]
    (7, 21, Ain0),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_pins_map_to_their_inputs() {
        assert_eq!(AnalogInput::from_pin(A0), AnalogInput::Ain1);
        assert_eq!(AnalogInput::from_pin(A1), AnalogInput::Ain2);
        assert_eq!(AnalogInput::from_pin(A2), AnalogInput::Ain4);
        assert_eq!(AnalogInput::from_pin(A3), AnalogInput::Ain5);
        assert_eq!(AnalogInput::from_pin(A4), AnalogInput::Ain6);
        assert_eq!(AnalogInput::from_pin(A5), AnalogInput::Ain7);
    }

    #[cfg(feature = "som")]
    #[test]
    fn som_pins_map_to_their_inputs() {
        assert_eq!(AnalogInput::from_pin(A6), AnalogInput::Ain3);
        assert_eq!(AnalogInput::from_pin(A7), AnalogInput::Ain0);
    }

    #[test]
    fn no_two_pins_share_an_input() {
        for (i, (pin_a, input_a)) in ANALOG_PINS.iter().enumerate() {
            assert!(AnalogInput::ALL.contains(input_a));
            for (pin_b, input_b) in &ANALOG_PINS[i + 1..] {
                assert_ne!(pin_a, pin_b);
                assert_ne!(input_a, input_b);
            }
        }
    }

    #[test]
    fn unmapped_pins_fall_back_to_input_0() {
        // D7, and a number past every board pin.
        for pin in [BoardPin(7), BoardPin(0), BoardPin(u16::MAX)] {
            assert_eq!(AnalogInput::from_pin(pin), AnalogInput::Ain0);
            assert_eq!(AnalogInput::try_from(pin), Err(PinError::Unmapped(pin)));
        }
    }

    #[test]
    fn inputs_are_bonded_to_distinct_gpios() {
        for (i, a) in AnalogInput::ALL.iter().enumerate() {
            assert_eq!(a.psel() as usize, i);
            for b in &AnalogInput::ALL[i + 1..] {
                assert_ne!(a.gpio_pin(), b.gpio_pin());
            }
        }
    }
}
