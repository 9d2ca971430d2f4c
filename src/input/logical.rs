//! Named logical inputs of a GameCube controller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One abstract controller input, independent of its physical encoding.
///
/// Declaration order doubles as the detection priority order: when two
/// inputs newly activate in the same poll tick, the one declared first
/// wins. Absence of an input is expressed as `Option::<LogicalInput>::None`
/// rather than a sentinel variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalInput {
    A,
    B,
    X,
    Y,
    Z,
    Start,
    L,
    R,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    LeftTrigger,
    RightTrigger,
    CStickUp,
    CStickDown,
    CStickLeft,
    CStickRight,
}

impl LogicalInput {
    /// Number of logical inputs.
    pub const COUNT: usize = 18;

    /// Every input in detection priority order.
    pub const ALL: [LogicalInput; Self::COUNT] = [
        LogicalInput::A,
        LogicalInput::B,
        LogicalInput::X,
        LogicalInput::Y,
        LogicalInput::Z,
        LogicalInput::Start,
        LogicalInput::L,
        LogicalInput::R,
        LogicalInput::DpadUp,
        LogicalInput::DpadDown,
        LogicalInput::DpadLeft,
        LogicalInput::DpadRight,
        LogicalInput::LeftTrigger,
        LogicalInput::RightTrigger,
        LogicalInput::CStickUp,
        LogicalInput::CStickDown,
        LogicalInput::CStickLeft,
        LogicalInput::CStickRight,
    ];

    /// Display label. Cosmetic only; persistence uses the variant name.
    pub fn label(self) -> &'static str {
        match self {
            LogicalInput::A => "A",
            LogicalInput::B => "B",
            LogicalInput::X => "X",
            LogicalInput::Y => "Y",
            LogicalInput::Z => "Z",
            LogicalInput::Start => "Start",
            LogicalInput::L => "L",
            LogicalInput::R => "R",
            LogicalInput::DpadUp => "D-Pad Up",
            LogicalInput::DpadDown => "D-Pad Down",
            LogicalInput::DpadLeft => "D-Pad Left",
            LogicalInput::DpadRight => "D-Pad Right",
            LogicalInput::LeftTrigger => "L Trigger",
            LogicalInput::RightTrigger => "R Trigger",
            LogicalInput::CStickUp => "C-Stick Up",
            LogicalInput::CStickDown => "C-Stick Down",
            LogicalInput::CStickLeft => "C-Stick Left",
            LogicalInput::CStickRight => "C-Stick Right",
        }
    }
}

impl fmt::Display for LogicalInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_input_once() {
        assert_eq!(LogicalInput::ALL.len(), LogicalInput::COUNT);
        for (i, a) in LogicalInput::ALL.iter().enumerate() {
            for b in &LogicalInput::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn priority_order_starts_with_face_buttons() {
        assert_eq!(LogicalInput::ALL[0], LogicalInput::A);
        assert_eq!(LogicalInput::ALL[1], LogicalInput::B);
        assert_eq!(LogicalInput::ALL[LogicalInput::COUNT - 1], LogicalInput::CStickRight);
    }

    #[test]
    fn labels_are_fixed() {
        assert_eq!(LogicalInput::DpadUp.to_string(), "D-Pad Up");
        assert_eq!(LogicalInput::LeftTrigger.to_string(), "L Trigger");
        assert_eq!(LogicalInput::CStickRight.to_string(), "C-Stick Right");
    }
}
