//! N64-side button slots and their mapping onto adapter inputs.

use std::collections::{BTreeMap, HashMap};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::input::logical::LogicalInput;

/// Nameable N64-side buttons a mapping covers.
pub const N64_BUTTON_COUNT: usize = 14;

/// One N64-side button slot.
///
/// The `key` string of each slot is the stable identifier used in
/// persisted profiles; the variant set is closed by the N64 controller
/// topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum N64Button {
    A,
    B,
    Start,
    Z,
    L,
    R,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    CUp,
    CDown,
    CLeft,
    CRight,
}

impl N64Button {
    pub const ALL: [N64Button; N64_BUTTON_COUNT] = [
        N64Button::A,
        N64Button::B,
        N64Button::Start,
        N64Button::Z,
        N64Button::L,
        N64Button::R,
        N64Button::DpadUp,
        N64Button::DpadDown,
        N64Button::DpadLeft,
        N64Button::DpadRight,
        N64Button::CUp,
        N64Button::CDown,
        N64Button::CLeft,
        N64Button::CRight,
    ];

    /// Stable identifier used as the persistence key for this slot.
    pub fn key(self) -> &'static str {
        match self {
            N64Button::A => "a",
            N64Button::B => "b",
            N64Button::Start => "start",
            N64Button::Z => "z",
            N64Button::L => "l",
            N64Button::R => "r",
            N64Button::DpadUp => "dpad_up",
            N64Button::DpadDown => "dpad_down",
            N64Button::DpadLeft => "dpad_left",
            N64Button::DpadRight => "dpad_right",
            N64Button::CUp => "c_up",
            N64Button::CDown => "c_down",
            N64Button::CLeft => "c_left",
            N64Button::CRight => "c_right",
        }
    }

    /// Inverse of [`key`](Self::key), case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|button| button.key().eq_ignore_ascii_case(key))
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            N64Button::A => "A",
            N64Button::B => "B",
            N64Button::Start => "Start",
            N64Button::Z => "Z",
            N64Button::L => "L",
            N64Button::R => "R",
            N64Button::DpadUp => "D-Pad Up",
            N64Button::DpadDown => "D-Pad Down",
            N64Button::DpadLeft => "D-Pad Left",
            N64Button::DpadRight => "D-Pad Right",
            N64Button::CUp => "C-Up",
            N64Button::CDown => "C-Down",
            N64Button::CLeft => "C-Left",
            N64Button::CRight => "C-Right",
        }
    }

    /// The adapter input this slot is paired with out of the box. L and R
    /// ride on the analog triggers; everything else pairs 1:1.
    pub fn default_input(self) -> LogicalInput {
        match self {
            N64Button::A => LogicalInput::A,
            N64Button::B => LogicalInput::B,
            N64Button::Start => LogicalInput::Start,
            N64Button::Z => LogicalInput::Z,
            N64Button::L => LogicalInput::LeftTrigger,
            N64Button::R => LogicalInput::RightTrigger,
            N64Button::DpadUp => LogicalInput::DpadUp,
            N64Button::DpadDown => LogicalInput::DpadDown,
            N64Button::DpadLeft => LogicalInput::DpadLeft,
            N64Button::DpadRight => LogicalInput::DpadRight,
            N64Button::CUp => LogicalInput::CStickUp,
            N64Button::CDown => LogicalInput::CStickDown,
            N64Button::CLeft => LogicalInput::CStickLeft,
            N64Button::CRight => LogicalInput::CStickRight,
        }
    }
}

impl std::fmt::Display for N64Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Mapping of every N64 button slot onto at most one adapter input.
///
/// Keyed by the button enumeration so a slot cannot be forgotten when the
/// set grows; an absent entry is a cleared slot. Persisted as a table of
/// slot key to input name, cleared slots omitted.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonMapping {
    slots: HashMap<N64Button, LogicalInput>,
}

impl Default for ButtonMapping {
    fn default() -> Self {
        let mut slots = HashMap::with_capacity(N64_BUTTON_COUNT);
        for button in N64Button::ALL {
            slots.insert(button, button.default_input());
        }
        Self { slots }
    }
}

impl ButtonMapping {
    /// The adapter input bound to `button`, if any.
    pub fn get(&self, button: N64Button) -> Option<LogicalInput> {
        self.slots.get(&button).copied()
    }

    /// Bind `input` to `button`, clearing it from any other slot so no
    /// two slots listen to the same physical input. Returns the slots
    /// that were cleared.
    pub fn assign(&mut self, button: N64Button, input: LogicalInput) -> Vec<N64Button> {
        let displaced: Vec<N64Button> = self
            .slots
            .iter()
            .filter(|&(&slot, &bound)| slot != button && bound == input)
            .map(|(&slot, _)| slot)
            .collect();
        for slot in &displaced {
            self.slots.remove(slot);
        }

        self.slots.insert(button, input);
        displaced
    }

    /// Clear `button`, returning the input it was bound to.
    pub fn clear(&mut self, button: N64Button) -> Option<LogicalInput> {
        self.slots.remove(&button)
    }

    /// Every slot with its binding, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (N64Button, Option<LogicalInput>)> + '_ {
        N64Button::ALL
            .into_iter()
            .map(move |button| (button, self.get(button)))
    }
}

impl Serialize for ButtonMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for button in N64Button::ALL {
            if let Some(input) = self.get(button) {
                map.serialize_entry(button.key(), &input)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ButtonMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, LogicalInput>::deserialize(deserializer)?;

        let mut slots = HashMap::with_capacity(entries.len());
        for (key, input) in entries {
            let button = N64Button::from_key(&key)
                .ok_or_else(|| D::Error::custom(format!("unknown button slot {key:?}")))?;
            slots.insert(button, input);
        }
        Ok(Self { slots })
    }
}
