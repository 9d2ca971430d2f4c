//! Threshold classification and rising-edge detection.
//!
//! Pure functions over one or two [`ControllerSnapshot`] values. Digital
//! buttons pass through untouched; triggers and the C-stick compare their
//! raw value against a normalized threshold scaled into the 8-bit range.

use crate::adapter::report::ControllerSnapshot;
use crate::input::logical::LogicalInput;

/// Scale a normalized `[0, 1]` threshold to the signed 8-bit comparison
/// value, `round(127 * t)`.
///
/// Out-of-range thresholds are clamped; callers are expected to stay in
/// range and get defined-but-saturated behavior when they do not.
fn scaled_threshold(threshold: f64) -> i32 {
    (f64::from(i8::MAX) * threshold.clamp(0.0, 1.0)).round() as i32
}

/// Recenter an unsigned stick axis (center 128) onto the signed 8-bit
/// deflection range.
fn recenter(raw: u8) -> i8 {
    raw.wrapping_sub(128) as i8
}

/// Whether `input` is currently active in `state`.
///
/// Digital inputs read their snapshot field directly. The triggers are
/// active above `round(127 * trigger_threshold)` of raw pressure, so a
/// threshold of 0 fires on any pressure and 1 only near the stop. C-stick
/// directions are active once the recentered axis deflects past
/// `round(127 * c_stick_threshold)` away from center; Up/Down read the Y
/// axis, Left/Right the X axis.
pub fn is_active(
    state: &ControllerSnapshot,
    input: LogicalInput,
    trigger_threshold: f64,
    c_stick_threshold: f64,
) -> bool {
    let trigger_thresh = scaled_threshold(trigger_threshold);
    let c_stick_thresh = scaled_threshold(c_stick_threshold);
    let c_x = i32::from(recenter(state.c_stick_x));
    let c_y = i32::from(recenter(state.c_stick_y));

    match input {
        LogicalInput::A => state.a,
        LogicalInput::B => state.b,
        LogicalInput::X => state.x,
        LogicalInput::Y => state.y,
        LogicalInput::Z => state.z,
        LogicalInput::Start => state.start,
        LogicalInput::L => state.l,
        LogicalInput::R => state.r,
        LogicalInput::DpadUp => state.dpad_up,
        LogicalInput::DpadDown => state.dpad_down,
        LogicalInput::DpadLeft => state.dpad_left,
        LogicalInput::DpadRight => state.dpad_right,
        LogicalInput::LeftTrigger => i32::from(state.left_trigger) > trigger_thresh,
        LogicalInput::RightTrigger => i32::from(state.right_trigger) > trigger_thresh,
        LogicalInput::CStickUp => c_y > c_stick_thresh,
        LogicalInput::CStickDown => c_y < -c_stick_thresh,
        LogicalInput::CStickLeft => c_x < -c_stick_thresh,
        LogicalInput::CStickRight => c_x > c_stick_thresh,
    }
}

/// The first input, in [`LogicalInput::ALL`] priority order, that was
/// inactive in `prev` and is active in `curr`.
///
/// Holding an input that is already past its threshold across both
/// snapshots never re-triggers; only crossing the threshold on this poll
/// does. `None` means nothing newly activated, the steady-state result.
/// When several inputs newly activate in the same tick, only the
/// highest-priority one is reported; lower-priority edges are dropped for
/// that tick.
pub fn detect_rising_edge(
    prev: &ControllerSnapshot,
    curr: &ControllerSnapshot,
    trigger_threshold: f64,
    c_stick_threshold: f64,
) -> Option<LogicalInput> {
    LogicalInput::ALL.iter().copied().find(|&input| {
        !is_active(prev, input, trigger_threshold, c_stick_threshold)
            && is_active(curr, input, trigger_threshold, c_stick_threshold)
    })
}
