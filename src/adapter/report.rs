//! Wire format of one adapter transfer and the per-controller snapshot.
//!
//! The adapter delivers its state in a single USB interrupt transfer:
//! a report id byte followed by four fixed-width controller blocks. Each
//! block is decoded field by field into [`ControllerSnapshot`]; no layout
//! tricks, every bit is pulled out explicitly.

/// Bytes in one per-controller report block.
pub const CONTROLLER_REPORT_LEN: usize = 9;

/// Controller ports on the adapter.
pub const PORT_COUNT: usize = 4;

/// Bytes in one full adapter transfer: report id + four controller blocks.
pub const ADAPTER_FRAME_LEN: usize = 1 + PORT_COUNT * CONTROLLER_REPORT_LEN;

/// Report id the adapter prefixes every state transfer with.
pub const FRAME_REPORT_ID: u8 = 0x21;

// Controller type bits of the status byte (wired / wireless).
const STATUS_TYPE_MASK: u8 = 0x30;

/// Point-in-time state of one controller port.
///
/// A snapshot is immutable once decoded; polling produces a fresh value
/// every tick and the caller swaps it for the previous one.
///
/// Sticks are unsigned with center at 128. The C-stick is carried in the
/// `c_stick_*` axes and is recentered to a signed range by the input
/// classifier, not here. Triggers run 0 (released) to 255.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// Adapter/controller status byte, opaque to input classification.
    pub status: u8,

    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub dpad_down: bool,
    pub dpad_up: bool,

    pub start: bool,
    pub z: bool,
    pub r: bool,
    pub l: bool,

    pub left_stick_x: u8,
    pub left_stick_y: u8,
    pub c_stick_x: u8,
    pub c_stick_y: u8,

    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl ControllerSnapshot {
    /// Decode one controller block.
    ///
    /// Byte 0 is the status byte. Byte 1 carries A, B, X, Y, D-pad
    /// Left/Right/Down/Up in bits 0..=7; byte 2 carries Start, Z, R, L in
    /// bits 0..=3 (4..=7 reserved). Bytes 3..=8 are left stick X/Y,
    /// C-stick X/Y and the two analog triggers.
    pub fn from_report(raw: &[u8; CONTROLLER_REPORT_LEN]) -> Self {
        Self {
            status: raw[0],

            a: raw[1] & 0x01 != 0,
            b: raw[1] & 0x02 != 0,
            x: raw[1] & 0x04 != 0,
            y: raw[1] & 0x08 != 0,
            dpad_left: raw[1] & 0x10 != 0,
            dpad_right: raw[1] & 0x20 != 0,
            dpad_down: raw[1] & 0x40 != 0,
            dpad_up: raw[1] & 0x80 != 0,

            start: raw[2] & 0x01 != 0,
            z: raw[2] & 0x02 != 0,
            r: raw[2] & 0x04 != 0,
            l: raw[2] & 0x08 != 0,

            left_stick_x: raw[3],
            left_stick_y: raw[4],
            c_stick_x: raw[5],
            c_stick_y: raw[6],

            left_trigger: raw[7],
            right_trigger: raw[8],
        }
    }

    /// Whether the status byte reports a controller on this port.
    ///
    /// The adapter sets the type bits (wired 0x10, wireless 0x20) only
    /// while a controller is plugged in; an empty port reads as zero.
    pub fn is_connected(&self) -> bool {
        self.status & STATUS_TYPE_MASK != 0
    }
}

/// Errors raised while validating a raw adapter transfer.
///
/// These are transport-level failures: a short read or a transfer that is
/// not a state report. The per-controller decode itself cannot fail.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("adapter transfer truncated: got {0} bytes, expected {ADAPTER_FRAME_LEN}")]
    Truncated(usize),

    #[error("unexpected report id {0:#04x}, expected {FRAME_REPORT_ID:#04x}")]
    BadReportId(u8),
}

/// One validated adapter transfer holding the state of all four ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdapterFrame {
    raw: [u8; ADAPTER_FRAME_LEN],
}

impl AdapterFrame {
    /// Validate a raw transfer payload.
    ///
    /// Extra trailing bytes are rejected along with short reads; the
    /// adapter always sends exactly one fixed-size report.
    pub fn parse(payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() != ADAPTER_FRAME_LEN {
            return Err(FrameError::Truncated(payload.len()));
        }
        if payload[0] != FRAME_REPORT_ID {
            return Err(FrameError::BadReportId(payload[0]));
        }

        let mut raw = [0u8; ADAPTER_FRAME_LEN];
        raw.copy_from_slice(payload);
        Ok(Self { raw })
    }

    /// Decode the controller block for `port`.
    ///
    /// Ports outside `0..PORT_COUNT` read as a default (disconnected)
    /// snapshot rather than panicking.
    pub fn snapshot(&self, port: usize) -> ControllerSnapshot {
        if port >= PORT_COUNT {
            return ControllerSnapshot::default();
        }

        let offset = 1 + port * CONTROLLER_REPORT_LEN;
        let mut block = [0u8; CONTROLLER_REPORT_LEN];
        block.copy_from_slice(&self.raw[offset..offset + CONTROLLER_REPORT_LEN]);
        ControllerSnapshot::from_report(&block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_button_byte_one() {
        let mut raw = [0u8; CONTROLLER_REPORT_LEN];

        raw[1] = 0x01;
        assert!(ControllerSnapshot::from_report(&raw).a);
        raw[1] = 0x02;
        assert!(ControllerSnapshot::from_report(&raw).b);
        raw[1] = 0x04;
        assert!(ControllerSnapshot::from_report(&raw).x);
        raw[1] = 0x08;
        assert!(ControllerSnapshot::from_report(&raw).y);
        raw[1] = 0x10;
        assert!(ControllerSnapshot::from_report(&raw).dpad_left);
        raw[1] = 0x20;
        assert!(ControllerSnapshot::from_report(&raw).dpad_right);
        raw[1] = 0x40;
        assert!(ControllerSnapshot::from_report(&raw).dpad_down);
        raw[1] = 0x80;
        assert!(ControllerSnapshot::from_report(&raw).dpad_up);
    }

    #[test]
    fn decode_button_byte_two() {
        let mut raw = [0u8; CONTROLLER_REPORT_LEN];

        raw[2] = 0x01;
        assert!(ControllerSnapshot::from_report(&raw).start);
        raw[2] = 0x02;
        assert!(ControllerSnapshot::from_report(&raw).z);
        raw[2] = 0x04;
        assert!(ControllerSnapshot::from_report(&raw).r);
        raw[2] = 0x08;
        assert!(ControllerSnapshot::from_report(&raw).l);

        // Reserved bits decode to nothing.
        raw[2] = 0xF0;
        let state = ControllerSnapshot::from_report(&raw);
        assert!(!state.start && !state.z && !state.r && !state.l);
    }

    #[test]
    fn decode_is_lossless_for_analog_fields() {
        let raw = [0x14, 0x00, 0x00, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC];
        let state = ControllerSnapshot::from_report(&raw);

        assert_eq!(state.status, 0x14);
        assert_eq!(state.left_stick_x, 0x12);
        assert_eq!(state.left_stick_y, 0x34);
        assert_eq!(state.c_stick_x, 0x56);
        assert_eq!(state.c_stick_y, 0x78);
        assert_eq!(state.left_trigger, 0x9A);
        assert_eq!(state.right_trigger, 0xBC);
    }

    #[test]
    fn default_snapshot_is_disconnected_and_idle() {
        let state = ControllerSnapshot::default();
        assert!(!state.is_connected());
        assert!(!state.a && !state.start);
        assert_eq!(state.left_trigger, 0);
    }

    #[test]
    fn connected_status_types() {
        let mut raw = [0u8; CONTROLLER_REPORT_LEN];

        raw[0] = 0x10; // wired
        assert!(ControllerSnapshot::from_report(&raw).is_connected());
        raw[0] = 0x20; // wireless
        assert!(ControllerSnapshot::from_report(&raw).is_connected());
        raw[0] = 0x04; // power bit alone is not a controller
        assert!(!ControllerSnapshot::from_report(&raw).is_connected());
    }

    #[test]
    fn frame_rejects_short_transfer() {
        assert_eq!(
            AdapterFrame::parse(&[FRAME_REPORT_ID; 10]),
            Err(FrameError::Truncated(10))
        );
    }

    #[test]
    fn frame_rejects_wrong_report_id() {
        let payload = [0x22u8; ADAPTER_FRAME_LEN];
        assert_eq!(
            AdapterFrame::parse(&payload),
            Err(FrameError::BadReportId(0x22))
        );
    }

    #[test]
    fn frame_splits_ports_at_fixed_offsets() {
        let mut payload = [0u8; ADAPTER_FRAME_LEN];
        payload[0] = FRAME_REPORT_ID;

        // Port 0: A held. Port 2: connected, right trigger at 200.
        payload[1] = 0x10;
        payload[2] = 0x01;
        payload[1 + 2 * CONTROLLER_REPORT_LEN] = 0x10;
        payload[1 + 2 * CONTROLLER_REPORT_LEN + 8] = 200;

        let frame = AdapterFrame::parse(&payload).unwrap();
        assert!(frame.snapshot(0).a);
        assert!(frame.snapshot(0).is_connected());
        assert!(!frame.snapshot(1).is_connected());
        assert_eq!(frame.snapshot(2).right_trigger, 200);
    }

    #[test]
    fn frame_out_of_range_port_reads_default() {
        let mut payload = [0xFFu8; ADAPTER_FRAME_LEN];
        payload[0] = FRAME_REPORT_ID;
        let frame = AdapterFrame::parse(&payload).unwrap();

        assert_eq!(frame.snapshot(PORT_COUNT), ControllerSnapshot::default());
    }
}
