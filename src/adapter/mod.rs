//! GameCube controller adapter subsystem
//!
//! Decodes the adapter's USB state transfers and publishes per-port
//! controller snapshots for the rest of the application:
//!
//! 1. [`source`] - raw transfer acquisition behind the transport seam
//! 2. [`report`] - fixed-layout decode of transfers and controller blocks
//! 3. [`poller`] - background polling task and snapshot publication
//!
//! # Architecture
//!
//! ```text
//! ReportSource ──► AdapterFrame ──► ControllerSnapshot ──► watch channel
//! (USB seam)       (37-byte xfer)   (per port, typed)      (readers)
//! ```
//!
//! Readers only ever observe complete snapshots; decoding and
//! classification never share mutable state with the polling task.

pub mod poller;
pub mod report;
pub mod source;
