//! Button mapping and bind-by-listening.
//!
//! [`mapping_types`] holds the N64 button slots and their bindings onto
//! adapter inputs; [`binder`] runs the "press an input to bind it"
//! session that rewrites one slot at a time from live snapshots.

pub mod binder;
pub mod mapping_types;

pub use binder::{Binder, ListenStep};
pub use mapping_types::{ButtonMapping, N64Button, N64_BUTTON_COUNT};
