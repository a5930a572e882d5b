//! Platform glue
//!
//! Device input lives here; the browser event wiring that feeds it is in
//! the binary.

pub mod input;

pub use input::InputState;
