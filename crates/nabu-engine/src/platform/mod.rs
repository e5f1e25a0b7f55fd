//! Platform adapter.
//!
//! `Platform` is the fixed capability interface the frame driver consumes;
//! `WinitPlatform` is the production implementation.

mod adapter;
mod cursor;
mod winit;

#[cfg(test)]
pub(crate) mod scripted;

pub use adapter::Platform;
pub use cursor::{CursorRegistry, CursorShape};
pub use self::winit::WinitPlatform;
