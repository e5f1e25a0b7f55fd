//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the frame driver and
//! higher layers (studio, tools). It avoids leaking platform or GPU handles
//! into user code: the application only ever sees the GUI context, the frame
//! snapshot and a command buffer.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, RuntimeCtx};
pub(crate) use ctx::Command;
