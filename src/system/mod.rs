//! # System Interaction Layer
//!
//! The boundary between resolved commands and the operating system.
//!
//! - **`executor`**: the [`executor::ActionExecutor`] trait and the
//!   process-spawning [`executor::SystemExecutor`], plus `handle_text`, which
//!   chains resolution and execution for one input.

pub mod executor;
