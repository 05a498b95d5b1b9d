//! # assistant
//!
//! Command resolution and configuration-consistency engine for a voice
//! assistant: a thread-safe store of trigger-phrase commands and settings,
//! the phrase conflict detector guarding it, and the resolver that maps free
//! text to the single best command.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
