// src/cli/handlers/mod.rs

// One module per CLI action.

pub mod commons;

pub mod add;
pub mod backup;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod phrases;
pub mod remove;
pub mod reset;
pub mod resolve;
pub mod restore;
pub mod say;
pub mod set;
pub mod show;
pub mod summary;
pub mod update;
pub mod validate;
