// src/core/mod.rs

pub mod conflict;
pub mod json_io;
pub mod paths;
pub mod resolver;
pub mod settings;
pub mod store;
pub mod template;
