//! Configuration for schemagen

pub mod defaults;
mod settings;

pub use settings::*;
