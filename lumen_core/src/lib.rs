// lumen_core/src/lib.rs

// This file defines the public modules of the library.
pub mod aggregator;
pub mod config;
pub mod estimation;
pub mod io;
pub mod layout;
pub mod messages;
pub mod prelude;
pub mod types;
