//! Internal implementation modules for `tipup-core`.
//!
//! Most callers should go through the re-exports in the crate root rather
//! than importing these modules directly.

pub mod build;
pub mod config;
pub mod download;
pub mod envutil;
pub mod errors;
pub mod forward;
pub mod git;
pub mod home;
pub mod lock;
pub mod outcome;
pub mod platform;
pub mod process;
pub mod sync;
pub mod tracker;
