//! Test helpers shared across the confbind workspace.
//!
//! - [`env`] serialises process environment mutation and restores every
//!   touched variable afterwards.
//! - [`files`] writes configuration documents into temporary directories.

pub mod env;
pub mod files;
