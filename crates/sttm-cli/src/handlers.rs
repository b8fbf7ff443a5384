//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod masks;
mod transform;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use masks::handle_masks;
pub use transform::handle_transform;
pub use validate::handle_validate;
