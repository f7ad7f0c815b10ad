//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the guidance pipeline and the
//! substitution logic that turns them into the text sent to a provider.

pub mod core;
pub mod tasks;

pub use self::core::assemble;
