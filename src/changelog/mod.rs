//! Conventional commit classification and markdown rendering.

pub mod groups;
pub mod parser;
pub mod render;

pub use groups::{CommitGroup, GroupRegistry};
pub use parser::{CommitInfo, parse_commit};
pub use render::{RenderOptions, render};
