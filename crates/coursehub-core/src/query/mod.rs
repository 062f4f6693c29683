//! Query evaluation shared by every store backend.

pub mod pipeline;

pub use pipeline::Pipeline;
