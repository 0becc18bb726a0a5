//! Upstream source providers

pub mod superstream;
pub mod vidsrc;

pub use superstream::SuperstreamProvider;
pub use vidsrc::VidsrcProvider;
