//! Frame sinks and the optional video encoder.

pub(crate) mod sink;
pub(crate) mod video;
