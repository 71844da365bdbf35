//! Operator feedback: heartbeat and spoken cues.

pub mod heartbeat;
pub mod voice;
