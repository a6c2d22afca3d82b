//! The send engine and its collaborators

pub mod cancel;
pub mod counters;
pub mod orchestrator;
pub mod payload;
pub mod sender;

pub use cancel::CancelToken;
pub use counters::SendCounters;
pub use orchestrator::Orchestrator;
pub use sender::PacketSender;
