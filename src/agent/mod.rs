//! Learning agents and their control surface.

pub mod error;
pub mod interface;
pub mod messages;
pub mod random;
pub mod trace_agent;


pub use error::AgentError;
pub use interface::EpisodicAgent;
pub use messages::{ControlMessage, MessageError};
pub use random::RandomAgent;
pub use trace_agent::TraceAgent;
