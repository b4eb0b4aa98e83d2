//! ## flodvakt-engine
//! **Live event stream: sessions, command handling and the HTTP surface**
//!
//! A viewer connection becomes a session. Each session runs one generation
//! loop that pushes synthetic packet events at the cadence of the shared
//! scenario, and one receive loop that applies `SET_MODE` commands to it.
//! Closing the connection cancels that session's loop and nothing else.

pub mod error;
pub mod generator;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

pub use error::EngineError;
pub use server::StreamServer;
pub use session::{run_session, SessionContext};
