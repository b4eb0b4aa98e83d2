//! # flodvakt-core
//!
//! Foundation layer for the live traffic simulator.
//!
//! ### Key Submodules:
//! - `scenario`: the closed set of traffic scenarios and their registry
//! - `event`: `PacketEvent` and the pure event synthesizer
//! - `state`: the process-wide scenario cell every viewer observes
//!
//! Nothing in this crate performs I/O; the engine crate wires these pieces
//! to transports and timers.

pub mod error;
pub mod event;
pub mod scenario;
pub mod state;

pub use error::CoreError;
pub use event::{synthesize, PacketEvent};
pub use scenario::{LabelBranch, RegistrySettings, Scenario, ScenarioProfile, ScenarioRegistry};
pub use state::SharedScenario;
