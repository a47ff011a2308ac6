//! EQ parameters: snapshot type, host layout, lock-free store and saved state.

mod layout;
mod settings;
mod shared;
mod state;

pub use layout::{ParameterId, ParameterKind, ParameterRange};
pub use settings::{ChainSettings, Slope};
pub use shared::{ChangeFlag, SharedParameters};
pub use state::{load_state, save_state};
