pub mod config;
pub mod error;
pub mod types;

pub use config::HearthConfig;
pub use error::{CoreError, CoreResult};
pub use types::*;
