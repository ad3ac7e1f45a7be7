//! Talks to an external move-provider on behalf of a [`sweeper_core::GameSession`].

mod config;
mod driver;
mod error;
mod provider;
mod wire;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use provider::*;
pub use wire::*;
