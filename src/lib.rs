// Library surface for the cabinet binary, headless replay and integration tests.
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod random;
pub mod runtime;
pub mod script;
pub mod session;
pub mod state;
pub mod transcript;

pub use controller::Controller;
pub use error::{Error, Result};
pub use state::State;
