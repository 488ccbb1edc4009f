//! REST access to the game server.

mod client;
mod error;
pub mod protocol;

pub use client::{GameApi, HttpGameApi};
pub use error::{ApiError, ApiErrorKind};
