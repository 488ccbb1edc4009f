//! Screen implementations.

mod game;
mod join_form;

pub use game::{GameLayout, GameScreen};
pub use join_form::JoinFormScreen;
