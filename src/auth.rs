//! Token lifecycle: redacted secrets, issued tokens, and the caching manager.

pub mod manager;
pub mod secret;
pub mod token;

pub use manager::*;
pub use secret::*;
pub use token::*;
