//! Access-token model and the blank-token fallback provider.

pub mod provider;
pub mod token;

pub use provider::*;
pub use token::*;
