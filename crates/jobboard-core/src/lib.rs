pub mod auth;
pub mod breaker;
pub mod clients;
pub mod error;
pub mod pagination;

pub use error::{Error, Result};
