//! Auth-domain models: issued tokens, access-token claims, and subjects.

pub mod claims;
pub mod subject;
pub mod token;

pub use claims::*;
pub use subject::*;
pub use token::{secret::*, set::*};
