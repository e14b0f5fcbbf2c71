//! Token secrets and the access/refresh pair issued by the token endpoint.

pub mod secret;
pub mod set;
