//! Token pair models and the redacting secret wrapper.

pub mod pair;
pub mod secret;
