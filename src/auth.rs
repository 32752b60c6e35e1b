//! Auth-domain credentials, token pairs, and the authorization state machine.

pub mod credentials;
pub mod state;
pub mod token;

pub use credentials::*;
pub use state::*;
pub use token::{pair::*, secret::*};
