//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the three
//! token-exchange endpoints, the API base, the token verification endpoint, and provider
//! quirks (callback placement, nonce length). `strategy` defines [`ProviderStrategy`], an
//! HTTP-client-agnostic hook used by the dispatcher to decide which signed-call failures
//! mean the access token is no longer usable.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
