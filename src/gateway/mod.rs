//! The generation gateway: routing, failover and the legacy string surface.

mod builder;
mod legacy;
mod router;
pub mod routing;

pub use builder::{GatewayBuilder, Sentiq};
pub use router::Gateway;
