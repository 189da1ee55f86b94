//! Fixture-backed engines for the One-Stop-Service portal.
//!
//! Each engine module owns its fixture types, the pure aggregations over them and the few
//! mutations the portal screens perform. [`store::FixtureStore`] holds every collection and
//! [`router::portal_router`] exposes the engines over HTTP.

pub mod applications;
pub mod bundles;
pub mod devices;
pub mod documents;
pub mod ledger;
pub mod metrics;
pub mod notifications;
pub mod officers;
pub mod overview;
pub mod router;
pub mod sla;
pub mod store;
pub mod talent;

#[cfg(test)]
mod tests;

pub use router::{portal_router, PortalState};
pub use store::{FixtureStore, SharedStore};
