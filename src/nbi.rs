//! Northbound-interface catalogue: ready-made descriptors and typed operations.
//!
//! The modules here pair the documents in [`documents`] with the paths and success rules the
//! Site Engine uses, so callers get sites, devices, and server information without writing
//! GraphQL by hand. Anything not covered can still go through
//! [`ProviderClient::execute`](crate::client::ProviderClient::execute).

/// Server information queries.
pub mod administration;
/// Device listing, lookup, onboarding, and resynchronization.
pub mod device;
pub mod documents;
/// Site descriptor and listing.
pub mod site;

pub use administration::*;
pub use device::*;
pub use site::*;
