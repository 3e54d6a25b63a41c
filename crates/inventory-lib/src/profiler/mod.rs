//! Normalization of raw cluster objects into inventory records

mod application;
mod locator;
mod node;

pub use application::{first_backend, hostnames, ApplicationProfiler};
pub use locator::{Placement, UnknownReason, WorkloadLocator};
pub use node::{profile_node, readiness};
