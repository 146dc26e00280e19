//! Fleet Types - Wire types for the deployment management API
//!
//! These types mirror the JSON documents served by the deployment management
//! service. The CLI only reads them; nothing here mutates remote state.
//!
//! ## Key Concepts
//!
//! - **Deployment**: A remote workload instance tracked by the service
//! - **Placement**: A scheduled instantiation of a deployment on a host
//! - **PlacementEvent**: One entry in a placement's lifecycle history

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod account;
pub mod deployment;
pub mod events;
pub mod ids;
pub mod placement;
pub mod record;

pub use account::Account;
pub use deployment::{Deployment, DeploymentPage, DeploymentState};
pub use events::{EventKind, PlacementEvent};
pub use ids::{DeploymentId, PlacementId};
pub use placement::{Placement, PlacementStatus};
pub use record::Record;
