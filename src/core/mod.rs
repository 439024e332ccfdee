// Core engine exports
pub mod coordinator;
pub mod filters;
pub mod matcher;
pub mod pool;
pub mod registry;

pub use coordinator::{CoordinatorStats, DeliveryFailure, SessionCoordinator};
pub use filters::{accepts, is_compatible};
pub use matcher::PairingEngine;
pub use pool::{PoolError, WaitingPool};
pub use registry::{PairRegistry, RegistryError};
