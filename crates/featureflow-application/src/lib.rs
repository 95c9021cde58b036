//! Application layer for the Feature Flow client.
//!
//! Coordinates the session and engagement state machines on top of the
//! domain contracts: optimistic local mutations, exactly-once vote toggles,
//! busy guards and rollback on failure.

pub mod api;
pub mod engagement;
pub mod flight;
pub mod optimistic;
pub mod session_store;

pub use api::{AuthPayload, BoardApi};
pub use engagement::{BoardStats, ConfirmedDeletion, EngagementStore, PendingDeletion};
pub use flight::{EntityRef, FlightGuard, FlightKey, FlightPolicy, InFlight, MutationKind};
pub use session_store::{SessionStore, SignupRequest};
