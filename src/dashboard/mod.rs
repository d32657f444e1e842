//! Readiness dashboard
//!
//! Capability selection drives the region summary fetch; clicking a map
//! polygon drives the facility fetch for the resolved region. The two panels
//! and the boundary layer load and fail independently.

pub mod runner;
pub mod state;

pub use runner::Dashboard;
pub use state::{DashboardState, Effect, Event, Panel};
