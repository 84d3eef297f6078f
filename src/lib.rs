//! Parachute descent estimation: free fall, canopy inflation, and terminal descent, with
//! force and oscillation estimates built on top of the trajectory.
//!
//! The physics lives in the `chute_*` workspace crates; this crate re-exports them so the
//! binaries and downstream users have a single entry point.

pub use chute_atmosphere as atmosphere;
pub use chute_config as config;
pub use chute_core as common;
pub use chute_export as export;
pub use chute_forces as forces;
pub use chute_mission as mission;
pub use chute_oscillation as oscillation;
pub use chute_parachute as parachute;
pub use chute_payload as payload;
pub use chute_trajectory as trajectory;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
