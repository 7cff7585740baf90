// lumen_sim/src/simulation/app_state.rs

use bevy::ecs::schedule::SystemSet;

// =========================================================================
// == Main Simulation Sets (The "Data Flow Graph") ==
// =========================================================================

/// Per-tick phases, run in this order inside `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Advances the scripted robot motion.
    GroundTruth,
    /// Simulated cameras expose a frame of the true field.
    Sensors,
    /// Camera inputs are refreshed and turned into pose observations.
    Aggregation,
    /// Observations are compared against truth and counted.
    Telemetry,
}
