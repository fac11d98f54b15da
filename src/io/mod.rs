//! Export collaborators consuming per-timestep state snapshots.

pub mod export;
