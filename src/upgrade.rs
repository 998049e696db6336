//! Per-service upgrade flow: availability gating, step invocations, the
//! controller state machine, and outcome types.

pub mod controller;
pub mod gate;
pub mod image;
pub mod outcome;
pub mod steps;

/// Action that begins an in-service upgrade.
pub const ACTION_UPGRADE: &str = "upgrade";

/// Action that finalizes an upgrade once the new containers are running.
pub const ACTION_FINISH_UPGRADE: &str = "finishupgrade";
