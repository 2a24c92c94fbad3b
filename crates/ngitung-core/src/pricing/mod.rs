pub mod engine;

#[cfg(feature = "simulation")]
pub mod simulation;

#[cfg(feature = "recommendations")]
pub mod recommendations;
