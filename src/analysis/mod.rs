/// Analysis layer: power-law fitting, input diagnostics, axis ticks.

pub mod detect;
pub mod fit;
pub mod ticks;
