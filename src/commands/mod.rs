// Template commands
pub mod diff;
pub mod synth;

// Inspection commands
pub mod show;
pub mod validate;
