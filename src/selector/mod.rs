pub mod escape;
pub mod point;
pub mod synthesizer;
