pub mod core;
pub mod geometry;
pub mod samples;
pub mod solver;
pub mod validate;
