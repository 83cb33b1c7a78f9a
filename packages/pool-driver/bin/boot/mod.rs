pub mod runner;
pub mod setup;
