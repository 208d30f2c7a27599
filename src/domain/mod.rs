pub mod access;
pub mod cadence;
pub mod hierarchy;
pub mod models;
pub mod progress;
pub mod validation;
