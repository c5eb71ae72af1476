// IAM
pub mod diff;

// Security groups
pub mod consolidate;
pub mod migrate;

// Settings
pub mod config;
