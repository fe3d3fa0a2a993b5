// PressureLog Data
// This crate holds the storage models and the repository seam the domain
// layer saves and retrieves readings through

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
