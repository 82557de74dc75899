// Public library interface for Tessera
// The window binary and the debug CLI tool both build on these modules

pub mod app;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod render;
pub mod tree;
pub mod ui;
