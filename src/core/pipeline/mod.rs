pub mod commands;
pub mod dispatching;
