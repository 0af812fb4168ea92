//! Terminal front end

pub mod commands;
pub mod config;
pub mod logging;
