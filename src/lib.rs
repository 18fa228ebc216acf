pub mod api;
pub mod client;
pub mod config;
pub mod metrics_defs;
pub mod types;

#[cfg(test)]
mod testutils;
