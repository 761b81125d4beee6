//! Shared utilities for the Tsudoi server and client.

pub mod logger;
pub mod time;
