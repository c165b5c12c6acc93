// src/lib.rs
// acplan - floor-plan based air-conditioning recommendation service

pub mod chat;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod server;
pub mod session;
pub mod state;
pub mod store;

pub use error::{AcError, Result};
