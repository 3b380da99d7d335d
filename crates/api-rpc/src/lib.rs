//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for Tasklist Engine. The fronting
//! gateway handles authentication and forwards extracted caller claims.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
