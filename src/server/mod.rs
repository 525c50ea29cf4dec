//! HTTP JSON-RPC surface
//!
//! Thin request router over the pipeline: every request runs an
//! independent parse/generate pass over freshly constructed value
//! objects, so concurrent requests share nothing mutable.

mod http;
mod types;

pub use http::{health_check, rpc_handler, start_server};
pub use types::{RpcError, RpcRequest, RpcResponse};
