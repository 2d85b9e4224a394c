//! Editing server - JSON-RPC over stdin/stdout
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types
//! - `state` - Published board snapshot, config and DRC scheduling
//! - `util` - Param parsing and error mapping
//! - `handlers` - Request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;
pub mod util;

// Re-export key types for convenience
pub use handlers::{dispatch, drc_complete_notification, handle_line};
pub use protocol::{error_codes, ErrorResponse, Notification, Request, Response};
pub use state::ServerState;
