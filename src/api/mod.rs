/*!
 * API Layer
 * JSON protocol and WebSocket transport for dashboard clients
 */

pub mod protocol;
pub mod server;

pub use protocol::{ClientMessage, DashboardState, ServerMessage};
pub use server::{GcServer, TransportError};
