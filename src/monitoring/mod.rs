/*!
 * Monitoring
 * Tracing setup and the engine's event stream
 */

mod events;
mod tracer;

pub use events::{Category, GcEvent};
pub use tracer::{generate_trace_id, init_tracing, span_operation, OperationSpan};
