/*!
 * Monitoring
 * Structured, leveled diagnostics for ledger operations
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, span_operation, OperationSpan};
