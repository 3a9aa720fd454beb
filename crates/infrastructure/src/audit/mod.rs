pub mod composite;
pub mod json_lines;
pub mod tracing_sink;

pub use composite::CompositeAuditSink;
pub use json_lines::JsonLinesAuditSink;
pub use tracing_sink::TracingAuditSink;
