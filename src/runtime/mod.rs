//! Per-row machinery: decomposition, coercion and assembly.
//!
//! Everything here runs synchronously on the calling thread.

pub mod config_loader;
pub mod coercion;
pub mod row_assembler;
pub mod row_decomposer;
pub mod timestamp_format;

// Re-export key types
pub use config_loader::SerDeProperties;
pub use coercion::TypeCoercer;
pub use row_assembler::RowAssembler;
pub use row_decomposer::{decompose_row, AttributeMap, HEADER_TERMINATOR, RECORD_TERMINATOR};
pub use timestamp_format::TimestampFormat;
