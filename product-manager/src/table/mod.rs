//! Table transforms
//!
//! Reshapes backend records into display rows, builds the renderer's column
//! descriptors and sorts/filters an in-memory row set. Every operation here
//! is synchronous and pure: inputs are borrowed and new vectors returned.

pub mod columns;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod row;
pub mod sort;
pub mod value;

pub use columns::{
    ColumnDescriptor, ColumnType, FieldKey, PicklistOption, TypeAttributes, build_columns,
    parse_field_list, resolve_fields,
};
pub use error::TableError;
pub use filter::{MissingFieldPolicy, filter_rows};
pub use mapper::{MapOptions, RecordShape, map_record, map_records};
pub use row::{DisplayRow, PartialRecord, Record, records_from_json};
pub use sort::{FieldClassification, RowSorter, SortDirection};
