//! Records in, label images out.

pub mod label;
pub mod record;

pub use label::{LabelEncoder, LabelImage, RenderedLabel, encode};
pub use record::{Columns, SampleRecord, load_records, read_records};
