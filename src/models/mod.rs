pub mod records;

pub use records::{DisplayValue, RecordOptions, RecordsQuery};
