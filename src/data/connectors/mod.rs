mod csv;
pub mod types;
pub mod validator;

pub use csv::CsvConnector;
pub use types::{ColumnStats, DataPreview, DatasetMetadata, RequiredColumn};
pub use validator::DataValidator;
