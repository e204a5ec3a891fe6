pub mod cache;
pub mod connectors;
pub mod oracle;
pub mod synthetic;

pub use cache::EncodingCache;
pub use connectors::{CsvConnector, DataPreview, DatasetMetadata};
pub use oracle::MeasurementOracle;
pub use synthetic::SyntheticDataset;
