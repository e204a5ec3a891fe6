use serde::{Deserialize, Serialize};

/// Required columns in an affinity dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Sequence,
    Response,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Response => "response",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Sequence, Self::Response]
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Sequence => vec!["sequence", "Sequence", "SEQUENCE", "seq"],
            Self::Response => vec![
                "response",
                "Response",
                "affinity",
                "Affinity",
                "binding",
                "y",
            ],
        }
    }
}

/// Metadata about a loaded affinity dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<String>,
    pub sequence_length: usize,
    pub response_range: (f64, f64), // (min, max)
}

/// First rows and per-column stats for display
#[derive(Debug, Clone)]
pub struct DataPreview {
    pub metadata: DatasetMetadata,
    pub first_rows: Vec<Vec<String>>, // First 10 rows as strings
    pub column_stats: Vec<ColumnStats>,
}

#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}
