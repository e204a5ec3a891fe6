use super::{
    types::{ColumnStats, DataPreview, DatasetMetadata, RequiredColumn},
    validator::DataValidator,
};
use crate::error::{Result, SeqDesignError};
use crate::types::DesignSchema;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| SeqDesignError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load and validate an affinity dataset against the design schema
    pub fn load_and_validate<P: AsRef<Path>>(
        path: P,
        schema: &DesignSchema,
        min_rows: Option<usize>,
    ) -> Result<(DataFrame, HashMap<RequiredColumn, String>)> {
        let df = Self::load(&path)?;

        let column_map = DataValidator::validate_dataset(&df, schema)?;

        // A seed batch needs something to draw from
        let min_rows = min_rows.unwrap_or(32);
        DataValidator::validate_minimum_rows(&df, min_rows)?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok((df, column_map))
    }

    /// Create metadata for a loaded DataFrame
    pub fn create_metadata<P: AsRef<Path>>(
        path: P,
        df: &DataFrame,
        column_map: &HashMap<RequiredColumn, String>,
        schema: &DesignSchema,
    ) -> Result<DatasetMetadata> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let response_name = column_map
            .get(&RequiredColumn::Response)
            .ok_or_else(|| SeqDesignError::DataLoading("Response column unresolved".to_string()))?;

        let response = df.column(response_name)?.cast(&DataType::Float64)?;
        let response_f64 = response.f64()?;
        let response_range = (
            response_f64.min().unwrap_or(0.0),
            response_f64.max().unwrap_or(0.0),
        );

        Ok(DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            sequence_length: schema.length,
            response_range,
        })
    }

    /// Create a preview of the data for display
    pub fn create_preview<P: AsRef<Path>>(
        path: P,
        df: &DataFrame,
        column_map: &HashMap<RequiredColumn, String>,
        schema: &DesignSchema,
    ) -> Result<DataPreview> {
        let metadata = Self::create_metadata(&path, df, column_map, schema)?;

        let preview_rows = df.height().min(10);
        let mut first_rows = Vec::with_capacity(preview_rows);
        for i in 0..preview_rows {
            let mut row = Vec::with_capacity(df.width());
            for col_name in df.get_column_names() {
                let series = df.column(col_name)?;
                let value = series
                    .get(i)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|_| "null".to_string());
                row.push(value);
            }
            first_rows.push(row);
        }

        let mut column_stats = Vec::with_capacity(df.width());
        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let (min, max, mean) = match series.cast(&DataType::Float64) {
                Ok(as_f64) => {
                    let values = as_f64.f64()?;
                    (values.min(), values.max(), values.mean())
                }
                Err(_) => (None, None, None),
            };
            column_stats.push(ColumnStats {
                name: col_name.to_string(),
                dtype: format!("{:?}", series.dtype()),
                null_count: series.null_count(),
                min,
                max,
                mean,
            });
        }

        Ok(DataPreview {
            metadata,
            first_rows,
            column_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affinity_frame() -> DataFrame {
        df!(
            "sequence" => ["ACGT", "TTTT", "GGCC", "ACGA"],
            "affinity" => [0.5, -1.0, 2.0, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn preview_summarizes_loaded_frame() {
        let df = affinity_frame();
        let schema = DesignSchema::new(4);
        let map = DataValidator::validate_dataset(&df, &schema).unwrap();

        let preview = CsvConnector::create_preview("inline.csv", &df, &map, &schema).unwrap();

        assert_eq!(preview.metadata.num_rows, 4);
        assert_eq!(preview.metadata.response_range, (-1.0, 2.0));
        assert_eq!(preview.first_rows.len(), 4);
        assert_eq!(preview.first_rows[0].len(), 2);
        assert_eq!(preview.column_stats.len(), 2);

        let affinity = preview
            .column_stats
            .iter()
            .find(|s| s.name == "affinity")
            .unwrap();
        assert_eq!(affinity.null_count, 0);
        assert_eq!(affinity.min, Some(-1.0));
        assert_eq!(affinity.max, Some(2.0));
        assert!((affinity.mean.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn preview_caps_row_dump_at_ten() {
        let sequences: Vec<String> = (0..15).map(|_| "ACGT".to_string()).collect();
        let responses: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let df = df!("seq" => sequences, "response" => responses).unwrap();
        let schema = DesignSchema::new(4);
        let map = DataValidator::validate_dataset(&df, &schema).unwrap();

        let preview = CsvConnector::create_preview("inline.csv", &df, &map, &schema).unwrap();

        assert_eq!(preview.first_rows.len(), 10);
        assert_eq!(preview.metadata.num_rows, 15);
    }
}
