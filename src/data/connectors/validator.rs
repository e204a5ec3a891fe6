use super::types::RequiredColumn;
use crate::error::{Result, SeqDesignError};
use crate::types::{DesignSchema, Sequence};
use polars::prelude::*;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Validate that the DataFrame carries a sequence column and a numeric
    /// response column, and that every sequence fits the design schema
    pub fn validate_dataset(
        df: &DataFrame,
        schema: &DesignSchema,
    ) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(SeqDesignError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        let response_name = column_map.get(&RequiredColumn::Response).unwrap();
        let response = df.column(response_name)?;
        if !matches!(
            response.dtype(),
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::UInt64
                | DataType::UInt32
        ) {
            return Err(SeqDesignError::DataLoading(format!(
                "Column '{}' (response) must be numeric, found {:?}",
                response_name,
                response.dtype()
            )));
        }

        Self::validate_sequences(df, column_map.get(&RequiredColumn::Sequence).unwrap(), schema)?;

        Ok(column_map)
    }

    /// Find column by checking aliases
    fn find_column<'a>(df: &'a DataFrame, required: &RequiredColumn) -> Option<&'a str> {
        let columns = df.get_column_names();
        for alias in required.aliases() {
            if columns.iter().any(|col| col.as_str() == alias) {
                return Some(alias);
            }
        }
        None
    }

    /// Every entry must parse under the schema: fixed length, ACGT alphabet
    fn validate_sequences(df: &DataFrame, column: &str, schema: &DesignSchema) -> Result<()> {
        let sequences = df.column(column)?.str()?;

        for i in 0..df.height() {
            match sequences.get(i) {
                Some(s) => {
                    Sequence::parse(s, schema.length).map_err(|e| {
                        SeqDesignError::DataLoading(format!("Invalid sequence at row {}: {}", i, e))
                    })?;
                }
                None => {
                    return Err(SeqDesignError::DataLoading(format!(
                        "Null sequence at row {}",
                        i
                    )));
                }
            }
        }

        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(SeqDesignError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Check for null values in any column
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "sequence" => &["ACGTACGT", "TTTTAAAA", "GGGGCCCC"],
            "affinity" => &[1.2, -0.4, 0.9],
        }
        .unwrap();

        let result = DataValidator::validate_dataset(&df, &DesignSchema::new(8));
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_missing_column() {
        let df = df! {
            "sequence" => &["ACGTACGT", "TTTTAAAA"],
            // Missing response
            "other" => &["x", "y"],
        }
        .unwrap();

        let result = DataValidator::validate_dataset(&df, &DesignSchema::new(8));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_wrong_length() {
        let df = df! {
            "sequence" => &["ACGT", "TTTTAAAA"],
            "affinity" => &[1.2, -0.4],
        }
        .unwrap();

        let result = DataValidator::validate_dataset(&df, &DesignSchema::new(8));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bad_alphabet() {
        let df = df! {
            "sequence" => &["ACGTACGN"],
            "affinity" => &[1.2],
        }
        .unwrap();

        let result = DataValidator::validate_dataset(&df, &DesignSchema::new(8));
        assert!(result.is_err());
    }

    #[test]
    fn test_column_aliases() {
        let df = df! {
            "seq" => &["ACGTACGT"],
            "y" => &[0.5],
        }
        .unwrap();

        let result = DataValidator::validate_dataset(&df, &DesignSchema::new(8));
        assert!(result.is_ok());
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! {
            "sequence" => &["ACGTACGT"],
            "affinity" => &[0.5],
        }
        .unwrap();

        assert!(DataValidator::validate_minimum_rows(&df, 2).is_err());
        assert!(DataValidator::validate_minimum_rows(&df, 1).is_ok());
    }
}
