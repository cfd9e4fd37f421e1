use crate::core::{IngredientLine, LineSource, Storage};
use crate::utils::error::{BuylistError, Result};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    Csv,
}

impl FileKind {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(FileKind::Json),
            Some("csv") => Ok(FileKind::Csv),
            _ => Err(BuylistError::InvalidConfigValueError {
                field: "source.path".to_string(),
                value: path.to_string(),
                reason: "Cart file must be .json or .csv".to_string(),
            }),
        }
    }
}

/// Reads an exported cart from storage: a JSON array of lines, or CSV with a
/// `name,unit,amount` (or `name,measurement_unit,amount`) header.
pub struct FileSource<S: Storage> {
    storage: S,
    path: String,
    kind: FileKind,
}

impl<S: Storage> FileSource<S> {
    pub fn new(storage: S, path: String) -> Result<Self> {
        let kind = FileKind::from_path(&path)?;
        Ok(Self { storage, path, kind })
    }
}

pub fn parse_json(data: &[u8]) -> Result<Vec<IngredientLine>> {
    Ok(serde_json::from_slice(data)?)
}

pub fn parse_csv(data: &[u8]) -> Result<Vec<IngredientLine>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut lines = Vec::new();
    for record in reader.deserialize() {
        let line: IngredientLine = record?;
        lines.push(line);
    }
    Ok(lines)
}

#[async_trait]
impl<S: Storage> LineSource for FileSource<S> {
    async fn fetch_lines(&self) -> Result<Vec<IngredientLine>> {
        let data = self.storage.read_file(&self.path).await?;
        let lines = match self.kind {
            FileKind::Json => parse_json(&data)?,
            FileKind::Csv => parse_csv(&data)?,
        };
        tracing::debug!("Read {} lines from {}", lines.len(), self.path);
        Ok(lines)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use tempfile::TempDir;

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path("cart.json").unwrap(), FileKind::Json);
        assert_eq!(FileKind::from_path("exports/Cart.CSV").unwrap(), FileKind::Csv);
        assert!(FileKind::from_path("cart.xml").is_err());
        assert!(FileKind::from_path("cart").is_err());
    }

    #[test]
    fn test_parse_json_lines() {
        let data = br#"[
            {"name": "Flour", "unit": "g", "amount": 200},
            {"name": "Egg", "measurement_unit": "pcs", "amount": 2}
        ]"#;
        let lines = parse_json(data).unwrap();
        assert_eq!(
            lines,
            vec![IngredientLine::new("Flour", "g", 200), IngredientLine::new("Egg", "pcs", 2)]
        );
    }

    #[test]
    fn test_parse_json_rejects_negative_amount() {
        let data = br#"[{"name": "Flour", "unit": "g", "amount": -5}]"#;
        assert!(matches!(parse_json(data), Err(BuylistError::SerializationError(_))));
    }

    #[test]
    fn test_parse_csv_lines() {
        let data = b"name, measurement_unit, amount\nFlour, g, 200\n\"Salt, sea\", g, 5\n";
        let lines = parse_csv(data).unwrap();
        assert_eq!(
            lines,
            vec![IngredientLine::new("Flour", "g", 200), IngredientLine::new("Salt, sea", "g", 5)]
        );
    }

    #[test]
    fn test_parse_csv_bad_amount() {
        let data = b"name,unit,amount\nFlour,g,lots\n";
        assert!(matches!(parse_csv(data), Err(BuylistError::CsvError(_))));
    }

    #[tokio::test]
    async fn test_fetch_lines_from_storage() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("cart.csv"),
            "name,unit,amount\nFlour,g,200\nEgg,pcs,2\n",
        )
        .unwrap();

        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let source = FileSource::new(storage, "cart.csv".to_string()).unwrap();

        let lines = source.fetch_lines().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(source.describe(), "file cart.csv");
    }

    #[tokio::test]
    async fn test_fetch_lines_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let source = FileSource::new(storage, "missing.json".to_string()).unwrap();

        assert!(matches!(source.fetch_lines().await, Err(BuylistError::IoError(_))));
    }
}
