use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 購物車中某一道食譜貢獻的一筆食材需求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    #[serde(alias = "measurement_unit")]
    pub unit: String,
    pub amount: u64,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, amount: u64) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    pub unit: String,
    pub amount: u64,
}

/// A later line whose unit differed from the one already recorded for its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitConflict {
    pub name: String,
    pub kept_unit: String,
    pub discarded_unit: String,
}

/// Ingredient name -> entry, ordered by first occurrence in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    entries: Vec<(String, AggregatedEntry)>,
    index: HashMap<String, usize>,
    conflicts: Vec<UnitConflict>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AggregatedEntry> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregatedEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn total_amount(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, entry)| acc.saturating_add(entry.amount))
    }

    pub fn conflicts(&self) -> &[UnitConflict] {
        &self.conflicts
    }

    /// Returns the entry for `name`, inserting it with `unit` and a zero amount
    /// when the name has not been seen yet.
    pub(crate) fn entry_mut(&mut self, name: &str, unit: &str) -> &mut AggregatedEntry {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push((
                    name.to_string(),
                    AggregatedEntry {
                        unit: unit.to_string(),
                        amount: 0,
                    },
                ));
                self.index.insert(name.to_string(), position);
                position
            }
        };
        &mut self.entries[position].1
    }

    pub(crate) fn record_conflict(&mut self, conflict: UnitConflict) {
        self.conflicts.push(conflict);
    }
}

/// Serialized shape of one aggregated row (JSON / CSV outputs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListRow {
    pub name: String,
    pub unit: String,
    pub amount: u64,
}

impl Serialize for AggregationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            seq.serialize_element(&ShoppingListRow {
                name: name.clone(),
                unit: entry.unit.clone(),
                amount: entry.amount,
            })?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[serde(alias = "txt")]
    Text,
    Pdf,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text/plain; charset=utf-8",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Text,
    Pdf,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "pdf" => Ok(OutputFormat::Pdf),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unsupported format '{}'. Valid formats: text, pdf, csv, json",
                other
            )),
        }
    }
}

/// Finished artifact. The caller owns the bytes and picks filename/content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub format: DocumentFormat,
}

impl RenderedDocument {
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// What to do when an ingredient name shows up again under a different unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitConflictPolicy {
    /// 保留第一次出現的單位，後續數量直接累加
    #[default]
    FirstWins,
    Reject,
}

/// Output of the transform stage.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub shopping_list: AggregationResult,
    pub source_lines: usize,
}
