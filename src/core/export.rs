use crate::domain::model::{AggregationResult, ShoppingListRow};
use crate::utils::error::{BuylistError, Result};

pub fn to_csv(result: &AggregationResult) -> Result<Vec<u8>> {
    // 表頭明確寫出，空清單也是合法的 CSV
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(["name", "unit", "amount"])?;
    for (name, entry) in result.iter() {
        writer.serialize(ShoppingListRow {
            name: name.to_string(),
            unit: entry.unit.clone(),
            amount: entry.amount,
        })?;
    }
    writer.into_inner().map_err(|e| BuylistError::IoError(e.into_error()))
}

pub fn to_json(result: &AggregationResult) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(result)?)
}
