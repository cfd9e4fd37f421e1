use crate::domain::model::{AggregationResult, IngredientLine, UnitConflict, UnitConflictPolicy};
use crate::utils::error::{BuylistError, Result};

/// Merges cart lines by ingredient name, summing amounts.
///
/// Single pass in input order. The first unit seen for a name is kept; a later
/// line with another unit still adds its amount and is recorded in
/// [`AggregationResult::conflicts`]. Sums saturate instead of overflowing.
pub fn aggregate<'a, I>(lines: I) -> AggregationResult
where
    I: IntoIterator<Item = &'a IngredientLine>,
{
    let mut result = AggregationResult::new();

    for line in lines {
        let entry = result.entry_mut(&line.name, &line.unit);
        entry.amount = entry.amount.saturating_add(line.amount);

        if entry.unit != line.unit {
            let kept_unit = entry.unit.clone();
            result.record_conflict(UnitConflict {
                name: line.name.clone(),
                kept_unit,
                discarded_unit: line.unit.clone(),
            });
        }
    }

    result
}

/// Like [`aggregate`], but rejects blank names and amount overflow, and applies
/// `policy` to unit conflicts.
pub fn aggregate_strict(lines: &[IngredientLine], policy: UnitConflictPolicy) -> Result<AggregationResult> {
    let mut result = AggregationResult::new();

    for (position, line) in lines.iter().enumerate() {
        if line.name.trim().is_empty() {
            return Err(BuylistError::InvalidInputError {
                message: format!("ingredient line #{} has an empty name", position + 1),
            });
        }

        let entry = result.entry_mut(&line.name, &line.unit);
        entry.amount = entry.amount.checked_add(line.amount).ok_or_else(|| {
            BuylistError::InvalidInputError {
                message: format!("total amount of '{}' overflows", line.name),
            }
        })?;

        if entry.unit == line.unit {
            continue;
        }

        let kept_unit = entry.unit.clone();
        match policy {
            UnitConflictPolicy::Reject => {
                return Err(BuylistError::UnitConflictError {
                    name: line.name.clone(),
                    first_unit: kept_unit,
                    unit: line.unit.clone(),
                });
            }
            UnitConflictPolicy::FirstWins => {
                tracing::warn!(
                    "⚠️ '{}' appears as '{}' and '{}'; summing under '{}'",
                    line.name,
                    kept_unit,
                    line.unit,
                    kept_unit
                );
                result.record_conflict(UnitConflict {
                    name: line.name.clone(),
                    kept_unit,
                    discarded_unit: line.unit.clone(),
                });
            }
        }
    }

    Ok(result)
}
