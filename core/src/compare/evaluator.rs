//! Side-by-side comparison of two products over the spec-field schema.
//!
//! Every function here is pure: the selected pair is passed in explicitly and
//! nothing touches the network or disk. Absent values are `None` throughout
//! and are never coerced to zero or to an empty string.

use super::magnitude::extract_magnitude;
use super::selection::SelectionPair;
use crate::catalog::{ProductRecord, SpecFieldDescriptor};
use serde::Serialize;

/// Width of the smallest visible meter, in percent.
const MIN_METER_PERCENT: f64 = 6.0;

/// Which side of a comparison has the larger magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// No winner: tie, non-numeric field, or an unparseable side.
    #[default]
    Neither,
    First,
    Second,
}

/// One rendered line of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow<'a> {
    pub field_key: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub numeric: bool,
    pub value_a: Option<&'a str>,
    pub value_b: Option<&'a str>,
    pub is_different: bool,
    pub winner: Winner,
}

impl ComparisonRow<'_> {
    /// Meter widths for both sides, scaled against the larger magnitude.
    ///
    /// `None` for text fields and when neither side has a positive magnitude.
    pub fn meters(&self) -> Option<(u8, u8)> {
        if !self.numeric {
            return None;
        }
        let a = extract_magnitude(self.value_a);
        let b = extract_magnitude(self.value_b);
        let max = a.unwrap_or(0.0).max(b.unwrap_or(0.0));
        if max == 0.0 {
            return None;
        }
        Some((
            meter_width_percent(a, Some(max)),
            meter_width_percent(b, Some(max)),
        ))
    }
}

/// Case- and whitespace-insensitive equality for display values.
///
/// Two absent values are equal; an absent and a present value never are.
/// No numeric normalization happens here, so `"8"` and `"8.0"` differ.
pub fn loose_equal(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.trim().to_lowercase() == b.trim().to_lowercase(),
        _ => false,
    }
}

/// Pick the side with the larger magnitude.
///
/// Higher is always better. No field in [`crate::catalog::SPEC_FIELDS`]
/// prefers lower values, so the schema carries no direction.
pub fn better_of(a: Option<&str>, b: Option<&str>) -> Winner {
    match (extract_magnitude(a), extract_magnitude(b)) {
        (Some(a), Some(b)) if a > b => Winner::First,
        (Some(a), Some(b)) if b > a => Winner::Second,
        _ => Winner::Neither,
    }
}

/// Build one row per schema entry, in schema order.
pub fn build_rows<'a>(
    a: Option<&'a ProductRecord>,
    b: Option<&'a ProductRecord>,
    schema: &[SpecFieldDescriptor],
) -> Vec<ComparisonRow<'a>> {
    schema
        .iter()
        .map(|descriptor| {
            let value_a = a.and_then(|p| p.spec(descriptor.key));
            let value_b = b.and_then(|p| p.spec(descriptor.key));
            let winner = if descriptor.is_numeric {
                better_of(value_a, value_b)
            } else {
                Winner::Neither
            };
            ComparisonRow {
                field_key: descriptor.key,
                label: descriptor.label,
                unit: descriptor.unit,
                numeric: descriptor.is_numeric,
                value_a,
                value_b,
                is_different: !loose_equal(value_a, value_b),
                winner,
            }
        })
        .collect()
}

/// Keep only differing rows, but only when both sides are present.
///
/// With fewer than two products the toggle is meaningless and must not empty
/// the view, so the rows come back unchanged.
pub fn filter_differences_only<'a>(
    rows: Vec<ComparisonRow<'a>>,
    a: Option<&ProductRecord>,
    b: Option<&ProductRecord>,
    enabled: bool,
) -> Vec<ComparisonRow<'a>> {
    if !enabled || a.is_none() || b.is_none() {
        return rows;
    }
    rows.into_iter().filter(|row| row.is_different).collect()
}

/// Number of differing fields, or 0 unless both products are present.
pub fn count_differences(
    a: Option<&ProductRecord>,
    b: Option<&ProductRecord>,
    schema: &[SpecFieldDescriptor],
) -> usize {
    if a.is_none() || b.is_none() {
        return 0;
    }
    build_rows(a, b, schema)
        .iter()
        .filter(|row| row.is_different)
        .count()
}

/// Meter fill for `value` relative to `max`, as a whole percentage.
///
/// 0 when either input is absent or `max` is 0. Otherwise the rounded ratio
/// clamped to `[6, 100]` so a small nonzero value stays visible.
pub fn meter_width_percent(value: Option<f64>, max: Option<f64>) -> u8 {
    let (Some(value), Some(max)) = (value, max) else {
        return 0;
    };
    if max == 0.0 {
        return 0;
    }
    (value / max * 100.0).round().clamp(MIN_METER_PERCENT, 100.0) as u8
}

/// Everything a renderer needs for the comparison panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView<'a> {
    pub first: Option<&'a ProductRecord>,
    pub second: Option<&'a ProductRecord>,
    pub complete: bool,
    pub differences_only: bool,
    pub difference_count: usize,
    pub rows: Vec<ComparisonRow<'a>>,
}

/// Evaluate the current selection against a schema.
pub fn evaluate<'a>(
    pair: &'a SelectionPair<ProductRecord>,
    schema: &[SpecFieldDescriptor],
    differences_only: bool,
) -> ComparisonView<'a> {
    let (a, b) = (pair.first(), pair.second());
    let rows = filter_differences_only(build_rows(a, b, schema), a, b, differences_only);
    ComparisonView {
        first: a,
        second: b,
        complete: pair.is_complete(),
        differences_only,
        difference_count: count_differences(a, b, schema),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RecordId, Segment, SpecMap, SPEC_FIELDS};

    fn product(id: u64, specs: &[(&str, &str)]) -> ProductRecord {
        ProductRecord {
            id: RecordId::Number(id),
            product_name: format!("Phone {id}"),
            segment: Segment::Midrange,
            image_base64: None,
            spec_list: specs.iter().copied().collect::<SpecMap>(),
        }
    }

    #[test]
    fn test_loose_equal() {
        assert!(loose_equal(None, None));
        assert!(!loose_equal(None, Some("8")));
        assert!(!loose_equal(Some("8"), None));
        assert!(loose_equal(Some(" 8GB "), Some("8gb")));
        assert!(!loose_equal(Some("8"), Some("8.0")));
        assert!(!loose_equal(Some(""), None));
    }

    #[test]
    fn test_better_of() {
        assert_eq!(better_of(Some("8"), Some("12")), Winner::Second);
        assert_eq!(better_of(Some("12 GB"), Some("8 GB")), Winner::First);
        assert_eq!(better_of(Some("8"), Some("8")), Winner::Neither);
        assert_eq!(better_of(Some("8"), Some("8.0")), Winner::Neither);
        assert_eq!(better_of(Some("x"), Some("12")), Winner::Neither);
        assert_eq!(better_of(None, Some("12")), Winner::Neither);
    }

    #[test]
    fn test_build_rows_preserves_schema_order_and_length() {
        let a = product(1, &[("battery", "5000 mAh")]);
        let rows = build_rows(Some(&a), None, SPEC_FIELDS);

        assert_eq!(rows.len(), SPEC_FIELDS.len());
        let keys: Vec<&str> = rows.iter().map(|r| r.field_key).collect();
        let expected: Vec<&str> = SPEC_FIELDS.iter().map(|f| f.key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_build_rows_with_no_products() {
        let rows = build_rows(None, None, SPEC_FIELDS);
        assert_eq!(rows.len(), SPEC_FIELDS.len());
        assert!(rows.iter().all(|r| !r.is_different));
        assert!(rows.iter().all(|r| r.winner == Winner::Neither));
    }

    #[test]
    fn test_winner_only_for_numeric_fields() {
        let a = product(1, &[("cpu", "Chip 9"), ("ram", "8 GB")]);
        let b = product(2, &[("cpu", "Chip 12"), ("ram", "12 GB")]);
        let rows = build_rows(Some(&a), Some(&b), SPEC_FIELDS);

        let cpu = rows.iter().find(|r| r.field_key == "cpu").unwrap();
        assert!(cpu.is_different);
        assert_eq!(cpu.winner, Winner::Neither);

        let ram = rows.iter().find(|r| r.field_key == "ram").unwrap();
        assert!(ram.is_different);
        assert_eq!(ram.winner, Winner::Second);
    }

    #[test]
    fn test_missing_key_is_unknown_not_zero() {
        let a = product(1, &[("battery", "4000 mAh")]);
        let b = product(2, &[]);
        let rows = build_rows(Some(&a), Some(&b), SPEC_FIELDS);
        let battery = rows.iter().find(|r| r.field_key == "battery").unwrap();

        assert_eq!(battery.value_b, None);
        assert!(battery.is_different);
        assert_eq!(battery.winner, Winner::Neither);
    }

    #[test]
    fn test_filter_differences_only() {
        let a = product(1, &[("ram", "8 GB"), ("rom", "128 GB")]);
        let b = product(2, &[("ram", " 8 gb "), ("rom", "256 GB")]);

        let rows = build_rows(Some(&a), Some(&b), SPEC_FIELDS);
        let all = filter_differences_only(rows.clone(), Some(&a), Some(&b), false);
        assert_eq!(all, rows);

        let diff = filter_differences_only(rows, Some(&a), Some(&b), true);
        let keys: Vec<&str> = diff.iter().map(|r| r.field_key).collect();
        assert_eq!(keys, vec!["rom"]);
    }

    #[test]
    fn test_filter_is_identity_with_one_side_absent() {
        let a = product(1, &[("ram", "8 GB")]);
        let rows = build_rows(Some(&a), None, SPEC_FIELDS);
        let filtered = filter_differences_only(rows.clone(), Some(&a), None, true);
        assert_eq!(filtered, rows);
    }

    #[test]
    fn test_count_differences() {
        let a = product(1, &[("cpu", "Tensor G4"), ("ram", "12 GB")]);
        let b = product(2, &[("cpu", "tensor g4 "), ("ram", "16 GB")]);

        assert_eq!(count_differences(Some(&a), Some(&b), SPEC_FIELDS), 1);
        assert_eq!(count_differences(Some(&a), None, SPEC_FIELDS), 0);
        assert_eq!(count_differences(None, None, SPEC_FIELDS), 0);
    }

    #[test]
    fn test_meter_width_percent() {
        assert_eq!(meter_width_percent(Some(1.0), Some(1000.0)), 6);
        assert_eq!(meter_width_percent(Some(1000.0), Some(1000.0)), 100);
        assert_eq!(meter_width_percent(Some(500.0), Some(1000.0)), 50);
        assert_eq!(meter_width_percent(Some(2000.0), Some(1000.0)), 100);
        assert_eq!(meter_width_percent(None, Some(1000.0)), 0);
        assert_eq!(meter_width_percent(Some(50.0), Some(0.0)), 0);
        assert_eq!(meter_width_percent(Some(50.0), None), 0);
        assert_eq!(meter_width_percent(Some(0.0), Some(10.0)), 6);
    }

    #[test]
    fn test_row_meters() {
        let a = product(1, &[("battery", "4,000 mAh"), ("cpu", "A")]);
        let b = product(2, &[("battery", "5000 mAh")]);
        let rows = build_rows(Some(&a), Some(&b), SPEC_FIELDS);

        let battery = rows.iter().find(|r| r.field_key == "battery").unwrap();
        assert_eq!(battery.meters(), Some((80, 100)));

        let cpu = rows.iter().find(|r| r.field_key == "cpu").unwrap();
        assert_eq!(cpu.meters(), None);

        let ram = rows.iter().find(|r| r.field_key == "ram").unwrap();
        assert_eq!(ram.meters(), None);
    }

    #[test]
    fn test_row_meters_with_one_side_unknown() {
        let a = product(1, &[("rom", "256 GB")]);
        let rows = build_rows(Some(&a), None, SPEC_FIELDS);
        let rom = rows.iter().find(|r| r.field_key == "rom").unwrap();
        assert_eq!(rom.meters(), Some((100, 0)));
    }

    #[test]
    fn test_evaluate_complete_pair() {
        let mut pair = SelectionPair::new();
        pair.toggle(product(1, &[("ram", "8 GB"), ("cpu", "X")]));
        pair.toggle(product(2, &[("ram", "12 GB"), ("cpu", "x")]));

        let view = evaluate(&pair, SPEC_FIELDS, true);
        assert!(view.complete);
        assert_eq!(view.difference_count, 1);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].field_key, "ram");
        assert_eq!(view.rows[0].winner, Winner::Second);
    }

    #[test]
    fn test_evaluate_single_selection_keeps_all_rows() {
        let mut pair = SelectionPair::new();
        pair.toggle(product(1, &[("ram", "8 GB")]));

        let view = evaluate(&pair, SPEC_FIELDS, true);
        assert!(!view.complete);
        assert_eq!(view.difference_count, 0);
        assert_eq!(view.rows.len(), SPEC_FIELDS.len());
        assert!(view.second.is_none());
    }
}
