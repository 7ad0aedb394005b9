use tracing::warn;

use crate::data::{ColumnId, Dataset};
use crate::ir::{ColumnSpec, DrillFilter, FilterTerm};

/// Largest number of drilled grid columns. Combinations past this leave the
/// column axis empty.
pub const MAX_DRILL_COLUMNS: usize = 10_000;

/// A distinct observed value of a drill variable.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillValue {
    pub value: f64,
    pub label: String,
}

/// Column combinatorics for an ordered list of drill variables.
///
/// The first drill variable is the shared x-axis of every generated column and
/// does not partition anything, so it carries degree 1 and no values. Every
/// later variable contributes its sorted distinct values; the grid gets one
/// column per combination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrillPlan {
    pub variables: Vec<(String, ColumnId)>,
    pub values: Vec<Vec<DrillValue>>,
    pub degrees: Vec<usize>,
}

impl DrillPlan {
    /// Plan the drill over the given (already color-filtered) rows.
    pub fn plan(drill_variables: &[(String, ColumnId)], data: &Dataset, rows: &[usize]) -> Self {
        let mut values = Vec::with_capacity(drill_variables.len());
        let mut degrees = Vec::with_capacity(drill_variables.len());

        for (i, (_, column)) in drill_variables.iter().enumerate() {
            // Skip first one, since that's just the x axis
            if i == 0 {
                values.push(Vec::new());
                degrees.push(1);
                continue;
            }
            let distinct = distinct_values(data, rows, *column);
            degrees.push(distinct.len());
            values.push(distinct);
        }

        let plan = Self {
            variables: drill_variables.to_vec(),
            values,
            degrees,
        };
        if plan.is_active() && plan.total_columns() == 0 && plan.degrees.iter().all(|&d| d > 0) {
            warn!(
                degrees = ?plan.degrees,
                max = MAX_DRILL_COLUMNS,
                "too many drill combinations, leaving the column axis empty"
            );
        }
        plan
    }

    pub fn is_active(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Product of all degrees; 1 when nothing is drilled. A product that
    /// overflows or exceeds [`MAX_DRILL_COLUMNS`] counts as 0.
    pub fn total_columns(&self) -> usize {
        self.degrees
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .filter(|&n| n <= MAX_DRILL_COLUMNS)
            .unwrap_or(0)
    }

    /// The shared x-axis variable, if drilling.
    pub fn x_variable(&self) -> Option<&str> {
        self.variables.first().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|(v, _)| v == name)
    }

    /// Drill predicate for grid column `column`.
    ///
    /// Variables are consumed from last to second. The last one cycles fastest
    /// (`column % degree`); each earlier one is indexed by `column / capacity`,
    /// where capacity is the product of the degrees consumed so far. Returns
    /// `None` for an out-of-range column.
    pub fn filter_for_column(&self, column: usize) -> Option<DrillFilter> {
        if column >= self.total_columns() {
            return None;
        }
        let mut terms = Vec::new();
        let last = self.variables.len().saturating_sub(1);

        let mut capacity = 1;
        for i in (1..self.variables.len()).rev() {
            let degree = self.degrees[i];
            let index = if i == last {
                column % degree
            } else {
                (column / capacity) % degree
            };
            let value = &self.values[i][index];
            let (variable, id) = &self.variables[i];
            terms.push(FilterTerm {
                variable: variable.clone(),
                column: *id,
                value: value.value,
                label: value.label.clone(),
            });
            capacity *= degree;
        }

        Some(DrillFilter { terms })
    }

    /// Grid columns. Without drilling, one column per included variable;
    /// with drilling, `total_columns` columns sharing the first drill variable.
    pub fn column_specs(&self, included: &[String]) -> Vec<ColumnSpec> {
        match self.x_variable() {
            None => included
                .iter()
                .map(|v| ColumnSpec { x_variable: v.clone(), filter: DrillFilter::default() })
                .collect(),
            Some(x) => (0..self.total_columns())
                .filter_map(|c| self.filter_for_column(c))
                .map(|filter| ColumnSpec { x_variable: x.to_string(), filter })
                .collect(),
        }
    }

    /// Row variables: included variables minus every drill variable.
    pub fn y_variables(&self, included: &[String]) -> Vec<String> {
        included
            .iter()
            .filter(|v| !self.contains(v))
            .cloned()
            .collect()
    }
}

/// Rows (out of `rows`) that satisfy every term of `filter`.
pub fn apply_filter(filter: &DrillFilter, data: &Dataset, rows: &[usize]) -> Vec<usize> {
    rows.iter()
        .copied()
        .filter(|&r| {
            let row = data.row(r);
            filter.terms.iter().all(|t| row.number(t.column) == t.value)
        })
        .collect()
}

/// Sorted distinct finite values of a column; each keeps its first raw text.
fn distinct_values(data: &Dataset, rows: &[usize], column: ColumnId) -> Vec<DrillValue> {
    let mut values: Vec<DrillValue> = Vec::new();
    for &r in rows {
        let row = data.row(r);
        let v = row.number(column);
        if v.is_nan() || values.iter().any(|d| d.value == v) {
            continue;
        }
        values.push(DrillValue { value: v, label: row.raw(column).trim().to_string() });
    }
    values.sort_by(|a, b| a.value.total_cmp(&b.value));
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // X free, Y in {1,2,3}, Z in {10,20}
    fn make_data() -> Dataset {
        let mut rows = Vec::new();
        for y in ["3", "1", "2"] {
            for z in ["20", "10"] {
                for x in ["0.5", "1.5"] {
                    rows.push(vec![x.to_string(), y.to_string(), z.to_string()]);
                }
            }
        }
        Dataset::new(vec!["X".into(), "Y".into(), "Z".into()], rows)
    }

    fn vars(names: &[&str], data: &Dataset) -> Vec<(String, ColumnId)> {
        names
            .iter()
            .map(|n| (n.to_string(), data.column(n).unwrap()))
            .collect()
    }

    fn all_rows(data: &Dataset) -> Vec<usize> {
        (0..data.len()).collect()
    }

    #[test]
    fn test_no_drill() {
        let data = make_data();
        let plan = DrillPlan::plan(&[], &data, &all_rows(&data));
        assert!(!plan.is_active());
        assert_eq!(plan.total_columns(), 1);
        let included = vec!["X".to_string(), "Y".to_string()];
        let cols = plan.column_specs(&included);
        assert_eq!(cols.len(), 2);
        assert!(cols.iter().all(|c| c.filter.is_empty()));
        assert_eq!(plan.y_variables(&included), included);
    }

    #[test]
    fn test_single_drill_variable() {
        let data = make_data();
        let plan = DrillPlan::plan(&vars(&["Y"], &data), &data, &all_rows(&data));
        assert_eq!(plan.total_columns(), 1);
        let included = vec!["X".to_string(), "Y".to_string(), "Z".to_string()];
        let cols = plan.column_specs(&included);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].x_variable, "Y");
        assert!(cols[0].filter.is_empty());
        assert_eq!(plan.y_variables(&included), vec!["X", "Z"]);
    }

    #[test]
    fn test_drill_combinatorics() {
        let data = make_data();
        let plan = DrillPlan::plan(&vars(&["X", "Y", "Z"], &data), &data, &all_rows(&data));
        assert_eq!(plan.degrees, vec![1, 3, 2]);
        assert_eq!(plan.total_columns(), 6);

        let y_vals: Vec<f64> = plan.values[1].iter().map(|v| v.value).collect();
        assert_eq!(y_vals, vec![1.0, 2.0, 3.0]);

        // Column 4: Z = Z[4 % 2], Y = Y[4 / 2]
        let filter = plan.filter_for_column(4).unwrap();
        assert_eq!(filter.terms[0].variable, "Z");
        assert_eq!(filter.terms[0].value, 10.0);
        assert_eq!(filter.terms[1].variable, "Y");
        assert_eq!(filter.terms[1].value, 3.0);
        assert!(plan.filter_for_column(6).is_none());

        let filters: Vec<DrillFilter> = (0..6).map(|c| plan.filter_for_column(c).unwrap()).collect();
        for i in 0..6 {
            for j in (i + 1)..6 {
                assert_ne!(filters[i], filters[j]);
            }
        }
    }

    #[test]
    fn test_drill_partition() {
        let data = make_data();
        let rows = all_rows(&data);
        let plan = DrillPlan::plan(&vars(&["X", "Y", "Z"], &data), &data, &rows);

        let mut seen = HashSet::new();
        for spec in plan.column_specs(&[]) {
            let subset = apply_filter(&spec.filter, &data, &rows);
            assert_eq!(subset.len(), 2);
            for r in subset {
                assert!(seen.insert(r), "row {} in two columns", r);
            }
        }
        assert_eq!(seen.len(), rows.len());
    }

    #[test]
    fn test_three_partitioning_variables() {
        let mut rows = Vec::new();
        for a in ["0", "1"] {
            for b in ["0", "1"] {
                for c in ["0", "1"] {
                    rows.push(vec!["1".to_string(), a.to_string(), b.to_string(), c.to_string()]);
                }
            }
        }
        let data = Dataset::new(vec!["X".into(), "A".into(), "B".into(), "C".into()], rows);
        let all = all_rows(&data);
        let plan = DrillPlan::plan(&vars(&["X", "A", "B", "C"], &data), &data, &all);
        assert_eq!(plan.total_columns(), 8);

        let mut seen = HashSet::new();
        for spec in plan.column_specs(&[]) {
            let subset = apply_filter(&spec.filter, &data, &all);
            assert_eq!(subset.len(), 1);
            seen.insert(subset[0]);
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_drill_values_sorted_numerically() {
        let data = Dataset::new(
            vec!["X".into(), "N".into()],
            vec![
                vec!["0".into(), "10".into()],
                vec!["0".into(), "9".into()],
                vec!["0".into(), "10.0".into()],
                vec!["0".into(), "n/a".into()],
            ],
        );
        let plan = DrillPlan::plan(&vars(&["X", "N"], &data), &data, &all_rows(&data));
        let labels: Vec<&str> = plan.values[1].iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["9", "10"]);
        // The unparseable row belongs to no column
        let covered: usize = plan
            .column_specs(&[])
            .iter()
            .map(|s| apply_filter(&s.filter, &data, &all_rows(&data)).len())
            .sum();
        assert_eq!(covered, 3);
    }

    #[test]
    fn test_too_many_combinations_gives_no_columns() {
        // X plus 6 partitioning columns with 1700 distinct values each
        let n = 1700;
        let headers: Vec<String> = ["X", "A", "B", "C", "D", "E", "F"].iter().map(|s| s.to_string()).collect();
        let rows: Vec<Vec<String>> = (0..n).map(|i| vec![i.to_string(); headers.len()]).collect();
        let data = Dataset::new(headers.clone(), rows);
        let names: Vec<&str> = headers.iter().map(String::as_str).collect();
        let plan = DrillPlan::plan(&vars(&names, &data), &data, &all_rows(&data));

        assert_eq!(plan.degrees[1..], [n; 6]);
        assert_eq!(plan.total_columns(), 0);
        assert!(plan.column_specs(&[]).is_empty());
        assert!(plan.filter_for_column(0).is_none());
    }

    #[test]
    fn test_column_cap_is_inclusive() {
        // 100 x 100 combinations sit exactly at the cap
        let rows: Vec<Vec<String>> = (0..100)
            .map(|i| vec!["0".to_string(), i.to_string(), i.to_string()])
            .collect();
        let data = Dataset::new(vec!["X".into(), "A".into(), "B".into()], rows);
        let plan = DrillPlan::plan(&vars(&["X", "A", "B"], &data), &data, &all_rows(&data));
        assert_eq!(plan.total_columns(), MAX_DRILL_COLUMNS);
    }

    #[test]
    fn test_drill_over_filtered_rows() {
        let data = make_data();
        // Only rows with Y = 1
        let rows: Vec<usize> = (0..data.len())
            .filter(|&r| data.row(r).number(ColumnId(1)) == 1.0)
            .collect();
        let plan = DrillPlan::plan(&vars(&["X", "Y"], &data), &data, &rows);
        assert_eq!(plan.degrees, vec![1, 1]);
        assert_eq!(plan.total_columns(), 1);
    }
}
