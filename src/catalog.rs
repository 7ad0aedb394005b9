//! Column classification.
//!
//! A column is numeric when its value in the *first* row parses as a finite
//! number. Later rows are not re-checked: a non-numeric value further down a
//! numeric column reads as NaN, is skipped when computing scale domains and
//! is never plotted or selected.

use std::collections::HashSet;

use crate::data::{parse_number, ColumnId, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub kind: ColumnKind,
    /// Number of distinct raw values over the whole dataset
    pub distinct: usize,
}

/// An entry of the color-variable chooser. `None` means no coloring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorOption {
    None,
    Variable(String),
}

impl ColorOption {
    pub fn label(&self) -> &str {
        match self {
            ColorOption::None => "None",
            ColorOption::Variable(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableCatalog {
    columns: Vec<Column>,
}

impl VariableCatalog {
    /// Classify every column from the first record.
    pub fn classify(data: &Dataset) -> Self {
        let Some(first) = data.rows.first() else {
            return Self::default();
        };

        let columns = data
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let id = ColumnId(i);
                let sample = first.get(i).map(String::as_str).unwrap_or("");
                let kind = if parse_number(sample).is_some() {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                };
                let distinct = data
                    .iter()
                    .map(|row| row.raw(id))
                    .collect::<HashSet<_>>()
                    .len();
                Column { id, name: name.clone(), kind, distinct }
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve `name` only if it is a numeric column.
    pub fn numeric(&self, name: &str) -> Option<ColumnId> {
        self.get(name)
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.id)
    }

    /// Resolve `name` only if it is a categorical column.
    pub fn categorical(&self, name: &str) -> Option<ColumnId> {
        self.get(name)
            .filter(|c| c.kind == ColumnKind::Categorical)
            .map(|c| c.id)
    }

    /// Numeric column names in header order.
    pub fn numeric_variables(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Color choices: the "no color" sentinel first, then categorical columns
    /// in header order.
    pub fn categorical_variables(&self) -> Vec<ColorOption> {
        std::iter::once(ColorOption::None)
            .chain(
                self.columns
                    .iter()
                    .filter(|c| c.kind == ColumnKind::Categorical)
                    .map(|c| ColorOption::Variable(c.name.clone())),
            )
            .collect()
    }

    /// Distinct value count, as shown next to drill options.
    pub fn distinct_count(&self, name: &str) -> Option<usize> {
        self.get(name).map(|c| c.distinct)
    }

    /// Label for a drill option, e.g. `petal_width (22)`.
    pub fn drill_label(&self, name: &str) -> Option<String> {
        self.distinct_count(name).map(|n| format!("{} ({})", name, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_classify_numeric_and_categorical() {
        let data = dataset(&["A", "B"], &[&["3.14", "red"]]);
        let catalog = VariableCatalog::classify(&data);
        assert_eq!(catalog.numeric_variables(), vec!["A"]);
        let options = catalog.categorical_variables();
        assert_eq!(
            options,
            vec![ColorOption::None, ColorOption::Variable("B".to_string())]
        );
        let labels: Vec<&str> = options.iter().map(ColorOption::label).collect();
        assert_eq!(labels, vec!["None", "B"]);
        assert_eq!(catalog.columns()[1].kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_classify_uses_first_row_only() {
        let data = dataset(&["a"], &[&["1"], &["oops"], &["3"]]);
        let catalog = VariableCatalog::classify(&data);
        assert_eq!(catalog.numeric("a"), Some(ColumnId(0)));
        assert!(data.row(1).number(ColumnId(0)).is_nan());
    }

    #[test]
    fn test_classify_empty_dataset() {
        let data = dataset(&["a", "b"], &[]);
        let catalog = VariableCatalog::classify(&data);
        assert!(catalog.numeric_variables().is_empty());
        assert_eq!(catalog.categorical_variables(), vec![ColorOption::None]);
    }

    #[test]
    fn test_header_order_preserved() {
        let data = dataset(&["z", "kind", "a", "m"], &[&["1", "x", "2", "3"]]);
        let catalog = VariableCatalog::classify(&data);
        assert_eq!(catalog.numeric_variables(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_empty_and_infinite_are_categorical() {
        let data = dataset(&["e", "i"], &[&["", "inf"]]);
        let catalog = VariableCatalog::classify(&data);
        assert!(catalog.numeric_variables().is_empty());
        assert_eq!(catalog.categorical("e"), Some(ColumnId(0)));
    }

    #[test]
    fn test_drill_label() {
        let data = dataset(&["w"], &[&["1"], &["2"], &["1"]]);
        let catalog = VariableCatalog::classify(&data);
        assert_eq!(catalog.drill_label("w"), Some("w (2)".to_string()));
        assert_eq!(catalog.drill_label("missing"), None);
    }
}
