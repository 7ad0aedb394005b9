use std::collections::{BTreeSet, HashMap};

use plotters::style::RGBColor;

use crate::data::{ColumnId, Dataset};
use crate::ir::{LegendEntry, PointClass};

/// Stable class indices for the values of the color variable.
///
/// Indices follow first-seen order over the *unfiltered* dataset, so a
/// value keeps its color when other values are filtered out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorClasses {
    column: Option<ColumnId>,
    values: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColorClasses {
    pub fn new(data: &Dataset, column: Option<ColumnId>) -> Self {
        let mut classes = ColorClasses { column, ..Default::default() };
        if let Some(col) = column {
            for row in data.iter() {
                let v = row.raw(col);
                if !classes.index.contains_key(v) {
                    classes.index.insert(v.to_string(), classes.values.len());
                    classes.values.push(v.to_string());
                }
            }
        }
        classes
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Class of a raw color value.
    pub fn class_of(&self, value: &str) -> PointClass {
        match self.column {
            None => PointClass::Constant,
            Some(_) => self
                .index
                .get(value)
                .map(|&i| PointClass::Class(i))
                .unwrap_or(PointClass::Unclassified),
        }
    }

    /// Class of a dataset row.
    pub fn class_of_row(&self, data: &Dataset, row: usize) -> PointClass {
        match self.column {
            None => PointClass::Constant,
            Some(col) => self.class_of(data.row(row).raw(col)),
        }
    }

    /// Rows surviving the value filter. Excluded rows are dropped entirely.
    pub fn filter_rows(&self, data: &Dataset, allowed: Option<&BTreeSet<String>>) -> Vec<usize> {
        match (self.column, allowed) {
            (Some(col), Some(allowed)) => (0..data.len())
                .filter(|&r| allowed.contains(data.row(r).raw(col)))
                .collect(),
            _ => (0..data.len()).collect(),
        }
    }

    /// Legend entries: surviving values with their stable class, in class order.
    pub fn legend(&self, allowed: Option<&BTreeSet<String>>) -> Vec<LegendEntry> {
        if self.column.is_none() {
            return Vec::new();
        }
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| allowed.map_or(true, |a| a.contains(*v)))
            .map(|(class, v)| LegendEntry { value: v.clone(), class })
            .collect()
    }
}

/// Categorical color palette used by the backend
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    pub fn category10() -> Self {
        Self {
            colors: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
        }
    }

    /// Fill color for a point class; `None` for unclassified points, which
    /// the backend greys out.
    pub fn color(&self, class: PointClass) -> Option<RGBColor> {
        match class {
            PointClass::Constant => Some(self.colors[2]),
            PointClass::Class(i) => Some(self.colors[i % self.colors.len()]),
            PointClass::Unclassified => None,
        }
    }
}
