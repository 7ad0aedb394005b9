use std::collections::BTreeSet;

use serde::Deserialize;

use crate::catalog::VariableCatalog;

pub const DEFAULT_CELL_SIZE: f64 = 140.0;
const MIN_CELL_SIZE: f64 = 20.0;
pub const MAX_CELL_SIZE: f64 = 2000.0;

/// Caller-owned view configuration.
///
/// The engine only ever reads it; every mutation is followed by a rebuild.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Numeric variables shown in the grid, in ascending name order
    pub included_variables: BTreeSet<String>,
    pub color_variable: Option<String>,
    /// Allowed values of the color variable; `None` allows all
    pub color_value_filter: Option<BTreeSet<String>>,
    /// Order matters: the first is the shared x-axis
    pub drill_variables: Vec<String>,
    pub cell_size: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            included_variables: BTreeSet::new(),
            color_variable: None,
            color_value_filter: None,
            drill_variables: Vec::new(),
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl ViewState {
    /// Initial view: every numeric variable included, nothing drilled or colored.
    pub fn initial(catalog: &VariableCatalog) -> Self {
        Self {
            included_variables: catalog
                .numeric_variables()
                .into_iter()
                .map(str::to_string)
                .collect(),
            ..Self::default()
        }
    }

    /// Clamp values that would make the layout meaningless.
    pub fn sanitized(mut self) -> Self {
        if !self.cell_size.is_finite() {
            self.cell_size = DEFAULT_CELL_SIZE;
        }
        self.cell_size = self.cell_size.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE);
        self
    }

    pub fn toggle_included(&mut self, variable: &str) {
        if !self.included_variables.remove(variable) {
            self.included_variables.insert(variable.to_string());
        }
    }

    /// Remove a drill variable (keeping the others in order) or append it.
    pub fn toggle_drill(&mut self, variable: &str) {
        if let Some(pos) = self.drill_variables.iter().position(|v| v == variable) {
            self.drill_variables.remove(pos);
        } else {
            self.drill_variables.push(variable.to_string());
        }
    }

    /// Choose the color variable. The value filter resets to "all allowed".
    pub fn set_color_variable(&mut self, variable: Option<&str>) {
        self.color_variable = variable.map(str::to_string);
        self.color_value_filter = None;
    }

    /// Flip one color value in or out of the filter. `all_values` seeds the
    /// filter the first time it is touched.
    pub fn toggle_color_value(&mut self, value: &str, all_values: &[String]) {
        if self.color_variable.is_none() {
            return;
        }
        let filter = self
            .color_value_filter
            .get_or_insert_with(|| all_values.iter().cloned().collect());
        if !filter.remove(value) {
            filter.insert(value.to_string());
        }
    }

    /// The value filter, only when a color variable is set.
    pub fn active_color_filter(&self) -> Option<&BTreeSet<String>> {
        self.color_variable.as_ref().and(self.color_value_filter.as_ref())
    }

    pub fn shrink_cells(&mut self) {
        self.cell_size = (self.cell_size * 0.75).max(MIN_CELL_SIZE);
    }

    pub fn grow_cells(&mut self) {
        self.cell_size = (self.cell_size * 1.25).min(MAX_CELL_SIZE);
    }
}
