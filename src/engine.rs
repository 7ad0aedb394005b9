use tracing::{debug, warn};

use crate::brush::{Highlight, SelectionBrush};
use crate::catalog::VariableCatalog;
use crate::data::{ColumnId, Dataset};
use crate::drill::DrillPlan;
use crate::ir::{CellId, Extent, GridLayoutResult, PointClass, SelectionRegion};
use crate::layout::layout;
use crate::palette::ColorClasses;
use crate::scale::ScaleSet;
use crate::view::ViewState;

/// Rebuild the whole grid from a view snapshot.
///
/// Pure: the same dataset and view always give the same result. Names in the
/// view that are not columns of the right kind are skipped.
pub fn rebuild(data: &Dataset, catalog: &VariableCatalog, view: &ViewState) -> GridLayoutResult {
    // 1. Color classes come from the unfiltered data so they stay stable
    let color_column = view.color_variable.as_deref().and_then(|name| {
        let col = catalog.categorical(name);
        if col.is_none() {
            warn!(variable = name, "color variable is not a categorical column, ignoring");
        }
        col
    });
    let colors = ColorClasses::new(data, color_column);

    // 2. Drop rows excluded by the color filter
    let filter = color_column.and(view.active_color_filter());
    let rows = colors.filter_rows(data, filter);

    // 3. Resolve variable names
    let included: Vec<(String, ColumnId)> = resolve_numeric(catalog, view.included_variables.iter());
    let mut drill: Vec<(String, ColumnId)> = Vec::new();
    for (name, id) in resolve_numeric(catalog, view.drill_variables.iter()) {
        if !drill.iter().any(|(n, _)| *n == name) {
            drill.push((name, id));
        }
    }
    let included_names: Vec<String> = included.iter().map(|(n, _)| n.clone()).collect();

    // 4. Drill plan, columns and rows of the grid
    let plan = DrillPlan::plan(&drill, data, &rows);
    let columns = plan.column_specs(&included_names);
    let y_variables = plan.y_variables(&included_names);

    // 5. Scales for every variable that can appear on an axis
    let mut scaled = included.clone();
    for var in &drill {
        if !scaled.iter().any(|(n, _)| *n == var.0) {
            scaled.push(var.clone());
        }
    }
    let scales = ScaleSet::build(&scaled, data, &rows, view.cell_size);

    // 6. Cells
    let cells = layout(&columns, &y_variables, data, &rows);

    debug!(
        rows = rows.len(),
        columns = columns.len(),
        y_variables = y_variables.len(),
        cells = cells.len(),
        "rebuilt scatter matrix"
    );

    GridLayoutResult {
        cells,
        columns,
        y_variables,
        scales,
        legend: colors.legend(filter),
        colors,
        plan,
        cell_size: view.cell_size,
    }
}

fn resolve_numeric<'a, I>(catalog: &VariableCatalog, names: I) -> Vec<(String, ColumnId)>
where
    I: Iterator<Item = &'a String>,
{
    names
        .filter_map(|name| match catalog.numeric(name) {
            Some(id) => Some((name.clone(), id)),
            None => {
                warn!(variable = name.as_str(), "not a numeric column, ignoring");
                None
            }
        })
        .collect()
}

/// Loaded dataset plus the latest layout and the active brush.
///
/// The caller owns the `ViewState`; after each mutation it calls
/// [`ScatterMatrix::rebuild`] and reads the new snapshot.
#[derive(Debug, Clone)]
pub struct ScatterMatrix {
    data: Dataset,
    catalog: VariableCatalog,
    layout: GridLayoutResult,
    brush: SelectionBrush,
    /// Brush predicate with its columns resolved, refreshed on every brush change
    highlight: Highlight,
}

impl ScatterMatrix {
    pub fn new(data: Dataset) -> Self {
        let catalog = VariableCatalog::classify(&data);
        Self {
            data,
            catalog,
            layout: GridLayoutResult::default(),
            brush: SelectionBrush::new(),
            highlight: Highlight::All,
        }
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &GridLayoutResult {
        &self.layout
    }

    pub fn brush(&self) -> &SelectionBrush {
        &self.brush
    }

    /// Starting view for this dataset.
    pub fn initial_view(&self) -> ViewState {
        ViewState::initial(&self.catalog)
    }

    /// Replace the layout and reattach the brush to the new cells.
    pub fn rebuild(&mut self, view: &ViewState) -> &GridLayoutResult {
        self.layout = rebuild(&self.data, &self.catalog, view);
        self.brush.reattach(&self.layout.cells);
        self.refresh_highlight();
        &self.layout
    }

    /// Begin a brush in `cell`. Unknown cells are ignored.
    pub fn brush_start(&mut self, cell: CellId) -> Option<SelectionRegion> {
        let grid_cell = self.layout.cell(cell)?;
        let cleared = self.brush.start(grid_cell);
        self.refresh_highlight();
        cleared
    }

    /// Drag the brush to a data-space rectangle.
    pub fn brush_update(&mut self, cell: CellId, extent: Extent) {
        if let Some(grid_cell) = self.layout.cell(cell) {
            self.brush.update(grid_cell, extent);
            self.refresh_highlight();
        }
    }

    /// Drag the brush between two cell-local pixel positions; converted to
    /// data space through the cell's scales.
    pub fn brush_update_pixels(&mut self, cell: CellId, from: (f64, f64), to: (f64, f64)) {
        let Some(grid_cell) = self.layout.cell(cell) else {
            return;
        };
        let (Some(x), Some(y)) = (
            self.layout.scales.x.get(&grid_cell.x_variable),
            self.layout.scales.y.get(&grid_cell.y_variable),
        ) else {
            return;
        };
        let extent = Extent::from_corners(
            (x.invert(from.0), y.invert(from.1)),
            (x.invert(to.0), y.invert(to.1)),
        );
        self.brush.update(grid_cell, extent);
        self.refresh_highlight();
    }

    pub fn brush_end(&mut self) {
        self.brush.end();
        self.refresh_highlight();
    }

    fn refresh_highlight(&mut self) {
        self.highlight = self.brush.highlight(&self.data);
    }

    /// Current brush predicate, resolved when the brush last changed.
    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Class a point is drawn with right now, taking the brush into account.
    pub fn point_class(&self, row: usize) -> PointClass {
        let class = self.layout.colors.class_of_row(&self.data, row);
        self.highlight.apply(self.data.row(row), class)
    }
}
