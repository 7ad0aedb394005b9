use std::sync::Arc;

use crate::data::Dataset;
use crate::drill::apply_filter;
use crate::ir::{CellId, ColumnSpec, GridCell};

/// Enumerate grid cells as the cross product of columns and row variables.
///
/// Cells are ordered column by column; within a column, row index increases
/// fastest. This order is stable across rebuilds, which is what lets the
/// active brush find its cell again. `rows` is the color-filtered dataset;
/// each cell keeps the subset matching its column's drill predicate.
pub fn layout(
    columns: &[ColumnSpec],
    y_variables: &[String],
    data: &Dataset,
    rows: &[usize],
) -> Vec<GridCell> {
    // If no data, don't do anything
    if rows.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::with_capacity(columns.len() * y_variables.len());
    for (i, column) in columns.iter().enumerate() {
        let subset: Arc<[usize]> = if column.filter.is_empty() {
            Arc::from(rows)
        } else {
            apply_filter(&column.filter, data, rows).into()
        };

        for (j, y) in y_variables.iter().enumerate() {
            cells.push(GridCell {
                id: CellId { column: i, row: j },
                x_variable: column.x_variable.clone(),
                y_variable: y.clone(),
                filter: column.filter.clone(),
                rows: Arc::clone(&subset),
            });
        }
    }

    cells
}
