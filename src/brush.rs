use tracing::debug;

use crate::data::{ColumnId, Dataset, Row};
use crate::ir::{Extent, GridCell, PointClass, SelectionRegion};

/// The single active brush of the grid.
///
/// `start`, `update` and `end` mirror a press, drag and release inside one
/// cell. There is never more than one region; starting in another cell drops
/// the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionBrush {
    active: Option<SelectionRegion>,
}

impl SelectionBrush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&SelectionRegion> {
        self.active.as_ref()
    }

    /// Bind a fresh empty region to `cell`. Returns the region that was
    /// cleared from a different cell, if any, so its overlay can be erased.
    pub fn start(&mut self, cell: &GridCell) -> Option<SelectionRegion> {
        let cleared = match self.active.take() {
            Some(prev) if prev.cell != cell.id => {
                debug!(column = prev.cell.column, row = prev.cell.row, "clearing brush in other cell");
                Some(prev)
            }
            _ => None,
        };
        self.active = Some(SelectionRegion {
            cell: cell.id,
            x_variable: cell.x_variable.clone(),
            y_variable: cell.y_variable.clone(),
            extent: None,
        });
        cleared
    }

    /// Replace the region's rectangle. A drag reported for a cell other than
    /// the active one starts a brush there first.
    pub fn update(&mut self, cell: &GridCell, extent: Extent) {
        let bound = matches!(&self.active, Some(region) if region.cell == cell.id);
        if !bound {
            self.start(cell);
        }
        if let Some(region) = self.active.as_mut() {
            region.extent = Some(Extent::from_corners(
                (extent.x.0, extent.y.0),
                (extent.x.1, extent.y.1),
            ));
        }
    }

    /// Finish the gesture. A missing or zero-area rectangle clears the brush.
    pub fn end(&mut self) {
        let empty = match &self.active {
            Some(region) => region.extent.map_or(true, |e| e.is_empty()),
            None => false,
        };
        if empty {
            self.active = None;
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Keep the region across a rebuild only if its cell still exists with the
    /// same variable pair.
    pub fn reattach(&mut self, cells: &[GridCell]) {
        let keep = match &self.active {
            Some(region) => cells.iter().any(|c| {
                c.id == region.cell
                    && c.x_variable == region.x_variable
                    && c.y_variable == region.y_variable
            }),
            None => true,
        };
        if !keep {
            debug!("active brush no longer matches a cell, dropping it");
            self.active = None;
        }
    }

    /// Resolve the current selection against the dataset columns.
    pub fn highlight(&self, data: &Dataset) -> Highlight {
        let Some(region) = &self.active else {
            return Highlight::All;
        };
        let Some(extent) = region.extent else {
            return Highlight::All;
        };
        match (data.column(&region.x_variable), data.column(&region.y_variable)) {
            (Some(x), Some(y)) => Highlight::Region { x, y, extent },
            _ => Highlight::All,
        }
    }
}

/// Selection predicate shared by every cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Highlight {
    /// No selection: every point keeps its class
    All,
    Region { x: ColumnId, y: ColumnId, extent: Extent },
}

impl Highlight {
    pub fn selects(&self, row: Row<'_>) -> bool {
        match self {
            Highlight::All => true,
            Highlight::Region { x, y, extent } => extent.contains(row.number(*x), row.number(*y)),
        }
    }

    /// Class to draw a point with, given its normal color class.
    pub fn apply(&self, row: Row<'_>, class: PointClass) -> PointClass {
        if self.selects(row) { class } else { PointClass::Unclassified }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CellId, DrillFilter};

    fn cell(column: usize, row: usize, x: &str, y: &str) -> GridCell {
        GridCell {
            id: CellId { column, row },
            x_variable: x.into(),
            y_variable: y.into(),
            filter: DrillFilter::default(),
            rows: Vec::new().into(),
        }
    }

    fn make_data() -> Dataset {
        Dataset::new(
            vec!["a".into(), "b".into()],
            vec![
                vec!["1".into(), "1".into()],
                vec!["2".into(), "5".into()],
                vec!["4".into(), "4".into()],
                vec!["x".into(), "2".into()],
            ],
        )
    }

    fn rect(x0: f64, x1: f64, y0: f64, y1: f64) -> Extent {
        Extent { x: (x0, x1), y: (y0, y1) }
    }

    #[test]
    fn test_start_binds_empty_region() {
        let mut brush = SelectionBrush::new();
        let c = cell(0, 1, "a", "b");
        assert!(brush.start(&c).is_none());
        let region = brush.active().unwrap();
        assert_eq!(region.cell, c.id);
        assert!(region.extent.is_none());
    }

    #[test]
    fn test_start_other_cell_clears() {
        let mut brush = SelectionBrush::new();
        let first = cell(0, 1, "a", "b");
        let second = cell(1, 0, "b", "a");
        brush.start(&first);
        brush.update(&first, rect(0.0, 3.0, 0.0, 3.0));
        let cleared = brush.start(&second).unwrap();
        assert_eq!(cleared.cell, first.id);
        assert_eq!(brush.active().unwrap().cell, second.id);
        assert!(brush.active().unwrap().extent.is_none());
    }

    #[test]
    fn test_start_twice_same_cell_stays_empty() {
        let mut brush = SelectionBrush::new();
        let c = cell(0, 0, "a", "b");
        brush.start(&c);
        assert!(brush.start(&c).is_none());
        assert!(brush.active().unwrap().extent.is_none());
        assert_eq!(brush.highlight(&make_data()), Highlight::All);
    }

    #[test]
    fn test_update_selects_across_grid() {
        let data = make_data();
        let mut brush = SelectionBrush::new();
        let c = cell(0, 1, "a", "b");
        brush.start(&c);
        // Corners given in reverse order
        brush.update(&c, rect(2.5, 0.5, 4.5, 0.5));
        let hl = brush.highlight(&data);
        let selected: Vec<bool> = data.iter().map(|r| hl.selects(r)).collect();
        assert_eq!(selected, vec![true, false, false, false]);
        assert_eq!(hl.apply(data.row(1), PointClass::Class(0)), PointClass::Unclassified);
        assert_eq!(hl.apply(data.row(0), PointClass::Class(0)), PointClass::Class(0));
    }

    #[test]
    fn test_bounds_inclusive() {
        let data = make_data();
        let mut brush = SelectionBrush::new();
        let c = cell(0, 0, "a", "b");
        brush.update(&c, rect(2.0, 4.0, 4.0, 5.0));
        let hl = brush.highlight(&data);
        assert!(hl.selects(data.row(1)));
        assert!(hl.selects(data.row(2)));
        // NaN coordinate is never selected
        assert!(!hl.selects(data.row(3)));
    }

    #[test]
    fn test_end_empty_clears() {
        let mut brush = SelectionBrush::new();
        let c = cell(0, 0, "a", "b");
        brush.start(&c);
        brush.end();
        assert!(brush.active().is_none());

        brush.start(&c);
        brush.update(&c, rect(1.0, 1.0, 0.0, 5.0));
        brush.end();
        assert!(brush.active().is_none());
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut brush = SelectionBrush::new();
        let c = cell(0, 0, "a", "b");
        brush.start(&c);
        brush.update(&c, rect(0.0, 2.0, 0.0, 2.0));
        brush.end();
        let after_first = brush.clone();
        brush.end();
        assert_eq!(brush, after_first);
        assert!(brush.active().is_some());

        brush.clear();
        assert_eq!(brush.highlight(&make_data()), Highlight::All);
    }

    #[test]
    fn test_reattach() {
        let mut brush = SelectionBrush::new();
        let c = cell(1, 0, "a", "b");
        brush.update(&c, rect(0.0, 2.0, 0.0, 2.0));

        brush.reattach(&[cell(0, 0, "a", "a"), cell(1, 0, "a", "b")]);
        assert!(brush.active().is_some());

        brush.reattach(&[cell(1, 0, "b", "b")]);
        assert!(brush.active().is_none());
    }
}
