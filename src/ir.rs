use std::sync::Arc;

use crate::data::ColumnId;
use crate::drill::DrillPlan;
use crate::palette::ColorClasses;
use crate::scale::ScaleSet;

// =============================================================================
// Phase 1: Scaling
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub domain: (f64, f64), // Data min/max
    pub range: (f64, f64),  // Pixel/Coordinate start/end (end < start when inverted)
}

// =============================================================================
// Phase 2: Layout
// =============================================================================

/// Drill predicate of one grid column: `(variable, required value)` pairs,
/// ordered from the last drill variable to the second.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrillFilter {
    pub terms: Vec<FilterTerm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterTerm {
    pub variable: String,
    pub column: ColumnId,
    pub value: f64,
    pub label: String, // First observed raw text of the value
}

impl DrillFilter {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Caption lines shown under a drilled column, e.g. `"2: cyl"`.
    pub fn captions(&self) -> Vec<String> {
        self.terms
            .iter()
            .map(|t| format!("{}: {}", t.label, t.variable))
            .collect()
    }
}

/// One column of the grid: its x variable and its drill predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub x_variable: String,
    pub filter: DrillFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub id: CellId,
    pub x_variable: String,
    pub y_variable: String,
    pub filter: DrillFilter,
    pub rows: Arc<[usize]>, // Dataset indices, shared by every cell of a column
}

/// Stable visual class of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointClass {
    /// No color variable: every point shares one style
    Constant,
    /// Index of the point's color value
    Class(usize),
    /// Outside the active brush
    Unclassified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub value: String,
    pub class: usize,
}

/// Everything a rebuild produces. Replaced wholesale on each rebuild.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLayoutResult {
    pub cells: Vec<GridCell>,
    pub columns: Vec<ColumnSpec>,
    pub y_variables: Vec<String>,
    pub scales: ScaleSet,
    pub legend: Vec<LegendEntry>,
    pub colors: ColorClasses,
    pub plan: DrillPlan,
    pub cell_size: f64,
}

impl GridLayoutResult {
    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// =============================================================================
// Phase 3: Selection
// =============================================================================

/// Rectangle in the data space of a cell's two variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Extent {
    /// Build an extent from two corners in any order.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: (a.0.min(b.0), a.0.max(b.0)),
            y: (a.1.min(b.1), a.1.max(b.1)),
        }
    }

    /// Zero width or zero height.
    pub fn is_empty(&self) -> bool {
        !(self.x.1 > self.x.0 && self.y.1 > self.y.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x.0 <= x && x <= self.x.1 && self.y.0 <= y && y <= self.y.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRegion {
    pub cell: CellId,
    pub x_variable: String,
    pub y_variable: String,
    pub extent: Option<Extent>,
}

// =============================================================================
// Phase 4: Compilation (Scene Graph)
// =============================================================================

/// A list of primitive drawing commands.
/// The Backend just executes these blindly.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub panels: Vec<PanelScene>,
    pub commands: Vec<DrawCommand>, // Axes, titles and legend (canvas coordinates)
}

#[derive(Debug, Clone)]
pub struct PanelScene {
    pub id: CellId,
    pub origin: (f64, f64), // Top-left corner on the canvas
    pub size: f64,
    pub commands: Vec<DrawCommand>, // Cell-local coordinates
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    DrawLine {
        points: Vec<(f64, f64)>,
    },
    DrawPoint {
        center: (f64, f64),
        radius: f64,
        class: PointClass,
    },
    DrawFrame {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
    },
    DrawBrush {
        tl: (f64, f64),
        br: (f64, f64),
    },
    DrawText {
        position: (f64, f64),
        text: String,
        anchor: TextAnchor,
        rotated: bool,
    },
}
