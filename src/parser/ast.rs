// Abstract Syntax Tree for the view DSL

use std::collections::BTreeSet;

use crate::ir::{CellId, Extent};
use crate::view::ViewState;

/// Parsed view pipeline, applied in order on top of a base ViewState
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewSpec {
    pub commands: Vec<ViewCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    /// Replace the included variable set
    Include(Vec<String>),
    /// Replace the ordered drill list
    Drill(Vec<String>),
    /// Set (or with no argument, clear) the color variable
    Color(Option<String>),
    /// Restrict the allowed color values
    Filter(Vec<String>),
    /// Cell size in pixels
    Size(f64),
    /// Brush a data-space rectangle in one cell
    Brush(BrushSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSpec {
    pub cell: CellId,
    pub extent: Extent,
}

impl ViewSpec {
    /// Apply every state command to `view`; brush commands are skipped.
    pub fn apply(&self, view: &mut ViewState) {
        for command in &self.commands {
            match command {
                ViewCommand::Include(vars) => {
                    view.included_variables = vars.iter().cloned().collect();
                }
                ViewCommand::Drill(vars) => view.drill_variables = vars.clone(),
                ViewCommand::Color(var) => view.set_color_variable(var.as_deref()),
                ViewCommand::Filter(values) => {
                    view.color_value_filter = Some(values.iter().cloned().collect::<BTreeSet<_>>());
                }
                ViewCommand::Size(size) => view.cell_size = *size,
                ViewCommand::Brush(_) => {}
            }
        }
    }

    /// The last brush command, if any.
    pub fn brush(&self) -> Option<BrushSpec> {
        self.commands.iter().rev().find_map(|c| match c {
            ViewCommand::Brush(b) => Some(*b),
            _ => None,
        })
    }
}
