use crate::brush::Highlight;
use crate::data::Dataset;
use crate::ir::{
    DrawCommand, GridCell, GridLayoutResult, PanelScene, PointClass, SceneGraph,
    SelectionRegion, TextAnchor,
};
use crate::scale::{format_tick, CELL_PADDING};

// Size parameters
pub const AXIS_WIDTH: f64 = 20.0;
pub const AXIS_HEIGHT: f64 = 15.0;
pub const LEGEND_WIDTH: f64 = 200.0;
pub const LABEL_HEIGHT: f64 = 15.0;
pub const POINT_RADIUS: f64 = 5.0;
const LEGEND_RADIUS: f64 = 3.0;
const LEGEND_SPACING: f64 = 20.0;
const TICK_COUNT: usize = 5;

/// Compile a layout snapshot into a SceneGraph of drawing commands
pub fn compile_scene(
    layout: &GridLayoutResult,
    data: &Dataset,
    highlight: &Highlight,
    brush: Option<&SelectionRegion>,
) -> SceneGraph {
    let size = layout.cell_size;
    let ncol = layout.columns.len() as f64;
    let nrow = layout.y_variables.len() as f64;
    let filter_descriptions = layout.plan.variables.len().saturating_sub(1) as f64;

    let width = LABEL_HEIGHT + size * ncol + AXIS_WIDTH + CELL_PADDING + LEGEND_WIDTH;
    let height = size * nrow + AXIS_HEIGHT + LABEL_HEIGHT + LABEL_HEIGHT * filter_descriptions;

    let mut scene = SceneGraph {
        width: width.ceil() as u32,
        height: height.ceil() as u32,
        panels: Vec::new(),
        commands: Vec::new(),
    };

    // If no cells, don't draw anything
    if layout.is_empty() {
        return scene;
    }

    compile_axes(layout, &mut scene.commands);
    compile_legend(layout, &mut scene.commands);

    for cell in &layout.cells {
        scene.panels.push(compile_cell(layout, cell, data, highlight, brush));
    }

    scene
}

/// Tick lines spanning the whole grid plus their labels.
fn compile_axes(layout: &GridLayoutResult, commands: &mut Vec<DrawCommand>) {
    let size = layout.cell_size;
    let grid_w = size * layout.columns.len() as f64;
    let grid_h = size * layout.y_variables.len() as f64;

    for (i, column) in layout.columns.iter().enumerate() {
        let Some(scale) = layout.scales.x.get(&column.x_variable) else { continue };
        let left = LABEL_HEIGHT + i as f64 * size;
        for tick in scale.ticks(TICK_COUNT) {
            let x = left + scale.apply(tick);
            commands.push(DrawCommand::DrawLine { points: vec![(x, 0.0), (x, grid_h)] });
            commands.push(DrawCommand::DrawText {
                position: (x, grid_h + 2.0),
                text: format_tick(tick),
                anchor: TextAnchor::Middle,
                rotated: false,
            });
        }
    }

    for (j, variable) in layout.y_variables.iter().enumerate() {
        let Some(scale) = layout.scales.y.get(variable) else { continue };
        let top = j as f64 * size;
        for tick in scale.ticks(TICK_COUNT) {
            let y = top + scale.apply(tick);
            commands.push(DrawCommand::DrawLine {
                points: vec![(LABEL_HEIGHT, y), (LABEL_HEIGHT + grid_w, y)],
            });
            commands.push(DrawCommand::DrawText {
                position: (LABEL_HEIGHT + grid_w + 2.0, y),
                text: format_tick(tick),
                anchor: TextAnchor::Start,
                rotated: false,
            });
        }
    }
}

fn compile_legend(layout: &GridLayoutResult, commands: &mut Vec<DrawCommand>) {
    let left = 2.0 * LABEL_HEIGHT + layout.cell_size * layout.columns.len() as f64 + CELL_PADDING;
    for (i, entry) in layout.legend.iter().enumerate() {
        let y = i as f64 * LEGEND_SPACING + 10.0;
        commands.push(DrawCommand::DrawPoint {
            center: (left, y),
            radius: LEGEND_RADIUS,
            class: PointClass::Class(entry.class),
        });
        commands.push(DrawCommand::DrawText {
            position: (left + 12.0, y),
            text: entry.value.clone(),
            anchor: TextAnchor::Start,
            rotated: false,
        });
    }
}

fn compile_cell(
    layout: &GridLayoutResult,
    cell: &GridCell,
    data: &Dataset,
    highlight: &Highlight,
    brush: Option<&SelectionRegion>,
) -> PanelScene {
    let size = layout.cell_size;
    let mut commands = Vec::new();

    // Frame
    commands.push(DrawCommand::DrawFrame {
        tl: (CELL_PADDING / 2.0, CELL_PADDING / 2.0),
        br: (size - CELL_PADDING / 2.0, size - CELL_PADDING / 2.0),
    });

    let scales = (
        layout.scales.x.get(&cell.x_variable),
        layout.scales.y.get(&cell.y_variable),
    );
    let columns = (data.column(&cell.x_variable), data.column(&cell.y_variable));

    // Scatter plot dots
    if let ((Some(sx), Some(sy)), (Some(cx), Some(cy))) = (scales, columns) {
        for &r in cell.rows.iter() {
            let row = data.row(r);
            let (vx, vy) = (row.number(cx), row.number(cy));
            if vx.is_nan() || vy.is_nan() {
                continue;
            }
            let class = highlight.apply(row, layout.colors.class_of_row(data, r));
            commands.push(DrawCommand::DrawPoint {
                center: (sx.apply(vx), sy.apply(vy)),
                radius: POINT_RADIUS,
                class,
            });
        }

        // Active brush rectangle
        if let Some(extent) = brush.filter(|b| b.cell == cell.id).and_then(|b| b.extent) {
            commands.push(DrawCommand::DrawBrush {
                tl: (sx.apply(extent.x.0), sy.apply(extent.y.1)),
                br: (sx.apply(extent.x.1), sy.apply(extent.y.0)),
            });
        }
    }

    // Titles for x variables and drill variable values under the last row
    if cell.id.row + 1 == layout.y_variables.len() {
        commands.push(DrawCommand::DrawText {
            position: (CELL_PADDING, size + AXIS_HEIGHT),
            text: cell.x_variable.clone(),
            anchor: TextAnchor::Start,
            rotated: false,
        });
        for (k, caption) in cell.filter.captions().into_iter().enumerate() {
            commands.push(DrawCommand::DrawText {
                position: (CELL_PADDING, size + AXIS_HEIGHT + LABEL_HEIGHT * (k + 1) as f64),
                text: caption,
                anchor: TextAnchor::Start,
                rotated: false,
            });
        }
    }

    // Titles for y variables on the first column
    if cell.id.column == 0 {
        commands.push(DrawCommand::DrawText {
            position: (-LABEL_HEIGHT, size - CELL_PADDING),
            text: cell.y_variable.clone(),
            anchor: TextAnchor::Start,
            rotated: true,
        });
    }

    PanelScene {
        id: cell.id,
        origin: (LABEL_HEIGHT + cell.id.column as f64 * size, cell.id.row as f64 * size),
        size,
        commands,
    }
}
