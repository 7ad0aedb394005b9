use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::ir::{DrawCommand, SceneGraph, TextAnchor};
use crate::palette::ColorPalette;
use crate::{OutputFormat, RenderOptions};

const GRID_COLOR: RGBColor = RGBColor(221, 221, 221);
const FRAME_COLOR: RGBColor = RGBColor(170, 170, 170);
const UNSELECTED_COLOR: RGBColor = RGBColor(204, 204, 204);
const FONT_SIZE: u32 = 11;
/// Largest bitmap the PNG backend will allocate
const MAX_PNG_PIXELS: usize = 1 << 26;

/// Render a compiled scene to image bytes
pub fn render_scene(scene: &SceneGraph, options: &RenderOptions) -> Result<Vec<u8>> {
    match options.format {
        OutputFormat::Png => render_png(scene),
        OutputFormat::Svg => render_svg(scene),
    }
}

fn canvas_size(scene: &SceneGraph) -> (u32, u32) {
    (scene.width.max(1), scene.height.max(1))
}

fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let (width, height) = canvas_size(scene);
    let len = (width as usize)
        .checked_mul(height as usize)
        .filter(|&pixels| pixels <= MAX_PNG_PIXELS)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| anyhow!("Canvas {}x{} is too large to render as PNG", width, height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(scene: &SceneGraph) -> Result<Vec<u8>> {
    let (width, height) = canvas_size(scene);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg.into_bytes())
}

/// Execute every command of the scene: canvas-level first, then each panel
/// shifted to its origin.
fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) -> Result<()> {
    let palette = ColorPalette::category10();

    for command in &scene.commands {
        draw_command(root, command, (0.0, 0.0), &palette)?;
    }
    for panel in &scene.panels {
        for command in &panel.commands {
            draw_command(root, command, panel.origin, &palette)?;
        }
    }
    Ok(())
}

fn draw_command<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    command: &DrawCommand,
    origin: (f64, f64),
    palette: &ColorPalette,
) -> Result<()> {
    let at = |(x, y): (f64, f64)| ((origin.0 + x).round() as i32, (origin.1 + y).round() as i32);

    let result = match command {
        DrawCommand::DrawLine { points } => root.draw(&PathElement::new(
            points.iter().copied().map(at).collect::<Vec<_>>(),
            GRID_COLOR.stroke_width(1),
        )),
        DrawCommand::DrawFrame { tl, br } => root.draw(&Rectangle::new(
            [at(*tl), at(*br)],
            FRAME_COLOR.stroke_width(1),
        )),
        DrawCommand::DrawPoint { center, radius, class } => {
            let color = palette.color(*class).unwrap_or(UNSELECTED_COLOR);
            root.draw(&Circle::new(at(*center), radius.round() as i32, color.mix(0.8).filled()))
        }
        DrawCommand::DrawBrush { tl, br } => root
            .draw(&Rectangle::new([at(*tl), at(*br)], BLACK.mix(0.125).filled()))
            .and_then(|_| root.draw(&Rectangle::new([at(*tl), at(*br)], WHITE.stroke_width(1)))),
        DrawCommand::DrawText { position, text, anchor, rotated } => {
            let hpos = match anchor {
                TextAnchor::Start => HPos::Left,
                TextAnchor::Middle => HPos::Center,
                TextAnchor::End => HPos::Right,
            };
            let font = if *rotated {
                ("sans-serif", FONT_SIZE).into_font().transform(FontTransform::Rotate270)
            } else {
                ("sans-serif", FONT_SIZE).into_font()
            };
            let style = font.color(&BLACK).pos(Pos::new(hpos, VPos::Top));
            // Hosts without a usable system font still get the marks drawn
            if let Err(e) = root.draw(&Text::new(text.clone(), at(*position), style)) {
                debug!("skipping label '{}': {:?}", text, e);
            }
            Ok(())
        }
    };

    result.map_err(|e| anyhow!("Failed to draw {}: {:?}", command_name(command), e))
}

fn command_name(command: &DrawCommand) -> &'static str {
    match command {
        DrawCommand::DrawLine { .. } => "line",
        DrawCommand::DrawPoint { .. } => "point",
        DrawCommand::DrawFrame { .. } => "frame",
        DrawCommand::DrawBrush { .. } => "brush",
        DrawCommand::DrawText { .. } => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CellId, PanelScene, PointClass};

    fn make_scene() -> SceneGraph {
        SceneGraph {
            width: 60,
            height: 40,
            panels: vec![PanelScene {
                id: CellId { column: 0, row: 0 },
                origin: (5.0, 5.0),
                size: 30.0,
                commands: vec![
                    DrawCommand::DrawFrame { tl: (1.0, 1.0), br: (29.0, 29.0) },
                    DrawCommand::DrawPoint { center: (10.0, 10.0), radius: 2.0, class: PointClass::Class(0) },
                    DrawCommand::DrawPoint { center: (20.0, 20.0), radius: 2.0, class: PointClass::Unclassified },
                    DrawCommand::DrawBrush { tl: (5.0, 5.0), br: (15.0, 15.0) },
                ],
            }],
            commands: vec![DrawCommand::DrawLine { points: vec![(0.0, 35.0), (60.0, 35.0)] }],
        }
    }

    #[test]
    fn test_render_png() {
        let bytes = render_scene(&make_scene(), &RenderOptions::default()).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_render_svg() {
        let options = RenderOptions { format: OutputFormat::Svg };
        let bytes = render_scene(&make_scene(), &options).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("<svg"));
        assert!(text.contains("<circle"));
    }

    #[test]
    fn test_render_oversized_png_fails() {
        let scene = SceneGraph { width: 300_245, height: 300_030, panels: vec![], commands: vec![] };
        let err = render_scene(&scene, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_render_empty_scene() {
        let scene = SceneGraph { width: 0, height: 0, panels: vec![], commands: vec![] };
        assert!(render_scene(&scene, &RenderOptions::default()).is_ok());
    }
}
