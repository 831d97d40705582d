//! The drawing-sink contract the painter produces and a test harness
//! consumes (§6 "Drawing sink"): a `Canvas` trait with the named operations,
//! a `DrawCommand` enum that mirrors each call 1:1, and a `CommandRecorder`
//! that implements `Canvas` by pushing commands into a `Vec` so rendering
//! can be asserted on without a graphical backend (§6 "replayable and
//! equality-testable").

use css::Color;
use layout::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BorderSide {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Borders {
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
}

impl Borders {
    pub fn is_empty(&self) -> bool {
        [self.top, self.right, self.bottom, self.left].iter().all(|s| s.width <= 0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Radius {
    pub horizontal: f32,
    pub vertical: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Corners {
    pub top_left: Radius,
    pub top_right: Radius,
    pub bottom_right: Radius,
    pub bottom_left: Radius,
}

/// Derived from `text-decoration-line`, `font-style`, and `font-weight`
/// (§4.7) at the point the painter emits `draw_text`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontStyle {
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub overline: bool,
    pub strikethrough: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetViewportSize { width: f32, height: f32 },
    SetScale { scale: f32 },
    AddTranslation { dx: f32, dy: f32 },
    Clear { color: Color },
    DrawRect { rect: Rect, color: Color, borders: Borders, corners: Corners },
    DrawText { pos: (f32, f32), text: String, families: Vec<String>, size: f32, style: FontStyle, color: Color },
    DrawPixels { rect: Rect, rgba: Vec<u8> },
}

/// The sink the painter drives (§6). A real backend implements this against
/// a window/GPU surface; `CommandRecorder` below implements it purely in
/// memory for tests.
pub trait Canvas {
    fn set_viewport_size(&mut self, width: f32, height: f32);
    fn set_scale(&mut self, scale: f32);
    fn add_translation(&mut self, dx: f32, dy: f32);
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color, borders: Borders, corners: Corners);
    fn draw_text(&mut self, pos: (f32, f32), text: &str, families: &[String], size: f32, style: FontStyle, color: Color);
    fn draw_pixels(&mut self, rect: Rect, rgba: &[u8]);
}

/// Records every call as a `DrawCommand`, in emission order. `take` drains
/// the buffer so the same recorder can be reused across repeated paints
/// (e.g. a `relayout` idempotence test, §8).
#[derive(Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> CommandRecorder {
        CommandRecorder::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Canvas for CommandRecorder {
    fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::SetViewportSize { width, height });
    }

    fn set_scale(&mut self, scale: f32) {
        self.commands.push(DrawCommand::SetScale { scale });
    }

    fn add_translation(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::AddTranslation { dx, dy });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, borders: Borders, corners: Corners) {
        self.commands.push(DrawCommand::DrawRect { rect, color, borders, corners });
    }

    fn draw_text(&mut self, pos: (f32, f32), text: &str, families: &[String], size: f32, style: FontStyle, color: Color) {
        self.commands.push(DrawCommand::DrawText {
            pos,
            text: text.to_string(),
            families: families.to_vec(),
            size,
            style,
            color,
        });
    }

    fn draw_pixels(&mut self, rect: Rect, rgba: &[u8]) {
        self.commands.push(DrawCommand::DrawPixels { rect, rgba: rgba.to_vec() });
    }
}

/// Replay previously recorded commands against a (possibly different)
/// canvas. Used by backends that want to decouple "build the command list"
/// from "submit it to the GPU/window".
pub fn replay(canvas: &mut dyn Canvas, commands: &[DrawCommand]) {
    for cmd in commands {
        match cmd {
            DrawCommand::SetViewportSize { width, height } => canvas.set_viewport_size(*width, *height),
            DrawCommand::SetScale { scale } => canvas.set_scale(*scale),
            DrawCommand::AddTranslation { dx, dy } => canvas.add_translation(*dx, *dy),
            DrawCommand::Clear { color } => canvas.clear(*color),
            DrawCommand::DrawRect { rect, color, borders, corners } => {
                canvas.draw_rect(*rect, *color, *borders, *corners)
            }
            DrawCommand::DrawText { pos, text, families, size, style, color } => {
                canvas.draw_text(*pos, text, families, *size, *style, *color)
            }
            DrawCommand::DrawPixels { rect, rgba } => canvas.draw_pixels(*rect, rgba),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_replays_into_an_identical_command_list() {
        let mut rec = CommandRecorder::new();
        rec.clear(Color::BLACK);
        rec.draw_rect(Rect::default(), Color::BLACK, Borders::default(), Corners::default());
        let first = rec.take();

        let mut rec2 = CommandRecorder::new();
        replay(&mut rec2, &first);
        assert_eq!(rec2.commands(), first.as_slice());
    }
}
