//! Cell colors and grid painting.

use crate::metrics::CellMetrics;
use crate::provider::{SelectionStyle, SettingsProvider};
use alacritty_terminal::index::Point;
use alacritty_terminal::selection::SelectionRange;
use alacritty_terminal::term::RenderableContent;
use alacritty_terminal::term::cell::Flags;
use alacritty_terminal::vte::ansi::{Color as AnsiColor, CursorShape, NamedColor};
use deskterminal_config::{AnsiPalette, Color};

/// Everything needed to turn cell attributes into concrete colors,
/// captured from the settings provider once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: Color,
    pub background: Color,
    pub palette: AnsiPalette,
    pub selection: SelectionStyle,
}

impl ColorScheme {
    pub fn from_provider(provider: &dyn SettingsProvider) -> Self {
        Self {
            foreground: provider.default_foreground(),
            background: provider.default_background(),
            palette: provider.palette(),
            selection: provider.selection_style(),
        }
    }

    fn ansi(&self, index: usize) -> Color {
        self.palette.foreground(index).unwrap_or(self.foreground)
    }

    /// Concrete color for an emulator color attribute
    pub fn resolve(&self, color: AnsiColor) -> Color {
        match color {
            AnsiColor::Spec(rgb) => Color::rgb(rgb.r, rgb.g, rgb.b),
            AnsiColor::Indexed(index) => self.indexed(index),
            AnsiColor::Named(named) => self.named(named),
        }
    }

    fn named(&self, named: NamedColor) -> Color {
        match named {
            NamedColor::Foreground | NamedColor::BrightForeground | NamedColor::Cursor => {
                self.foreground
            }
            NamedColor::DimForeground => dim(self.foreground),
            NamedColor::Background => self.background,
            NamedColor::Black => self.ansi(0),
            NamedColor::Red => self.ansi(1),
            NamedColor::Green => self.ansi(2),
            NamedColor::Yellow => self.ansi(3),
            NamedColor::Blue => self.ansi(4),
            NamedColor::Magenta => self.ansi(5),
            NamedColor::Cyan => self.ansi(6),
            NamedColor::White => self.ansi(7),
            NamedColor::BrightBlack => self.ansi(8),
            NamedColor::BrightRed => self.ansi(9),
            NamedColor::BrightGreen => self.ansi(10),
            NamedColor::BrightYellow => self.ansi(11),
            NamedColor::BrightBlue => self.ansi(12),
            NamedColor::BrightMagenta => self.ansi(13),
            NamedColor::BrightCyan => self.ansi(14),
            NamedColor::BrightWhite => self.ansi(15),
            NamedColor::DimBlack => dim(self.ansi(0)),
            NamedColor::DimRed => dim(self.ansi(1)),
            NamedColor::DimGreen => dim(self.ansi(2)),
            NamedColor::DimYellow => dim(self.ansi(3)),
            NamedColor::DimBlue => dim(self.ansi(4)),
            NamedColor::DimMagenta => dim(self.ansi(5)),
            NamedColor::DimCyan => dim(self.ansi(6)),
            NamedColor::DimWhite => dim(self.ansi(7)),
        }
    }

    fn indexed(&self, index: u8) -> Color {
        match index {
            0..=15 => self.ansi(usize::from(index)),
            16..=231 => {
                const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
                let i = usize::from(index - 16);
                Color::rgb(LEVELS[i / 36], LEVELS[(i / 6) % 6], LEVELS[i % 6])
            }
            232..=255 => {
                let gray = 8 + 10 * (index - 232);
                Color::rgb(gray, gray, gray)
            }
        }
    }

    /// Foreground and background of a cell after inverse video, dim,
    /// hidden and selection are applied.
    pub fn cell_colors(
        &self,
        fg: AnsiColor,
        bg: AnsiColor,
        flags: Flags,
        selected: bool,
    ) -> (Color, Color) {
        let mut fg = self.resolve(fg);
        let mut bg = self.resolve(bg);

        if flags.contains(Flags::INVERSE) {
            std::mem::swap(&mut fg, &mut bg);
            // An inverted default background would otherwise inherit the
            // near-transparent alpha of the window surface
            fg = fg.with_alpha(255);
            bg = bg.with_alpha(255);
        }
        if flags.contains(Flags::DIM) {
            fg = dim(fg);
        }
        if flags.contains(Flags::HIDDEN) {
            fg = bg;
        }

        if selected {
            let cell_bg = bg;
            bg = self.selection.background;
            fg = self.selection.foreground.unwrap_or(cell_bg.with_alpha(255));
        }

        (fg, bg)
    }
}

fn dim(color: Color) -> Color {
    let scale = |c: u8| ((u16::from(c) * 2) / 3) as u8;
    Color::new(scale(color.r), scale(color.g), scale(color.b), color.a)
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// A run of adjacent cells sharing a foreground color
struct TextRun {
    start: egui::Pos2,
    text: String,
    color: Color,
    next_column: usize,
    row: i32,
}

/// Paint the visible grid, selection and cursor into `rect`.
pub fn paint_content(
    painter: &egui::Painter,
    rect: egui::Rect,
    content: RenderableContent<'_>,
    scheme: &ColorScheme,
    font_id: &egui::FontId,
    metrics: CellMetrics,
) {
    painter.rect_filled(rect, 0.0, to_color32(scheme.background));

    let display_offset = content.display_offset as i32;
    let selection = content.selection;
    let cell_origin = |point: Point| -> egui::Pos2 {
        egui::pos2(
            rect.left() + point.column.0 as f32 * metrics.char_width,
            rect.top() + (point.line.0 + display_offset) as f32 * metrics.line_height,
        )
    };

    let mut run: Option<TextRun> = None;
    let flush = |run: &mut Option<TextRun>| {
        if let Some(run) = run.take() {
            let text = run.text.trim_end();
            if !text.is_empty() {
                painter.text(
                    run.start,
                    egui::Align2::LEFT_TOP,
                    text,
                    font_id.clone(),
                    to_color32(run.color),
                );
            }
        }
    };

    for indexed in content.display_iter {
        let cell = indexed.cell;
        if cell.flags.contains(Flags::WIDE_CHAR_SPACER) {
            continue;
        }

        let point = indexed.point;
        let selected = is_selected(selection.as_ref(), point);
        let (fg, bg) = scheme.cell_colors(cell.fg, cell.bg, cell.flags, selected);
        let origin = cell_origin(point);
        let width = if cell.flags.contains(Flags::WIDE_CHAR) {
            2.0 * metrics.char_width
        } else {
            metrics.char_width
        };

        if bg != scheme.background {
            painter.rect_filled(
                egui::Rect::from_min_size(origin, egui::vec2(width, metrics.line_height)),
                0.0,
                to_color32(bg),
            );
        }

        if cell.flags.intersects(Flags::UNDERLINE | Flags::DOUBLE_UNDERLINE) {
            let y = origin.y + metrics.line_height - 1.0;
            painter.line_segment(
                [egui::pos2(origin.x, y), egui::pos2(origin.x + width, y)],
                egui::Stroke::new(1.0, to_color32(fg)),
            );
        }

        let continues = run.as_ref().is_some_and(|r| {
            r.row == point.line.0 && r.next_column == point.column.0 && r.color == fg
        });
        if !continues || cell.flags.contains(Flags::WIDE_CHAR) {
            flush(&mut run);
        }

        match run.as_mut() {
            Some(r) if continues && !cell.flags.contains(Flags::WIDE_CHAR) => {
                r.text.push(cell.c);
                r.next_column += 1;
            }
            _ => {
                run = Some(TextRun {
                    start: origin,
                    text: cell.c.to_string(),
                    color: fg,
                    next_column: point.column.0 + 1,
                    row: point.line.0,
                });
                if cell.flags.contains(Flags::WIDE_CHAR) {
                    flush(&mut run);
                }
            }
        }
    }
    flush(&mut run);

    let cursor = content.cursor;
    if cursor.shape != CursorShape::Hidden {
        let origin = cell_origin(cursor.point);
        let cell = egui::Rect::from_min_size(
            origin,
            egui::vec2(metrics.char_width, metrics.line_height),
        );
        let color = to_color32(scheme.foreground.with_alpha(255));
        match cursor.shape {
            CursorShape::Beam => {
                painter.rect_filled(
                    egui::Rect::from_min_size(origin, egui::vec2(2.0, metrics.line_height)),
                    0.0,
                    color,
                );
            }
            CursorShape::Underline => {
                painter.rect_filled(
                    egui::Rect::from_min_max(
                        egui::pos2(cell.left(), cell.bottom() - 2.0),
                        cell.right_bottom(),
                    ),
                    0.0,
                    color,
                );
            }
            CursorShape::HollowBlock => {
                painter.rect_stroke(
                    cell,
                    0.0,
                    egui::Stroke::new(1.0, color),
                    egui::StrokeKind::Inside,
                );
            }
            _ => {
                painter.rect_filled(cell, 0.0, color.gamma_multiply(0.6));
            }
        }
    }
}

fn is_selected(selection: Option<&SelectionRange>, point: Point) -> bool {
    selection.is_some_and(|range| range.contains(point))
}
