//! Pie chart rendering.
//!
//! Draws the passed/failed/skipped distribution into an RGB raster and
//! encodes it as PNG. Text uses the bundled DejaVu fonts so output does not
//! depend on fonts installed on the host.

use crate::config::ChartConfig;
use crate::error::{ReportError, Result};

use ab_glyph::{FontRef, PxScale};
use av_common::{Outcome, Summary};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static FONT_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static FONT_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT: Rgb<u8> = Rgb([33, 33, 33]);
const EMPTY_DISC: Rgb<u8> = Rgb([224, 224, 224]);

const TITLE_PX: f32 = 22.0;
const LEGEND_PX: f32 = 15.0;
const PAD: i32 = 12;
const SWATCH: u32 = 14;
const LEGEND_GAP: i32 = 24;

/// Fixed color of an outcome's slice.
pub fn outcome_color(outcome: Outcome) -> Rgb<u8> {
    match outcome {
        Outcome::Passed => Rgb([0x66, 0xCC, 0x00]),
        Outcome::Failed => Rgb([0xFF, 0x33, 0x33]),
        Outcome::Skipped => Rgb([0xFF, 0xCC, 0x00]),
    }
}

/// Pie geometry inside the raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieLayout {
    pub center: (i32, i32),
    pub radius: i32,
    /// Top edge of the legend row.
    pub legend_y: i32,
}

/// Chart renderer.
pub struct ChartRenderer {
    config: ChartConfig,
    regular: FontRef<'static>,
    bold: FontRef<'static>,
}

impl ChartRenderer {
    /// Create a renderer for the given raster settings.
    pub fn new(config: &ChartConfig) -> Result<Self> {
        let regular = FontRef::try_from_slice(FONT_REGULAR)
            .map_err(|e| ReportError::render_failure("DejaVuSans.ttf", e))?;
        let bold = FontRef::try_from_slice(FONT_BOLD)
            .map_err(|e| ReportError::render_failure("DejaVuSans-Bold.ttf", e))?;
        Ok(Self {
            config: config.clone(),
            regular,
            bold,
        })
    }

    /// Compute where the pie and legend go for the configured size.
    pub fn layout(&self) -> PieLayout {
        let width = self.config.width as i32;
        let height = self.config.height as i32;
        let (_, title_h) = text_size(PxScale::from(TITLE_PX), &self.bold, &self.config.title);
        let (_, legend_h) = text_size(PxScale::from(LEGEND_PX), &self.regular, "Skipped (0)");

        let top = PAD + title_h as i32 + PAD;
        let legend_y = height - PAD - legend_h.max(SWATCH) as i32;
        let bottom = legend_y - PAD;
        let radius = ((bottom - top) / 2).min(width * 2 / 5).max(0);

        PieLayout {
            center: (width / 2, top + (bottom - top).max(0) / 2),
            radius,
            legend_y,
        }
    }

    /// Draw the chart for a summary.
    pub fn render_image(&self, summary: &Summary) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.config.width, self.config.height, BACKGROUND);
        let layout = self.layout();

        self.draw_title(&mut canvas);
        if summary.is_empty() {
            self.draw_empty(&mut canvas, &layout);
        } else {
            draw_slices(&mut canvas, &layout, summary);
        }
        self.draw_legend(&mut canvas, &layout, summary);
        canvas
    }

    /// Draw the chart and save it as PNG at `path`, replacing any existing file.
    pub fn render(&self, summary: &Summary, path: &Path) -> Result<PathBuf> {
        let canvas = self.render_image(summary);
        canvas
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| ReportError::render_failure(path, e))?;
        info!(
            path = %path.display(),
            width = canvas.width(),
            height = canvas.height(),
            "Chart written"
        );
        Ok(path.to_path_buf())
    }

    fn draw_title(&self, canvas: &mut RgbImage) {
        let scale = PxScale::from(TITLE_PX);
        let (w, _) = text_size(scale, &self.bold, &self.config.title);
        let x = (canvas.width() as i32 - w as i32) / 2;
        draw_text_mut(canvas, TEXT, x.max(0), PAD, scale, &self.bold, &self.config.title);
    }

    fn draw_empty(&self, canvas: &mut RgbImage, layout: &PieLayout) {
        if layout.radius > 0 {
            draw_filled_circle_mut(canvas, layout.center, layout.radius, EMPTY_DISC);
        }
        let scale = PxScale::from(LEGEND_PX);
        let (w, h) = text_size(scale, &self.regular, "No data");
        let x = layout.center.0 - w as i32 / 2;
        let y = layout.center.1 - h as i32 / 2;
        draw_text_mut(canvas, TEXT, x, y, scale, &self.regular, "No data");
    }

    fn draw_legend(&self, canvas: &mut RgbImage, layout: &PieLayout, summary: &Summary) {
        let scale = PxScale::from(LEGEND_PX);
        let entries: Vec<(Outcome, String, u32)> = summary
            .counts()
            .into_iter()
            .map(|(outcome, count)| {
                let label = format!("{} ({count})", outcome.label());
                let (w, _) = text_size(scale, &self.regular, &label);
                (outcome, label, w)
            })
            .collect();

        let total_w: i32 = entries
            .iter()
            .map(|(_, _, w)| SWATCH as i32 + 6 + *w as i32)
            .sum::<i32>()
            + LEGEND_GAP * (entries.len() as i32 - 1);
        let mut x = ((canvas.width() as i32 - total_w) / 2).max(0);

        for (outcome, label, w) in &entries {
            draw_filled_rect_mut(
                canvas,
                Rect::at(x, layout.legend_y).of_size(SWATCH, SWATCH),
                outcome_color(*outcome),
            );
            x += SWATCH as i32 + 6;
            draw_text_mut(canvas, TEXT, x, layout.legend_y, scale, &self.regular, label);
            x += *w as i32 + LEGEND_GAP;
        }
    }
}

/// Slice boundaries as fractions of a turn, starting at 12 o'clock.
fn slice_bounds(summary: &Summary) -> [(Outcome, f64); 3] {
    let total = summary.total as f64;
    let mut acc = 0.0;
    summary.counts().map(|(outcome, count)| {
        acc += count as f64 / total;
        (outcome, acc)
    })
}

fn draw_slices(canvas: &mut RgbImage, layout: &PieLayout, summary: &Summary) {
    if layout.radius <= 0 {
        return;
    }
    let bounds = slice_bounds(summary);
    let (cx, cy) = layout.center;
    let r = layout.radius;
    let r2 = (r * r) as i64;

    for dy in -r..=r {
        for dx in -r..=r {
            if (dx as i64 * dx as i64 + dy as i64 * dy as i64) > r2 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
                continue;
            }
            // Clockwise from 12 o'clock; image y grows downward.
            let mut angle = (dx as f64).atan2(-(dy as f64));
            if angle < 0.0 {
                angle += TAU;
            }
            let turn = angle / TAU;
            let outcome = bounds
                .iter()
                .find(|(_, end)| turn < *end)
                .map(|(outcome, _)| *outcome)
                .unwrap_or(Outcome::Skipped);
            canvas.put_pixel(x as u32, y as u32, outcome_color(outcome));
        }
    }
    debug!(radius = r, total = summary.total, "Pie slices drawn");
}
