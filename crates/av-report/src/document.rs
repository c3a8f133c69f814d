//! PDF report rendering.
//!
//! The document is laid out top-down on fixed-size pages: a bold title,
//! the chart image scaled to the configured display width, a one-row
//! summary table, a "Test Results:" heading and the per-test table. Rows
//! that would cross the bottom margin move to a new page and the details
//! header is repeated there.

use crate::config::{DocumentConfig, ReportConfig};
use crate::error::{ReportError, Result};

use av_common::{Summary, TestResult};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const CHART_XOBJECT: &str = "Im1";

/// Header row of the summary table.
pub const SUMMARY_HEADERS: [&str; 4] = ["Total Tests", "Passed", "Failed", "Skipped"];

/// Header row of the details table.
pub const DETAIL_HEADERS: [&str; 4] = ["Test Name", "Status", "Duration", "Error (if any)"];

/// Heading above the details table.
pub const DETAILS_HEADING: &str = "Test Results:";

// Share of the content width per details column.
const DETAIL_COLUMNS: [f32; 4] = [0.34, 0.14, 0.16, 0.36];

const CELL_PAD: f32 = 4.0;
const BLOCK_GAP: f32 = 14.0;

/// Paginated document renderer.
pub struct DocumentRenderer {
    config: DocumentConfig,
    title: String,
    placeholder: String,
}

impl DocumentRenderer {
    /// Create a renderer from the report configuration.
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            config: config.document.clone(),
            title: config.title.clone(),
            placeholder: config.placeholder.clone(),
        }
    }

    /// Assemble the document in memory.
    ///
    /// `chart_path` must point at a decodable raster image, normally the PNG
    /// the chart renderer just wrote. The format is sniffed from the file
    /// contents, so the extension does not matter.
    pub fn build(
        &self,
        summary: &Summary,
        results: &[TestResult],
        chart_path: &Path,
    ) -> Result<Document> {
        let chart = load_chart(chart_path)?;
        let (px_w, px_h) = chart.dimensions();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => px_w,
                "Height" => px_h,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            chart.into_raw(),
        ));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => font_regular,
                FONT_BOLD => font_bold,
            },
            "XObject" => dictionary! {
                CHART_XOBJECT => image_id,
            },
        });

        let pages = self.lay_out(summary, results, (px_w, px_h));
        let page_count = pages.len();

        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for operations in pages {
            let content = Content { operations };
            let bytes = content
                .encode()
                .map_err(|e| ReportError::document_write("page content", e))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.config.page_width),
                    Object::Real(self.config.page_height),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let producer = format!("av-report {}", env!("CARGO_PKG_VERSION"));
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(&self.title)),
            "Producer" => Object::string_literal(producer),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        debug!(
            pages = page_count,
            rows = results.len(),
            chart_px = %format!("{px_w}x{px_h}"),
            "Document assembled"
        );
        Ok(doc)
    }

    /// Assemble the document and write it to `out_path`.
    pub fn render(
        &self,
        summary: &Summary,
        results: &[TestResult],
        chart_path: &Path,
        out_path: &Path,
    ) -> Result<PathBuf> {
        let mut doc = self.build(summary, results, chart_path)?;
        doc.compress();
        doc.save(out_path)
            .map_err(|e| ReportError::document_write(out_path, e))?;
        info!(
            path = %out_path.display(),
            pages = doc.get_pages().len(),
            "PDF report written"
        );
        Ok(out_path.to_path_buf())
    }

    fn lay_out(
        &self,
        summary: &Summary,
        results: &[TestResult],
        chart_px: (u32, u32),
    ) -> Vec<Vec<Operation>> {
        let cfg = &self.config;
        let mut page = PageCursor::new(cfg);
        let content_w = cfg.page_width - 2.0 * cfg.margin;
        let body = cfg.body_font_size;
        let row_h = body * 1.8;

        // Title.
        let title_size = cfg.title_font_size;
        page.reserve(title_size * 1.2);
        let baseline = page.y - title_size;
        page.ops
            .extend(text_ops(FONT_BOLD, title_size, cfg.margin, baseline, &self.title));
        page.y -= title_size * 1.2 + BLOCK_GAP;

        // Chart, aspect preserved, centered.
        let (px_w, px_h) = chart_px;
        let display_w = cfg.chart_display_width.min(content_w);
        let display_h = display_w * px_h as f32 / px_w.max(1) as f32;
        page.reserve(display_h);
        let x = cfg.margin + (content_w - display_w) / 2.0;
        page.ops.extend(image_ops(x, page.y - display_h, display_w, display_h));
        page.y -= display_h + BLOCK_GAP;

        // Summary table.
        let summary_widths = [content_w / 4.0; 4];
        let values = [
            summary.total.to_string(),
            summary.passed.to_string(),
            summary.failed.to_string(),
            summary.skipped.to_string(),
        ];
        page.reserve(row_h * 2.0);
        page.table_row(&summary_widths, &SUMMARY_HEADERS, row_h, body, true);
        page.table_row(&summary_widths, &values, row_h, body, false);
        page.y -= BLOCK_GAP;

        // Details heading plus at least the header row.
        let heading = body * 1.4;
        page.reserve(heading * 1.4 + row_h * 2.0);
        page.ops.extend(text_ops(
            FONT_BOLD,
            heading,
            cfg.margin,
            page.y - heading,
            DETAILS_HEADING,
        ));
        page.y -= heading * 1.4;

        let detail_widths = DETAIL_COLUMNS.map(|share| content_w * share);
        page.table_row(&detail_widths, &DETAIL_HEADERS, row_h, body, true);
        for result in results {
            if page.reserve(row_h) {
                page.table_row(&detail_widths, &DETAIL_HEADERS, row_h, body, true);
            }
            let cells = [
                result.name.as_str(),
                result.status.as_str(),
                result.duration.as_str(),
                result.error_or(&self.placeholder),
            ];
            page.table_row(&detail_widths, &cells, row_h, body, false);
        }

        page.finish()
    }
}

/// Top-down layout state across pages.
struct PageCursor {
    done: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
    top: f32,
    bottom: f32,
    left: f32,
}

impl PageCursor {
    fn new(cfg: &DocumentConfig) -> Self {
        Self {
            done: Vec::new(),
            ops: Vec::new(),
            y: cfg.page_height - cfg.margin,
            top: cfg.page_height - cfg.margin,
            bottom: cfg.margin,
            left: cfg.margin,
        }
    }

    /// Make room for `height`; returns true when a new page was started.
    ///
    /// A block taller than a whole page is placed on a fresh page anyway.
    fn reserve(&mut self, height: f32) -> bool {
        let page_is_fresh = self.ops.is_empty();
        if self.y - height >= self.bottom || page_is_fresh {
            return false;
        }
        self.done.push(std::mem::take(&mut self.ops));
        self.y = self.top;
        true
    }

    fn table_row<S: AsRef<str>>(
        &mut self,
        widths: &[f32],
        cells: &[S],
        row_h: f32,
        size: f32,
        header: bool,
    ) {
        let total_w: f32 = widths.iter().sum();
        let row_bottom = self.y - row_h;
        if header {
            self.ops.extend([
                Operation::new("q", vec![]),
                Operation::new("rg", vec![0.9.into(), 0.9.into(), 0.9.into()]),
                Operation::new(
                    "re",
                    vec![self.left.into(), row_bottom.into(), total_w.into(), row_h.into()],
                ),
                Operation::new("f", vec![]),
                Operation::new("Q", vec![]),
            ]);
        }

        let font = if header { FONT_BOLD } else { FONT_REGULAR };
        let baseline = row_bottom + (row_h - size * 0.7) / 2.0;
        let mut x = self.left;
        for (width, cell) in widths.iter().zip(cells) {
            self.ops.extend([
                Operation::new("w", vec![0.5.into()]),
                Operation::new(
                    "re",
                    vec![x.into(), row_bottom.into(), (*width).into(), row_h.into()],
                ),
                Operation::new("S", vec![]),
            ]);
            let text = fit_text(cell.as_ref(), size, width - 2.0 * CELL_PAD, header);
            self.ops
                .extend(text_ops(font, size, x + CELL_PAD, baseline, &text));
            x += width;
        }
        self.y = row_bottom;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.done.push(self.ops);
        self.done
    }
}

fn load_chart(path: &Path) -> Result<image::RgbImage> {
    let image = image::ImageReader::open(path)
        .map_err(|e| ReportError::render_failure(path, e))?
        .with_guessed_format()
        .map_err(|e| ReportError::render_failure(path, e))?
        .decode()
        .map_err(|e| ReportError::render_failure(path, e))?;
    Ok(image.to_rgb8())
}

fn text_ops(font: &str, size: f32, x: f32, y: f32, text: &str) -> [Operation; 5] {
    [
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

fn image_ops(x: f32, y: f32, w: f32, h: f32) -> [Operation; 4] {
    [
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
        ),
        Operation::new("Do", vec![CHART_XOBJECT.into()]),
        Operation::new("Q", vec![]),
    ]
}

/// Encode text for the standard WinAnsi fonts. Characters outside Latin-1
/// become `?`; line breaks become spaces.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => b' ',
            c if (' '..='~').contains(&c) => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

// Helvetica advance widths for ' '..='~', in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Approximate rendered width of `text` in points.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = win_ansi(text)
        .into_iter()
        .map(|b| match b {
            b' '..=b'~' => u32::from(HELVETICA_WIDTHS[usize::from(b - b' ')]),
            _ => 556,
        })
        .sum();
    // Bold glyphs run about 7% wider.
    let factor = if bold { 1.07 } else { 1.0 };
    units as f32 * size / 1000.0 * factor
}

/// Shorten `text` with a trailing ellipsis so it fits `max_width`.
pub fn fit_text(text: &str, size: f32, max_width: f32, bold: bool) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if text_width(&flat, size, bold) <= max_width {
        return flat;
    }
    let ellipsis = "...";
    let budget = max_width - text_width(ellipsis, size, bold);
    let mut out = String::new();
    let mut used = 0.0;
    for c in flat.chars() {
        let w = text_width(c.encode_utf8(&mut [0; 4]), size, bold);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}
