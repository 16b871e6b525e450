//! Printable quiz export laid out on A4 pages and rendered to PDF.
//!
//! Layout positions are millimetres from the top edge; [`ExportDocument::render_pdf`]
//! flips them into PDF space.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect,
};
use printpdf::path::PaintMode;
use thiserror::Error;

use crate::model::{Question, Topic};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 15.0;
pub const PAGE_TOP_MM: f32 = 20.0;
/// A question block that ends below this line pushes the next one to a new page.
pub const PAGE_BREAK_MM: f32 = 270.0;
/// Characters per wrapped question line (180 mm of body width at 12 pt).
pub const WRAP_COLUMNS: usize = 90;

pub const PDF_MIME: &str = "application/pdf";

const INSTRUCTIONS: [&str; 3] = [
    "1. Read each question carefully",
    "2. Select the correct answer from the options provided",
    "3. The correct answer is marked with an asterisk (*)",
];

const PT_TO_MM: f32 = 0.3528;
const OPTION_BOX_MM: f32 = 4.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not build the PDF: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Heading,
    Label,
    Instruction,
    Question,
    Option { correct: bool },
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            Self::Heading => 20.0,
            Self::Instruction => 10.0,
            Self::Label | Self::Question | Self::Option { .. } => 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportLine {
    pub y_mm: f32,
    pub style: LineStyle,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportPage {
    pub lines: Vec<ExportLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    title: String,
    file_stem: String,
    pages: Vec<ExportPage>,
}

impl ExportDocument {
    #[must_use]
    pub fn build(topic: &Topic, questions: &[Question]) -> Self {
        let mut layout = Layout::new();
        let title = format!("{topic} Quiz");

        layout.push(LineStyle::Heading, title.clone(), 10.0);
        layout.push(LineStyle::Label, "Instructions:".to_string(), 7.0);
        for (idx, line) in INSTRUCTIONS.iter().enumerate() {
            let advance = if idx + 1 == INSTRUCTIONS.len() { 15.0 } else { 5.0 };
            layout.push(LineStyle::Instruction, (*line).to_string(), advance);
        }

        for (idx, question) in questions.iter().enumerate() {
            let heading = format!("Q{}: {}", idx + 1, question.text());
            for line in wrap(&heading, WRAP_COLUMNS) {
                layout.push(LineStyle::Question, line, 6.0);
            }
            for option in question.options() {
                let correct = question.is_correct(option);
                layout.push(LineStyle::Option { correct }, option.clone(), 6.0);
            }
            layout.y += 8.0;
            if layout.y > PAGE_BREAK_MM && idx + 1 < questions.len() {
                layout.new_page();
            }
        }

        Self {
            title,
            file_stem: format!("{}-quiz", topic.as_str().to_lowercase()),
            pages: layout.pages,
        }
    }

    #[must_use]
    pub fn pages(&self) -> &[ExportPage] {
        &self.pages
    }

    /// Suggested file name for the given extension, e.g. `biology-quiz.pdf`.
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.file_stem)
    }

    /// Renders every laid-out page into a PDF using the built-in Helvetica fonts.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Render` if a font cannot be registered or the
    /// document cannot be serialized.
    pub fn render_pdf(&self) -> Result<Vec<u8>, ExportError> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            self.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Quiz",
        );
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|err| ExportError::Render(err.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|err| ExportError::Render(err.to_string()))?,
        };

        for (idx, page) in self.pages.iter().enumerate() {
            let layer = if idx == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_idx, layer_idx) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Quiz");
                doc.get_page(page_idx).get_layer(layer_idx)
            };
            for line in &page.lines {
                draw_line(&layer, &fonts, line);
            }
        }

        doc.save_to_bytes()
            .map_err(|err| ExportError::Render(err.to_string()))
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw_line(layer: &PdfLayerReference, fonts: &Fonts, line: &ExportLine) {
    let size = line.style.font_size();
    let baseline = Mm(PAGE_HEIGHT_MM - line.y_mm);
    match line.style {
        LineStyle::Heading => {
            // Helvetica Bold averages a little over half an em per glyph.
            let width = line.text.chars().count() as f32 * size * 0.55 * PT_TO_MM;
            let x = ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM);
            layer.use_text(line.text.as_str(), size, Mm(x), baseline, &fonts.bold);
        }
        LineStyle::Label | LineStyle::Question => {
            layer.use_text(line.text.as_str(), size, Mm(MARGIN_MM), baseline, &fonts.regular);
        }
        LineStyle::Instruction => {
            layer.use_text(
                line.text.as_str(),
                size,
                Mm(MARGIN_MM + 5.0),
                baseline,
                &fonts.regular,
            );
        }
        LineStyle::Option { correct } => {
            let box_left = MARGIN_MM + 5.0;
            let box_bottom = PAGE_HEIGHT_MM - line.y_mm - 1.0;
            layer.add_rect(
                Rect::new(
                    Mm(box_left),
                    Mm(box_bottom),
                    Mm(box_left + OPTION_BOX_MM),
                    Mm(box_bottom + OPTION_BOX_MM),
                )
                .with_mode(PaintMode::Stroke),
            );
            if correct {
                layer.use_text("*", size, Mm(MARGIN_MM + 2.0), baseline, &fonts.bold);
            }
            let font = if correct { &fonts.bold } else { &fonts.regular };
            layer.use_text(line.text.as_str(), size, Mm(MARGIN_MM + 12.0), baseline, font);
        }
    }
}

struct Layout {
    pages: Vec<ExportPage>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![ExportPage::default()],
            y: PAGE_TOP_MM,
        }
    }

    fn push(&mut self, style: LineStyle, text: String, advance: f32) {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(ExportLine {
                y_mm: self.y,
                style,
                text,
            });
        }
        self.y += advance;
    }

    fn new_page(&mut self) {
        self.pages.push(ExportPage::default());
        self.y = PAGE_TOP_MM;
    }
}

fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > columns && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
