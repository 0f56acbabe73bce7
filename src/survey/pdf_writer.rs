use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::fs::{self, File};
use std::io::BufWriter;

use crate::survey::*;

/// Distance between the top of a line and its baseline, as a fraction of the line height.
const BASELINE_RATIO: f32 = 0.7;

/// The font used to draw the sheets.
///
/// The stars and boxes need a font with a good Unicode coverage. If it cannot be
/// read, the sheets are still written with a built-in font.
#[derive(Debug, Clone)]
pub struct FontSource {
    pub name: String,
    pub bytes: Option<Vec<u8>>,
}

impl FontSource {
    pub fn load(path: &str) -> FontSource {
        match fs::read(path) {
            Ok(bytes) => {
                debug!("FontSource::load: {:?}: {} bytes", path, bytes.len());
                FontSource {
                    name: path.to_string(),
                    bytes: Some(bytes),
                }
            }
            Err(e) => {
                warn!(
                    "Cannot read font {:?} ({}), using Helvetica: some symbols may not show",
                    path, e
                );
                FontSource::builtin()
            }
        }
    }

    pub fn builtin() -> FontSource {
        FontSource {
            name: "Helvetica".to_string(),
            bytes: None,
        }
    }
}

fn add_font(doc: &PdfDocumentReference, font: &FontSource) -> SurveyResult<IndirectFontRef> {
    if let Some(bytes) = &font.bytes {
        match doc.add_external_font(bytes.as_slice()) {
            Ok(font_ref) => return Ok(font_ref),
            Err(e) => {
                warn!("Cannot use font {:?} ({}), using Helvetica", font.name, e);
            }
        }
    }
    doc.add_builtin_font(BuiltinFont::Helvetica)
        .context(LoadingFontSnafu { name: "Helvetica" })
}

/// Writes the sheet as a PDF file, one PDF page per page of the sheet.
pub fn write_pdf(
    sheet: &AnswerSheet,
    title: &str,
    font: &FontSource,
    path: &Path,
) -> SurveyResult<()> {
    let s = &sheet.settings;
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(s.width), Mm(s.height), "Layer 1");
    let font_ref = add_font(&doc, font)?;

    let mut initial = Some((first_page, first_layer));
    for (idx, page) in sheet.pages.iter().enumerate() {
        let (page_idx, layer_idx) = match initial.take() {
            Some(indexes) => indexes,
            None => doc.add_page(Mm(s.width), Mm(s.height), format!("Layer {}", idx + 1)),
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        for line in page.lines.iter() {
            // The PDF origin is the bottom left corner.
            let baseline = s.height - line.y - s.line_height * BASELINE_RATIO;
            layer.use_text(
                line.text.clone(),
                s.font_size,
                Mm(s.left_margin),
                Mm(baseline),
                &font_ref,
            );
        }
    }

    let path_s = path.display().to_string();
    let file = File::create(path).context(CreatingPdfSnafu { path: path_s.clone() })?;
    doc.save(&mut BufWriter::new(file))
        .context(WritingPdfSnafu { path: path_s })?;
    Ok(())
}
