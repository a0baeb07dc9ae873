//! Plain-text to PDF conversion.
//!
//! Lays the file out as a grid of fixed 200x10 mm cells, one line per cell,
//! Helvetica 12, starting a fresh A4 page whenever the grid runs off the
//! bottom margin.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::errors::{Error, Result};
use crate::storage;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const CELL_HEIGHT: f32 = 10.0;
const FONT_SIZE: f32 = 12.0;

pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let bytes = std::fs::read(input)?;
    let text = String::from_utf8(bytes).map_err(|_| Error::Conversion {
        reason: "the file is not valid UTF-8 text".to_string(),
    })?;

    let title = storage::stem(&input.to_string_lossy()).to_string();
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| Error::Conversion {
        reason: format!("could not load font: {e}"),
    })?;

    let mut layer_ref = doc.get_page(page).get_layer(layer);
    // Baseline of the first cell, one cell below the top margin.
    let mut y = PAGE_HEIGHT - MARGIN - CELL_HEIGHT;

    for line in text.lines() {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer_ref = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT - MARGIN - CELL_HEIGHT;
        }
        layer_ref.use_text(line.trim_end(), FONT_SIZE, Mm(MARGIN), Mm(y), &font);
        y -= CELL_HEIGHT;
    }

    let file = File::create(output)?;
    doc.save(&mut BufWriter::new(file)).map_err(|e| Error::Conversion {
        reason: format!("could not write PDF: {e}"),
    })
}
