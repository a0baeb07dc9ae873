//! Image to PDF conversion.
//!
//! Decodes the stored upload with the `image` crate and embeds it as a
//! single page sized to the pixel dimensions at 100 DPI.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::DynamicImage;
use printpdf::{Image as PdfImage, ImageTransform, Mm, PdfDocument};

use crate::errors::{Error, Result};
use crate::storage;

const DPI: f32 = 100.0;
const MM_PER_INCH: f32 = 25.4;

pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let decoded = image::open(input).map_err(|e| Error::Conversion {
        reason: format!("could not decode image: {e}"),
    })?;

    // PDF page content cannot carry an alpha channel; palette images are
    // already expanded to RGBA by the decoder, so flattening alpha covers
    // both cases.
    let flattened = match decoded {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => decoded,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let width_mm = Mm(flattened.width() as f32 * MM_PER_INCH / DPI);
    let height_mm = Mm(flattened.height() as f32 * MM_PER_INCH / DPI);

    let title = storage::stem(&input.to_string_lossy()).to_string();
    let (doc, page, layer) = PdfDocument::new(title, width_mm, height_mm, "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    PdfImage::from_dynamic_image(&flattened).add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(DPI),
            ..Default::default()
        },
    );

    let file = File::create(output)?;
    doc.save(&mut BufWriter::new(file)).map_err(|e| Error::Conversion {
        reason: format!("could not write PDF: {e}"),
    })
}
