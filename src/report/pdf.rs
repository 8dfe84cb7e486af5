use super::layout::{self, Align, DrawOp, ReportLayout, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::ReportError;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};

const LAYER: &str = "content";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Writes the laid out pages to a PDF document.
pub fn render(layout: &ReportLayout, title: &str) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(format!("{:?}", e)))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(format!("{:?}", e)))?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            doc.get_page(page_index).get_layer(layer_index)
        };
        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ReportError::Pdf(format!("{:?}", e)))
}

fn fill(color: layout::Rgb) -> Color {
    let layout::Rgb(r, g, b) = color;
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

// PDF space starts at the bottom-left corner.
fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(fill(*color));
            layer.add_rect(Rect::new(
                Mm(*x),
                Mm(flip(y + height)),
                Mm(x + width),
                Mm(flip(*y)),
            ));
        }
        DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            align,
            text,
        } => {
            let width = layout::text_width(text, *size);
            let left = match align {
                Align::Left => *x,
                Align::Center => x - width / 2.0,
                Align::Right => x - width,
            };
            let font = if *bold { &fonts.bold } else { &fonts.regular };
            layer.set_fill_color(fill(*color));
            layer.use_text(text.as_str(), *size, Mm(left), Mm(flip(*y)), font);
        }
    }
}
