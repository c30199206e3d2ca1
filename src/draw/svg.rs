// SVG pages. One user unit is one millimetre.

use std::fmt::{self, Write};

use bracket_draw::{BracketLayout, LabeledBox, ListingPage, PageSize, Primitive, TextAlign};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const TITLE_FONT_SIZE: f64 = 6.3;
const TITLE_Y: f64 = 12.0;
const FOOTER_FONT_SIZE: f64 = 2.8;
const FOOTER_MARGIN: f64 = 5.0;
const FOOTER_FILL: &str = "#808080";

pub fn render_bracket(
    title: &str,
    footer: &str,
    layout: &BracketLayout,
) -> Result<String, fmt::Error> {
    render_page(title, footer, layout.page, &layout.primitives)
}

pub fn render_listing(
    title: &str,
    footer: &str,
    page_size: PageSize,
    page: &ListingPage,
) -> Result<String, fmt::Error> {
    render_page(title, footer, page_size, &page.primitives)
}

/// Paints the primitives in list order between the title and the footer.
fn render_page(
    title: &str,
    footer: &str,
    page: PageSize,
    primitives: &[Primitive],
) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    write!(
        svg,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}" font-family="{font}">
  <rect width="100%" height="100%" fill="#ffffff" />
"##,
        w = page.width,
        h = page.height,
        font = FONT_FAMILY,
    )?;
    write!(
        svg,
        "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" font-weight=\"bold\" text-anchor=\"middle\">{}</text>\n",
        page.width / 2.0,
        TITLE_Y,
        TITLE_FONT_SIZE,
        escape_xml(title)
    )?;

    for p in primitives {
        match p {
            Primitive::Connector(c) => {
                for s in &c.segments {
                    write!(
                        svg,
                        "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#000000\" stroke-width=\"{}\" stroke-linecap=\"square\" />\n",
                        s.x1, s.y1, s.x2, s.y2, c.line_width
                    )?;
                }
            }
            Primitive::Box(b) => render_box(&mut svg, b)?,
        }
    }

    if !footer.is_empty() {
        write!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"end\">{}</text>\n",
            page.width - FOOTER_MARGIN,
            page.height - FOOTER_MARGIN,
            FOOTER_FONT_SIZE,
            FOOTER_FILL,
            escape_xml(footer)
        )?;
    }
    svg.push_str("</svg>\n");
    Ok(svg)
}

fn render_box(svg: &mut String, b: &LabeledBox) -> fmt::Result {
    write!(
        svg,
        "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"#000000\" stroke-width=\"0.3\" />\n",
        b.x,
        b.y,
        b.width,
        b.height,
        b.fill.to_hex()
    )?;
    if b.label.is_empty() {
        return Ok(());
    }
    let (x, anchor) = match b.align {
        TextAlign::Left => (b.x + b.padding, "start"),
        TextAlign::Center => (b.x + b.width / 2.0, "middle"),
    };
    let weight = if b.bold { " font-weight=\"bold\"" } else { "" };
    write!(
        svg,
        "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\"{} text-anchor=\"{}\" dominant-baseline=\"central\">{}</text>\n",
        x,
        b.center_y(),
        b.font_size,
        weight,
        anchor,
        escape_xml(&b.label)
    )
}

pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
