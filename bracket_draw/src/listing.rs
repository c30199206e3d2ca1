use log::debug;

use crate::config::*;
use crate::text::fit_label;

// A table column: header text, relative width, cell extractor.
struct Column {
    title: &'static str,
    weight: f64,
    cell: fn(usize, &Competitor) -> String,
}

fn optional(x: &Option<String>) -> String {
    x.clone().unwrap_or_default()
}

fn has_values<F>(competitors: &[Competitor], field: F) -> bool
where
    F: Fn(&Competitor) -> Option<&str>,
{
    competitors
        .iter()
        .any(|c| field(c).map_or(false, |s| !s.trim().is_empty()))
}

fn columns_for(competitors: &[Competitor]) -> Vec<Column> {
    let mut cols = vec![
        Column {
            title: "#",
            weight: 0.07,
            cell: |idx, c| match c.draw_position {
                Some(pos) => pos.to_string(),
                None => (idx + 1).to_string(),
            },
        },
        Column {
            title: "Name",
            weight: 0.37,
            cell: |_, c| c.name.clone(),
        },
    ];
    if has_values(competitors, |c| c.club.as_deref()) {
        cols.push(Column {
            title: "Club",
            weight: 0.26,
            cell: |_, c| optional(&c.club),
        });
    }
    if has_values(competitors, |c| c.gender.as_deref()) {
        cols.push(Column {
            title: "Gender",
            weight: 0.1,
            cell: |_, c| optional(&c.gender),
        });
    }
    if has_values(competitors, |c| c.weight.as_deref()) {
        cols.push(Column {
            title: "Weight",
            weight: 0.1,
            cell: |_, c| optional(&c.weight),
        });
    }
    if has_values(competitors, |c| c.class.as_deref()) {
        cols.push(Column {
            title: "Class",
            weight: 0.1,
            cell: |_, c| optional(&c.class),
        });
    }
    cols
}

/// Lays out a flat table of competitors, split over as many pages as needed.
///
/// Every page repeats the header row. Columns for club, gender, weight and
/// class only appear when at least one competitor has a value for them.
pub fn layout_listing(
    competitors: &[Competitor],
    config: &ListingConfig,
) -> Result<Vec<ListingPage>, BracketError> {
    if competitors.is_empty() {
        return Err(BracketError::InsufficientCompetitors {
            found: 0,
            required: 1,
        });
    }
    let m = &config.margins;
    let usable_w = config.page.width - m.left - m.right;
    let usable_h = config.page.height - m.top - m.bottom;
    let rows_per_page = ((usable_h - config.header_height) / config.row_height).floor();
    let sizes_ok = config.row_height > 0.0 && config.header_height >= 0.0;
    if !sizes_ok || !(usable_w > 0.0) || !(rows_per_page >= 1.0) || !rows_per_page.is_finite() {
        return Err(BracketError::LayoutOverflow {
            reason: format!(
                "a {:.1} x {:.1} area cannot hold the header and one row",
                usable_w, usable_h
            ),
        });
    }
    let rows_per_page = rows_per_page as usize;

    let cols = columns_for(competitors);
    let total_weight: f64 = cols.iter().map(|c| c.weight).sum();
    let mut xs: Vec<(f64, f64)> = Vec::with_capacity(cols.len());
    let mut x = m.left;
    for col in cols.iter() {
        let w = usable_w * col.weight / total_weight;
        xs.push((x, w));
        x += w;
    }

    let cell_box = |slot: usize, col: usize, y: f64, h: f64, text: &str, fill: Rgb, bold: bool| {
        let (x, w) = xs[col];
        LabeledBox {
            round: 0,
            slot,
            x,
            y,
            width: w,
            height: h,
            label: fit_label(text, w - 2.0 * config.text_padding, config.font_size),
            fill,
            bold,
            align: TextAlign::Left,
            font_size: config.font_size,
            padding: config.text_padding,
        }
    };

    let pages: Vec<ListingPage> = competitors
        .chunks(rows_per_page)
        .enumerate()
        .map(|(page_idx, chunk)| {
            let mut primitives: Vec<Primitive> = Vec::new();
            for (ci, col) in cols.iter().enumerate() {
                primitives.push(Primitive::Box(cell_box(
                    0,
                    ci,
                    m.top,
                    config.header_height,
                    col.title,
                    config.header_fill,
                    true,
                )));
            }
            for (row, c) in chunk.iter().enumerate() {
                let idx = page_idx * rows_per_page + row;
                let y = m.top + config.header_height + row as f64 * config.row_height;
                let fill = config.row_fills[row % 2];
                for (ci, col) in cols.iter().enumerate() {
                    let text = (col.cell)(idx, c);
                    primitives.push(Primitive::Box(cell_box(
                        idx + 1,
                        ci,
                        y,
                        config.row_height,
                        &text,
                        fill,
                        false,
                    )));
                }
            }
            ListingPage {
                number: page_idx + 1,
                primitives,
            }
        })
        .collect();
    debug!(
        "layout_listing: {} competitors, {} per page, {} pages, {} columns",
        competitors.len(),
        rows_per_page,
        pages.len(),
        cols.len()
    );
    Ok(pages)
}
