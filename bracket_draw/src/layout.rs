use log::debug;

use crate::config::*;
use crate::text::fit_label;
use crate::{Bracket, BYE_LABEL};

const WINNER_LABEL: &str = "Winner";
const CHAMPION_LABEL: &str = "Champion";

// Geometry shared by all the rounds of one bracket.
struct Grid {
    left: f64,
    top: f64,
    column_width: f64,
    box_width: f64,
    box_height: f64,
    gap: f64,
}

fn invalid(reason: String) -> BracketError {
    BracketError::LayoutOverflow { reason }
}

/// Rejects settings that would make boxes overlap or leave the page.
fn check_config(config: &LayoutConfig) -> Result<(), BracketError> {
    let m = &config.margins;
    let finite = [
        ("page width", config.page.width),
        ("page height", config.page.height),
        ("left margin", m.left),
        ("right margin", m.right),
        ("top margin", m.top),
        ("bottom margin", m.bottom),
        ("box width ratio", config.box_width_ratio),
        ("join fraction", config.join_fraction),
        ("minimum box height", config.min_box_height),
        ("maximum box height", config.max_box_height),
        ("minimum box gap", config.min_box_gap),
        ("minimum box width", config.min_box_width),
        ("font size", config.font_size),
        ("text padding", config.text_padding),
        ("line width", config.line_width),
    ];
    for (name, value) in finite.iter() {
        if !value.is_finite() || *value < 0.0 {
            return Err(invalid(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
    }
    if config.box_width_ratio <= 0.0 || config.box_width_ratio > 1.0 {
        return Err(invalid(format!(
            "box width ratio must be in (0, 1], got {}",
            config.box_width_ratio
        )));
    }
    if config.join_fraction > 1.0 {
        return Err(invalid(format!(
            "join fraction must be in [0, 1], got {}",
            config.join_fraction
        )));
    }
    if config.min_box_height <= 0.0 || config.min_box_height > config.max_box_height {
        return Err(invalid(format!(
            "box height bounds {}..{} are empty",
            config.min_box_height, config.max_box_height
        )));
    }
    Ok(())
}

impl Grid {
    fn compute(bracket: &Bracket, config: &LayoutConfig) -> Result<Grid, BracketError> {
        check_config(config)?;
        let m = &config.margins;
        let usable_w = config.page.width - m.left - m.right;
        let usable_h = config.page.height - m.top - m.bottom;
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return Err(BracketError::LayoutOverflow {
                reason: format!("margins leave no usable area ({} x {})", usable_w, usable_h),
            });
        }

        let columns = bracket.round_count() + 1;
        let column_width = usable_w / columns as f64;
        let box_width = column_width * config.box_width_ratio;
        if box_width < config.min_box_width {
            return Err(BracketError::LayoutOverflow {
                reason: format!(
                    "{} columns give boxes {:.1} wide, minimum is {:.1}",
                    columns, box_width, config.min_box_width
                ),
            });
        }

        let size = bracket.size() as f64;
        let box_height = ((usable_h - size * config.min_box_gap) / size).min(config.max_box_height);
        if box_height < config.min_box_height {
            return Err(BracketError::LayoutOverflow {
                reason: format!(
                    "{} slots give boxes {:.1} high, minimum is {:.1}",
                    bracket.size(),
                    box_height,
                    config.min_box_height
                ),
            });
        }
        let gap = (usable_h - size * box_height) / size;

        Ok(Grid {
            left: m.left,
            top: m.top,
            column_width,
            box_width,
            box_height,
            gap,
        })
    }

    fn column_x(&self, round: u32) -> f64 {
        self.left + round as f64 * self.column_width
    }

    // Half a gap above the first box and below the last one.
    fn first_round_y(&self, index: usize) -> f64 {
        self.top + self.gap / 2.0 + index as f64 * (self.box_height + self.gap)
    }
}

fn fill_for_round(round: u32, round_count: u32, config: &LayoutConfig) -> Rgb {
    if round == round_count || config.palette.is_empty() {
        return config.champion_fill;
    }
    config.palette[round as usize % config.palette.len()]
}

/// Computes the drawing of a bracket on one page.
///
/// The primitives are ordered back to front: every connector first, then
/// every box, both round by round and slot by slot.
pub fn layout_bracket(
    bracket: &Bracket,
    config: &LayoutConfig,
) -> Result<BracketLayout, BracketError> {
    let grid = Grid::compute(bracket, config)?;
    let round_count = bracket.round_count();
    debug!(
        "layout_bracket: column width {:.2}, box {:.2} x {:.2}, gap {:.2}",
        grid.column_width, grid.box_width, grid.box_height, grid.gap
    );

    let inner_width = grid.box_width - 2.0 * config.text_padding;
    let make_box = |round: u32, slot: usize, y: f64, text: &str| {
        let last = round == round_count;
        LabeledBox {
            round,
            slot,
            x: grid.column_x(round),
            y,
            width: grid.box_width,
            height: grid.box_height,
            label: fit_label(text, inner_width, config.font_size),
            fill: fill_for_round(round, round_count, config),
            bold: last,
            align: if round == 0 {
                TextAlign::Left
            } else {
                TextAlign::Center
            },
            font_size: config.font_size,
            padding: config.text_padding,
        }
    };

    let mut boxes: Vec<LabeledBox> = Vec::with_capacity(2 * bracket.size());
    let mut connectors: Vec<Connector> = Vec::with_capacity(bracket.size());

    let mut previous: Vec<LabeledBox> = bracket.rounds()[0]
        .slots
        .iter()
        .map(|slot| {
            let label = match &slot.content {
                SlotContent::Entrant(c) => c.display_label(),
                _ => BYE_LABEL.to_string(),
            };
            make_box(0, slot.index, grid.first_round_y(slot.index), &label)
        })
        .collect();

    for round in bracket.rounds().iter().skip(1) {
        let label = if round.number == round_count {
            CHAMPION_LABEL
        } else {
            WINNER_LABEL
        };
        let box_x = grid.column_x(round.number);
        let mut current: Vec<LabeledBox> = Vec::with_capacity(round.slots.len());
        for (slot, children) in round.slots.iter().zip(previous.chunks(2)) {
            let (center, segments) = join_children(children, box_x, config.join_fraction);
            let b = make_box(
                round.number,
                slot.index,
                center - grid.box_height / 2.0,
                label,
            );
            connectors.push(Connector {
                round: round.number,
                slot: slot.index,
                segments,
                line_width: config.line_width,
            });
            current.push(b);
        }
        boxes.append(&mut previous);
        previous = current;
    }
    boxes.append(&mut previous);

    let primitives: Vec<Primitive> = connectors
        .into_iter()
        .map(Primitive::Connector)
        .chain(boxes.into_iter().map(Primitive::Box))
        .collect();
    Ok(BracketLayout {
        page: config.page,
        primitives,
    })
}

/// Vertical centre of the parent box and the segments linking the children to
/// it. A single child passes its own centre through.
fn join_children(children: &[LabeledBox], parent_x: f64, join_fraction: f64) -> (f64, Vec<Segment>) {
    let child_right = children[0].right();
    let join_x = child_right + (parent_x - child_right) * join_fraction;
    let mut segments: Vec<Segment> = Vec::with_capacity(4);

    let center = match children {
        [a, b] => {
            let (y1, y2) = (a.center_y(), b.center_y());
            segments.push(Segment {
                x1: a.right(),
                y1,
                x2: join_x,
                y2: y1,
            });
            segments.push(Segment {
                x1: b.right(),
                y1: y2,
                x2: join_x,
                y2,
            });
            segments.push(Segment {
                x1: join_x,
                y1,
                x2: join_x,
                y2,
            });
            (y1 + y2) / 2.0
        }
        _ => {
            let y = children[0].center_y();
            segments.push(Segment {
                x1: child_right,
                y1: y,
                x2: join_x,
                y2: y,
            });
            y
        }
    };
    segments.push(Segment {
        x1: join_x,
        y1: center,
        x2: parent_x,
        y2: center,
    });
    (center, segments)
}
