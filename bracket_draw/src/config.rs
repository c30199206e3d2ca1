// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One registered competitor of a category.
///
/// Only the name is required. The other fields are free text copied from the
/// roster and are used for display purposes only.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Competitor {
    pub name: String,
    /// Club or team.
    pub club: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<String>,
    /// Belt, grade or skill class.
    pub class: Option<String>,
    /// Explicit round-0 ordinal. When present on any competitor, the roster is
    /// ordered by it before seeding.
    pub draw_position: Option<u32>,
}

impl Competitor {
    pub fn new(name: &str) -> Competitor {
        Competitor {
            name: name.to_string(),
            ..Competitor::default()
        }
    }

    pub fn with_club(mut self, club: &str) -> Competitor {
        self.club = Some(club.to_string());
        self
    }

    pub fn with_draw_position(mut self, pos: u32) -> Competitor {
        self.draw_position = Some(pos);
        self
    }

    /// The text printed in a round-0 box: `Name` or `Name (Club)`.
    pub fn display_label(&self) -> String {
        match self.club.as_deref().map(str::trim) {
            Some(club) if !club.is_empty() => format!("{} ({})", self.name, club),
            _ => self.name.clone(),
        }
    }
}

// ******** Bracket structures *********

/// What sits in a slot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SlotContent {
    /// A real competitor (round 0 only).
    Entrant(Competitor),
    /// Placeholder that advances without playing (round 0 only).
    Bye,
    /// Waiting for the winner of the two child slots (rounds 1 and later).
    Pending,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Slot {
    pub index: usize,
    pub content: SlotContent,
}

impl Slot {
    pub fn is_bye(&self) -> bool {
        self.content == SlotContent::Bye
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Round {
    pub number: u32,
    pub slots: Vec<Slot>,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TextAlign {
    Left,
    Center,
}

/// A straight line between two points of the canvas.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A filled rectangle with a single line of text.
#[derive(PartialEq, Debug, Clone)]
pub struct LabeledBox {
    pub round: u32,
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Already truncated to fit the box.
    pub label: String,
    pub fill: Rgb,
    pub bold: bool,
    pub align: TextAlign,
    pub font_size: f64,
    /// Horizontal space kept free on each side of the label.
    pub padding: f64,
}

impl LabeledBox {
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// The lines joining the two boxes of a pairing to the box of the next round.
/// `round` and `slot` identify the parent box.
#[derive(PartialEq, Debug, Clone)]
pub struct Connector {
    pub round: u32,
    pub slot: usize,
    pub segments: Vec<Segment>,
    pub line_width: f64,
}

/// Something to paint, in list order.
#[derive(PartialEq, Debug, Clone)]
pub enum Primitive {
    Connector(Connector),
    Box(LabeledBox),
}

#[derive(PartialEq, Debug, Clone)]
pub struct BracketLayout {
    pub page: PageSize,
    pub primitives: Vec<Primitive>,
}

impl BracketLayout {
    pub fn boxes(&self) -> impl Iterator<Item = &LabeledBox> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Box(b) => Some(b),
            Primitive::Connector(_) => None,
        })
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Connector(c) => Some(c),
            Primitive::Box(_) => None,
        })
    }

    pub fn boxes_in_round(&self, round: u32) -> Vec<&LabeledBox> {
        self.boxes().filter(|b| b.round == round).collect()
    }
}

/// One page of a flat competitor table.
#[derive(PartialEq, Debug, Clone)]
pub struct ListingPage {
    /// 1-based.
    pub number: usize,
    pub primitives: Vec<Primitive>,
}

/// Errors that prevent a bracket or a listing from being produced.
#[derive(PartialEq, Debug, Clone)]
pub enum BracketError {
    InsufficientCompetitors { found: usize, required: usize },
    /// The computed geometry does not fit on one page.
    LayoutOverflow { reason: String },
}

impl Error for BracketError {}

impl Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InsufficientCompetitors { found, required } => write!(
                f,
                "need at least {} competitors, found {}",
                required, found
            ),
            BracketError::LayoutOverflow { reason } => {
                write!(f, "layout does not fit the page: {}", reason)
            }
        }
    }
}

// ********* Configuration **********

/// Canvas size, in millimetres.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4_PORTRAIT: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    // The top margin leaves room for the title line.
    pub const DEFAULT: Margins = Margins {
        left: 10.0,
        right: 10.0,
        top: 20.0,
        bottom: 10.0,
    };
}

/// Geometry and styling of a bracket page.
#[derive(PartialEq, Debug, Clone)]
pub struct LayoutConfig {
    pub page: PageSize,
    pub margins: Margins,
    /// Share of a column taken by a box, in (0, 1].
    pub box_width_ratio: f64,
    /// Position of the vertical join line within the gap between two
    /// columns, in [0, 1].
    pub join_fraction: f64,
    pub min_box_height: f64,
    pub max_box_height: f64,
    /// Smallest vertical gap between two round-0 boxes.
    pub min_box_gap: f64,
    pub min_box_width: f64,
    pub font_size: f64,
    pub text_padding: f64,
    pub line_width: f64,
    /// Fills for the rounds before the final, cycled.
    pub palette: Vec<Rgb>,
    pub champion_fill: Rgb,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page: PageSize::A4_PORTRAIT,
            margins: Margins::DEFAULT,
            box_width_ratio: 0.85,
            join_fraction: 0.5,
            min_box_height: 8.0,
            max_box_height: 12.0,
            min_box_gap: 3.0,
            min_box_width: 18.0,
            // 10pt
            font_size: 3.5,
            text_padding: 1.5,
            line_width: 0.6,
            palette: vec![
                Rgb(160, 196, 255),
                Rgb(255, 198, 255),
                Rgb(190, 255, 190),
                Rgb(255, 236, 179),
            ],
            champion_fill: Rgb(220, 220, 220),
        }
    }
}

/// Geometry and styling of a listing page.
#[derive(PartialEq, Debug, Clone)]
pub struct ListingConfig {
    pub page: PageSize,
    pub margins: Margins,
    pub row_height: f64,
    pub header_height: f64,
    pub font_size: f64,
    pub text_padding: f64,
    pub header_fill: Rgb,
    pub row_fills: [Rgb; 2],
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            page: PageSize::A4_PORTRAIT,
            margins: Margins::DEFAULT,
            row_height: 7.0,
            header_height: 8.0,
            font_size: 3.5,
            text_padding: 1.5,
            header_fill: Rgb(220, 220, 220),
            row_fills: [Rgb::WHITE, Rgb(240, 244, 255)],
        }
    }
}
