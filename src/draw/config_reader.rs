use crate::draw::io_common::{normalize_header, ColumnSchema};
use crate::draw::*;

use bracket_draw::{Margins, PageSize, Rgb};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    pub mode: Option<String>,
    pub columns: Option<ColumnSettings>,
    pub layout: Option<LayoutSettings>,
    pub listing: Option<ListingSettings>,
    pub titles: Option<TitleSettings>,
}

/// Replacement header lists, one per field.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSettings {
    pub name: Option<Vec<String>>,
    pub club: Option<Vec<String>>,
    pub gender: Option<Vec<String>>,
    pub weight: Option<Vec<String>>,
    pub class: Option<Vec<String>>,
    #[serde(rename = "drawPosition")]
    pub draw_position: Option<Vec<String>>,
    #[serde(rename = "firstColumnAsName")]
    pub first_column_as_name: Option<bool>,
}

impl ColumnSettings {
    pub fn to_schema(&self) -> ColumnSchema {
        let d = ColumnSchema::default();
        let pick = |x: &Option<Vec<String>>, default: Vec<String>| match x {
            Some(names) => names.iter().map(|s| normalize_header(s)).collect(),
            None => default,
        };
        ColumnSchema {
            name: pick(&self.name, d.name),
            club: pick(&self.club, d.club),
            gender: pick(&self.gender, d.gender),
            weight: pick(&self.weight, d.weight),
            class: pick(&self.class, d.class),
            draw_position: pick(&self.draw_position, d.draw_position),
            first_column_as_name: self.first_column_as_name.unwrap_or(d.first_column_as_name),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSettings {
    #[serde(rename = "pageWidth")]
    pub page_width: Option<f64>,
    #[serde(rename = "pageHeight")]
    pub page_height: Option<f64>,
    #[serde(rename = "marginLeft")]
    pub margin_left: Option<f64>,
    #[serde(rename = "marginRight")]
    pub margin_right: Option<f64>,
    #[serde(rename = "marginTop")]
    pub margin_top: Option<f64>,
    #[serde(rename = "marginBottom")]
    pub margin_bottom: Option<f64>,
    #[serde(rename = "boxWidthRatio")]
    pub box_width_ratio: Option<f64>,
    #[serde(rename = "joinFraction")]
    pub join_fraction: Option<f64>,
    #[serde(rename = "minBoxHeight")]
    pub min_box_height: Option<f64>,
    #[serde(rename = "maxBoxHeight")]
    pub max_box_height: Option<f64>,
    #[serde(rename = "minBoxGap")]
    pub min_box_gap: Option<f64>,
    #[serde(rename = "minBoxWidth")]
    pub min_box_width: Option<f64>,
    #[serde(rename = "fontSize")]
    pub font_size: Option<f64>,
    #[serde(rename = "textPadding")]
    pub text_padding: Option<f64>,
    #[serde(rename = "lineWidth")]
    pub line_width: Option<f64>,
    pub palette: Option<Vec<String>>,
    #[serde(rename = "championFill")]
    pub champion_fill: Option<String>,
}

impl LayoutSettings {
    pub fn page(&self) -> DrawResult<PageSize> {
        let d = PageSize::A4_PORTRAIT;
        Ok(PageSize {
            width: positive("pageWidth", self.page_width, d.width)?,
            height: positive("pageHeight", self.page_height, d.height)?,
        })
    }

    pub fn margins(&self) -> DrawResult<Margins> {
        let d = Margins::DEFAULT;
        Ok(Margins {
            left: non_negative("marginLeft", self.margin_left, d.left)?,
            right: non_negative("marginRight", self.margin_right, d.right)?,
            top: non_negative("marginTop", self.margin_top, d.top)?,
            bottom: non_negative("marginBottom", self.margin_bottom, d.bottom)?,
        })
    }

    pub fn to_layout_config(&self) -> DrawResult<LayoutConfig> {
        let d = LayoutConfig::default();
        let box_width_ratio = positive("boxWidthRatio", self.box_width_ratio, d.box_width_ratio)?;
        if box_width_ratio > 1.0 {
            return InvalidConfigSnafu {
                reason: format!("boxWidthRatio must be at most 1, got {}", box_width_ratio),
            }
            .fail();
        }
        let join_fraction = non_negative("joinFraction", self.join_fraction, d.join_fraction)?;
        if join_fraction > 1.0 {
            return InvalidConfigSnafu {
                reason: format!("joinFraction must be at most 1, got {}", join_fraction),
            }
            .fail();
        }
        let min_box_height = positive("minBoxHeight", self.min_box_height, d.min_box_height)?;
        let max_box_height = positive("maxBoxHeight", self.max_box_height, d.max_box_height)?;
        if min_box_height > max_box_height {
            return InvalidConfigSnafu {
                reason: format!(
                    "minBoxHeight ({}) is larger than maxBoxHeight ({})",
                    min_box_height, max_box_height
                ),
            }
            .fail();
        }
        let palette = match &self.palette {
            Some(p) if p.is_empty() => {
                return InvalidConfigSnafu {
                    reason: "palette must have at least one colour",
                }
                .fail()
            }
            Some(p) => p
                .iter()
                .map(|s| parse_color(s))
                .collect::<DrawResult<Vec<Rgb>>>()?,
            None => d.palette,
        };
        let champion_fill = match &self.champion_fill {
            Some(s) => parse_color(s)?,
            None => d.champion_fill,
        };
        Ok(LayoutConfig {
            page: self.page()?,
            margins: self.margins()?,
            box_width_ratio,
            join_fraction,
            min_box_height,
            max_box_height,
            min_box_gap: non_negative("minBoxGap", self.min_box_gap, d.min_box_gap)?,
            min_box_width: positive("minBoxWidth", self.min_box_width, d.min_box_width)?,
            font_size: positive("fontSize", self.font_size, d.font_size)?,
            text_padding: non_negative("textPadding", self.text_padding, d.text_padding)?,
            line_width: positive("lineWidth", self.line_width, d.line_width)?,
            palette,
            champion_fill,
        })
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingSettings {
    #[serde(rename = "rowHeight")]
    pub row_height: Option<f64>,
    #[serde(rename = "headerHeight")]
    pub header_height: Option<f64>,
    #[serde(rename = "fontSize")]
    pub font_size: Option<f64>,
}

impl ListingSettings {
    pub fn to_listing_config(&self) -> DrawResult<ListingConfig> {
        let d = ListingConfig::default();
        Ok(ListingConfig {
            row_height: positive("rowHeight", self.row_height, d.row_height)?,
            header_height: positive("headerHeight", self.header_height, d.header_height)?,
            font_size: positive("fontSize", self.font_size, d.font_size)?,
            ..d
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleSettings {
    #[serde(rename = "bracketSuffix")]
    pub bracket_suffix: Option<String>,
    #[serde(rename = "listingSuffix")]
    pub listing_suffix: Option<String>,
    pub footer: Option<String>,
}

impl TitleSettings {
    pub fn to_titles(&self) -> Titles {
        let d = Titles::default();
        Titles {
            bracket_suffix: self.bracket_suffix.clone().unwrap_or(d.bracket_suffix),
            listing_suffix: self.listing_suffix.clone().unwrap_or(d.listing_suffix),
            footer: self.footer.clone().unwrap_or(d.footer),
        }
    }
}

pub fn read_config(path: &str) -> DrawResult<ToolConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// Parses `#rrggbb` (the `#` is optional).
pub fn parse_color(s: &str) -> DrawResult<Rgb> {
    let hex = s.trim().trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match (hex.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => Ok(Rgb(r, g, b)),
        _ => InvalidConfigSnafu {
            reason: format!("{:?} is not a #rrggbb colour", s),
        }
        .fail(),
    }
}

fn positive(key: &str, value: Option<f64>, default: f64) -> DrawResult<f64> {
    match value {
        None => Ok(default),
        Some(x) if x > 0.0 && x.is_finite() => Ok(x),
        Some(x) => InvalidConfigSnafu {
            reason: format!("{} must be positive, got {}", key, x),
        }
        .fail(),
    }
}

fn non_negative(key: &str, value: Option<f64>, default: f64) -> DrawResult<f64> {
    match value {
        None => Ok(default),
        Some(x) if x >= 0.0 && x.is_finite() => Ok(x),
        Some(x) => InvalidConfigSnafu {
            reason: format!("{} must not be negative, got {}", key, x),
        }
        .fail(),
    }
}
