// Column matching and roster parsing, shared by all the sheet readers.

use std::collections::HashMap;
use std::path::Path;

use snafu::OptionExt;

use crate::draw::*;

/// Accepted headers for every field, already normalized.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnSchema {
    pub name: Vec<String>,
    pub club: Vec<String>,
    pub gender: Vec<String>,
    pub weight: Vec<String>,
    pub class: Vec<String>,
    pub draw_position: Vec<String>,
    /// Use the first column for names when no header matches.
    pub first_column_as_name: bool,
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnSchema {
    fn default() -> Self {
        ColumnSchema {
            name: strings(&[
                "name",
                "competitor",
                "competitor name",
                "athlete",
                "full name",
                "player",
            ]),
            club: strings(&["club", "team", "club/team", "team/club", "dojang", "school"]),
            gender: strings(&["gender", "sex"]),
            weight: strings(&["weight", "weight class", "weight category", "division"]),
            class: strings(&["class", "belt", "grade", "level", "skill"]),
            draw_position: strings(&["draw position", "draw", "position", "draw no", "seed"]),
            first_column_as_name: false,
        }
    }
}

/// Lowercases, trims and collapses runs of spaces, underscores, hyphens and
/// dots into a single space.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.'))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct ColumnMap {
    name: usize,
    club: Option<usize>,
    gender: Option<usize>,
    weight: Option<usize>,
    class: Option<usize>,
    draw_position: Option<usize>,
}

fn find_column(header: &[String], aliases: &[String]) -> Option<usize> {
    // Alias order wins over column order.
    aliases
        .iter()
        .find_map(|a| header.iter().position(|h| h == a))
}

fn map_columns(sheet: &str, header: &[String], schema: &ColumnSchema) -> DrawResult<ColumnMap> {
    let header: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    debug!("map_columns: {:?}: header: {:?}", sheet, header);
    let name = match find_column(&header, &schema.name) {
        Some(idx) => idx,
        None if schema.first_column_as_name => {
            info!(
                "Sheet {:?}: no name header, using the first column {:?}",
                sheet,
                header.first()
            );
            0
        }
        None => {
            return MissingRequiredColumnSnafu {
                sheet,
                column: "name",
            }
            .fail()
        }
    };
    // The name column is never read twice.
    let other = |aliases: &[String]| find_column(&header, aliases).filter(|&idx| idx != name);
    Ok(ColumnMap {
        name,
        club: other(&schema.club),
        gender: other(&schema.gender),
        weight: other(&schema.weight),
        class: other(&schema.class),
        draw_position: other(&schema.draw_position),
    })
}

fn cell(row: &[String], idx: Option<usize>) -> Option<String> {
    let s = row.get(idx?)?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_draw_position(s: &str) -> Option<u32> {
    if let Ok(x) = s.parse::<u32>() {
        return Some(x);
    }
    // Spreadsheets store numbers as floats.
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Some(f as u32),
        _ => None,
    }
}

/// Turns the rows of a sheet into a roster in draw order.
///
/// The header is the first row with a non-blank cell. Rows with a blank name
/// are skipped.
pub fn parse_roster(
    sheet: &str,
    rows: &[Vec<String>],
    schema: &ColumnSchema,
) -> DrawResult<Vec<Competitor>> {
    let header_idx = rows
        .iter()
        .position(|r| r.iter().any(|c| !c.trim().is_empty()))
        .context(EmptySheetSnafu { sheet })?;
    let columns = map_columns(sheet, &rows[header_idx], schema)?;

    let mut res: Vec<Competitor> = Vec::new();
    let mut seen_positions: HashMap<u32, usize> = HashMap::new();
    for (idx, row) in rows.iter().enumerate().skip(header_idx + 1) {
        // 1-based, as displayed by spreadsheet programs.
        let lineno = idx + 1;
        let name = match cell(row, Some(columns.name)) {
            Some(n) => n,
            None => {
                debug!("parse_roster: {:?}: skipping row {} without a name", sheet, lineno);
                continue;
            }
        };
        let draw_position = match cell(row, columns.draw_position) {
            Some(s) => Some(parse_draw_position(&s).context(InvalidDrawPositionSnafu {
                sheet,
                row: lineno,
                value: s.clone(),
            })?),
            None => None,
        };
        if let Some(pos) = draw_position {
            if let Some(first) = seen_positions.insert(pos, lineno) {
                warn!(
                    "parse_roster: {:?}: draw position {} on rows {} and {}",
                    sheet, pos, first, lineno
                );
                return InvalidDrawPositionSnafu {
                    sheet,
                    row: lineno,
                    value: format!("{} (already used on row {})", pos, first),
                }
                .fail();
            }
        }
        res.push(Competitor {
            name,
            club: cell(row, columns.club),
            gender: cell(row, columns.gender),
            weight: cell(row, columns.weight),
            class: cell(row, columns.class),
            draw_position,
        });
    }
    sort_by_draw_position(&mut res);
    info!("Sheet {:?}: {} competitors", sheet, res.len());
    Ok(res)
}

/// The category name of a file that holds a single sheet.
pub fn sheet_name_for(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// A sheet name usable as a file name on all platforms.
pub fn file_stem_for(sheet: &str) -> String {
    let res: String = sheet
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if res.is_empty() {
        "sheet".to_string()
    } else {
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("  Draw_Position "), "draw position");
        assert_eq!(normalize_header("Weight-Class"), "weight class");
        assert_eq!(normalize_header("Draw No."), "draw no");
        assert_eq!(normalize_header("Club/Team"), "club/team");
        assert_eq!(normalize_header("NAME"), "name");
    }

    #[test]
    fn full_schema() {
        let r = rows(&[
            &["", "", ""],
            &["Draw Position", "Athlete", "Team", "Sex", "Weight Class", "Belt"],
            &["2", "Kim", "Tigers", "F", "-49", "Black"],
            &["1", "Lee", "", "F", "-49", "Red"],
            &["", "   ", "Ghost", "", "", ""],
            &["3.0", "Park", "Dragons"],
        ]);
        let roster = parse_roster("Seniors", &r, &ColumnSchema::default()).unwrap();
        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lee", "Kim", "Park"]);
        assert_eq!(roster[1].club.as_deref(), Some("Tigers"));
        assert_eq!(roster[0].club, None);
        assert_eq!(roster[1].gender.as_deref(), Some("F"));
        assert_eq!(roster[1].weight.as_deref(), Some("-49"));
        assert_eq!(roster[1].class.as_deref(), Some("Black"));
        assert_eq!(roster[2].draw_position, Some(3));
        assert_eq!(roster[2].gender, None);
    }

    #[test]
    fn upload_order_without_draw_positions() {
        let r = rows(&[&["Name", "Club"], &["Zed", "A"], &["Amy", "B"]]);
        let roster = parse_roster("Open", &r, &ColumnSchema::default()).unwrap();
        assert_eq!(roster[0].name, "Zed");
        assert_eq!(roster[1].name, "Amy");
    }

    #[test]
    fn missing_name_column() {
        let r = rows(&[&["Club", "Weight"], &["Tigers", "54"]]);
        match parse_roster("Open", &r, &ColumnSchema::default()) {
            Err(DrawError::MissingRequiredColumn { sheet, column }) => {
                assert_eq!(sheet, "Open");
                assert_eq!(column, "name");
            }
            x => panic!("unexpected {:?}", x),
        }

        let schema = ColumnSchema {
            first_column_as_name: true,
            ..ColumnSchema::default()
        };
        let roster = parse_roster("Open", &r, &schema).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Tigers");
        assert_eq!(roster[0].club, None);
        assert_eq!(roster[0].weight.as_deref(), Some("54"));
    }

    #[test]
    fn invalid_draw_position() {
        let r = rows(&[&["Name", "Seed"], &["Kim", "1"], &["Lee", "first"]]);
        match parse_roster("Open", &r, &ColumnSchema::default()) {
            Err(DrawError::InvalidDrawPosition { row, value, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "first");
            }
            x => panic!("unexpected {:?}", x),
        }
        assert_eq!(parse_draw_position("2.5"), None);
        assert_eq!(parse_draw_position("-1"), None);
        assert_eq!(parse_draw_position("12"), Some(12));
    }

    #[test]
    fn duplicate_draw_positions() {
        let r = rows(&[&["Name", "Draw"], &["Kim", "1"], &["Lee", "2"], &["Park", "1.0"]]);
        match parse_roster("Open", &r, &ColumnSchema::default()) {
            Err(DrawError::InvalidDrawPosition { row, value, .. }) => {
                assert_eq!(row, 4);
                assert!(value.contains("row 2"));
            }
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn empty_sheet() {
        let r = rows(&[&["", " "]]);
        assert!(matches!(
            parse_roster("Open", &r, &ColumnSchema::default()),
            Err(DrawError::EmptySheet { .. })
        ));
        assert!(parse_roster("Open", &[], &ColumnSchema::default()).is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(file_stem_for("Juniors/Male -45kg"), "Juniors_Male -45kg");
        assert_eq!(file_stem_for("  "), "sheet");
        assert_eq!(sheet_name_for("/data/Cadets Female.csv"), "Cadets Female");
    }
}
