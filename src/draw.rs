use log::{debug, info, warn};

use bracket_draw::builder::Builder;
use bracket_draw::{
    layout_listing, sort_by_draw_position, BracketError, Competitor, LayoutConfig, ListingConfig,
};
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::draw::config_reader::*;
use crate::draw::io_common::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod svg;

#[derive(Debug, Snafu)]
pub enum DrawError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error reading worksheet {sheet}"))]
    ReadingSheet {
        source: calamine::XlsxError,
        sheet: String,
    },
    #[snafu(display("Worksheet {sheet} not found in the workbook"))]
    MissingSheet { sheet: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid configuration: {reason}"))]
    InvalidConfig { reason: String },
    #[snafu(display("Sheet {sheet} is empty"))]
    EmptySheet { sheet: String },
    #[snafu(display("Sheet {sheet} has no {column} column"))]
    MissingRequiredColumn { sheet: String, column: String },
    #[snafu(display("Sheet {sheet}, row {row}: {value:?} is not a valid draw position"))]
    InvalidDrawPosition {
        sheet: String,
        row: usize,
        value: String,
    },
    #[snafu(display("Sheet {sheet}: {source}"))]
    Bracket {
        source: BracketError,
        sheet: String,
    },
    #[snafu(display("Error rendering page {page}"))]
    Rendering {
        source: std::fmt::Error,
        page: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference file {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{path} differs from the reference"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DrawResult<T> = Result<T, DrawError>;

/// The content of one worksheet, or the reason it could not be read.
#[derive(Debug)]
pub struct SheetRows {
    pub name: String,
    pub rows: DrawResult<Vec<Vec<String>>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Mode {
    Bracket,
    Listing,
    Both,
}

impl Mode {
    fn brackets(&self) -> bool {
        matches!(self, Mode::Bracket | Mode::Both)
    }

    fn listings(&self) -> bool {
        matches!(self, Mode::Listing | Mode::Both)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Titles {
    pub bracket_suffix: String,
    pub listing_suffix: String,
    pub footer: String,
}

impl Default for Titles {
    fn default() -> Self {
        Titles {
            bracket_suffix: "Bracket".to_string(),
            listing_suffix: "Competitors".to_string(),
            footer: "Generated by TKD Bracket Generator".to_string(),
        }
    }
}

/// Everything needed to turn sheets into pages, validated.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub mode: Mode,
    pub schema: ColumnSchema,
    pub layout: LayoutConfig,
    pub listing: ListingConfig,
    pub titles: Titles,
    pub out_dir: PathBuf,
    pub reference_dir: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            mode: Mode::Bracket,
            schema: ColumnSchema::default(),
            layout: LayoutConfig::default(),
            listing: ListingConfig::default(),
            titles: Titles::default(),
            out_dir: PathBuf::from("."),
            reference_dir: None,
        }
    }
}

/// What happened to one sheet.
#[derive(Debug)]
pub struct SheetReport {
    pub sheet: String,
    pub outcome: DrawResult<Vec<PathBuf>>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<SheetReport>,
}

impl RunSummary {
    pub fn failures(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_err()).count()
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok())
            .flatten()
            .cloned()
            .collect()
    }
}

fn validate_mode(mode: Option<&str>) -> DrawResult<Mode> {
    match mode {
        None | Some("bracket") => Ok(Mode::Bracket),
        Some("listing") => Ok(Mode::Listing),
        Some("both") => Ok(Mode::Both),
        Some(x) => InvalidConfigSnafu {
            reason: format!("unknown mode {:?} (expected bracket, listing or both)", x),
        }
        .fail(),
    }
}

fn validate_input_type(input_type: Option<&str>, path: &str) -> DrawResult<InputType> {
    let guessed = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match input_type.map(|s| s.to_lowercase()).or(guessed).as_deref() {
        Some("xlsx") | Some("xlsm") | Some("excel") => Ok(InputType::Xlsx),
        Some("csv") => Ok(InputType::Csv),
        x => whatever!(
            "Cannot read input of type {:?}: use --input-type xlsx or csv",
            x
        ),
    }
}

/// Merges the configuration file and the command line into run settings.
/// Command line arguments take precedence.
pub fn validate_config(config: &ToolConfig, args: &Args) -> DrawResult<RunSettings> {
    let mode = validate_mode(args.mode.as_deref().or(config.mode.as_deref()))?;
    let layout = match &config.layout {
        Some(l) => l.to_layout_config()?,
        None => LayoutConfig::default(),
    };
    let listing = match &config.listing {
        Some(l) => l.to_listing_config()?,
        None => ListingConfig::default(),
    };
    let schema = match &config.columns {
        Some(c) => c.to_schema(),
        None => ColumnSchema::default(),
    };
    let titles = match &config.titles {
        Some(t) => t.to_titles(),
        None => Titles::default(),
    };
    let out_dir = args
        .out
        .clone()
        .or_else(|| config.output_directory.clone())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(RunSettings {
        mode,
        schema,
        layout,
        listing,
        titles,
        out_dir,
        reference_dir: args.reference.clone().map(PathBuf::from),
    })
}

/// Reads the input spreadsheet and produces the pages of every sheet.
///
/// Only failures that concern the whole run (configuration, unreadable
/// input file) are returned as errors. Sheet failures are in the summary.
pub fn run_tool(args: &Args) -> DrawResult<RunSummary> {
    let config = match &args.config {
        Some(p) => read_config(p)?,
        None => ToolConfig::default(),
    };
    info!("config: {:?}", config);
    let settings = validate_config(&config, args)?;

    let input = match (&args.input, &config.input_file, &args.config) {
        (Some(i), _, _) => i.clone(),
        // Relative to the configuration file.
        (None, Some(i), Some(c)) => {
            let root = Path::new(c).parent().unwrap_or_else(|| Path::new(""));
            root.join(i).display().to_string()
        }
        _ => whatever!("No input file: use --input or set inputFile in the configuration"),
    };
    let input_type =
        validate_input_type(args.input_type.as_deref().or(config.input_type.as_deref()), &input)?;
    info!("Reading {:?} as {:?}", input, input_type);

    let sheets = match input_type {
        InputType::Xlsx => io_excel::read_workbook(&input)?,
        InputType::Csv => vec![io_csv::read_csv_sheet(&input)?],
    };
    let sheets = select_sheets(sheets, args.sheet.as_deref());
    Ok(process_sheets(sheets, &settings))
}

/// Keeps the requested sheets, in workbook order. A requested name that does
/// not exist becomes a failed sheet.
fn select_sheets(sheets: Vec<SheetRows>, wanted: Option<&[String]>) -> Vec<SheetRows> {
    let wanted = match wanted {
        Some(w) if !w.is_empty() => w,
        _ => return sheets,
    };
    let mut missing: Vec<SheetRows> = wanted
        .iter()
        .filter(|w| !sheets.iter().any(|s| &s.name == *w))
        .map(|w| SheetRows {
            name: w.clone(),
            rows: MissingSheetSnafu { sheet: w.clone() }.fail(),
        })
        .collect();
    let mut res: Vec<SheetRows> = sheets
        .into_iter()
        .filter(|s| wanted.contains(&s.name))
        .collect();
    res.append(&mut missing);
    res
}

/// Processes every sheet independently. A failing sheet is reported and
/// skipped; it never prevents the following sheets from being produced.
pub fn process_sheets(sheets: Vec<SheetRows>, settings: &RunSettings) -> RunSummary {
    let mut summary = RunSummary::default();
    for sheet in sheets {
        let name = sheet.name.clone();
        info!("Processing sheet {:?}", name);
        let outcome = process_sheet(sheet, settings);
        match &outcome {
            Ok(paths) => info!("Sheet {:?}: wrote {:?}", name, paths),
            Err(e) => {
                warn!("Sheet {:?} skipped: {:?}", name, e);
                eprintln!("Skipping sheet {:?}: {}", name, e);
            }
        }
        summary.reports.push(SheetReport {
            sheet: name,
            outcome,
        });
    }
    summary
}

fn process_sheet(sheet: SheetRows, settings: &RunSettings) -> DrawResult<Vec<PathBuf>> {
    let name = sheet.name;
    let rows = sheet.rows?;
    let competitors = parse_roster(&name, &rows, &settings.schema)?;
    debug!("process_sheet: {:?}: {} competitors", name, competitors.len());

    // All the pages are rendered and checked before anything is written.
    let mut pages: Vec<(String, String)> = Vec::new();
    let stem = file_stem_for(&name);
    if settings.mode.brackets() {
        pages.push(bracket_page(&name, &stem, &competitors, settings)?);
    }
    if settings.mode.listings() {
        pages.append(&mut listing_pages(&name, &stem, &competitors, settings)?);
    }

    if let Some(reference_dir) = &settings.reference_dir {
        check_reference(reference_dir, &pages)?;
    }
    write_pages(&settings.out_dir, &pages)
}

fn bracket_page(
    name: &str,
    stem: &str,
    competitors: &[Competitor],
    settings: &RunSettings,
) -> DrawResult<(String, String)> {
    let mut builder = Builder::new(&settings.layout);
    for c in competitors {
        builder.add_competitor(c);
    }
    let layout = builder.layout().context(BracketSnafu { sheet: name })?;
    let file_name = format!("{}_bracket.svg", stem);
    let title = format!("{} - {}", name, settings.titles.bracket_suffix);
    let content = svg::render_bracket(&title, &settings.titles.footer, &layout).context(
        RenderingSnafu {
            page: file_name.clone(),
        },
    )?;
    Ok((file_name, content))
}

fn listing_pages(
    name: &str,
    stem: &str,
    competitors: &[Competitor],
    settings: &RunSettings,
) -> DrawResult<Vec<(String, String)>> {
    let mut ordered = competitors.to_vec();
    sort_by_draw_position(&mut ordered);
    let pages = layout_listing(&ordered, &settings.listing).context(BracketSnafu { sheet: name })?;
    let title = format!("{} - {}", name, settings.titles.listing_suffix);
    let total = pages.len();
    let mut res: Vec<(String, String)> = Vec::with_capacity(total);
    for page in pages.iter() {
        let file_name = if total == 1 {
            format!("{}_listing.svg", stem)
        } else {
            format!("{}_listing_{}.svg", stem, page.number)
        };
        let footer = format!("Page {} / {}", page.number, total);
        let content = svg::render_listing(&title, &footer, settings.listing.page, page).context(
            RenderingSnafu {
                page: file_name.clone(),
            },
        )?;
        res.push((file_name, content));
    }
    Ok(res)
}

/// Writes all the pages of a sheet, or none of them: the pages already
/// written are removed when a later one fails.
fn write_pages(out_dir: &Path, pages: &[(String, String)]) -> DrawResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).context(WritingOutputSnafu {
        path: out_dir.display().to_string(),
    })?;
    let mut res: Vec<PathBuf> = Vec::with_capacity(pages.len());
    for (file_name, content) in pages {
        let p = out_dir.join(file_name);
        if let Err(e) = fs::write(&p, content) {
            for written in res.iter() {
                if let Err(re) = fs::remove_file(written) {
                    warn!("Could not remove {:?}: {}", written, re);
                }
            }
            return Err(e).context(WritingOutputSnafu {
                path: p.display().to_string(),
            });
        }
        debug!("write_pages: wrote {:?}", p);
        res.push(p);
    }
    Ok(res)
}

fn check_reference(reference_dir: &Path, pages: &[(String, String)]) -> DrawResult<()> {
    for (file_name, content) in pages {
        let p = reference_dir.join(file_name);
        let path = p.display().to_string();
        let reference = fs::read_to_string(&p).context(ReadingReferenceSnafu { path: &path })?;
        if reference != *content {
            warn!("Found differences with the reference {}", path);
            print_diff(reference.as_str(), content.as_str(), "\n");
            return ReferenceMismatchSnafu { path }.fail();
        }
    }
    Ok(())
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

    fn temp_dir(name: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!("tkdbracket-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&p);
        p
    }

    fn args() -> Args {
        Args {
            config: None,
            input: None,
            input_type: None,
            out: None,
            mode: None,
            sheet: None,
            reference: None,
            verbose: false,
        }
    }

    #[test]
    fn one_bad_sheet_does_not_stop_the_others() {
        let _ = env_logger::try_init();
        let out = temp_dir("isolation");
        let settings = RunSettings {
            out_dir: out.clone(),
            ..RunSettings::default()
        };
        let sheets = vec![
            SheetRows {
                name: "Cadets -45kg".to_string(),
                rows: Ok(rows(&[&["Club", "Weight"], &["Tigers", "44"]])),
            },
            SheetRows {
                name: "Solo".to_string(),
                rows: Ok(rows(&[&["Name"], &["Kim"]])),
            },
            SheetRows {
                name: "Juniors/Male".to_string(),
                rows: Ok(rows(&[
                    &["Name", "Club"],
                    &["Kim", "Tigers"],
                    &["Lee", "Dragons"],
                    &["Park", ""],
                ])),
            },
        ];
        let summary = process_sheets(sheets, &settings);
        assert_eq!(summary.reports.len(), 3);
        assert_eq!(summary.failures(), 2);
        assert!(matches!(
            summary.reports[0].outcome,
            Err(DrawError::MissingRequiredColumn { .. })
        ));
        assert!(matches!(
            summary.reports[1].outcome,
            Err(DrawError::Bracket {
                source: BracketError::InsufficientCompetitors { .. },
                ..
            })
        ));

        let written = summary.written();
        assert_eq!(written, vec![out.join("Juniors_Male_bracket.svg")]);
        let content = fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("Kim (Tigers)"));
        assert!(content.contains(">Juniors/Male - Bracket</text>"));
        assert!(content.contains("Champion"));
        assert!(!out.join("Solo_bracket.svg").exists());
        let _ = fs::remove_dir_all(&out);
    }

    #[test]
    fn listing_mode_paginates_into_files() {
        let out = temp_dir("listing");
        let settings = RunSettings {
            mode: Mode::Both,
            out_dir: out.clone(),
            ..RunSettings::default()
        };
        let mut cells: Vec<Vec<String>> = vec![vec!["Name".to_string()]];
        for i in 0..16 {
            cells.push(vec![format!("Athlete {}", i)]);
        }
        let summary = process_sheets(
            vec![SheetRows {
                name: "Open".to_string(),
                rows: Ok(cells),
            }],
            &settings,
        );
        assert_eq!(summary.failures(), 0);
        assert_eq!(
            summary.written(),
            vec![out.join("Open_bracket.svg"), out.join("Open_listing.svg")]
        );
        let _ = fs::remove_dir_all(&out);
    }

    #[test]
    fn reference_mismatch_fails_the_sheet() {
        let out = temp_dir("reference-out");
        let reference = temp_dir("reference");
        fs::create_dir_all(&reference).unwrap();
        fs::write(reference.join("Open_bracket.svg"), "<svg/>").unwrap();
        let settings = RunSettings {
            out_dir: out.clone(),
            reference_dir: Some(reference.clone()),
            ..RunSettings::default()
        };
        let sheet = || SheetRows {
            name: "Open".to_string(),
            rows: Ok(rows(&[&["Name"], &["A"], &["B"]])),
        };
        let summary = process_sheets(vec![sheet()], &settings);
        assert!(matches!(
            summary.reports[0].outcome,
            Err(DrawError::ReferenceMismatch { .. })
        ));
        assert!(!out.join("Open_bracket.svg").exists());

        // A page produced without a reference is a valid reference for the
        // same input.
        let fresh = temp_dir("reference-fresh");
        let plain = RunSettings {
            out_dir: fresh.clone(),
            ..RunSettings::default()
        };
        assert_eq!(process_sheets(vec![sheet()], &plain).failures(), 0);
        fs::copy(fresh.join("Open_bracket.svg"), reference.join("Open_bracket.svg")).unwrap();
        let summary = process_sheets(vec![sheet()], &settings);
        assert_eq!(summary.failures(), 0);
        assert!(out.join("Open_bracket.svg").exists());
        let _ = fs::remove_dir_all(&fresh);
        let _ = fs::remove_dir_all(&out);
        let _ = fs::remove_dir_all(&reference);
    }

    #[test]
    fn failed_write_removes_earlier_pages() {
        let out = temp_dir("partial");
        fs::create_dir_all(out.join("Open_listing_2.svg")).unwrap();
        let pages = vec![
            ("Open_listing_1.svg".to_string(), "<svg/>".to_string()),
            ("Open_listing_2.svg".to_string(), "<svg/>".to_string()),
        ];
        assert!(matches!(
            write_pages(&out, &pages),
            Err(DrawError::WritingOutput { .. })
        ));
        assert!(!out.join("Open_listing_1.svg").exists());
        let _ = fs::remove_dir_all(&out);
    }

    #[test]
    fn select_sheets_reports_unknown_names() {
        let sheets = vec![
            SheetRows {
                name: "A".to_string(),
                rows: Ok(vec![]),
            },
            SheetRows {
                name: "B".to_string(),
                rows: Ok(vec![]),
            },
        ];
        let selected = select_sheets(sheets, Some(&["B".to_string(), "C".to_string()][..]));
        let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert!(matches!(
            selected[1].rows,
            Err(DrawError::MissingSheet { .. })
        ));
    }

    #[test]
    fn command_line_overrides_configuration() {
        let config = ToolConfig {
            mode: Some("listing".to_string()),
            output_directory: Some("from_config".to_string()),
            ..ToolConfig::default()
        };
        let settings = validate_config(&config, &args()).unwrap();
        assert_eq!(settings.mode, Mode::Listing);
        assert_eq!(settings.out_dir, PathBuf::from("from_config"));

        let a = Args {
            mode: Some("both".to_string()),
            out: Some("cli".to_string()),
            ..args()
        };
        let settings = validate_config(&config, &a).unwrap();
        assert_eq!(settings.mode, Mode::Both);
        assert_eq!(settings.out_dir, PathBuf::from("cli"));

        let a = Args {
            mode: Some("poster".to_string()),
            ..args()
        };
        assert!(matches!(
            validate_config(&config, &a),
            Err(DrawError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn input_type_from_extension() {
        assert_eq!(
            validate_input_type(None, "open.XLSX").unwrap(),
            InputType::Xlsx
        );
        assert_eq!(
            validate_input_type(None, "open.csv").unwrap(),
            InputType::Csv
        );
        assert_eq!(
            validate_input_type(Some("csv"), "open.txt").unwrap(),
            InputType::Csv
        );
        assert!(validate_input_type(None, "open.pdf").is_err());
    }
}
