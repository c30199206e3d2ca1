use clap::Parser;

/// Turns a spreadsheet of competitors into printable tournament brackets.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the column names, the layout and the output settings.
    /// See the manual of the bracket_draw crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The spreadsheet with the competitors. Every worksheet is a category.
    /// Setting this option overrides the file that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default xlsx or csv, guessed from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (directory, default current directory) Where the SVG pages are written.
    /// Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (bracket, listing or both; default bracket) What to produce for every category.
    #[clap(long, value_parser)]
    pub mode: Option<String>,

    /// (worksheet names or not specified) If specified, only these worksheets are processed.
    #[clap(long, value_parser)]
    pub sheet: Option<Vec<String>>,

    /// (directory) A directory of previously generated pages. If provided, every page produced
    /// is compared with the file of the same name and a category fails on any difference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
