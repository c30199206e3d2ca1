use log::debug;

pub use crate::config::*;
use crate::{layout_bracket, seed_bracket, sort_by_draw_position, Bracket};

/// A builder for assembling the roster of one category.
///
/// Blank names are skipped, so a roster can be fed straight from a
/// spreadsheet column.
///
/// ```
/// pub use bracket_draw::builder::Builder;
/// pub use bracket_draw::LayoutConfig;
/// # use bracket_draw::BracketError;
///
/// let mut builder = Builder::new(&LayoutConfig::default());
/// builder.add_name("Anna");
/// builder.add_name("  ");
/// builder.add_name("Bob");
/// builder.add_name("Clara");
///
/// let bracket = builder.bracket()?;
/// assert_eq!(bracket.size(), 4);
/// assert_eq!(bracket.bye_count(), 1);
///
/// let layout = builder.layout()?;
/// assert_eq!(layout.boxes().count(), 7);
/// # Ok::<(), BracketError>(())
/// ```
pub struct Builder {
    pub(crate) _config: LayoutConfig,
    pub(crate) _competitors: Vec<Competitor>,
}

impl Builder {
    pub fn new(config: &LayoutConfig) -> Builder {
        Builder {
            _config: config.clone(),
            _competitors: Vec::new(),
        }
    }

    /// Adds a competitor known only by name.
    pub fn add_name(&mut self, name: &str) {
        self.add_competitor(&Competitor::new(name))
    }

    /// Adds a competitor. The name is trimmed; a blank name is ignored.
    pub fn add_competitor(&mut self, competitor: &Competitor) {
        let name = competitor.name.trim();
        if name.is_empty() {
            debug!("add_competitor: skipping blank entry {:?}", competitor);
            return;
        }
        self._competitors.push(Competitor {
            name: name.to_string(),
            ..competitor.clone()
        });
    }

    /// The roster in draw order.
    pub fn competitors(&self) -> Vec<Competitor> {
        let mut res = self._competitors.clone();
        sort_by_draw_position(&mut res);
        res
    }

    pub fn bracket(&self) -> Result<Bracket, BracketError> {
        seed_bracket(&self.competitors())
    }

    pub fn layout(&self) -> Result<BracketLayout, BracketError> {
        layout_bracket(&self.bracket()?, &self._config)
    }
}
