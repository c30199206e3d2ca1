mod config;
pub mod builder;
mod layout;
mod listing;
pub mod manual;
mod text;

use log::{debug, info};

pub use crate::config::*;
pub use crate::layout::layout_bracket;
pub use crate::listing::layout_listing;
pub use crate::text::{fit_label, text_width};

/// The label printed for byes.
pub const BYE_LABEL: &str = "BYE";

/// Smallest power of two that holds `n` entrants. A bracket always has at
/// least two slots.
pub fn next_power_of_two(n: usize) -> usize {
    n.max(2).next_power_of_two()
}

/// A single-elimination draw. Round 0 holds the entrants and the byes, every
/// following round halves the number of slots, the last round is the
/// champion.
///
/// The bracket does not record match outcomes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Bracket {
    rounds: Vec<Round>,
    entrants: usize,
}

impl Bracket {
    /// Number of round-0 slots.
    pub fn size(&self) -> usize {
        self.rounds[0].slots.len()
    }

    /// log2(size): the number of rounds after round 0.
    pub fn round_count(&self) -> u32 {
        (self.rounds.len() - 1) as u32
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.get(number as usize)
    }

    /// Number of real competitors.
    pub fn entrant_count(&self) -> usize {
        self.entrants
    }

    pub fn bye_count(&self) -> usize {
        self.rounds[0].slots.iter().filter(|s| s.is_bye()).count()
    }

    /// The slot in round `r + 1` fed by slot `index` of round `r`.
    pub fn parent_of(index: usize) -> usize {
        index / 2
    }

    /// The two slots of round `round - 1` feeding slot `index` of `round`.
    pub fn children_of(&self, round: u32, index: usize) -> Option<(usize, usize)> {
        if round == 0 || round > self.round_count() {
            return None;
        }
        let slots = self.rounds[round as usize].slots.len();
        if index >= slots {
            return None;
        }
        Some((2 * index, 2 * index + 1))
    }
}

/// Seeds a bracket from an ordered roster.
///
/// Slots are filled in roster order. The roster is padded to the next power
/// of two with byes appended after the last competitor, so byes are never
/// interleaved with real entrants.
///
/// Arguments:
/// * `competitors` the roster, already in draw order. See
/// [`sort_by_draw_position`] for rosters with explicit draw positions.
pub fn seed_bracket(competitors: &[Competitor]) -> Result<Bracket, BracketError> {
    let n = competitors.len();
    if n < 2 {
        return Err(BracketError::InsufficientCompetitors {
            found: n,
            required: 2,
        });
    }

    let size = next_power_of_two(n);
    let round_count = size.trailing_zeros();
    info!(
        "seed_bracket: {} competitors, size {}, {} byes, {} rounds",
        n,
        size,
        size - n,
        round_count
    );

    let first: Vec<Slot> = competitors
        .iter()
        .cloned()
        .map(SlotContent::Entrant)
        .chain(std::iter::repeat(SlotContent::Bye).take(size - n))
        .enumerate()
        .map(|(index, content)| Slot { index, content })
        .collect();

    let mut rounds = vec![Round {
        number: 0,
        slots: first,
    }];
    for number in 1..=round_count {
        let count = size >> number;
        let slots = (0..count)
            .map(|index| Slot {
                index,
                content: SlotContent::Pending,
            })
            .collect();
        rounds.push(Round { number, slots });
    }
    debug!(
        "seed_bracket: slots per round: {:?}",
        rounds.iter().map(|r| r.slots.len()).collect::<Vec<_>>()
    );

    Ok(Bracket {
        rounds,
        entrants: n,
    })
}

/// Orders a roster by explicit draw positions.
///
/// The sort is stable. Competitors without a draw position keep their upload
/// order and come after the numbered ones. Equal draw positions also keep
/// their upload order. A roster without any draw position is left untouched.
pub fn sort_by_draw_position(competitors: &mut [Competitor]) {
    if competitors.iter().all(|c| c.draw_position.is_none()) {
        return;
    }
    competitors.sort_by_key(|c| match c.draw_position {
        Some(pos) => (0, pos),
        None => (1, 0),
    });
}
