//! Enumeration of the striation layouts a city deck may have been shuffled into.
//!
//! A deck of `D` cards holding `E` epidemics is cut into `E` piles, one epidemic is shuffled
//! into each pile, and the piles are stacked. Pile sizes differ by at most one card, but which
//! piles received the extra card is unknown. Every placement of the larger piles is a
//! [`Scenario`]; observing draws eliminates the placements that could not have produced them.

use crate::error::DeckError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

const LOG_TARGET: &str = "hurd_core::scenario";

/// Upper bound on epidemics. Sixteen striations yield at most C(16, 8) = 12,870 layouts.
pub const MAX_EPIDEMICS: usize = 16;

/// One hypothesis about the striation sizes of the city deck, top striation first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    striations: Vec<usize>,
}

impl Scenario {
    pub fn new(striations: Vec<usize>) -> Self {
        Self { striations }
    }

    pub fn striations(&self) -> &[usize] {
        &self.striations
    }

    pub fn total_cards(&self) -> usize {
        self.striations.iter().sum()
    }

    /// Probability that the card at `index` is an epidemic under this layout.
    ///
    /// Epidemics are uniformly placed within their striation, so with `k` cards of the
    /// striation left the next one is the epidemic with probability `1/k`. Striations whose
    /// epidemic has already been drawn can no longer yield one.
    pub fn epidemic_probability(&self, index: usize, epidemics_drawn: usize) -> f64 {
        let mut offset = index;
        for (ordinal, &size) in self.striations.iter().enumerate() {
            if offset < size {
                if ordinal < epidemics_drawn {
                    return 0.0;
                }
                return 1.0 / (size - offset) as f64;
            }
            offset -= size;
        }
        0.0
    }
}

/// Result of looking at the next two city draws.
///
/// `p1 + p2` is the per-turn epidemic figure shown to players. It sums two per-draw
/// probabilities that are not mutually exclusive, so it is not itself a probability and can
/// exceed `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpidemicAnalysis {
    /// Epidemic at the analysed index.
    pub p1: f64,
    /// Epidemic at the following index, marginalised over the first draw.
    pub p2: f64,
    /// Epidemic at the following index given the first draw was one.
    pub p2_given_p1: f64,
    pub scenario_count: usize,
    /// Scenarios that make an epidemic certain on one of the two draws.
    pub guaranteed_count: usize,
    /// Upcoming draws that are epidemic-free in every scenario.
    pub safe_upcoming_count: usize,
}

impl EpidemicAnalysis {
    pub fn turn_probability(&self) -> f64 {
        self.p1 + self.p2
    }
}

/// Surviving layouts of a city deck plus the observations applied so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioModel {
    card_count: usize,
    epidemics: usize,
    scenarios: Vec<Scenario>,
    epidemics_drawn: usize,
    last_index: Option<usize>,
}

impl ScenarioModel {
    /// Builds every layout of `card_count` cards into `epidemics` near-equal striations.
    pub fn generate(card_count: usize, epidemics: usize) -> Result<Self, DeckError> {
        if epidemics == 0 || epidemics > card_count || epidemics > MAX_EPIDEMICS {
            return Err(DeckError::InvalidLayout {
                cards: card_count,
                epidemics,
            });
        }

        let base = card_count / epidemics;
        let large = card_count % epidemics;
        let scenarios: Vec<Scenario> = (0..1u64 << epidemics)
            .filter(|pattern| pattern.count_ones() as usize == large)
            .map(|pattern| {
                let striations = (0..epidemics)
                    .map(|bit| base + ((pattern >> bit) & 1) as usize)
                    .collect();
                Scenario::new(striations)
            })
            .collect();

        debug!(
            target: LOG_TARGET,
            card_count,
            epidemics,
            scenarios = scenarios.len(),
            "generated striation scenarios"
        );

        Ok(Self {
            card_count,
            epidemics,
            scenarios,
            epidemics_drawn: 0,
            last_index: None,
        })
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn epidemics(&self) -> usize {
        self.epidemics
    }

    pub fn epidemics_drawn(&self) -> usize {
        self.epidemics_drawn
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_consistent(&self) -> bool {
        !self.scenarios.is_empty()
    }

    /// Probability that the card at `index` is an epidemic, averaged over surviving layouts.
    pub fn probability_at(&self, index: usize) -> Result<f64, DeckError> {
        if self.scenarios.is_empty() {
            return Err(DeckError::Inconsistent);
        }
        let total: f64 = self
            .scenarios
            .iter()
            .map(|scenario| scenario.epidemic_probability(index, self.epidemics_drawn))
            .sum();
        Ok(total / self.scenarios.len() as f64)
    }

    /// Records the card revealed at `index`.
    ///
    /// Layouts that guaranteed the opposite outcome are eliminated; the rest stay equally
    /// likely.
    pub fn observe(&mut self, index: usize, was_epidemic: bool) -> Result<(), DeckError> {
        let before = self.scenarios.len();
        self.eliminate(index, was_epidemic)?;

        debug!(
            target: LOG_TARGET,
            index,
            was_epidemic,
            eliminated = before - self.scenarios.len(),
            remaining = self.scenarios.len(),
            "observed city draw"
        );
        if self.scenarios.is_empty() && before > 0 {
            warn!(
                target: LOG_TARGET,
                index,
                was_epidemic,
                "observation eliminated every scenario"
            );
        }
        Ok(())
    }

    fn eliminate(&mut self, index: usize, was_epidemic: bool) -> Result<(), DeckError> {
        if let Some(last) = self.last_index {
            if index <= last {
                error!(
                    target: LOG_TARGET,
                    index,
                    last,
                    "draw observed out of order"
                );
                return Err(DeckError::OutOfOrderDraw { index, last });
            }
        }

        let contradicted = if was_epidemic { 0.0 } else { 1.0 };
        let drawn = self.epidemics_drawn;
        self.scenarios
            .retain(|scenario| scenario.epidemic_probability(index, drawn) != contradicted);

        if was_epidemic {
            self.epidemics_drawn += 1;
        }
        self.last_index = Some(index);
        Ok(())
    }

    /// Looks at the draws at `index` and `index + 1`.
    ///
    /// The second draw is expanded over both outcomes of the first on cloned models, so the
    /// receiver is left untouched.
    pub fn analysis(&self, index: usize) -> Result<EpidemicAnalysis, DeckError> {
        let p1 = self.probability_at(index)?;

        let mut hit = self.clone();
        hit.eliminate(index, true)?;
        let mut miss = self.clone();
        miss.eliminate(index, false)?;

        // An emptied branch is one the first draw cannot take; its weight is zero.
        let p2_given_p1 = hit.probability_at(index + 1).unwrap_or(0.0);
        let p2_given_miss = miss.probability_at(index + 1).unwrap_or(0.0);
        let p2 = p1 * p2_given_p1 + (1.0 - p1) * p2_given_miss;

        let drawn = self.epidemics_drawn;
        let guaranteed_count = self
            .scenarios
            .iter()
            .filter(|scenario| {
                scenario.epidemic_probability(index, drawn) == 1.0
                    || scenario.epidemic_probability(index + 1, drawn) == 1.0
            })
            .count();

        let horizon = self
            .scenarios
            .iter()
            .map(Scenario::total_cards)
            .max()
            .unwrap_or(0);
        let mut safe_upcoming_count = 0;
        for upcoming in index..horizon {
            if self.probability_at(upcoming)? == 0.0 {
                safe_upcoming_count += 1;
            }
        }

        Ok(EpidemicAnalysis {
            p1,
            p2,
            p2_given_p1,
            scenario_count: self.scenarios.len(),
            guaranteed_count,
            safe_upcoming_count,
        })
    }
}
