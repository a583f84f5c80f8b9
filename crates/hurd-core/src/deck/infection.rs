//! The infection deck as an ordered stack of striations.
//!
//! Epidemics shuffle the infection discard pile back on top of the deck, so the deck is a
//! stack of groups: within a group the order is unknown, but every card of group 0 is drawn
//! before any card of group 1.

use crate::error::{CardKind, DeckError, DeckRegion};
use crate::model::card::CityName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type Striation = BTreeSet<CityName>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionDeck {
    drawn: Striation,
    /// Striation 0 is the top of the deck.
    striations: Vec<Striation>,
}

impl InfectionDeck {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let first: Striation = cities.into_iter().map(CityName::new).collect();
        Self {
            drawn: Striation::new(),
            striations: vec![first],
        }
    }

    pub fn drawn(&self) -> &Striation {
        &self.drawn
    }

    pub fn striations(&self) -> &[Striation] {
        &self.striations
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    /// Cards left in the striation the next draw comes from.
    pub fn active_striation_count(&self) -> usize {
        self.striations
            .iter()
            .find(|striation| !striation.is_empty())
            .map_or(0, Striation::len)
    }

    pub fn remaining_count(&self) -> usize {
        self.striations.iter().map(Striation::len).sum()
    }

    /// Deepest striation that still holds cards.
    pub fn bottom_striation(&self) -> Option<&Striation> {
        self.striations
            .iter()
            .rev()
            .find(|striation| !striation.is_empty())
    }

    pub fn in_bottom_striation(&self, city: &CityName) -> bool {
        self.bottom_striation()
            .is_some_and(|bottom| bottom.contains(city))
    }

    /// Draws `city` from the top striation.
    pub fn draw(&mut self, city: &CityName) -> Result<(), DeckError> {
        if self.drawn.contains(city) {
            return Err(DeckError::AlreadyDrawn { name: city.clone() });
        }
        let leading_empty = self
            .striations
            .iter()
            .take_while(|striation| striation.is_empty())
            .count();
        if leading_empty == self.striations.len() {
            return Err(DeckError::Exhausted(CardKind::Infection));
        }
        self.striations = self.striations.split_off(leading_empty);

        if !self.striations[0].remove(city) {
            return Err(DeckError::NotFound {
                name: city.clone(),
                region: DeckRegion::ActiveStriation,
            });
        }
        self.drawn.insert(city.clone());
        Ok(())
    }

    /// Removes `city` from the bottom of the deck, as an epidemic does.
    pub fn pull_from_bottom(&mut self, city: &CityName) -> Result<(), DeckError> {
        let bottom = self
            .striations
            .iter_mut()
            .rev()
            .find(|striation| !striation.is_empty());
        match bottom.map(|striation| striation.remove(city)) {
            Some(true) => {
                self.drawn.insert(city.clone());
                Ok(())
            }
            _ => Err(DeckError::NotFound {
                name: city.clone(),
                region: DeckRegion::BottomStriation,
            }),
        }
    }

    /// Places the discard pile on top of the deck as a new striation.
    pub fn recycle(&mut self) {
        let drawn = std::mem::take(&mut self.drawn);
        self.striations.insert(0, drawn);
    }

    /// Chance that `city` is among the next `lookahead` infection draws.
    ///
    /// Each draw from a striation containing the city misses it with probability
    /// `(size - 1) / size` for the striation's current size. This per-step approximation is
    /// kept as-is rather than replaced with an exact hypergeometric term.
    pub fn probability_of_drawing(&self, city: &CityName, lookahead: usize) -> f64 {
        if self.drawn.contains(city) {
            return 0.0;
        }

        let mut striations = self.striations.iter();
        let mut current = striations.next();
        let mut size = current.map_or(0, Striation::len);
        let mut not_drawn = 1.0;
        for _ in 0..lookahead {
            while size == 0 {
                current = striations.next();
                match current {
                    Some(striation) => size = striation.len(),
                    None => return 1.0 - not_drawn,
                }
            }
            if current.is_some_and(|striation| striation.contains(city)) {
                not_drawn *= (size - 1) as f64 / size as f64;
            }
            size -= 1;
        }
        1.0 - not_drawn
    }
}
