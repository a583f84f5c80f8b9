use super::scenario::{EpidemicAnalysis, ScenarioModel};
use crate::error::{CardKind, DeckError, DeckRegion};
use crate::model::card::{Card, CityName};
use crate::model::disease::DiseaseType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The city (player) deck after starting hands were dealt.
///
/// The `n`-th revealed card is observed by the scenario model at index `n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityDeck {
    cities: BTreeMap<CityName, DiseaseType>,
    epidemics: usize,
    funded_events: usize,
    drawn: Vec<Card>,
    model: ScenarioModel,
}

impl CityDeck {
    /// Builds the deck from every city card not dealt into a starting hand.
    pub fn new<I>(
        cities: I,
        epidemics: usize,
        funded_events: usize,
        start_hands: &BTreeSet<CityName>,
    ) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (CityName, DiseaseType)>,
    {
        let cities: BTreeMap<CityName, DiseaseType> = cities
            .into_iter()
            .filter(|(name, _)| !start_hands.contains(name))
            .collect();
        let total = cities.len() + epidemics + funded_events;
        let model = ScenarioModel::generate(total, epidemics)?;
        Ok(Self {
            cities,
            epidemics,
            funded_events,
            drawn: Vec::new(),
            model,
        })
    }

    pub fn total(&self) -> usize {
        self.cities.len() + self.epidemics + self.funded_events
    }

    pub fn epidemics(&self) -> usize {
        self.epidemics
    }

    pub fn funded_events(&self) -> usize {
        self.funded_events
    }

    pub fn drawn(&self) -> &[Card] {
        &self.drawn
    }

    pub fn model(&self) -> &ScenarioModel {
        &self.model
    }

    pub fn remaining_cards(&self) -> usize {
        self.total() - self.drawn.len()
    }

    pub fn epidemics_drawn(&self) -> usize {
        self.count_drawn(|card| matches!(card, Card::Epidemic))
    }

    pub fn funded_events_drawn(&self) -> usize {
        self.count_drawn(|card| matches!(card, Card::FundedEvent))
    }

    pub fn city_names(&self) -> impl Iterator<Item = &CityName> {
        self.cities.keys()
    }

    pub fn contains_city(&self, city: &CityName) -> bool {
        self.cities.contains_key(city)
    }

    pub fn is_drawn(&self, city: &CityName) -> bool {
        self.drawn
            .iter()
            .any(|card| card.city_name() == Some(city))
    }

    /// Undrawn city cards of `disease`.
    pub fn remaining_cards_with(&self, disease: DiseaseType) -> usize {
        self.cities
            .iter()
            .filter(|(name, kind)| **kind == disease && !self.is_drawn(name))
            .count()
    }

    pub fn draw_city(&mut self, city: &CityName) -> Result<(), DeckError> {
        if !self.cities.contains_key(city) {
            return Err(DeckError::NotFound {
                name: city.clone(),
                region: DeckRegion::CityDeck,
            });
        }
        if self.is_drawn(city) {
            return Err(DeckError::AlreadyDrawn { name: city.clone() });
        }
        self.reveal(Card::City(city.clone()))
    }

    pub fn draw_epidemic(&mut self) -> Result<(), DeckError> {
        if self.epidemics_drawn() >= self.epidemics {
            return Err(DeckError::Exhausted(CardKind::Epidemic));
        }
        self.reveal(Card::Epidemic)
    }

    pub fn draw_funded_event(&mut self) -> Result<(), DeckError> {
        if self.funded_events_drawn() >= self.funded_events {
            return Err(DeckError::Exhausted(CardKind::FundedEvent));
        }
        self.reveal(Card::FundedEvent)
    }

    /// Flat chance that `city` is the next card revealed.
    pub fn probability_of_drawing(&self, city: &CityName) -> f64 {
        let remaining = self.remaining_cards();
        if remaining == 0 || !self.contains_city(city) || self.is_drawn(city) {
            return 0.0;
        }
        1.0 / remaining as f64
    }

    /// Epidemic outlook for the two cards of the next turn.
    pub fn epidemic_analysis(&self) -> Result<EpidemicAnalysis, DeckError> {
        self.model.analysis(self.drawn.len())
    }

    /// `p1 + p2` for the next turn; see [`EpidemicAnalysis`] for why this may exceed one.
    pub fn probability_of_epidemic(&self) -> Result<f64, DeckError> {
        Ok(self.epidemic_analysis()?.turn_probability())
    }

    fn reveal(&mut self, card: Card) -> Result<(), DeckError> {
        self.model.observe(self.drawn.len(), card.is_epidemic())?;
        self.drawn.push(card);
        Ok(())
    }

    fn count_drawn(&self, predicate: impl Fn(&Card) -> bool) -> usize {
        self.drawn.iter().filter(|card| predicate(card)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    fn numbered_cities(count: usize) -> Vec<(CityName, DiseaseType)> {
        (0..count)
            .map(|i| {
                let disease = DiseaseType::ALL[i % DiseaseType::ALL.len()];
                (CityName::new(format!("testCity{i}")), disease)
            })
            .collect()
    }

    fn name(i: usize) -> CityName {
        CityName::new(format!("testCity{i}"))
    }

    #[test]
    fn epidemic_probability_through_the_first_striation() {
        let mut deck = CityDeck::new(numbered_cities(95), 5, 0, &BTreeSet::new()).unwrap();
        assert_eq!(deck.total(), 100);
        approx(deck.probability_of_epidemic().unwrap(), 0.1);

        deck.draw_city(&name(0)).unwrap();
        deck.draw_city(&name(1)).unwrap();
        approx(deck.probability_of_epidemic().unwrap(), 1.0 / 9.0);

        deck.draw_city(&name(2)).unwrap();
        deck.draw_epidemic().unwrap();
        assert_eq!(deck.probability_of_epidemic().unwrap(), 0.0);
        assert_eq!(deck.epidemics_drawn(), 1);
    }

    #[test]
    fn start_hands_are_excluded() {
        let hands: BTreeSet<CityName> = [name(0), name(1)].into_iter().collect();
        let deck = CityDeck::new(numbered_cities(10), 2, 1, &hands).unwrap();
        assert_eq!(deck.total(), 11);
        assert_eq!(deck.model().card_count(), 11);
        assert!(!deck.contains_city(&name(0)));
        assert_eq!(deck.probability_of_drawing(&name(0)), 0.0);
    }

    #[test]
    fn draw_errors() {
        let mut deck = CityDeck::new(numbered_cities(10), 2, 1, &BTreeSet::new()).unwrap();
        deck.draw_city(&name(3)).unwrap();
        assert_eq!(
            deck.draw_city(&name(3)),
            Err(DeckError::AlreadyDrawn { name: name(3) })
        );
        assert!(matches!(
            deck.draw_city(&CityName::new("atlantis")),
            Err(DeckError::NotFound {
                region: DeckRegion::CityDeck,
                ..
            })
        ));
        deck.draw_funded_event().unwrap();
        assert_eq!(
            deck.draw_funded_event(),
            Err(DeckError::Exhausted(CardKind::FundedEvent))
        );
    }

    #[test]
    fn epidemics_run_out() {
        let mut deck = CityDeck::new(numbered_cities(4), 2, 0, &BTreeSet::new()).unwrap();
        deck.draw_epidemic().unwrap();
        deck.draw_city(&name(0)).unwrap();
        deck.draw_city(&name(1)).unwrap();
        deck.draw_epidemic().unwrap();
        assert_eq!(
            deck.draw_epidemic(),
            Err(DeckError::Exhausted(CardKind::Epidemic))
        );
    }

    #[test]
    fn remaining_family_counts_track_draws() {
        let mut deck = CityDeck::new(numbered_cities(10), 2, 0, &BTreeSet::new()).unwrap();
        assert_eq!(deck.remaining_cards_with(DiseaseType::Yellow), 2);
        deck.draw_city(&name(0)).unwrap();
        assert_eq!(deck.remaining_cards_with(DiseaseType::Yellow), 1);
        assert_eq!(deck.remaining_cards(), 11);
        approx(deck.probability_of_drawing(&name(5)), 1.0 / 11.0);
        assert_eq!(deck.probability_of_drawing(&name(0)), 0.0);
    }

    #[test]
    fn funded_events_are_safe_draws() {
        let mut deck = CityDeck::new(numbered_cities(10), 2, 2, &BTreeSet::new()).unwrap();
        deck.draw_funded_event().unwrap();
        assert_eq!(deck.model().last_index(), Some(0));
        assert_eq!(deck.model().epidemics_drawn(), 0);
    }
}
