use super::cure::{CureRequest, cure_probability, usable_draws};
use crate::deck::{CityDeck, EpidemicAnalysis, InfectionDeck};
use crate::error::{DeckError, DeckRegion, GameError};
use crate::model::card::CityName;
use crate::model::city::City;
use crate::model::disease::{DiseaseTable, DiseaseType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

const LOG_TARGET: &str = "hurd_core::game";

/// Infection cards drawn at the end of a turn unless configured otherwise.
pub const DEFAULT_INFECTION_RATE: usize = 2;

/// Everything needed to start tracking a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    pub cities: Vec<City>,
    pub epidemics: usize,
    pub funded_events: usize,
    /// City cards dealt to players before the city deck was formed.
    pub start_hands: BTreeSet<CityName>,
    pub infection_rate: usize,
    pub diseases: DiseaseTable,
}

impl GameSetup {
    pub fn new(cities: Vec<City>, epidemics: usize) -> Self {
        Self {
            cities,
            epidemics,
            funded_events: 0,
            start_hands: BTreeSet::new(),
            infection_rate: DEFAULT_INFECTION_RATE,
            diseases: DiseaseTable::default(),
        }
    }
}

/// Infection outlook for one city, as listed by [`GameState::cities_by_severity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityOutlook {
    pub name: CityName,
    pub disease: DiseaseType,
    pub infections: u8,
    pub quarantined: bool,
    pub probability: f64,
    pub can_outbreak: bool,
}

/// Board, city deck and infection deck of a game in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    cities: BTreeMap<CityName, City>,
    city_deck: CityDeck,
    infection_deck: InfectionDeck,
    diseases: DiseaseTable,
    infection_rate: usize,
    outbreaks: usize,
}

impl GameState {
    pub fn new(setup: GameSetup) -> Result<Self, GameError> {
        if setup.infection_rate == 0 {
            return Err(GameError::InvalidInfectionRate);
        }
        let mut cities = BTreeMap::new();
        for city in setup.cities {
            let name = city.name.clone();
            if cities.insert(name.clone(), city).is_some() {
                return Err(GameError::DuplicateCity(name));
            }
        }
        if let Some(unknown) = setup
            .start_hands
            .iter()
            .find(|name| !cities.contains_key(*name))
        {
            return Err(GameError::UnknownCity(unknown.clone()));
        }

        let city_deck = CityDeck::new(
            cities.values().map(|city| (city.name.clone(), city.disease)),
            setup.epidemics,
            setup.funded_events,
            &setup.start_hands,
        )?;
        let infection_deck = InfectionDeck::new(cities.keys().map(CityName::as_str));

        info!(
            target: LOG_TARGET,
            cities = cities.len(),
            city_deck = city_deck.total(),
            epidemics = setup.epidemics,
            funded_events = setup.funded_events,
            "game created"
        );

        Ok(Self {
            cities,
            city_deck,
            infection_deck,
            diseases: setup.diseases,
            infection_rate: setup.infection_rate,
            outbreaks: 0,
        })
    }

    pub(crate) fn from_parts(
        cities: Vec<City>,
        city_deck: CityDeck,
        infection_deck: InfectionDeck,
        diseases: DiseaseTable,
        infection_rate: usize,
        outbreaks: usize,
    ) -> Result<Self, GameError> {
        let mut by_name = BTreeMap::new();
        for city in cities {
            let name = city.name.clone();
            if by_name.insert(name.clone(), city).is_some() {
                return Err(GameError::DuplicateCity(name));
            }
        }
        Ok(Self {
            cities: by_name,
            city_deck,
            infection_deck,
            diseases,
            infection_rate,
            outbreaks,
        })
    }

    pub fn city(&self, name: &CityName) -> Result<&City, GameError> {
        self.cities
            .get(name)
            .ok_or_else(|| GameError::UnknownCity(name.clone()))
    }

    fn city_mut(&mut self, name: &CityName) -> Result<&mut City, GameError> {
        self.cities
            .get_mut(name)
            .ok_or_else(|| GameError::UnknownCity(name.clone()))
    }

    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    pub fn city_deck(&self) -> &CityDeck {
        &self.city_deck
    }

    pub fn infection_deck(&self) -> &InfectionDeck {
        &self.infection_deck
    }

    pub fn diseases(&self) -> &DiseaseTable {
        &self.diseases
    }

    pub fn infection_rate(&self) -> usize {
        self.infection_rate
    }

    /// Outbreaks triggered by infections so far.
    pub fn outbreaks(&self) -> usize {
        self.outbreaks
    }

    /// Draws `name` from the infection deck and places a cube.
    ///
    /// Returns `true` when the city was already full. Outbreak chains are not resolved.
    pub fn infect(&mut self, name: &CityName) -> Result<bool, GameError> {
        self.city(name)?;
        self.infection_deck.draw(name)?;
        self.place_cube(name)
    }

    /// Resolves an epidemic that pulled `name` from the bottom of the infection deck.
    ///
    /// Nothing changes unless every step can succeed.
    pub fn epidemic(&mut self, name: &CityName) -> Result<(), GameError> {
        self.city(name)?;
        if !self.infection_deck.in_bottom_striation(name) {
            return Err(DeckError::NotFound {
                name: name.clone(),
                region: DeckRegion::BottomStriation,
            }
            .into());
        }
        self.city_deck.draw_epidemic()?;
        self.infection_deck.pull_from_bottom(name)?;

        let city = self.city_mut(name)?;
        if city.quarantined {
            city.quarantined = false;
        } else {
            city.epidemic();
        }
        self.infection_deck.recycle();

        info!(
            target: LOG_TARGET,
            city = %name,
            epidemics_drawn = self.city_deck.epidemics_drawn(),
            striations = self.infection_deck.striations().len(),
            "epidemic resolved"
        );
        Ok(())
    }

    /// Reveals a city card; diseases flagged `infect_on_city_draw` also infect the city.
    pub fn draw_city_card(&mut self, name: &CityName) -> Result<(), GameError> {
        let disease = self.city(name)?.disease;
        self.city_deck.draw_city(name)?;
        if self.diseases.get(disease).infect_on_city_draw {
            self.place_cube(name)?;
        }
        Ok(())
    }

    pub fn draw_funded_event(&mut self) -> Result<(), GameError> {
        self.city_deck.draw_funded_event()?;
        Ok(())
    }

    pub fn quarantine(&mut self, name: &CityName) -> Result<(), GameError> {
        let city = self.city_mut(name)?;
        if city.quarantined {
            return Err(GameError::AlreadyQuarantined(name.clone()));
        }
        city.quarantined = true;
        Ok(())
    }

    pub fn remove_quarantine(&mut self, name: &CityName) -> Result<(), GameError> {
        let city = self.city_mut(name)?;
        if !city.quarantined {
            return Err(GameError::NotQuarantined(name.clone()));
        }
        city.quarantined = false;
        Ok(())
    }

    /// Removes one cube from `name`. Diseases marked untreatable keep their cubes.
    pub fn treat(&mut self, name: &CityName) -> Result<(), GameError> {
        let disease = self.city(name)?.disease;
        if self.diseases.get(disease).untreatable {
            return Err(GameError::Untreatable {
                city: name.clone(),
                disease,
            });
        }
        let city = self.city_mut(name)?;
        if city.infections == 0 {
            return Err(GameError::NotInfected(name.clone()));
        }
        city.infections -= 1;
        Ok(())
    }

    pub fn set_infections(&mut self, name: &CityName, infections: u8) -> Result<(), GameError> {
        self.city_mut(name)?.set_infections(infections);
        Ok(())
    }

    pub fn set_infection_rate(&mut self, rate: usize) -> Result<(), GameError> {
        if rate == 0 {
            return Err(GameError::InvalidInfectionRate);
        }
        debug!(
            target: LOG_TARGET,
            from = self.infection_rate,
            to = rate,
            "infection rate changed"
        );
        self.infection_rate = rate;
        Ok(())
    }

    pub fn epidemic_analysis(&self) -> Result<EpidemicAnalysis, GameError> {
        Ok(self.city_deck.epidemic_analysis()?)
    }

    /// Chance that `name` gains a cube before the next turn ends.
    ///
    /// Combines a direct hit from the city deck, the epidemic pull and re-draw, and a regular
    /// infection draw. Neighbouring outbreaks are not considered.
    pub fn probability_of_city(&self, name: &CityName) -> Result<f64, GameError> {
        let city = self.city(name)?;
        if city.quarantined {
            return Ok(0.0);
        }

        let direct = if self.diseases.get(city.disease).infect_on_city_draw && !city.is_full() {
            self.city_deck.probability_of_drawing(name)
        } else {
            0.0
        };

        let epidemic = self.city_deck.probability_of_epidemic()?;
        let epidemic_draw = match self.infection_deck.bottom_striation() {
            Some(bottom) if bottom.contains(name) => 1.0 / bottom.len() as f64,
            _ if self.infection_deck.drawn().contains(name) => {
                self.infection_rate as f64 / (1 + self.infection_deck.drawn_count()) as f64
            }
            _ => 0.0,
        };
        let regular_draw = self
            .infection_deck
            .probability_of_drawing(name, self.infection_rate);

        Ok(direct + epidemic * epidemic_draw + (1.0 - epidemic) * regular_draw)
    }

    /// Whether `name` could outbreak this turn: it can be infected and is either full or
    /// waiting at the bottom of the infection deck.
    pub fn can_outbreak(&self, name: &CityName) -> Result<bool, GameError> {
        let probability = self.probability_of_city(name)?;
        Ok(self.outbreak_possible(self.city(name)?, probability))
    }

    /// Every city ordered by cubes, then infection probability, then name.
    pub fn cities_by_severity(&self) -> Result<Vec<CityOutlook>, GameError> {
        let mut outlooks = self
            .cities
            .values()
            .map(|city| {
                let probability = self.probability_of_city(&city.name)?;
                Ok(CityOutlook {
                    name: city.name.clone(),
                    disease: city.disease,
                    infections: city.infections,
                    quarantined: city.quarantined,
                    probability,
                    can_outbreak: self.outbreak_possible(city, probability),
                })
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        outlooks.sort_by(|a, b| {
            b.infections
                .cmp(&a.infections)
                .then_with(|| b.probability.total_cmp(&a.probability))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(outlooks)
    }

    /// Inputs for curing `disease` holding `held` matching cards, with a role `bonus`.
    pub fn cure_request(&self, disease: DiseaseType, held: u32, bonus: u32) -> CureRequest {
        let remaining_deck = self.city_deck.remaining_cards();
        CureRequest {
            held,
            required_total: self.diseases.get(disease).cards_to_cure,
            bonus,
            remaining_deck,
            remaining_draws: usable_draws(remaining_deck),
            family_remaining: self.city_deck.remaining_cards_with(disease),
        }
    }

    pub fn probability_of_curing(&self, disease: DiseaseType, held: u32, bonus: u32) -> f64 {
        if self.diseases.get(disease).incurable {
            return 0.0;
        }
        cure_probability(&self.cure_request(disease, held, bonus))
    }

    fn place_cube(&mut self, name: &CityName) -> Result<bool, GameError> {
        let city = self.city_mut(name)?;
        if city.quarantined {
            city.quarantined = false;
            debug!(target: LOG_TARGET, city = %name, "quarantine absorbed an infection");
            return Ok(false);
        }
        let outbreak = city.infect();
        if outbreak {
            self.outbreaks += 1;
            info!(target: LOG_TARGET, city = %name, outbreaks = self.outbreaks, "outbreak");
        }
        Ok(outbreak)
    }

    fn outbreak_possible(&self, city: &City, probability: f64) -> bool {
        if city.infections == 0 && !self.diseases.get(city.disease).infect_on_city_draw {
            return false;
        }
        if probability == 0.0 {
            return false;
        }
        city.is_full() || self.infection_deck.in_bottom_striation(&city.name)
    }
}
