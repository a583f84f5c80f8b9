use core::fmt;

use hurd_core::GameError;
use hurd_core::deck::EpidemicAnalysis;
use hurd_core::game::{CityOutlook, GameState};
use hurd_core::model::card::CityName;
use hurd_core::model::city::MAX_INFECTIONS;
use hurd_core::model::disease::DiseaseType;
use serde::Serialize;

use crate::config::PlayerConfig;

/// Everything the assistant shows after a batch of events.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub game_name: String,
    pub infection_rate: usize,
    pub outbreaks: usize,
    pub city_deck: CityDeckSummary,
    pub epidemic: EpidemicSummary,
    pub infection_deck: InfectionDeckSummary,
    pub cities: Vec<CityOutlook>,
    pub cures: Vec<PlayerCures>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityDeckSummary {
    pub total: usize,
    pub remaining: usize,
    pub epidemics: usize,
    pub epidemics_drawn: usize,
    pub funded_events_drawn: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpidemicSummary {
    #[serde(flatten)]
    pub analysis: EpidemicAnalysis,
    pub turn_probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfectionDeckSummary {
    /// Cards left per striation, top first.
    pub striations: Vec<usize>,
    pub drawn: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerCures {
    pub player: String,
    pub scientist: bool,
    pub cures: Vec<CureOutlook>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CureOutlook {
    pub disease: DiseaseType,
    pub held: u32,
    pub needed: u32,
    pub probability: f64,
}

impl Report {
    pub fn build(
        game_name: &str,
        players: &[PlayerConfig],
        game: &GameState,
    ) -> Result<Self, GameError> {
        let analysis = game.epidemic_analysis()?;
        let city_deck = game.city_deck();
        let infection_deck = game.infection_deck();

        let cures = players
            .iter()
            .map(|player| player_cures(player, game))
            .collect::<Result<Vec<_>, GameError>>()?;

        Ok(Self {
            game_name: game_name.to_string(),
            infection_rate: game.infection_rate(),
            outbreaks: game.outbreaks(),
            city_deck: CityDeckSummary {
                total: city_deck.total(),
                remaining: city_deck.remaining_cards(),
                epidemics: city_deck.epidemics(),
                epidemics_drawn: city_deck.epidemics_drawn(),
                funded_events_drawn: city_deck.funded_events_drawn(),
            },
            epidemic: EpidemicSummary {
                turn_probability: analysis.turn_probability(),
                analysis,
            },
            infection_deck: InfectionDeckSummary {
                striations: infection_deck
                    .striations()
                    .iter()
                    .map(|striation| striation.len())
                    .filter(|&len| len > 0)
                    .collect(),
                drawn: infection_deck.drawn_count(),
            },
            cities: game.cities_by_severity()?,
            cures,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn player_cures(player: &PlayerConfig, game: &GameState) -> Result<PlayerCures, GameError> {
    let mut hand = Vec::with_capacity(player.start_cards.len());
    for card in &player.start_cards {
        hand.push(game.city(&CityName::new(card))?.disease);
    }

    let cures = game
        .diseases()
        .curable()
        .filter(|disease| game.cities().any(|city| city.disease == *disease))
        .map(|disease| {
            let held = hand.iter().filter(|held| **held == disease).count() as u32;
            let request = game.cure_request(disease, held, player.cure_bonus());
            CureOutlook {
                disease,
                held,
                needed: request.cards_needed(),
                probability: game.probability_of_curing(disease, held, player.cure_bonus()),
            }
        })
        .collect();

    Ok(PlayerCures {
        player: player.name.clone(),
        scientist: player.scientist,
        cures,
    })
}

fn percent(probability: f64) -> String {
    format!("{:5.1}%", probability * 100.0)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deck = &self.city_deck;
        let epidemic = &self.epidemic.analysis;
        writeln!(f, "== {} ==", self.game_name)?;
        writeln!(
            f,
            "City deck: {} of {} cards left, {}/{} epidemics drawn, {} scenario{}",
            deck.remaining,
            deck.total,
            deck.epidemics_drawn,
            deck.epidemics,
            epidemic.scenario_count,
            if epidemic.scenario_count == 1 { "" } else { "s" }
        )?;
        writeln!(
            f,
            "Epidemic this turn: {} (first draw {}, second draw {}, back-to-back {})",
            percent(self.epidemic.turn_probability),
            percent(epidemic.p1),
            percent(epidemic.p2),
            percent(epidemic.p2_given_p1)
        )?;
        writeln!(
            f,
            "Safe upcoming draws: {}, scenarios guaranteeing an epidemic: {}",
            epidemic.safe_upcoming_count, epidemic.guaranteed_count
        )?;
        writeln!(
            f,
            "Infection deck: striations {:?}, discard {}, rate {}, outbreaks {}",
            self.infection_deck.striations,
            self.infection_deck.drawn,
            self.infection_rate,
            self.outbreaks
        )?;

        writeln!(f)?;
        writeln!(f, "Cities by severity")?;
        for city in &self.cities {
            let cubes = "*".repeat(usize::from(city.infections));
            let flag = if city.quarantined {
                "  quarantined"
            } else if city.can_outbreak {
                "  OUTBREAK RISK"
            } else {
                ""
            };
            writeln!(
                f,
                "  {:<16} {:<7} {:<width$} {}{}",
                city.name.as_str(),
                city.disease.as_str(),
                cubes,
                percent(city.probability),
                flag,
                width = usize::from(MAX_INFECTIONS)
            )?;
        }

        if !self.cures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Cure chances")?;
        }
        for player in &self.cures {
            let role = if player.scientist { " (scientist)" } else { "" };
            writeln!(f, "  {}{}", player.player, role)?;
            for cure in &player.cures {
                writeln!(
                    f,
                    "    {:<7} held {} needs {} {}",
                    cure.disease.as_str(),
                    cure.held,
                    cure.needed,
                    percent(cure.probability)
                )?;
            }
        }
        Ok(())
    }
}
