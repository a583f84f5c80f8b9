use core::fmt;

use anyhow::{Context, Result, anyhow};
use hurd_core::deck::{DeckLayout, InfectionDeck};
use hurd_core::game::GameState;
use hurd_core::game::cure::CITY_CARDS_PER_TURN;
use hurd_core::model::card::{Card, CityName};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use tracing::info;

use crate::config::GameConfig;

const LOG_TARGET: &str = "nerd_hurd::demo";

/// One simulated turn: the forecast made before the draws and what the deck produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoTurn {
    pub turn: usize,
    pub forecast: f64,
    pub first_draw: f64,
    pub cards: Vec<Card>,
    pub epidemic_cities: Vec<CityName>,
    pub infected: Vec<CityName>,
}

impl DemoTurn {
    pub fn had_epidemic(&self) -> bool {
        self.cards.iter().any(Card::is_epidemic)
    }
}

impl fmt::Display for DemoTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(ToString::to_string).collect();
        write!(
            f,
            "Turn {:>2}: forecast {:5.1}% (first draw {:5.1}%) -> {}",
            self.turn,
            self.forecast * 100.0,
            self.first_draw * 100.0,
            cards.join(", ")
        )?;
        for city in &self.epidemic_cities {
            write!(f, " [epidemic in {city}]")?;
        }
        if !self.infected.is_empty() {
            let infected: Vec<&str> = self.infected.iter().map(CityName::as_str).collect();
            write!(f, "; infected {}", infected.join(", "))?;
        }
        Ok(())
    }
}

fn pick(deck: &InfectionDeck, bottom: bool, rng: &mut StdRng) -> Option<CityName> {
    let striation = if bottom {
        deck.bottom_striation()
    } else {
        deck.striations().iter().find(|striation| !striation.is_empty())
    };
    striation.and_then(|cards| cards.iter().choose(rng).cloned())
}

/// Deals a seeded city deck and plays up to `turns` turns of it, drawing infection cards at
/// random from the active striation.
pub fn run_demo(config: &GameConfig, seed: u64, turns: usize) -> Result<Vec<DemoTurn>> {
    let mut game = GameState::new(config.setup()).context("building game from configuration")?;
    let mut rng = StdRng::seed_from_u64(seed);
    let layout = DeckLayout::shuffled(game.city_deck(), &mut rng);
    info!(
        target: LOG_TARGET,
        seed,
        striations = ?layout.striation_sizes(),
        "dealt city deck"
    );

    let mut played = Vec::new();
    for (index, cards) in layout
        .cards()
        .chunks(CITY_CARDS_PER_TURN)
        .take(turns)
        .enumerate()
    {
        let analysis = game.epidemic_analysis()?;
        let mut epidemic_cities = Vec::new();
        for card in cards {
            match card {
                Card::City(name) => game.draw_city_card(name)?,
                Card::FundedEvent => game.draw_funded_event()?,
                Card::Epidemic => {
                    let city = pick(game.infection_deck(), true, &mut rng)
                        .ok_or_else(|| anyhow!("infection deck is empty"))?;
                    game.epidemic(&city)?;
                    epidemic_cities.push(city);
                }
            }
        }

        let mut infected = Vec::with_capacity(game.infection_rate());
        for _ in 0..game.infection_rate() {
            let Some(city) = pick(game.infection_deck(), false, &mut rng) else {
                break;
            };
            game.infect(&city)?;
            infected.push(city);
        }

        played.push(DemoTurn {
            turn: index + 1,
            forecast: analysis.turn_probability(),
            first_draw: analysis.p1,
            cards: cards.to_vec(),
            epidemic_cities,
            infected,
        });
    }
    Ok(played)
}
