use crate::model::card::CityName;
use crate::model::disease::DiseaseType;
use core::fmt;
use thiserror::Error;

/// Part of the game a card was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckRegion {
    ActiveStriation,
    BottomStriation,
    CityDeck,
}

impl fmt::Display for DeckRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeckRegion::ActiveStriation => "active infection striation",
            DeckRegion::BottomStriation => "bottom infection striation",
            DeckRegion::CityDeck => "city deck",
        };
        f.write_str(label)
    }
}

/// Kind of card that has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Epidemic,
    FundedEvent,
    Infection,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CardKind::Epidemic => "epidemic",
            CardKind::FundedEvent => "funded event",
            CardKind::Infection => "infection",
        };
        f.write_str(label)
    }
}

/// Failures raised by the deck models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("{name} is not present in the {region}")]
    NotFound { name: CityName, region: DeckRegion },
    #[error("{name} has already been drawn")]
    AlreadyDrawn { name: CityName },
    /// The caller broke the strictly increasing draw index contract.
    #[error("draw index {index} does not follow the last processed index {last}")]
    OutOfOrderDraw { index: usize, last: usize },
    #[error("no {0} cards left to draw")]
    Exhausted(CardKind),
    /// Every candidate layout has been eliminated; upstream state is corrupt.
    #[error("no layout of the city deck is consistent with the observed draws")]
    Inconsistent,
    #[error("cannot split {cards} cards into {epidemics} striations")]
    InvalidLayout { cards: usize, epidemics: usize },
}

/// Failures raised by game-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0} is not a known city")]
    UnknownCity(CityName),
    #[error("{0} is already quarantined")]
    AlreadyQuarantined(CityName),
    #[error("{0} is not quarantined")]
    NotQuarantined(CityName),
    #[error("{0} appears more than once")]
    DuplicateCity(CityName),
    #[error("{city} cannot be treated: {disease} is untreatable")]
    Untreatable { city: CityName, disease: DiseaseType },
    #[error("{0} has no cubes to treat")]
    NotInfected(CityName),
    #[error("infection rate must be at least 1")]
    InvalidInfectionRate,
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_region() {
        let err = DeckError::NotFound {
            name: CityName::new("Paris"),
            region: DeckRegion::BottomStriation,
        };
        assert_eq!(
            err.to_string(),
            "paris is not present in the bottom infection striation"
        );
        assert_eq!(
            DeckError::Exhausted(CardKind::Epidemic).to_string(),
            "no epidemic cards left to draw"
        );
    }

    #[test]
    fn deck_errors_convert_into_game_errors() {
        let err: GameError = DeckError::Inconsistent.into();
        assert!(matches!(err, GameError::Deck(DeckError::Inconsistent)));
    }
}
