use crate::combinatorics::at_least_n;

/// City cards drawn per player turn.
pub const CITY_CARDS_PER_TURN: usize = 2;

/// Remaining city cards are shared by the table; a player sees roughly one card in four.
const CARDS_PER_PLAYER_DRAW: usize = 4;

/// The last draws come too late to act on.
const UNUSABLE_DRAWS: usize = 2;

/// Inputs to the cure probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CureRequest {
    /// Matching cards already in hand.
    pub held: u32,
    pub required_total: u32,
    /// Reduction granted by a role (the scientist needs one card fewer).
    pub bonus: u32,
    pub remaining_deck: usize,
    pub remaining_draws: usize,
    /// Undrawn cards of the disease left in the deck.
    pub family_remaining: usize,
}

impl CureRequest {
    pub fn cards_needed(&self) -> u32 {
        self.required_total
            .saturating_sub(self.held)
            .saturating_sub(self.bonus)
    }
}

/// Chance of collecting the cards still needed within the remaining draws.
pub fn cure_probability(request: &CureRequest) -> f64 {
    at_least_n(
        request.remaining_deck as u64,
        request.remaining_draws as u64,
        u64::from(request.cards_needed()),
        request.family_remaining as u64,
    )
}

/// Draws a single player can still use out of `remaining_cards` city cards.
pub fn usable_draws(remaining_cards: usize) -> usize {
    (remaining_cards / CARDS_PER_PLAYER_DRAW).saturating_sub(UNUSABLE_DRAWS)
}
