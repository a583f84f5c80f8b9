use super::city::CityDeck;
use crate::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A physical city deck prepared the way the rules describe: the non-epidemic cards are split
/// into near-equal piles, one epidemic is shuffled into each pile, and the piles are stacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLayout {
    cards: Vec<Card>,
    striation_sizes: Vec<usize>,
}

impl DeckLayout {
    pub fn shuffled<R: rand::Rng + ?Sized>(deck: &CityDeck, rng: &mut R) -> Self {
        let mut others: Vec<Card> = deck.city_names().cloned().map(Card::City).collect();
        others.extend(std::iter::repeat_n(Card::FundedEvent, deck.funded_events()));
        others.shuffle(rng);

        let piles = deck.epidemics();
        let base = others.len() / piles;
        let mut sizes: Vec<usize> = (0..piles)
            .map(|pile| base + usize::from(pile < others.len() % piles))
            .collect();
        sizes.shuffle(rng);

        let mut cards = Vec::with_capacity(deck.total());
        let mut striation_sizes = Vec::with_capacity(piles);
        let mut rest = others.into_iter();
        for size in sizes {
            let mut pile: Vec<Card> = rest.by_ref().take(size).collect();
            pile.push(Card::Epidemic);
            pile.shuffle(rng);
            striation_sizes.push(pile.len());
            cards.extend(pile);
        }

        Self {
            cards,
            striation_sizes,
        }
    }

    pub fn shuffled_with_seed(deck: &CityDeck, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(deck, &mut rng)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Pile sizes including each pile's epidemic, top pile first.
    pub fn striation_sizes(&self) -> &[usize] {
        &self.striation_sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::CityName;
    use crate::model::disease::DiseaseType;
    use std::collections::BTreeSet;

    fn deck(cities: usize, epidemics: usize, funded: usize) -> CityDeck {
        let cities = (0..cities).map(|i| (CityName::new(format!("c{i}")), DiseaseType::Red));
        CityDeck::new(cities, epidemics, funded, &BTreeSet::new()).unwrap()
    }

    #[test]
    fn layout_holds_every_card_once() {
        let deck = deck(45, 5, 3);
        let layout = DeckLayout::shuffled_with_seed(&deck, 7);
        assert_eq!(layout.cards().len(), deck.total());
        let epidemics = layout.cards().iter().filter(|c| c.is_epidemic()).count();
        assert_eq!(epidemics, 5);
        let unique: BTreeSet<_> = layout
            .cards()
            .iter()
            .filter_map(Card::city_name)
            .collect();
        assert_eq!(unique.len(), 45);
    }

    #[test]
    fn striations_follow_the_partition_discipline() {
        let deck = deck(45, 5, 3);
        let layout = DeckLayout::shuffled_with_seed(&deck, 11);
        let sizes = layout.striation_sizes();
        assert_eq!(sizes.iter().sum::<usize>(), 53);
        assert!(sizes.iter().all(|&size| size == 10 || size == 11));
        assert_eq!(sizes.iter().filter(|&&size| size == 11).count(), 53 % 5);

        let mut start = 0;
        for &size in sizes {
            let pile = &layout.cards()[start..start + size];
            assert_eq!(pile.iter().filter(|c| c.is_epidemic()).count(), 1);
            start += size;
        }
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck = deck(20, 4, 0);
        assert_eq!(
            DeckLayout::shuffled_with_seed(&deck, 42),
            DeckLayout::shuffled_with_seed(&deck, 42)
        );
    }
}
