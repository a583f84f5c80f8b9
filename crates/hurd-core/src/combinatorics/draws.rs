use super::combination::n_choose_k;

/// Probability of drawing exactly `n` cards of a family of `family_size` when drawing `draws`
/// cards without replacement from a deck of `deck_size`.
///
/// `C(family, n) · C(deck - family, draws - n) / C(deck, draws)`
pub fn exactly_n(deck_size: u64, draws: u64, n: u64, family_size: u64) -> f64 {
    if family_size > deck_size || n > draws {
        return 0.0;
    }
    let draws = draws.min(deck_size);
    if n > draws {
        return 0.0;
    }

    let family = n_choose_k(family_size, n);
    let others = n_choose_k(deck_size - family_size, draws - n);
    let all = n_choose_k(deck_size, draws);
    family.product(others.product(all.inverse())).value()
}

/// Probability of drawing at least `n` cards of the family over `draws` draws.
pub fn at_least_n(deck_size: u64, draws: u64, n: u64, family_size: u64) -> f64 {
    if family_size > deck_size || n > draws {
        return 0.0;
    }
    (0..n).fold(1.0, |remaining, i| {
        remaining - exactly_n(deck_size, draws, i, family_size)
    })
}
