//! Randomized fortune draw.

use rand::Rng;

use crate::fortune::catalog::{fortunes, lucky_colors, lucky_places, Language, LUCKY_NUMBERS};
use crate::fortune::FortuneSelection;

/// Draw one fortune: every field independently and uniformly from its list.
///
/// List lengths are taken from `language`; the lucky number comes from the
/// shared pool. Nothing is cached, so repeated calls are independent.
/// Production draws pass `rand::thread_rng()`.
pub fn generate<R: Rng + ?Sized>(language: Language, rng: &mut R) -> FortuneSelection {
    FortuneSelection {
        fortune_id: rng.gen_range(0..fortunes(language).len()),
        color_index: rng.gen_range(0..lucky_colors(language).len()),
        place_index: rng.gen_range(0..lucky_places(language).len()),
        lucky_number: LUCKY_NUMBERS[rng.gen_range(0..LUCKY_NUMBERS.len())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn draws_are_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for language in Language::ALL {
            for _ in 0..500 {
                let s = generate(language, &mut rng);
                assert!(s.fortune_id < fortunes(language).len());
                assert!(s.color_index < lucky_colors(language).len());
                assert!(s.place_index < lucky_places(language).len());
                assert!(LUCKY_NUMBERS.contains(&s.lucky_number));
            }
        }
    }

    #[test]
    fn every_fortune_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<usize> = (0..2000)
            .map(|_| generate(Language::Ko, &mut rng).fortune_id)
            .collect();
        assert_eq!(seen.len(), fortunes(Language::Ko).len());
    }

    #[test]
    fn fields_are_not_locked_together() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<_> = (0..200).map(|_| generate(Language::En, &mut rng)).collect();
        assert!(draws.iter().any(|s| s.color_index != s.place_index));
        assert!(draws.iter().any(|s| s.fortune_id != s.color_index));
    }
}
