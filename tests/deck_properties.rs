use pazaak_rs::cards::CATALOG;
use pazaak_rs::deck::{build_side_deck, shuffle, validate_side_deck, Deck, SidePool};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn any_pool() -> impl Strategy<Value = SidePool> {
    prop_oneof![Just(SidePool::All), Just(SidePool::Simple), Just(SidePool::Flip)]
}

proptest! {
    #[test]
    fn shuffle_is_a_permutation(mut items in proptest::collection::vec(0u16..500, 0..64), seed in any::<u64>()) {
        let mut expected = items.clone();
        shuffle(&mut items, &mut ChaCha8Rng::seed_from_u64(seed));
        items.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(items, expected);
    }

    #[test]
    fn rigged_deck_hits_target_exactly(target in 0i32..=220, seed in any::<u64>()) {
        let deck = Deck::rigged(target, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(deck.len(), 40);
        prop_assert_eq!(deck.total(), 220);
        if target > 0 {
            let mut sum = 0;
            let mut hit = false;
            for card in deck.iter() {
                sum += card.value();
                if sum == target {
                    hit = true;
                    break;
                }
                prop_assert!(sum < target);
            }
            prop_assert!(hit);
        }
    }

    #[test]
    fn generated_side_decks_validate(pool in any_pool(), seed in any::<u64>()) {
        let ids = build_side_deck(pool, &mut ChaCha8Rng::seed_from_u64(seed));
        let cards = validate_side_deck(ids.as_slice()).unwrap();
        prop_assert_eq!(cards.len(), 10);
        for c in &cards {
            match pool {
                SidePool::Simple => prop_assert!(!c.is_flippable()),
                SidePool::Flip => prop_assert!(c.is_flippable()),
                _ => {}
            }
        }
    }

    #[test]
    fn any_catalog_card_round_trips_through_json(idx in 0usize..CATALOG.len()) {
        let card: pazaak_rs::cards::Card = CATALOG[idx].identifier.parse().unwrap();
        let json = serde_json::to_string(&card).unwrap();
        let back: pazaak_rs::cards::Card = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, card);
    }
}
