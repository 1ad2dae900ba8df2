//! Crop combinations planted together on one farm in one season.

use super::values::{pick, ValueProvider};

pub type CropCombination = &'static [&'static str];

/// Monocultures, common rotations and multi-crop systems.
pub const CROP_COMBINATIONS: &[CropCombination] = &[
    &["Soja"],
    &["Milho"],
    &["Café"],
    &["Cana-de-açúcar"],
    &["Algodão"],
    &["Arroz"],
    &["Soja", "Milho"],
    &["Soja", "Trigo"],
    &["Soja", "Algodão"],
    &["Milho", "Feijão"],
    &["Arroz", "Feijão"],
    &["Café", "Milho"],
    &["Soja", "Milho", "Trigo"],
    &["Soja", "Milho", "Algodão"],
    &["Milho", "Feijão", "Mandioca"],
    &["Café", "Milho", "Feijão"],
];

pub fn pick_crop_combination(values: &mut dyn ValueProvider) -> CropCombination {
    pick(values, CROP_COMBINATIONS).copied().unwrap_or(&["Soja"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::values::SeededValues;
    use std::collections::HashSet;

    #[test]
    fn catalog_entries_are_non_empty_sets() {
        for combination in CROP_COMBINATIONS {
            assert!(!combination.is_empty());
            let distinct: HashSet<_> = combination.iter().collect();
            assert_eq!(distinct.len(), combination.len(), "{:?}", combination);
        }
    }

    #[test]
    fn every_combination_gets_picked() {
        let mut values = SeededValues::from_seed(8);
        let mut seen = HashSet::new();
        for _ in 0..2_000 {
            seen.insert(pick_crop_combination(&mut values));
        }
        assert_eq!(seen.len(), CROP_COMBINATIONS.len());
    }
}
