//! Uniform drawing with replacement

use crate::error::SamplingError;
use rand::Rng;

/// Draw `count` elements uniformly at random, with replacement
///
/// The result is in draw order and may contain duplicates. Drawing zero
/// elements always succeeds, even from an empty slice.
///
/// # Errors
/// Returns [`SamplingError::InvalidInput`] if `elements` is empty and
/// `count > 0`.
pub fn draw_elements<T, R>(rng: &mut R, elements: &[T], count: usize) -> Result<Vec<T>, SamplingError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    if elements.is_empty() {
        return Err(SamplingError::invalid_input(format!(
            "cannot draw {count} elements from an empty population"
        )));
    }

    Ok((0..count)
        .map(|_| elements[rng.gen_range(0..elements.len())].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draw_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let drawn = draw_elements(&mut rng, &["A", "B"], 0).unwrap();
        assert!(drawn.is_empty());

        let none: [&str; 0] = [];
        assert!(draw_elements(&mut rng, &none, 0).unwrap().is_empty());
    }

    #[test]
    fn draw_from_empty_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let none: [&str; 0] = [];
        let result = draw_elements(&mut rng, &none, 3);
        assert!(matches!(result, Err(SamplingError::InvalidInput(_))));
    }

    #[test]
    fn draw_single_element_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = draw_elements(&mut rng, &["TP53"], 4).unwrap();
        assert_eq!(drawn, vec!["TP53"; 4]);
    }

    #[test]
    fn same_seed_same_draw() {
        let symbols = ["A", "B", "C", "D", "E"];
        let first = draw_elements(&mut StdRng::seed_from_u64(99), &symbols, 8).unwrap();
        let second = draw_elements(&mut StdRng::seed_from_u64(99), &symbols, 8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn draw_allows_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = draw_elements(&mut rng, &[1, 2], 20).unwrap();
        assert_eq!(drawn.len(), 20);
        assert!(drawn.iter().all(|x| *x == 1 || *x == 2));

        let mut sorted = drawn.clone();
        sorted.dedup();
        assert!(sorted.len() < drawn.len());
    }
}
