use super::error::EngineError;
use crate::core::models::record::{PAIR_SIZE, StabilityVector};

/// Folds per-compound predictions back into one stability vector per pair.
///
/// `predictions` must be ordered like a [`CompoundSet`](crate::core::models::compound::CompoundSet):
/// both members of a pair adjacent, slot 0 first. Slot *i* of each vector is the
/// prediction for slot *i*'s compound.
pub fn to_stability_vectors(predictions: &[u8]) -> Result<Vec<StabilityVector>, EngineError> {
    if predictions.len() % PAIR_SIZE != 0 {
        return Err(EngineError::UnpairedPredictions(predictions.len()));
    }
    Ok(predictions
        .chunks_exact(PAIR_SIZE)
        .map(|pair| StabilityVector::new(pair[0], pair[1]))
        .collect())
}

/// Flattens stability vectors into per-compound labels, the inverse of
/// [`to_stability_vectors`].
pub fn to_compound_labels(vectors: &[StabilityVector]) -> Vec<u8> {
    vectors.iter().flat_map(|v| v.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_keep_slot_order() {
        let vectors = to_stability_vectors(&[1, 0, 0, 1, 1, 1]).unwrap();
        assert_eq!(
            vectors,
            vec![
                StabilityVector::new(1, 0),
                StabilityVector::new(0, 1),
                StabilityVector::new(1, 1)
            ]
        );
    }

    #[test]
    fn mapping_is_a_bijection_on_every_pair() {
        for a in 0..=1 {
            for b in 0..=1 {
                let vectors = to_stability_vectors(&[a, b]).unwrap();
                assert_eq!(vectors[0].0, [a, b]);
                assert_eq!(to_compound_labels(&vectors), vec![a, b]);
            }
        }
    }

    #[test]
    fn odd_prediction_count_is_rejected() {
        assert!(matches!(
            to_stability_vectors(&[1, 0, 1]),
            Err(EngineError::UnpairedPredictions(3))
        ));
    }
}
