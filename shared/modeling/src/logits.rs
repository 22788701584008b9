/// Numerically stable log-softmax over one row of logits.
pub fn log_softmax(row: &[f32]) -> Vec<f32> {
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let sum: f32 = row.iter().map(|logit| (logit - max).exp()).sum();
    let log_denominator = max + sum.ln();
    row.iter().map(|logit| logit - log_denominator).collect()
}

/// Index of the first maximum in the row.
pub fn argmax(row: &[f32]) -> usize {
    debug_assert!(!row.is_empty());
    let mut best = 0;
    for (index, value) in row.iter().enumerate() {
        if *value > row[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn log_softmax_normalizes() {
        let row = [1.0f32, 2.0, 3.0];
        let total: f32 = log_softmax(&row).iter().map(|lp| lp.exp()).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn log_softmax_is_shift_invariant() {
        let row = [1.0f32, 2.0, 3.0];
        let shifted = [1001.0f32, 1002.0, 1003.0];
        for (a, b) in log_softmax(&row).iter().zip(log_softmax(&shifted)) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn log_softmax_survives_large_magnitudes() {
        let row = [1e4f32, 0.0];
        let log_probs = log_softmax(&row);
        assert!(log_probs[0] <= 0.0);
        assert!(log_probs[1].is_finite());
    }

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.5, 2.0, 2.0, 1.0]), 1);
        assert_eq!(argmax(&[3.0]), 0);
    }
}
