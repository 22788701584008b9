use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};

fn check_lengths(labels: &[i64], predictions: &[i64]) -> Result<()> {
    if labels.len() != predictions.len() {
        return Err(anyhow!(
            "The lengths of the label and prediction sequences must be equal, but found {} and {}",
            labels.len(),
            predictions.len()
        ));
    }
    Ok(())
}

// The class set is the union of everything seen on either side, so a
// prediction class absent from the gold labels (e.g. the indeterminate
// class) still shapes precision without contributing weight.
fn class_list(labels: &[i64], predictions: &[i64]) -> Vec<i64> {
    labels
        .iter()
        .chain(predictions.iter())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// F1 score per class, averaged with each class weighted by its support in
/// the gold labels.
pub fn weighted_f1(labels: &[i64], predictions: &[i64]) -> Result<f64> {
    check_lengths(labels, predictions)?;
    if labels.is_empty() {
        return Ok(0.0);
    }

    let mut weighted_sum = 0.0;
    for class in class_list(labels, predictions) {
        let mut true_positives = 0usize;
        let mut false_positives = 0usize;
        let mut false_negatives = 0usize;
        let mut support = 0usize;

        for (&label, &prediction) in labels.iter().zip(predictions) {
            if label == class {
                support += 1;
                if prediction == class {
                    true_positives += 1;
                } else {
                    false_negatives += 1;
                }
            } else if prediction == class {
                false_positives += 1;
            }
        }

        if support == 0 {
            continue;
        }

        let precision = match true_positives + false_positives {
            0 => 0.0,
            denom => true_positives as f64 / denom as f64,
        };
        let recall = match true_positives + false_negatives {
            0 => 0.0,
            denom => true_positives as f64 / denom as f64,
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        weighted_sum += f1 * support as f64;
    }

    Ok(weighted_sum / labels.len() as f64)
}

/// Matthews correlation coefficient, in its multiclass form over the
/// confusion matrix. A degenerate denominator yields 0.
pub fn matthews_corrcoef(labels: &[i64], predictions: &[i64]) -> Result<f64> {
    check_lengths(labels, predictions)?;
    if labels.is_empty() {
        return Ok(0.0);
    }

    let classes = class_list(labels, predictions);
    let index: BTreeMap<i64, usize> = classes
        .iter()
        .enumerate()
        .map(|(position, &class)| (class, position))
        .collect();

    let num_classes = classes.len();
    let mut confusion = vec![vec![0u64; num_classes]; num_classes];
    for (&label, &prediction) in labels.iter().zip(predictions) {
        confusion[index[&label]][index[&prediction]] += 1;
    }

    let total = labels.len() as f64;
    let trace: u64 = (0..num_classes).map(|k| confusion[k][k]).sum();
    let true_counts: Vec<f64> = confusion
        .iter()
        .map(|row| row.iter().sum::<u64>() as f64)
        .collect();
    let pred_counts: Vec<f64> = (0..num_classes)
        .map(|k| confusion.iter().map(|row| row[k]).sum::<u64>() as f64)
        .collect();

    let cov_ytyp = trace as f64 * total
        - true_counts
            .iter()
            .zip(&pred_counts)
            .map(|(t, p)| t * p)
            .sum::<f64>();
    let cov_ypyp = total * total - pred_counts.iter().map(|p| p * p).sum::<f64>();
    let cov_ytyt = total * total - true_counts.iter().map(|t| t * t).sum::<f64>();

    let denominator = (cov_ypyp * cov_ytyt).sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok(cov_ytyp / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn f1_one_wrong_out_of_five() {
        let labels = [1, 0, 1, 0, 1];
        let predictions = [1, 0, 0, 0, 1];
        assert_abs_diff_eq!(
            weighted_f1(&labels, &predictions).unwrap(),
            0.8,
            epsilon = 1e-9
        );
    }

    #[test]
    fn mcc_one_wrong_out_of_five() {
        let labels = [1, 0, 1, 0, 1];
        let predictions = [1, 0, 0, 0, 1];
        assert_abs_diff_eq!(
            matthews_corrcoef(&labels, &predictions).unwrap(),
            2.0 / 3.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn perfect_predictions() {
        let labels = [0, 1, 1, 0];
        assert_abs_diff_eq!(weighted_f1(&labels, &labels).unwrap(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            matthews_corrcoef(&labels, &labels).unwrap(),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn inverted_predictions() {
        let labels = [0, 1, 0, 1];
        let predictions = [1, 0, 1, 0];
        assert_abs_diff_eq!(
            matthews_corrcoef(&labels, &predictions).unwrap(),
            -1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            weighted_f1(&labels, &predictions).unwrap(),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn sentinel_prediction_forms_its_own_class() {
        // Reference values from sklearn with y_pred containing -1.
        let labels = [1, 0, 1];
        let predictions = [1, -1, 0];
        assert_abs_diff_eq!(
            weighted_f1(&labels, &predictions).unwrap(),
            4.0 / 9.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            matthews_corrcoef(&labels, &predictions).unwrap(),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn degenerate_single_class_is_zero() {
        let labels = [1, 1];
        let predictions = [1, 1];
        assert_abs_diff_eq!(
            matthews_corrcoef(&labels, &predictions).unwrap(),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn empty_sequences() {
        assert_abs_diff_eq!(weighted_f1(&[], &[]).unwrap(), 0.0);
        assert_abs_diff_eq!(matthews_corrcoef(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_lengths_error() {
        assert!(weighted_f1(&[1], &[1, 0]).is_err());
        assert!(matthews_corrcoef(&[1, 0], &[1]).is_err());
    }
}
