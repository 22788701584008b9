use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use verdict_core::{matthews_corrcoef, weighted_f1};
use verdict_data_provider::Example;

/// A single prediction: either a label index or the explicit indeterminate
/// outcome when free-text generation named no label word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Answer {
    Choice(usize),
    Indeterminate,
}

impl Answer {
    /// Class id used for metric computation; indeterminate forms its own
    /// class.
    pub fn metric_class(&self) -> i64 {
        match self {
            Answer::Choice(label) => *label as i64,
            Answer::Indeterminate => -1,
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Answer::Indeterminate)
    }
}

/// Both predictions for one evaluation example.
#[derive(Clone, Copy, Debug)]
pub struct Outcome {
    pub label: usize,
    pub scan: Answer,
    pub likelihood: Answer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelTally {
    pub correct: usize,
    pub incorrect: usize,
}

/// Accumulates outcomes across the evaluation sequence. Threaded through
/// the scoring loop as a value; `finish` consumes it into the summary.
///
/// Correctness is judged against the generation-scan prediction; the
/// likelihood prediction is carried alongside for the second F1.
#[derive(Clone, Debug)]
pub struct Accumulator {
    per_label: Vec<LabelTally>,
    correct: usize,
    incorrect: usize,
    invalid: usize,
    labels: Vec<i64>,
    scan_predictions: Vec<i64>,
    likelihood_predictions: Vec<i64>,
}

impl Accumulator {
    pub fn new(num_labels: usize) -> Self {
        Accumulator {
            per_label: vec![LabelTally::default(); num_labels],
            correct: 0,
            incorrect: 0,
            invalid: 0,
            labels: Vec::new(),
            scan_predictions: Vec::new(),
            likelihood_predictions: Vec::new(),
        }
    }

    #[must_use]
    pub fn observe(mut self, outcome: &Outcome) -> Self {
        self.labels.push(outcome.label as i64);
        self.scan_predictions.push(outcome.scan.metric_class());
        self.likelihood_predictions
            .push(outcome.likelihood.metric_class());

        match outcome.scan {
            Answer::Indeterminate => self.invalid += 1,
            Answer::Choice(predicted) if predicted == outcome.label => {
                self.correct += 1;
                self.per_label[outcome.label].correct += 1;
            }
            Answer::Choice(_) => {
                self.incorrect += 1;
                self.per_label[outcome.label].incorrect += 1;
            }
        }
        self
    }

    pub fn total(&self) -> usize {
        self.labels.len()
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn incorrect(&self) -> usize {
        self.incorrect
    }

    pub fn invalid(&self) -> usize {
        self.invalid
    }

    /// Running accuracy; indeterminate outcomes stay in the denominator.
    pub fn accuracy(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.correct as f64 / self.labels.len() as f64
    }

    pub fn finish(self, elapsed: Duration) -> Result<EvalSummary> {
        let f1 = weighted_f1(&self.labels, &self.scan_predictions)?;
        let f1_likelihood = weighted_f1(&self.labels, &self.likelihood_predictions)?;
        let mcc = matthews_corrcoef(&self.labels, &self.scan_predictions)?;
        Ok(EvalSummary {
            correct: self.correct,
            incorrect: self.incorrect,
            invalid: self.invalid,
            total: self.labels.len(),
            per_label: self.per_label,
            f1,
            f1_likelihood,
            mcc,
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }
}

/// Run-level summary record.
#[derive(Clone, Debug, Serialize)]
pub struct EvalSummary {
    pub correct: usize,
    pub incorrect: usize,
    pub invalid: usize,
    pub total: usize,
    pub per_label: Vec<LabelTally>,
    pub f1: f64,
    pub f1_likelihood: f64,
    pub mcc: f64,
    pub elapsed_secs: f64,
}

/// Per-example trace record.
#[derive(Clone, Debug, Serialize)]
pub struct TraceRecord {
    pub example: Example,
    pub prompt: String,
    pub generated_text: String,
    pub scan_answer: Answer,
    pub likelihood_answer: Answer,
    pub choice_probs: Vec<f64>,
    pub greedy_continuation: String,
    pub correct: bool,
    pub invalid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn outcome(label: usize, scan: Answer) -> Outcome {
        Outcome {
            label,
            scan,
            likelihood: scan,
        }
    }

    #[test]
    fn scripted_five_example_scenario() {
        // Labels [1,0,1,0,1] with scan predictions [1,0,0,0,1].
        let outcomes = [
            outcome(1, Answer::Choice(1)),
            outcome(0, Answer::Choice(0)),
            outcome(1, Answer::Choice(0)),
            outcome(0, Answer::Choice(0)),
            outcome(1, Answer::Choice(1)),
        ];
        let mut accumulator = Accumulator::new(2);
        for outcome in &outcomes {
            accumulator = accumulator.observe(outcome);
        }
        let summary = accumulator.finish(Duration::from_secs(1)).unwrap();

        assert_eq!(summary.correct, 4);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.invalid, 0);
        assert_eq!(summary.total, 5);
        assert_eq!(
            summary.per_label,
            vec![
                LabelTally {
                    correct: 2,
                    incorrect: 0
                },
                LabelTally {
                    correct: 2,
                    incorrect: 1
                },
            ]
        );
        assert_abs_diff_eq!(summary.f1, 0.8, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.mcc, 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn indeterminate_counts_toward_the_denominator() {
        let mut accumulator = Accumulator::new(2);
        accumulator = accumulator.observe(&outcome(1, Answer::Choice(1)));
        accumulator = accumulator.observe(&Outcome {
            label: 0,
            scan: Answer::Indeterminate,
            likelihood: Answer::Choice(1),
        });

        assert_eq!(accumulator.correct(), 1);
        assert_eq!(accumulator.invalid(), 1);
        assert_eq!(accumulator.total(), 2);
        assert_abs_diff_eq!(accumulator.accuracy(), 0.5, epsilon = 1e-9);
    }
}
