use crate::report::{Accumulator, Answer, EvalSummary, Outcome, TraceRecord};
use crate::traits::ClassificationTask;
use anyhow::{ensure, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};
use verdict_data_provider::{Example, Subset};
use verdict_modeling::{argmax, log_softmax, CausalLM};

pub const MAX_NUM_FEW_SHOT: usize = 50;

// Llama-family tokenizers prepend BOS plus an empty leading piece when a
// candidate word is tokenized with its leading space.
const LLAMA_CANDIDATE_SKIP: usize = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("requested {requested} few-shot exemplars, the budget is {max}")]
    FewShotBudget { requested: usize, max: usize },

    #[error("subset holds {available} examples, fewer than the {requested} few-shot exemplars")]
    SubsetTooSmall {
        available: usize,
        requested: usize,
    },
}

pub struct Task {
    benchmark: Box<dyn ClassificationTask>,
    num_few_shot: usize,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("benchmark", &self.benchmark.to_string())
            .field("num_few_shot", &self.num_few_shot)
            .finish()
    }
}

impl Task {
    /// Validates the configuration up front; nothing touches the model
    /// until `run`.
    pub fn new(benchmark: Box<dyn ClassificationTask>, num_few_shot: usize) -> Result<Self, EvalError> {
        if num_few_shot >= MAX_NUM_FEW_SHOT {
            return Err(EvalError::FewShotBudget {
                requested: num_few_shot,
                max: MAX_NUM_FEW_SHOT,
            });
        }
        Ok(Task { benchmark, num_few_shot })
    }

    /// Renders the few-shot context once and fixes the evaluation
    /// sequence, truncated to `limit` when given.
    pub fn prepare(self, subset: &Subset, limit: Option<usize>) -> Result<PreparedTask> {
        if subset.len() < self.num_few_shot {
            return Err(EvalError::SubsetTooSmall {
                available: subset.len(),
                requested: self.num_few_shot,
            }
            .into());
        }

        let (exemplars, rest) = subset.split_few_shot(self.num_few_shot);
        let mut few_shot_context = String::new();
        for exemplar in exemplars {
            let fields = self.benchmark.render_fields(exemplar)?;
            let word = self.benchmark.label_words()[self.benchmark.gold_label(exemplar)?];
            few_shot_context.push_str(&format!(
                "{}{}{} {}\n",
                self.benchmark.preamble(),
                fields,
                self.benchmark.answer_cue(),
                word
            ));
        }

        let mut docs: Vec<Example> = rest.to_vec();
        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        info!(
            task = %self.benchmark,
            num_few_shot = self.num_few_shot,
            docs = docs.len(),
            "prepared task"
        );

        Ok(PreparedTask {
            benchmark: self.benchmark,
            few_shot_context,
            docs,
        })
    }
}

pub struct PreparedTask {
    benchmark: Box<dyn ClassificationTask>,
    few_shot_context: String,
    docs: Vec<Example>,
}

impl std::fmt::Debug for PreparedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedTask")
            .field("benchmark", &self.benchmark.to_string())
            .field("few_shot_context", &self.few_shot_context)
            .field("docs", &self.docs.len())
            .finish()
    }
}

pub struct EvalTaskOptions<'a> {
    pub model: &'a mut dyn CausalLM,
    /// Number of tokens the free-form generation pass may add.
    pub gen_len: usize,
    pub llama_compat: bool,
    pub verbose: bool,
}

struct ScoredCandidate {
    probability: f64,
    greedy_text: String,
}

impl PreparedTask {
    pub fn name(&self) -> String {
        format!("{}", self.benchmark)
    }

    pub fn few_shot_context(&self) -> &str {
        &self.few_shot_context
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// Scores every evaluation example by both methods and folds the
    /// outcomes into a summary plus per-example traces.
    pub fn run(
        &self,
        options: EvalTaskOptions,
        progress_bar: bool,
    ) -> Result<(EvalSummary, Vec<TraceRecord>)> {
        let pbar = match progress_bar {
            false => None,
            true => {
                info!("Running {}", self.name());
                let pbar = ProgressBar::new(self.docs.len() as u64);
                pbar.set_style(ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap()
                    .progress_chars("#>-"));
                Some(pbar)
            }
        };

        let EvalTaskOptions {
            model,
            gen_len,
            llama_compat,
            verbose,
        } = options;

        let words = self.benchmark.label_words();
        let candidate_lens = words
            .iter()
            .map(|word| candidate_token_len(&*model, word, llama_compat))
            .collect::<Result<Vec<_>>>()?;

        let mut accumulator = Accumulator::new(words.len());
        let mut traces = Vec::with_capacity(self.docs.len());
        let start = Instant::now();

        for (index, example) in self.docs.iter().enumerate() {
            let fields = self.benchmark.render_fields(example)?;
            let prompt = format!(
                "{}{}{}{}",
                self.few_shot_context,
                self.benchmark.preamble(),
                fields,
                self.benchmark.answer_cue()
            );
            let label = self.benchmark.gold_label(example)?;

            let mut choice_probs = Vec::with_capacity(words.len());
            let mut greedy_continuation = String::new();
            for (word, candidate_len) in words.iter().zip(&candidate_lens) {
                let scored = score_candidate(model, &prompt, word, *candidate_len)?;
                choice_probs.push(scored.probability);
                // The greedy decode of the answer span is the same for
                // every candidate; the last one wins.
                greedy_continuation = scored.greedy_text;
            }
            let likelihood_answer = Answer::Choice(argmax_probability(&choice_probs));

            let prompt_tokens = model.encode(&prompt)?;
            let max_len = prompt_tokens.len() + gen_len;
            let sequence = model.generate(&prompt_tokens, max_len)?;
            let decoded = model.decode(&sequence)?;
            let decoded_prompt = model.decode(&prompt_tokens)?;
            let generated_text = decoded
                .strip_prefix(decoded_prompt.as_str())
                .unwrap_or(decoded.as_str())
                .to_string();
            let continuation = decoded
                .rsplit(self.benchmark.answer_cue())
                .next()
                .unwrap_or_default();
            let scan_answer = scan_for_answer(continuation, words);

            let outcome = Outcome {
                label,
                scan: scan_answer,
                likelihood: likelihood_answer,
            };
            accumulator = accumulator.observe(&outcome);

            traces.push(TraceRecord {
                example: example.clone(),
                prompt,
                generated_text,
                scan_answer,
                likelihood_answer,
                choice_probs,
                greedy_continuation,
                correct: matches!(scan_answer, Answer::Choice(predicted) if predicted == label),
                invalid: scan_answer.is_indeterminate(),
            });

            if verbose {
                debug!(example = index, continuation, "generated continuation");
                info!(
                    example = index,
                    correct = accumulator.correct(),
                    incorrect = accumulator.incorrect(),
                    invalid = accumulator.invalid(),
                    acc = accumulator.accuracy(),
                    "scored example"
                );
            }
            if let Some(pbar) = &pbar {
                pbar.set_message(format!("acc: {:.3}", accumulator.accuracy()));
                pbar.inc(1);
            }
        }

        let summary = accumulator.finish(start.elapsed())?;
        Ok((summary, traces))
    }
}

/// Token length of a candidate word, tokenized with its leading space.
fn candidate_token_len(model: &dyn CausalLM, word: &str, llama_compat: bool) -> Result<usize> {
    let tokens = model.encode(&format!(" {word}"))?;
    let skip = if llama_compat { LLAMA_CANDIDATE_SKIP } else { 0 };
    let len = tokens.len().saturating_sub(skip);
    ensure!(len > 0, "candidate word {word:?} tokenized to nothing");
    Ok(len)
}

/// Scores one candidate continuation of the prompt: mean negative
/// log-likelihood of the candidate's own tokens, returned as
/// `exp(-mean_nll)`, together with the greedy decode of the answer span.
fn score_candidate(
    model: &mut dyn CausalLM,
    prompt: &str,
    word: &str,
    candidate_len: usize,
) -> Result<ScoredCandidate> {
    let request = model.encode(&format!("{prompt} {word}"))?;
    ensure!(
        request.len() > candidate_len,
        "request for candidate {word:?} tokenized shorter than the candidate itself"
    );
    let targets = request[request.len() - candidate_len..].to_vec();

    // The final token is withheld from the forward pass; each remaining
    // position's logits score its successor.
    let mut input = request;
    input.pop();
    let logits = model.forward(&input)?;
    ensure!(
        logits.len() == input.len(),
        "model returned {} logit rows for {} input tokens",
        logits.len(),
        input.len()
    );

    let first_row = input.len() - candidate_len;
    let mut nll_sum = 0.0f64;
    let mut greedy_tokens = Vec::with_capacity(candidate_len);
    for (offset, target) in targets.iter().enumerate() {
        let row = &logits[first_row + offset];
        let log_probs = log_softmax(row);
        let target_log_prob = log_probs
            .get(*target as usize)
            .copied()
            .with_context(|| format!("token id {target} outside vocabulary of {}", row.len()))?;
        nll_sum -= f64::from(target_log_prob);
        greedy_tokens.push(argmax(row) as i64);
    }

    let mean_nll = nll_sum / candidate_len as f64;
    Ok(ScoredCandidate {
        probability: (-mean_nll).exp(),
        greedy_text: model.decode(&greedy_tokens)?,
    })
}

/// Strict argmax over candidate probabilities; ties resolve to the lower
/// label index.
fn argmax_probability(probabilities: &[f64]) -> usize {
    let mut best = 0;
    for (index, probability) in probabilities.iter().enumerate() {
        if *probability > probabilities[best] {
            best = index;
        }
    }
    best
}

/// Earliest label word occurring in the continuation wins; none yields the
/// indeterminate outcome.
fn scan_for_answer(continuation: &str, words: &[&str]) -> Answer {
    let mut earliest: Option<(usize, usize)> = None;
    for (label, word) in words.iter().enumerate() {
        if let Some(position) = continuation.find(word) {
            if earliest.map_or(true, |(seen, _)| position < seen) {
                earliest = Some((position, label));
            }
        }
    }
    match earliest {
        Some((_, label)) => Answer::Choice(label),
        None => Answer::Indeterminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINARY_WORDS: [&str; 2] = ["No", "Yes"];

    #[test]
    fn scan_finds_the_positive_word() {
        assert_eq!(
            scan_for_answer(" Yes, they match", &BINARY_WORDS),
            Answer::Choice(1)
        );
    }

    #[test]
    fn scan_finds_the_negative_word() {
        assert_eq!(scan_for_answer(" No", &BINARY_WORDS), Answer::Choice(0));
    }

    #[test]
    fn scan_without_any_label_word_is_indeterminate() {
        assert_eq!(
            scan_for_answer(" the sentences differ", &BINARY_WORDS),
            Answer::Indeterminate
        );
        assert_eq!(scan_for_answer("", &BINARY_WORDS), Answer::Indeterminate);
    }

    #[test]
    fn scan_prefers_the_earliest_occurrence() {
        assert_eq!(
            scan_for_answer(" Yes and then No", &BINARY_WORDS),
            Answer::Choice(1)
        );
        assert_eq!(
            scan_for_answer(" No but maybe Yes", &BINARY_WORDS),
            Answer::Choice(0)
        );
    }

    #[test]
    fn probability_ties_resolve_to_the_lower_label() {
        assert_eq!(argmax_probability(&[0.5, 0.5]), 0);
        assert_eq!(argmax_probability(&[0.2, 0.7, 0.7]), 1);
    }
}
