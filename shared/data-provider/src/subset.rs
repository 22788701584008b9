use crate::{dataset::Example, errors::DataError};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use verdict_core::{seeded_rng, Shuffle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceStrategy {
    /// Round-robin across label groups, truncated evenly at the smallest
    /// group. Every label contributes the same count; no oversampling.
    Interleaved,
    /// Cap every label group at `per_class`, then shuffle the concatenation.
    CappedShuffle { per_class: usize },
}

/// An ordered, class-balanced sequence of examples. Produced once by the
/// [`SubsetBuilder`], persisted as an artifact, read-only afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subset {
    examples: Vec<Example>,
}

impl Subset {
    pub fn from_examples(examples: Vec<Example>) -> Self {
        Subset { examples }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Splits off the first `k` examples as few-shot exemplars; the
    /// remainder is the evaluation sequence.
    pub fn split_few_shot(&self, k: usize) -> (&[Example], &[Example]) {
        let k = k.min(self.examples.len());
        self.examples.split_at(k)
    }
}

pub struct SubsetBuilder {
    label_field: String,
    strategy: BalanceStrategy,
    shuffle: Shuffle,
}

impl SubsetBuilder {
    pub fn new(label_field: &str, strategy: BalanceStrategy, shuffle: Shuffle) -> Self {
        SubsetBuilder {
            label_field: label_field.to_string(),
            strategy,
            shuffle,
        }
    }

    /// Groups the split by label, shuffles each group, and assembles the
    /// balanced subset per the configured strategy.
    pub fn build(&self, examples: Vec<Example>) -> Result<Subset, DataError> {
        let mut groups: IndexMap<i64, Vec<Example>> = IndexMap::new();
        for example in examples {
            let label = example.get_int(&self.label_field)?;
            groups.entry(label).or_default().push(example);
        }
        let num_groups = groups.len();

        let mut rng = match self.shuffle {
            Shuffle::DontShuffle => None,
            Shuffle::Seeded(seed) => Some(seeded_rng(seed)),
        };
        if let Some(rng) = rng.as_mut() {
            for group in groups.values_mut() {
                group.shuffle(rng);
            }
        }

        let finalized = match self.strategy {
            BalanceStrategy::Interleaved => {
                let target = groups.values().map(Vec::len).min().unwrap_or(0);
                let goal = target * num_groups;
                let mut finalized = Vec::with_capacity(goal);
                let mut index = 0;
                while finalized.len() < goal {
                    for group in groups.values() {
                        // A group exhausted before the others stops
                        // contributing without halting the build.
                        if index < group.len() {
                            finalized.push(group[index].clone());
                        }
                    }
                    index += 1;
                }
                finalized
            }
            BalanceStrategy::CappedShuffle { per_class } => {
                let mut finalized = Vec::new();
                for group in groups.values_mut() {
                    let take = per_class.min(group.len());
                    finalized.extend(group.drain(..take));
                }
                if let Some(rng) = rng.as_mut() {
                    finalized.shuffle(rng);
                }
                finalized
            }
        };

        tracing::info!(
            label_field = %self.label_field,
            groups = num_groups,
            examples = finalized.len(),
            "built balanced subset"
        );
        Ok(Subset {
            examples: finalized,
        })
    }
}
