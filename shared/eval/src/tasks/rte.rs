use super::mrpc::binary_label;
use crate::traits::ClassificationTask;
use anyhow::Result;
use std::fmt::Display;
use verdict_data_provider::Example;

/// RTE textual entailment. Label 0 is entailment, so the label words run
/// "Yes" then "No".
pub struct Rte;

const LABEL_WORDS: [&str; 2] = ["Yes", "No"];

impl Rte {
    pub const fn name() -> &'static str {
        "rte"
    }
}

impl ClassificationTask for Rte {
    fn preamble(&self) -> &'static str {
        "Does Sentence 1 entail Sentence 2.\n"
    }

    fn label_words(&self) -> &'static [&'static str] {
        &LABEL_WORDS
    }

    fn render_fields(&self, example: &Example) -> Result<String> {
        Ok(format!(
            "Sentence 1: {}\nSentence 2: {}\n",
            example.get_text("sentence1")?,
            example.get_text("sentence2")?
        ))
    }

    fn gold_label(&self, example: &Example) -> Result<usize> {
        binary_label(example, "label")
    }
}

impl Display for Rte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::name())
    }
}
