use super::mrpc::binary_label;
use crate::traits::ClassificationTask;
use anyhow::Result;
use std::fmt::Display;
use verdict_data_provider::Example;

/// SST-2 sentiment classification over single sentences.
pub struct Sst2;

const LABEL_WORDS: [&str; 2] = ["Negative", "Positive"];

impl Sst2 {
    pub const fn name() -> &'static str {
        "sst2"
    }
}

impl ClassificationTask for Sst2 {
    fn preamble(&self) -> &'static str {
        "Is the sentiment of the sentence Positive or Negative.\n"
    }

    fn label_words(&self) -> &'static [&'static str] {
        &LABEL_WORDS
    }

    fn render_fields(&self, example: &Example) -> Result<String> {
        Ok(format!("Sentence: {}\n", example.get_text("sentence")?))
    }

    fn gold_label(&self, example: &Example) -> Result<usize> {
        binary_label(example, "label")
    }
}

impl Display for Sst2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::name())
    }
}
