use super::mrpc::binary_label;
use crate::traits::ClassificationTask;
use anyhow::Result;
use std::fmt::Display;
use verdict_data_provider::Example;

/// CoLA linguistic acceptability.
pub struct Cola;

const LABEL_WORDS: [&str; 2] = ["No", "Yes"];

impl Cola {
    pub const fn name() -> &'static str {
        "cola"
    }
}

impl ClassificationTask for Cola {
    fn preamble(&self) -> &'static str {
        "Is the sentence grammatically acceptable.\n"
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

impl Display for Cola {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::name())
    }
}
