use crate::traits::ClassificationTask;
use anyhow::Result;
use std::fmt::Display;
use verdict_data_provider::Example;

/// MRPC paraphrase detection: does sentence 2 restate sentence 1.
pub struct Mrpc;

const LABEL_WORDS: [&str; 2] = ["No", "Yes"];

impl Mrpc {
    pub const fn name() -> &'static str {
        "mrpc"
    }
}

impl ClassificationTask for Mrpc {
    fn preamble(&self) -> &'static str {
        "Are the sentences paraphrases of each other.\n"
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

impl Display for Mrpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::name())
    }
}

pub(crate) fn binary_label(example: &Example, field: &str) -> Result<usize> {
    let label = example.get_int(field)?;
    anyhow::ensure!(
        label == 0 || label == 1,
        "label {label} is outside the binary label space"
    );
    Ok(label as usize)
}
