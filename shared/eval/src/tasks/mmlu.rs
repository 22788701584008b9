use crate::traits::ClassificationTask;
use crate::ASCII_UPPERCASE;
use anyhow::{ensure, Result};
use std::fmt::Display;
use verdict_data_provider::Example;

/// MMLU-style four-way multiple choice.
pub struct Mmlu;

const NUM_CHOICES: usize = 4;

impl Mmlu {
    pub const fn name() -> &'static str {
        "mmlu"
    }
}

impl ClassificationTask for Mmlu {
    fn preamble(&self) -> &'static str {
        "The following is a multiple choice question (with answer).\n"
    }

    fn label_words(&self) -> &'static [&'static str] {
        &ASCII_UPPERCASE[..NUM_CHOICES]
    }

    fn render_fields(&self, example: &Example) -> Result<String> {
        let question = example.get_text("question")?;
        let choices = example.get_text_list("choices")?;
        ensure!(
            choices.len() == NUM_CHOICES,
            "expected {NUM_CHOICES} choices, found {}",
            choices.len()
        );

        let mut rendered = format!("Question: {question}\n");
        for (letter, choice) in ASCII_UPPERCASE.iter().zip(choices) {
            rendered.push_str(&format!("{letter}. {choice}\n"));
        }
        Ok(rendered)
    }

    fn gold_label(&self, example: &Example) -> Result<usize> {
        let answer = example.get_int("answer")?;
        ensure!(
            (0..NUM_CHOICES as i64).contains(&answer),
            "answer {answer} is outside the choice range"
        );
        Ok(answer as usize)
    }
}

impl Display for Mmlu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::name())
    }
}
