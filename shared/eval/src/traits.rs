use anyhow::Result;
use std::fmt::Display;
use verdict_data_provider::Example;

/// A classification benchmark rendered as few-shot prompt stanzas.
///
/// A full stanza is `preamble + rendered fields + answer cue`, optionally
/// followed by the gold label word for exemplars.
pub trait ClassificationTask: Send + Display {
    /// Instruction line opening every stanza.
    fn preamble(&self) -> &'static str;

    /// Cue that precedes the answer word.
    fn answer_cue(&self) -> &'static str {
        "Answer:"
    }

    /// Label words in label order; the prediction space for both scoring
    /// methods.
    fn label_words(&self) -> &'static [&'static str];

    /// Renders the example's task fields as prompt text, without preamble
    /// or answer cue.
    fn render_fields(&self, example: &Example) -> Result<String>;

    /// Gold label index for the example.
    fn gold_label(&self, example: &Example) -> Result<usize>;
}
