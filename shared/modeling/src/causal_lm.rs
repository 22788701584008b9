use anyhow::Result;

/// Per-position rows of vocabulary logits, one row per input token.
/// Row `i` scores the token following the prefix `tokens[..=i]`.
pub type Logits = Vec<Vec<f32>>;

/// Capability interface over a pretrained causal language model and its
/// tokenizer. Backends live outside this workspace; the harness only needs
/// these four operations.
pub trait CausalLM: Send {
    fn encode(&self, text: &str) -> Result<Vec<i64>>;

    fn decode(&self, tokens: &[i64]) -> Result<String>;

    /// Full forward pass over `tokens`, returning one logit row per input
    /// position.
    fn forward(&mut self, tokens: &[i64]) -> Result<Logits>;

    /// Greedy decoding from `tokens`, bounded by `max_len` total sequence
    /// length. Returns the whole sequence, prompt included.
    fn generate(&mut self, tokens: &[i64], max_len: usize) -> Result<Vec<i64>>;
}
