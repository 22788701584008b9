use crate::causal_lm::{CausalLM, Logits};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Deterministic stand-in for a real inference backend, used by tests and
/// the example binaries.
///
/// Tokenization is whitespace word-level over an interned vocabulary.
/// Forward logits are position-independent: every vocabulary word scores
/// its configured weight (default 0). Generation replays the first
/// scripted reply whose needle occurs in the decoded prompt.
#[derive(Default)]
pub struct DummyModel {
    vocab: Mutex<Vocab>,
    weights: HashMap<String, f32>,
    replies: Vec<(String, String)>,
    default_reply: String,
}

#[derive(Default)]
struct Vocab {
    words: Vec<String>,
    ids: HashMap<String, i64>,
}

impl Vocab {
    fn intern(&mut self, word: &str) -> i64 {
        if let Some(id) = self.ids.get(word) {
            return *id;
        }
        let id = self.words.len() as i64;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Biases the forward logits for one vocabulary word.
    pub fn with_token_weight(mut self, word: &str, weight: f32) -> Self {
        self.weights.insert(word.to_string(), weight);
        self
    }

    /// Scripts the greedy continuation for prompts containing `needle`.
    pub fn with_reply(mut self, needle: &str, reply: &str) -> Self {
        self.replies.push((needle.to_string(), reply.to_string()));
        self
    }

    pub fn with_default_reply(mut self, reply: &str) -> Self {
        self.default_reply = reply.to_string();
        self
    }
}

impl CausalLM for DummyModel {
    fn encode(&self, text: &str) -> Result<Vec<i64>> {
        let mut vocab = self.vocab.lock().unwrap();
        Ok(text
            .split_whitespace()
            .map(|word| vocab.intern(word))
            .collect())
    }

    fn decode(&self, tokens: &[i64]) -> Result<String> {
        let vocab = self.vocab.lock().unwrap();
        let words = tokens
            .iter()
            .map(|&token| {
                vocab
                    .words
                    .get(token as usize)
                    .map(String::as_str)
                    .ok_or_else(|| anyhow!("token id {token} outside vocabulary"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(words.join(" "))
    }

    fn forward(&mut self, tokens: &[i64]) -> Result<Logits> {
        let row: Vec<f32> = {
            let vocab = self.vocab.lock().unwrap();
            vocab
                .words
                .iter()
                .map(|word| self.weights.get(word).copied().unwrap_or(0.0))
                .collect()
        };
        Ok(vec![row; tokens.len()])
    }

    fn generate(&mut self, tokens: &[i64], max_len: usize) -> Result<Vec<i64>> {
        let prompt = self.decode(tokens)?;
        let reply = self
            .replies
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone());

        let mut sequence = tokens.to_vec();
        for token in self.encode(&reply)? {
            if sequence.len() >= max_len {
                break;
            }
            sequence.push(token);
        }
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let model = DummyModel::new();
        let tokens = model.encode("the quick fox").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(model.decode(&tokens).unwrap(), "the quick fox");
    }

    #[test]
    fn repeated_words_share_ids() {
        let model = DummyModel::new();
        let tokens = model.encode("yes no yes").unwrap();
        assert_eq!(tokens[0], tokens[2]);
        assert_ne!(tokens[0], tokens[1]);
    }

    #[test]
    fn unknown_token_fails_to_decode() {
        let model = DummyModel::new();
        assert!(model.decode(&[99]).is_err());
    }

    #[test]
    fn forward_reflects_token_weights() {
        let mut model = DummyModel::new().with_token_weight("Yes", 2.0);
        let tokens = model.encode("Yes No").unwrap();
        let logits = model.forward(&tokens).unwrap();
        assert_eq!(logits.len(), 2);
        assert_eq!(logits[0][tokens[0] as usize], 2.0);
        assert_eq!(logits[0][tokens[1] as usize], 0.0);
    }

    #[test]
    fn generation_picks_the_matching_reply() {
        let mut model = DummyModel::new()
            .with_reply("oak", "Yes")
            .with_reply("birch", "No")
            .with_default_reply("Maybe");

        let prompt = model.encode("about the birch tree Answer:").unwrap();
        let sequence = model.generate(&prompt, prompt.len() + 3).unwrap();
        let text = model.decode(&sequence).unwrap();
        assert!(text.ends_with("Answer: No"));

        let other = model.encode("nothing scripted here").unwrap();
        let sequence = model.generate(&other, other.len() + 3).unwrap();
        assert!(model.decode(&sequence).unwrap().ends_with("Maybe"));
    }

    #[test]
    fn generation_respects_max_len() {
        let mut model = DummyModel::new().with_default_reply("one two three four");
        let prompt = model.encode("prompt").unwrap();
        let sequence = model.generate(&prompt, prompt.len() + 2).unwrap();
        assert_eq!(sequence.len(), prompt.len() + 2);
    }
}
