mod causal_lm;
mod dummy;
mod logits;

pub use causal_lm::{CausalLM, Logits};
pub use dummy::DummyModel;
pub use logits::{argmax, log_softmax};
