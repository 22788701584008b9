use anyhow::{bail, Result};

mod harness;
mod report;
mod tasks;
mod traits;

pub use harness::{EvalError, EvalTaskOptions, PreparedTask, Task, MAX_NUM_FEW_SHOT};
pub use report::{Accumulator, Answer, EvalSummary, LabelTally, Outcome, TraceRecord};
pub use tasks::{Cola, Mmlu, Mrpc, Rte, Sst2};
pub use traits::ClassificationTask;

pub static ASCII_UPPERCASE: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

pub const ALL_TASK_NAMES: [&str; 5] = [
    Mrpc::name(),
    Sst2::name(),
    Cola::name(),
    Rte::name(),
    Mmlu::name(),
];

pub fn task_from_name(name: &str) -> Result<Box<dyn ClassificationTask>> {
    match name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .as_str()
    {
        "mrpc" => Ok(Box::new(Mrpc)),
        "sst2" | "sst_2" => Ok(Box::new(Sst2)),
        "cola" => Ok(Box::new(Cola)),
        "rte" => Ok(Box::new(Rte)),
        "mmlu" => Ok(Box::new(Mmlu)),
        _ => bail!("Unknown task {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_every_listed_task() {
        for name in ALL_TASK_NAMES {
            assert!(task_from_name(name).is_ok(), "task {name} did not resolve");
        }
        assert!(task_from_name("SST-2").is_ok());
        assert!(task_from_name("squad").is_err());
    }
}
