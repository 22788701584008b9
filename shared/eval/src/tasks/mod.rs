mod cola;
mod mmlu;
mod mrpc;
mod rte;
mod sst2;

pub use cola::Cola;
pub use mmlu::Mmlu;
pub use mrpc::Mrpc;
pub use rte::Rte;
pub use sst2::Sst2;
