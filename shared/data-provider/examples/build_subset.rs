use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use verdict_core::Shuffle;
use verdict_data_provider::{load_split, save_subset, BalanceStrategy, Split, SubsetBuilder};

#[derive(Parser, Debug)]
struct Args {
    /// Directory holding <split>.jsonl files for the task
    #[arg(long)]
    data_dir: PathBuf,

    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long)]
    task: String,

    #[arg(long, default_value = "validation")]
    split: Split,

    #[arg(long, default_value = "label")]
    label_field: String,

    /// Cap per class; omit to interleave round-robin at the smallest class
    #[arg(long)]
    per_class: Option<usize>,

    #[arg(long, default_value_t = 37)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let examples = load_split(&args.data_dir, args.split)?;
    let strategy = match args.per_class {
        Some(per_class) => BalanceStrategy::CappedShuffle { per_class },
        None => BalanceStrategy::Interleaved,
    };
    let subset = SubsetBuilder::new(&args.label_field, strategy, Shuffle::Seeded(args.seed))
        .build(examples)?;
    let path = save_subset(&subset, &args.out_dir, &args.task)?;
    println!(
        "{}: {} examples -> {}",
        args.task,
        subset.len(),
        path.display()
    );
    Ok(())
}
