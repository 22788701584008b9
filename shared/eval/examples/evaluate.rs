//! Drives an evaluation over a prebuilt subset artifact with the scriptable
//! dummy backend. Real backends implement `verdict_modeling::CausalLM`
//! outside this workspace and slot into `EvalTaskOptions` the same way.

use anyhow::Result;
use clap::Parser;
use std::{fs, path::PathBuf};
use verdict_data_provider::load_subset;
use verdict_eval::{task_from_name, EvalTaskOptions, Task, ALL_TASK_NAMES};
use verdict_modeling::DummyModel;

#[derive(Parser, Debug, Clone)]
struct Args {
    /// Directory holding <task>.subset artifacts
    #[arg(long)]
    subset_dir: PathBuf,

    #[arg(long, default_value_t = ALL_TASK_NAMES.join(","))]
    tasks: String,

    #[arg(long, default_value_t = 0)]
    num_fewshot: usize,

    /// Evaluate only the first N examples after the few-shot split
    #[arg(long)]
    number_of_tests: Option<usize>,

    #[arg(long, default_value_t = 3)]
    gen_len: usize,

    #[arg(long, default_value_t = false)]
    llama_compat: bool,

    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Write summary and per-example traces as JSON
    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut model = DummyModel::new().with_default_reply("Yes");
    for name in args.tasks.split(',') {
        let spec = task_from_name(name)?;
        let subset = load_subset(&args.subset_dir, name)?;
        let prepared = Task::new(spec, args.num_fewshot)?.prepare(&subset, args.number_of_tests)?;
        let (summary, traces) = prepared.run(
            EvalTaskOptions {
                model: &mut model,
                gen_len: args.gen_len,
                llama_compat: args.llama_compat,
                verbose: args.verbose,
            },
            !args.quiet,
        )?;

        println!("{name}: {}", serde_json::to_string_pretty(&summary)?);
        if let Some(out_dir) = &args.out_dir {
            fs::create_dir_all(out_dir)?;
            fs::write(
                out_dir.join(format!("{name}_summary.json")),
                serde_json::to_string_pretty(&summary)?,
            )?;
            fs::write(
                out_dir.join(format!("{name}_generations.json")),
                serde_json::to_string_pretty(&traces)?,
            )?;
        }
    }
    Ok(())
}
