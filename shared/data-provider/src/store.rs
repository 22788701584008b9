use crate::{errors::DataError, subset::Subset};
use std::{
    fs,
    path::{Path, PathBuf},
};

const SUBSET_EXTENSION: &str = "subset";

pub fn subset_path(dir: &Path, task_name: &str) -> PathBuf {
    dir.join(format!("{task_name}.{SUBSET_EXTENSION}"))
}

/// Persists the subset as an opaque artifact keyed by task name.
pub fn save_subset(subset: &Subset, dir: &Path, task_name: &str) -> Result<PathBuf, DataError> {
    let bytes = postcard::to_stdvec(subset)?;
    fs::create_dir_all(dir)?;
    let path = subset_path(dir, task_name);
    fs::write(&path, bytes)?;
    tracing::info!(path = ?path, examples = subset.len(), "wrote subset artifact");
    Ok(path)
}

pub fn load_subset(dir: &Path, task_name: &str) -> Result<Subset, DataError> {
    let bytes = fs::read(subset_path(dir, task_name))?;
    Ok(postcard::from_bytes(&bytes)?)
}
