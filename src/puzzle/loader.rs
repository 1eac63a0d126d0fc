use anyhow::{Context, Result};
use std::path::Path;

use super::types::{validate_pool, Question, QuestionPack};

pub fn load_pack(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading question pack {}", path.display()))?;
    let pack: QuestionPack = toml::from_str(&content)
        .with_context(|| format!("parsing question pack {}", path.display()))?;
    let questions = validate_pool(pack.questions)
        .with_context(|| format!("validating question pack {}", path.display()))?;
    Ok(questions)
}

/// Loads every `*.toml` pack in `dir`, in file-name order, into one pool.
pub fn load_pack_dir(dir: &Path) -> Result<Vec<Question>> {
    let pattern = dir.join("*.toml");
    let pattern = pattern.to_string_lossy();

    let mut paths: Vec<_> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .collect();

    // Sort by filename so 01_history, 02_geography, ... load in order
    paths.sort();

    let mut questions = Vec::new();
    for path in paths {
        questions.extend(load_pack(&path)?);
    }

    Ok(questions)
}

/// A path may name a single pack or a directory of packs.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    if path.is_dir() {
        load_pack_dir(path)
    } else {
        load_pack(path)
    }
}
