//! JSON persistence for contracts and comparison corpora.

use std::io::Write;
use std::path::Path;

use clausewise_core::Corpora;
use tracing::info;

use crate::{ContractDocument, StoreError};

/// Read a contract document from a JSON file.
pub fn load_contract(path: &Path) -> Result<ContractDocument, StoreError> {
    let doc: ContractDocument = read_json(path)?;
    info!(path = %path.display(), clauses = doc.clauses.len(), "loaded contract");
    Ok(doc)
}

/// Write a contract document as pretty JSON.
///
/// Writes to a temporary file in the same directory and renames it over
/// `path`, so a crash mid-write never leaves a truncated contract.
pub fn save_contract(path: &Path, doc: &ContractDocument) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, doc)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!(path = %path.display(), clauses = doc.clauses.len(), "saved contract");
    Ok(())
}

/// Read template, industry-standard, and prior-version texts from a JSON file.
pub fn load_corpora(path: &Path) -> Result<Corpora, StoreError> {
    let corpora: Corpora = read_json(path)?;
    info!(
        path = %path.display(),
        templates = corpora.templates.len(),
        industry_standards = corpora.industry_standards.len(),
        "loaded comparison corpora"
    );
    Ok(corpora)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
