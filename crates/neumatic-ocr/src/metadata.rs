//! Model metadata loading.
//!
//! The classifier ships with a JSON sidecar describing its version and the
//! ordered class list. The class order defines the meaning of the model's
//! output logits, so a missing or empty class list is fatal.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use neumatic_core::ModelMetadata;

use crate::{OcrError, Result};

/// Reads `{model_version, classes}` from the metadata JSON file.
pub fn load_metadata(path: &Path) -> Result<ModelMetadata> {
    let file = File::open(path)?;
    let metadata: ModelMetadata = serde_json::from_reader(BufReader::new(file))?;

    if metadata.classes.is_empty() {
        return Err(OcrError::Metadata(format!(
            "{} contains an empty class list",
            path.display()
        )));
    }

    log::debug!(
        "model metadata: version {}, {} classes",
        metadata.model_version,
        metadata.classes.len()
    );

    Ok(metadata)
}
