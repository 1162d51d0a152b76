use std::path::Path;

use anyhow::{Context, Result};

/// Class names indexed by `class_id`, as exported next to the model.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Reads a JSON array of names, e.g. `["bottle", "can", ...]`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read labels file {}", path.display()))?;
        let names: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("labels file {} is not a JSON array of strings", path.display()))?;
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn label(&self, class_id: usize) -> String {
        self.names
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }
}

pub const GENERAL_WASTE: &str = "General waste";

/// Disposal bin for a detected label. Unknown labels go to general waste.
pub fn disposal_bin(label: &str) -> &'static str {
    let key = label.trim().to_lowercase().replace(' ', "_");
    match key.as_str() {
        "bottle" | "cup" => "Plastic recycling",
        "wine_glass" => "Glass recycling",
        "can" => "Metal recycling",
        "book" | "paper" => "Paper recycling",
        "box" => "Cardboard",
        _ => GENERAL_WASTE,
    }
}
