//! Class-index to label resolution.

use crate::error::{Error, Result};
use std::path::Path;

/// Maps model output indices to human-readable event labels.
///
/// Resolution order: the labels file given by the user, then a built-in
/// table of common AudioSet classes, then an `Event_<index>` placeholder.
/// Resolution never fails, so a model with more classes than labels
/// still produces a usable timeline.
#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    table: Vec<String>,
}

impl LabelResolver {
    /// Resolver with no labels file, built-in table and placeholders only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load labels from a text file, one label per line in model output
    /// order. Blank lines are kept as empty slots so indices stay aligned.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::LabelsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table = contents.lines().map(|l| l.trim().to_string()).collect();
        Ok(Self { table })
    }

    /// Resolver over an in-memory label table.
    pub fn from_table(table: Vec<String>) -> Self {
        Self { table }
    }

    /// Number of labels loaded from the file, zero for [`Self::empty`].
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether any labels were loaded.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve a class index to a label.
    pub fn resolve(&self, index: usize) -> String {
        if let Some(label) = self.table.get(index).filter(|l| !l.is_empty()) {
            return label.clone();
        }
        if let Some(label) = builtin_label(index) {
            return label.to_string();
        }
        format!("Event_{index}")
    }
}

/// Well-known AudioSet class indices, used when no labels file is given.
fn builtin_label(index: usize) -> Option<&'static str> {
    let label = match index {
        0 => "Speech",
        1 => "Male speech",
        2 => "Female speech",
        3 => "Child speech",
        7 => "Speech synthesizer",
        16 => "Laughter",
        17 => "Baby laughter",
        20 => "Belly laugh",
        47 => "Cough",
        48 => "Throat clearing",
        49 => "Sneeze",
        50 => "Sniff",
        62 => "Burping",
        63 => "Hiccup",
        70 => "Conversation",
        137 => "Music",
        500 => "Silence",
        506 => "Inside, small room",
        507 => "Inside, large room",
        508 => "Inside, public space",
        509 => "Outside, urban",
        510 => "Outside, rural",
        511 => "Reverberation",
        512 => "Echo",
        513 => "Noise",
        514 => "Environmental noise",
        515 => "Static",
        516 => "Mains hum",
        517 => "Distortion",
        518 => "Sidetone",
        519 => "Cacophony",
        520 => "White noise",
        521 => "Pink noise",
        522 => "Throbbing",
        523 => "Vibration",
        524 => "Hum",
        525 => "Whoosh",
        526 => "Fire",
        _ => return None,
    };
    Some(label)
}
