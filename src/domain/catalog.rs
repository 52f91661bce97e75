use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1_048_576.0;

/// One selectable model as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Unique identifier (e.g. "large-v3-turbo").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the model file is present on disk.
    pub installed: bool,
    /// On-disk size, when installed.
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Approximate download size for display.
    #[serde(default)]
    pub approx_size_mb: Option<u64>,
}

/// Full catalog snapshot: the selected model plus every known entry.
///
/// The selector is rebuilt wholesale from this snapshot on every refresh;
/// the catalog is small enough that diffing buys nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub selected_id: Option<String>,
    #[serde(default, rename = "available")]
    pub entries: Vec<ModelEntry>,
}

impl CatalogSnapshot {
    /// Find an entry by ID.
    pub fn get(&self, model_id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|m| m.id == model_id)
    }

    /// The selected entry, when `selected_id` names a known entry.
    ///
    /// A dangling `selected_id` is treated as no selection.
    pub fn selected(&self) -> Option<&ModelEntry> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    /// Whether `selected_id` honors the catalog invariant (absent, or
    /// matching a known entry).
    #[must_use]
    pub fn selection_is_valid(&self) -> bool {
        match self.selected_id.as_deref() {
            None => true,
            Some(id) => self.get(id).is_some(),
        }
    }
}

/// Transient byte progress for the single in-flight model download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub received_bytes: u64,
    #[serde(default)]
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Progress line text, received-only when the total is unknown.
    #[must_use]
    pub fn label(&self) -> String {
        let received = self.received_bytes as f64 / BYTES_PER_MB;
        match self.total_bytes {
            Some(total) if total > 0 => {
                format!("{:.1} / {:.1} MB", received, total as f64 / BYTES_PER_MB)
            }
            _ => format!("{received:.1} MB"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CatalogSnapshot {
        serde_json::from_value(serde_json::json!({
            "selected_id": "base",
            "available": [
                {"id": "base", "name": "Base", "installed": true},
                {"id": "small", "installed": false, "name": "Small"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_snapshot_decodes_wire_shape() {
        let snap = snapshot();
        assert_eq!(snap.entries.len(), 2);
        assert_eq!(snap.selected().unwrap().id, "base");
        assert!(snap.selected().unwrap().installed);
        assert!(!snap.get("small").unwrap().installed);
    }

    #[test]
    fn test_dangling_selection_is_invalid() {
        let mut snap = snapshot();
        snap.selected_id = Some("missing".to_string());
        assert!(!snap.selection_is_valid());
        assert!(snap.selected().is_none());
    }

    #[test]
    fn test_no_selection_is_valid() {
        let mut snap = snapshot();
        snap.selected_id = None;
        assert!(snap.selection_is_valid());
    }

    #[test]
    fn test_progress_label_with_total() {
        let progress = DownloadProgress {
            id: "base".to_string(),
            received_bytes: 52_428_800,
            total_bytes: Some(104_857_600),
        };
        assert_eq!(progress.label(), "50.0 / 100.0 MB");
    }

    #[test]
    fn test_progress_label_without_total() {
        let progress = DownloadProgress {
            id: "base".to_string(),
            received_bytes: 10_485_760,
            total_bytes: None,
        };
        assert_eq!(progress.label(), "10.0 MB");
    }
}
