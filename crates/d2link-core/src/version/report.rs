//! Serialisable fingerprint report for diagnostics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::version::{Fingerprint, ModuleObservation};

/// Diagnostic snapshot of a fingerprint pass, suitable for attaching to bug
/// reports.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintReport {
    pub detected_version: String,
    pub scanned_at: DateTime<Utc>,
    pub modules: Vec<ModuleReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub load_address: String,
    pub preferred_base: String,
    pub entry_point: String,
    pub relocated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FingerprintReport {
    pub fn from_fingerprint(fingerprint: &Fingerprint) -> Self {
        Self {
            detected_version: fingerprint.version.to_string(),
            scanned_at: Utc::now(),
            modules: fingerprint.observations.iter().map(ModuleReport::from).collect(),
        }
    }

    /// Save the report to a pretty-printed JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl From<&ModuleObservation> for ModuleReport {
    fn from(observation: &ModuleObservation) -> Self {
        Self {
            module: observation.module.display_name().to_string(),
            load_address: format!("{:#010x}", observation.load_address),
            preferred_base: format!("{:#010x}", observation.preferred_base),
            entry_point: format!("{:#010x}", observation.entry_point),
            relocated: observation.relocated,
            path: observation.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::GameModule;
    use crate::version::GameVersion;

    fn sample() -> Fingerprint {
        Fingerprint {
            version: GameVersion::Lod113c,
            observations: vec![ModuleObservation {
                module: GameModule::D2Client,
                load_address: 0x6FAB_0000,
                preferred_base: 0x6FAB_0000,
                entry_point: 0x45F6,
                path: Some("C:\\Games\\D2\\D2Client.dll".to_string()),
                relocated: false,
            }],
        }
    }

    #[test]
    fn test_report_contents() {
        let report = FingerprintReport::from_fingerprint(&sample());
        assert_eq!(report.detected_version, "Lod113c");
        assert_eq!(report.modules.len(), 1);
        assert_eq!(report.modules[0].module, "D2Client.dll");
        assert_eq!(report.modules[0].entry_point, "0x000045f6");
        assert!(!report.modules[0].relocated);
    }

    #[test]
    fn test_report_save() {
        let report = FingerprintReport::from_fingerprint(&sample());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fingerprint.json");

        report.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Lod113c"));
        assert!(contents.contains("D2Client.dll"));
    }
}
