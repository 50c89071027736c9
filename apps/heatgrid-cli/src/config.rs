use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Parameters for a `step` run, loadable from a JSON file.
///
/// Every field is optional in the file; missing fields take the defaults
/// below. Command-line flags override whatever the file says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    /// Size of one time step.
    pub dt: f32,
    /// Number of steps to take.
    pub steps: u32,
    /// Emit the stepped world in the binary encoding.
    pub binary: bool,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            steps: 1,
            binary: false,
        }
    }
}

impl StepConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening step config {}", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("parsing step config {}", path.display()))
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, dt: Option<f32>, steps: Option<u32>, binary: bool) -> Self {
        if let Some(dt) = dt {
            self.dt = dt;
        }
        if let Some(steps) = steps {
            self.steps = steps;
        }
        self.binary |= binary;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StepConfig::default();
        assert_eq!(c.dt, 0.1);
        assert_eq!(c.steps, 1);
        assert!(!c.binary);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let c: StepConfig = serde_json::from_str(r#"{ "steps": 250 }"#).unwrap();
        assert_eq!(c.steps, 250);
        assert_eq!(c.dt, 0.1);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<StepConfig>(r#"{ "stpes": 3 }"#).is_err());
    }

    #[test]
    fn flags_override_file() {
        let c = StepConfig {
            dt: 0.5,
            steps: 10,
            binary: false,
        }
        .with_overrides(None, Some(3), true);
        assert_eq!(c.dt, 0.5);
        assert_eq!(c.steps, 3);
        assert!(c.binary);
    }

    #[test]
    fn load_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("step.json");
        std::fs::write(&path, r#"{ "dt": 0.01, "steps": 1000, "binary": true }"#).unwrap();
        let c = StepConfig::load(&path).unwrap();
        assert_eq!(
            c,
            StepConfig {
                dt: 0.01,
                steps: 1000,
                binary: true
            }
        );
        assert!(StepConfig::load(&tmp.path().join("missing.json")).is_err());
    }
}
