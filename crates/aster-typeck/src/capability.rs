//! Capability manifests.
//!
//! An optional external manifest bounds the capabilities each package may
//! declare:
//!
//! ```json
//! { "packages": { "acme.billing": { "allow": ["Http", "Sql"] } },
//!   "default": { "allow": ["Http"] } }
//! ```

use aster_common::Capability;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityManifest {
    #[serde(default)]
    pub packages: FxHashMap<String, AllowList>,
    #[serde(default)]
    pub default: Option<AllowList>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowList {
    pub allow: Vec<String>,
}

impl CapabilityManifest {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The allowed capability set for a module, falling back to the
    /// manifest default. `None` means the manifest does not constrain
    /// this module.
    pub fn allowed_for(&self, module: &str) -> Option<Vec<Capability>> {
        let list = self.packages.get(module).or(self.default.as_ref())?;
        Some(
            list.allow
                .iter()
                .filter_map(|name| Capability::parse(name))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_resolves_per_package() {
        let manifest = CapabilityManifest::from_json(
            r#"{ "packages": { "acme.billing": { "allow": ["Http", "Sql"] } },
                 "default": { "allow": ["Http"] } }"#,
        )
        .unwrap();
        assert_eq!(
            manifest.allowed_for("acme.billing"),
            Some(vec![Capability::Http, Capability::Sql])
        );
        assert_eq!(manifest.allowed_for("other"), Some(vec![Capability::Http]));
    }

    #[test]
    fn no_default_means_unconstrained() {
        let manifest =
            CapabilityManifest::from_json(r#"{ "packages": {} }"#).unwrap();
        assert_eq!(manifest.allowed_for("anything"), None);
    }

    #[test]
    fn unknown_capability_names_are_ignored() {
        let manifest = CapabilityManifest::from_json(
            r#"{ "packages": { "m": { "allow": ["Http", "Teleport"] } } }"#,
        )
        .unwrap();
        assert_eq!(manifest.allowed_for("m"), Some(vec![Capability::Http]));
    }
}
