//! Loads choice-set templates from YAML documents.
//!
//! The document maps each content provider to its list of templates:
//!
//! ```yaml
//! village:
//!   - name: Crowded labor
//!     action_type: Labor
//!     composition:
//!       primary_archetype: Physical
//!       secondary_archetype: Social
//!     location_conditions:
//!       - property: Population
//!         value: Crowded
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::template::ChoiceSetTemplate;

use super::{ContentError, TemplateRepository};

/// Templates grouped by content provider.
#[derive(Debug, Clone, Default)]
pub struct YamlTemplateRepository {
    providers: BTreeMap<String, Vec<ChoiceSetTemplate>>,
}

impl YamlTemplateRepository {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Yaml` if the document is malformed and
    /// `ContentError::Validation` if a template name is empty or repeated
    /// within one provider.
    pub fn from_yaml_str(source: &str) -> Result<Self, ContentError> {
        let providers: BTreeMap<String, Vec<ChoiceSetTemplate>> = serde_yaml::from_str(source)?;
        for (provider, templates) in &providers {
            let mut seen = HashSet::new();
            for template in templates {
                if template.name.trim().is_empty() {
                    return Err(ContentError::Validation(format!(
                        "provider {provider} has a template without a name"
                    )));
                }
                if !seen.insert(template.name.as_str()) {
                    return Err(ContentError::Validation(format!(
                        "provider {provider} declares template {} twice",
                        template.name
                    )));
                }
            }
        }
        Ok(Self { providers })
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Io` if the file cannot be read, otherwise as
    /// [`YamlTemplateRepository::from_yaml_str`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let repository = Self::from_yaml_str(&source)?;
        debug!(providers = repository.providers.len(), "loaded template content");
        Ok(repository)
    }

    /// Provider names, sorted.
    #[must_use]
    pub fn providers(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}

impl TemplateRepository for YamlTemplateRepository {
    fn templates(&self, provider: &str) -> Vec<ChoiceSetTemplate> {
        self.providers.get(provider).cloned().unwrap_or_default()
    }
}
