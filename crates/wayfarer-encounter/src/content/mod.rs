//! Template content: the repository interface and its YAML implementation.

mod yaml;

pub use yaml::YamlTemplateRepository;

use thiserror::Error;
use wayfarer_core::error::DomainError;

use crate::domain::template::ChoiceSetTemplate;

/// Supplies choice-set templates for a content provider.
pub trait TemplateRepository: Send + Sync {
    /// Templates registered for `provider`, in declaration order. Unknown
    /// providers yield an empty list.
    fn templates(&self, provider: &str) -> Vec<ChoiceSetTemplate>;
}

/// Failure to load template content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse template YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid template content: {0}")]
    Validation(String),
}

impl From<ContentError> for DomainError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(msg) => Self::Validation(msg),
            other => Self::Infrastructure(other.to_string()),
        }
    }
}
