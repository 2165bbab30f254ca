use thiserror::Error;

use crate::document::DocumentError;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("invalid workflow yaml spec passed: {0}")]
  TemplateParse(String),

  #[error("invalid workflow, missing spec")]
  MissingSpec,

  #[error("invalid workflow parameter: {0}")]
  ParameterInjection(#[source] DocumentError),

  #[error("unable to unmarshal artifact: {message}\n{document}")]
  ArtifactParse { document: String, message: String },

  #[error("unable to marshal artifact resource: {0}")]
  ArtifactSerialize(String),

  #[error("invalid workflow document: {0}")]
  InvalidDocument(#[from] DocumentError),
}
