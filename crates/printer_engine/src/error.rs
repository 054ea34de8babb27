use std::io;

use thiserror::Error;

/// Failure reported by a host collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("host print failed: {0}")]
    Host(#[from] HostError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no active note view")]
    NoActiveView,
    #[error("rendered view has no element matching .{selector}")]
    MissingStructuralElement { selector: String },
    #[error(transparent)]
    RenderFailure(#[from] RenderError),
    #[error("no markdown files found in folder {folder}")]
    EmptyFolderSelection { folder: String },
    #[error("print cancelled")]
    UserCancelled,
    #[error("no text selected")]
    NoSelection,
    #[error("could not resolve folder")]
    NoFolder,
    #[error("host error: {0}")]
    Host(#[from] HostError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl CaptureError {
    /// Short text shown to the user when a job aborts.
    pub fn notice(&self) -> String {
        match self {
            CaptureError::NoActiveView => "No active markdown view".to_string(),
            CaptureError::MissingStructuralElement { .. } => {
                "Failed to capture preview content".to_string()
            }
            CaptureError::RenderFailure(_) => "Failed to generate preview content.".to_string(),
            CaptureError::EmptyFolderSelection { .. } => {
                "No markdown files found in the folder.".to_string()
            }
            CaptureError::UserCancelled => "Print cancelled".to_string(),
            CaptureError::NoSelection => "No text selected.".to_string(),
            CaptureError::NoFolder => "Could not resolve folder.".to_string(),
            CaptureError::Host(_) | CaptureError::Dispatch(_) => {
                "Failed to print content".to_string()
            }
        }
    }
}
