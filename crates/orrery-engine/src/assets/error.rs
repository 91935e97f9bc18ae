use thiserror::Error;

/// Failures while loading body tables or textures.
///
/// None of these are fatal to a running orrery: callers log them and keep
/// whatever state they already had.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid system manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("body {body:?} orbits unknown parent {parent:?}")]
    UnknownParent { body: String, parent: String },

    #[error("body name {0:?} appears more than once")]
    DuplicateBody(String),

    #[error("texture {url:?} failed to load: {reason}")]
    TextureLoad { url: String, reason: String },
}
