pub mod dump;
pub mod sig;

#[cfg(test)]
mod sig_tests;

use koala_core::SignatureError;
use koala_klc::ImageError;

/// Why a command failed.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("cannot load {path}: {source}")]
    Image { path: String, source: ImageError },
    #[error("malformed signature {signature:?}: {source}")]
    Signature {
        signature: String,
        source: SignatureError,
    },
}
