use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::Error;
use crate::types::{Artifact, Result};

/// Read an input artifact, attributing failures to it
pub fn read_artifact<P: AsRef<Path>>(path: P, artifact: Artifact) -> Result<Vec<u8>> {
    let path = path.as_ref();
    debug!("Loading {}: {}", artifact, path.display());

    fs::read(path).map_err(|source| Error::ReadFailed {
        artifact,
        path: path.to_path_buf(),
        source,
    })
}
