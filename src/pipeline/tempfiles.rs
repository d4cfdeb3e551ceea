//! Scoped temp-file cleanup (§4.5 step 9, §9 design note).
//!
//! Both the persisted scene file and the rendered PNG must be deleted on
//! every exit path from a request's pipeline run — success, render
//! failure, or a panic unwinding through it. A `Drop` guard is the scoped-
//! resource idiom for that in Rust; best-effort removal (a file that was
//! never created, or already gone, is not itself an error).

use std::path::PathBuf;

/// Removes its tracked paths when dropped. Paths are recorded as they
/// become known (the scene file first, the PNG once rendering succeeds)
/// rather than all at once, so a failure partway through the pipeline
/// still cleans up whatever was actually created.
pub struct CleanupGuard {
    paths: Vec<PathBuf>,
}

impl CleanupGuard {
    #[must_use]
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }
}

impl Default for CleanupGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(err) = std::fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("failed to remove temp file {}: {err}", path.display());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_removes_tracked_files_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scene.gltf");
        std::fs::write(&path, b"hello").expect("write");
        assert!(path.exists());

        {
            let mut guard = CleanupGuard::new();
            guard.track(path.clone());
        }
        assert!(!path.exists());
    }

    #[test]
    fn guard_tolerates_a_path_that_was_never_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("never-written.png");
        let mut guard = CleanupGuard::new();
        guard.track(path);
        drop(guard);
    }
}
