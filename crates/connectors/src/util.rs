use std::path::Path;

/// Non-erroring existence check. Broken symlinks and permission errors both
/// resolve to `false`; absence is never treated as a failure.
pub(crate) async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
