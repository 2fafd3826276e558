use std::fs;
use std::path::Path;

use log::debug;

use crate::assets::{AssetKind, AssetStore};
use crate::error::SetupError;
use crate::shells::Shell;

/// Materialize the bundled integration files for `shell` under `dest_root`,
/// preserving the archive-relative layout.
///
/// Regular files that already exist with identical content are left
/// untouched, so re-extraction into a shared cache directory is idempotent
/// and safe against concurrently starting shells. New content goes through
/// a write-to-temp-then-rename so a partially written file is never visible.
/// Any filesystem failure aborts the walk; files written so far remain.
pub fn extract_shell_integration_for(
    store: &dyn AssetStore,
    shell: Shell,
    dest_root: &Path,
) -> Result<(), SetupError> {
    let prefix = format!("shell-integration/{}/", shell.name());
    for path in store.paths_matching(&prefix) {
        let Some(entry) = store.entry(&path) else {
            continue;
        };
        let dest = dest_root.join(&path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        match &entry.kind {
            AssetKind::Directory => fs::create_dir_all(&dest)?,
            AssetKind::Symlink { target } => symlink(target, &dest)?,
            AssetKind::Regular => {
                if let Ok(existing) = fs::read(&dest) {
                    if existing == entry.data {
                        continue;
                    }
                }
                debug!("extracting {path}");
                atomic_write(&dest, &entry.data)?;
            }
        }
    }
    Ok(())
}

fn atomic_write(dest: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write as _;

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &str, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(windows)]
fn symlink(target: &str, dest: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, dest)
}
