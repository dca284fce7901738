// Local filesystem concerns: the reserved-filename check, the per-gist
// download directory, and launching the platform editor for files that do
// not exist yet.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Returns false iff the base name matches the host's auto-generated
/// placeholder pattern: the literal `gistfile` followed by one or more
/// digits. The host reserves those names, so they cannot be uploaded.
pub fn acceptable_filename(name: &str) -> bool {
    match name.strip_prefix("gistfile") {
        Some(rest) => rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

/// Directory a fetched gist is written into. Created once, written
/// sequentially, and removed on failure only if it ended up empty, so a
/// partially populated download is never silently discarded.
pub struct GistDir {
    path: PathBuf,
}

impl GistDir {
    /// Create a fresh directory; refuses to overwrite an existing one.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        fs::create_dir(&path)?;
        Ok(GistDir { path })
    }

    /// Create the directory or reuse it if it already exists. Used for the
    /// fixed backup root.
    pub fn create_or_reuse(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
        Ok(GistDir { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or overwrite one file inside the directory.
    pub fn write(&self, file_name: &str, content: &str) -> io::Result<()> {
        fs::write(self.path.join(file_name), content)
    }

    /// Signal that a later step failed. Best-effort cleanup: the directory
    /// is removed iff nothing was written into it.
    pub fn mark_failed(&self) {
        if let Ok(mut entries) = fs::read_dir(&self.path) {
            if entries.next().is_none() {
                let _ = fs::remove_dir(&self.path);
            }
        }
    }
}

/// Create `path` and open it in the platform default editor. Returns an
/// error when the file cannot be created or the editor fails to launch;
/// callers treat that as a warning, not a fatal condition.
pub fn open_in_editor(path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;

    let mut command = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start"]);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg("-t");
        cmd
    } else {
        // xdg-open refuses zero-byte files with some editors, seed a line.
        file.write_all(b"# Placeholder text.")?;
        Command::new("xdg-open")
    };
    drop(file);

    let status = command
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("editor exited with {status}"),
        ));
    }
    Ok(())
}
