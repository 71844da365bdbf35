//! Hand the finished artifact to the OS default viewer.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Open `path` with the platform's default handler.
///
/// Spawns the opener and returns without waiting on it. Best-effort by
/// contract: callers downgrade any error here to a warning.
pub fn open_default(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(path)
            .spawn()
            .context("failed to spawn open")?;
        Ok(())
    }

    #[cfg(target_os = "windows")]
    {
        // Empty first argument is the window title slot.
        Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()
            .context("failed to spawn start")?;
        Ok(())
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let opener = which::which("xdg-open").context("xdg-open not available")?;
        debug!("opening {} with {}", path.display(), opener.display());
        Command::new(opener)
            .arg(path)
            .spawn()
            .context("failed to spawn xdg-open")?;
        Ok(())
    }
}
