//! Spoken status cues.
//!
//! Uses whichever platform TTS binary is installed (`say` on macOS,
//! `espeak` or `spd-say` elsewhere); without one, falls back to the
//! terminal bell. Always best-effort.

use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

const TTS_CANDIDATES: &[&str] = &["say", "espeak", "spd-say"];

/// Locate an installed TTS binary, if any.
fn find_tts() -> Option<PathBuf> {
    TTS_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Speak `message`, or ring the terminal bell when no TTS is installed.
///
/// Runs the binary on a blocking task; every failure is debug-logged and
/// swallowed.
pub async fn announce(message: &str) {
    let Some(bin) = find_tts() else {
        bell();
        return;
    };

    let message = message.to_string();
    let result =
        tokio::task::spawn_blocking(move || Command::new(&bin).arg(&message).status()).await;
    match result {
        Ok(Ok(status)) if status.success() => {}
        Ok(Ok(status)) => debug!("tts exited with {status}"),
        Ok(Err(e)) => debug!("tts failed to run: {e}"),
        Err(e) => debug!("tts task died: {e}"),
    }
}

/// ASCII BEL; terminals that allow it will chirp.
pub fn bell() {
    eprint!("\x07");
}
