// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Endpoint Discovery
//!
//! The peer listens on one of a small numbered range of well-known local
//! endpoints and does not announce which slot it took, so discovery is a
//! brute-force scan: try every candidate in order until one accepts.
//!
//! On Windows the candidates are named pipes under `\\.\pipe\`. On Unix-like
//! systems they are domain sockets in whichever temp directory the peer
//! chose, so every plausible directory is scanned.

use std::path::PathBuf;

/// Number of endpoint slots the peer may listen on (`<base>-0` .. `<base>-9`).
pub const ENDPOINT_SLOTS: u32 = 10;

/// Default endpoint base name shared with the peer.
pub const DEFAULT_PIPE_BASE: &str = "discord-ipc";

/// Builds the ordered candidate list for the current platform.
#[cfg(unix)]
pub fn candidate_paths(base: &str) -> Vec<PathBuf> {
    candidate_paths_in(&socket_dirs(), base)
}

/// Builds the candidate list for an explicit set of socket directories.
///
/// Pure helper so the scan order can be tested without touching the
/// process environment.
#[cfg(unix)]
pub fn candidate_paths_in(dirs: &[PathBuf], base: &str) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(dirs.len() * ENDPOINT_SLOTS as usize);
    for dir in dirs {
        for slot in 0..ENDPOINT_SLOTS {
            paths.push(dir.join(format!("{}-{}", base, slot)));
        }
    }
    paths
}

/// Candidate socket directories, most specific first.
///
/// Unset or empty environment variables are skipped; `/tmp` is always the
/// final fallback. Duplicates are not removed, a second attempt on the same
/// path just fails fast.
#[cfg(unix)]
fn socket_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for var in ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                dirs.push(PathBuf::from(value));
            }
        }
    }
    dirs.push(PathBuf::from("/tmp"));
    dirs
}

/// Builds the ordered candidate list for the current platform.
#[cfg(windows)]
pub fn candidate_paths(base: &str) -> Vec<PathBuf> {
    (0..ENDPOINT_SLOTS)
        .map(|slot| PathBuf::from(format!(r"\\.\pipe\{}-{}", base, slot)))
        .collect()
}
