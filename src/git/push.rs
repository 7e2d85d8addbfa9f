// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-ref push results.
//!
//! `git push` exits non-zero for a rejected ref but also for transport
//! failures, so the exit code alone cannot separate the two. The
//! `--porcelain` ref lines are parsed into [`PushInfo`] instead:
//!
//! ```text
//! To git@host:org/repo.git
//! !<TAB>refs/heads/main:refs/heads/main<TAB>[rejected] (fetch first)
//! Done
//!
//! flag  meaning          PushFlags
//!  ' '  fast-forward     FAST_FORWARD
//!  '+'  forced update    FORCED_UPDATE
//!  '-'  deleted          DELETED
//!  '*'  new ref          NEW_HEAD | NEW_TAG (refs/tags/*)
//!  '='  up to date       UP_TO_DATE
//!  '!'  not updated      ERROR (+ REJECTED / REMOTE_REJECTED / REMOTE_FAILURE)
//!  'X'  no match         NO_MATCH
//! ```

use bitflags::bitflags;

bitflags! {
    /// Outcome bits of a single pushed ref.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PushFlags: u16 {
        const NEW_TAG = 1 << 0;
        const NEW_HEAD = 1 << 1;
        const NO_MATCH = 1 << 2;
        const REJECTED = 1 << 3;
        const REMOTE_REJECTED = 1 << 4;
        const REMOTE_FAILURE = 1 << 5;
        const DELETED = 1 << 6;
        const FORCED_UPDATE = 1 << 7;
        const FAST_FORWARD = 1 << 8;
        const UP_TO_DATE = 1 << 9;
        const ERROR = 1 << 10;
    }
}

/// Result of pushing one ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushInfo {
    pub flags: PushFlags,
    pub local_ref: String,
    pub remote_ref: String,
    pub summary: String,
}

impl PushInfo {
    /// Build a result from flags and summary alone.
    pub fn new(flags: PushFlags, summary: impl Into<String>) -> Self {
        Self {
            flags,
            local_ref: String::new(),
            remote_ref: String::new(),
            summary: summary.into(),
        }
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.flags.contains(PushFlags::REJECTED)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.flags.contains(PushFlags::ERROR)
    }

    /// Parse one porcelain ref line. Returns `None` for `To ...`, `Done` and
    /// anything else that is not a ref line.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let flag = chars.next()?;
        let rest = chars.as_str().strip_prefix('\t')?;
        let (refs, summary) = rest.split_once('\t')?;
        let (local_ref, remote_ref) = refs.split_once(':').unwrap_or((refs, ""));
        let summary = summary.trim();

        let mut flags = match flag {
            ' ' => PushFlags::FAST_FORWARD,
            '+' => PushFlags::FORCED_UPDATE,
            '-' => PushFlags::DELETED,
            '=' => PushFlags::UP_TO_DATE,
            '!' => PushFlags::ERROR,
            'X' => PushFlags::NO_MATCH,
            '*' if remote_ref.starts_with("refs/tags/") => PushFlags::NEW_TAG,
            '*' => PushFlags::NEW_HEAD,
            _ => return None,
        };

        if flags.contains(PushFlags::ERROR) {
            if summary.starts_with("[rejected]") {
                flags |= PushFlags::REJECTED;
            } else if summary.starts_with("[remote rejected]") {
                flags |= PushFlags::REMOTE_REJECTED;
            } else if summary.starts_with("[remote failure]") {
                flags |= PushFlags::REMOTE_FAILURE;
            }
        }

        Some(Self {
            flags,
            local_ref: local_ref.to_string(),
            remote_ref: remote_ref.to_string(),
            summary: summary.to_string(),
        })
    }
}

/// Parse every ref line of `git push --porcelain` stdout.
#[must_use]
pub fn parse_porcelain(stdout: &str) -> Vec<PushInfo> {
    stdout.lines().filter_map(PushInfo::parse_line).collect()
}
