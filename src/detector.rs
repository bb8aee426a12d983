//! Guess which dialect a command line is written in.

use crate::dialect::Dialect;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// (indicator, weight) pairs matched as lowercase substrings.
const POWERSHELL_INDICATORS: &[(&str, u32)] = &[
    ("get-", 2),
    ("set-", 2),
    ("new-", 2),
    ("remove-", 2),
    ("start-", 2),
    ("stop-", 2),
    ("invoke-", 2),
    ("test-", 2),
    ("select-", 2),
    ("where-", 2),
    ("sort-", 2),
    ("$", 3),
    ("|", 3),
    ("-path", 2),
    ("-name", 2),
    ("-filter", 2),
    ("-recurse", 2),
    ("foreach-object", 2),
    ("where-object", 2),
];

const CMD_INDICATORS: &[&str] = &[
    "dir", "cd", "copy", "del", "move", "ren", "md", "rd", "type", "find", "tasklist", "taskkill",
    "ping", "ipconfig", "net ", "reg ", "echo", "cls", "exit", "/s", "/q", "/f",
];
const CMD_WEIGHT: u32 = 2;

// Constant patterns; compilation cannot fail.
static CMDLET_WITH_FLAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z-]+\s+-\w+").unwrap());
static SLASH_SWITCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+/\w+").unwrap());

/// Raw scores behind a detection, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionScore {
    pub cmd: u32,
    pub powershell: u32,
}

impl DetectionScore {
    /// Ties go to CMD.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        if self.powershell > self.cmd {
            Dialect::PowerShell
        } else {
            Dialect::Cmd
        }
    }
}

/// Stateless heuristic scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionDetector;

impl DirectionDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn detect(&self, text: &str) -> Dialect {
        self.score(text).dialect()
    }

    #[must_use]
    pub fn score(&self, text: &str) -> DetectionScore {
        let trimmed = text.trim();
        let lower = trimmed.to_lowercase();

        let mut powershell: u32 = POWERSHELL_INDICATORS
            .iter()
            .filter(|(indicator, _)| lower.contains(indicator))
            .map(|(_, weight)| weight)
            .sum();
        let mut cmd: u32 = CMD_INDICATORS
            .iter()
            .filter(|indicator| lower.contains(*indicator))
            .count() as u32
            * CMD_WEIGHT;

        if CMDLET_WITH_FLAG.is_match(trimmed) {
            powershell += 3;
        }
        if SLASH_SWITCH.is_match(trimmed) {
            cmd += 2;
        }
        if trimmed.contains('\\') {
            cmd += 1;
        }
        if trimmed.contains('"') && trimmed.contains('-') {
            powershell += 1;
        }

        DetectionScore { cmd, powershell }
    }
}
