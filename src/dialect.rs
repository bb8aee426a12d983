//! Shell dialects and conversion directions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two command-line syntaxes the engine converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Legacy `cmd.exe` syntax (`dir /s`, `del /q`, ...)
    Cmd,
    /// PowerShell cmdlet syntax (`Get-ChildItem -Recurse`, ...)
    #[serde(rename = "powershell")]
    PowerShell,
}

impl Dialect {
    /// The dialect a command written in `self` converts into.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Dialect::Cmd => Dialect::PowerShell,
            Dialect::PowerShell => Dialect::Cmd,
        }
    }

    /// Separator used when joining several converted commands in this dialect.
    #[must_use]
    pub fn join_separator(self) -> &'static str {
        match self {
            Dialect::Cmd => " && ",
            Dialect::PowerShell => ";\n",
        }
    }

    /// Render a single-line comment in this dialect.
    #[must_use]
    pub fn comment(self, text: &str) -> String {
        match self {
            Dialect::Cmd => format!("REM {text}"),
            Dialect::PowerShell => format!("# {text}"),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Cmd => "cmd",
            Dialect::PowerShell => "powershell",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[serde(rename = "cmd_to_powershell")]
    CmdToPowerShell,
    #[serde(rename = "powershell_to_cmd")]
    PowerShellToCmd,
    /// Let the direction detector pick the source dialect
    #[default]
    Auto,
}

impl Direction {
    /// Source dialect, or `None` when detection is required.
    #[must_use]
    pub fn source(self) -> Option<Dialect> {
        match self {
            Direction::CmdToPowerShell => Some(Dialect::Cmd),
            Direction::PowerShellToCmd => Some(Dialect::PowerShell),
            Direction::Auto => None,
        }
    }

    #[must_use]
    pub fn from_source(source: Dialect) -> Self {
        match source {
            Dialect::Cmd => Direction::CmdToPowerShell,
            Dialect::PowerShell => Direction::PowerShellToCmd,
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a_to_b" | "cmd" | "cmd_to_powershell" | "cmd-to-ps" => Ok(Direction::CmdToPowerShell),
            "b_to_a" | "powershell" | "ps" | "powershell_to_cmd" | "ps-to-cmd" => {
                Ok(Direction::PowerShellToCmd)
            }
            "auto" | "" => Ok(Direction::Auto),
            other => Err(anyhow::anyhow!("Unknown conversion direction: {other}")),
        }
    }
}
