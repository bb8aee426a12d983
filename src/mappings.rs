//! Mapping store: every conversion table, indexed once and shared read-only.
//!
//! The store is built from the static tables in `translator::tables` and
//! `translator::patterns`, plus any custom mappings supplied through
//! [`MappingStoreBuilder`]. After construction it is immutable; share it with
//! an `Arc`.

use crate::dialect::Dialect;
use crate::error::MappingError;
use crate::translator::patterns::{PatternDef, PatternHandler, CMD_PATTERNS, POWERSHELL_PATTERNS};
use crate::translator::tables;
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Switch table for one CMD command: lowercase switch -> PowerShell fragment.
pub type ParameterTable = HashMap<String, String>;

/// A compiled complex pattern.
#[derive(Debug, Clone)]
pub struct ComplexPattern {
    regex: Regex,
    handler: PatternHandler,
    pub description: &'static str,
    pub example: &'static str,
}

impl ComplexPattern {
    fn compile(def: &PatternDef) -> Result<Self, MappingError> {
        let regex = Regex::new(def.pattern).map_err(|source| MappingError::InvalidPattern {
            pattern: def.pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            handler: def.handler,
            description: def.description,
            example: def.example,
        })
    }

    /// Run the handler if the whole command matches.
    #[must_use]
    pub fn apply(&self, command: &str) -> Option<String> {
        self.regex.captures(command).map(|caps: Captures<'_>| (self.handler)(&caps))
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Side-by-side example for display.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Example {
    pub cmd: &'static str,
    pub powershell: &'static str,
    pub description: &'static str,
}

/// Immutable lookup tables for both conversion directions.
#[derive(Debug, Clone)]
pub struct MappingStore {
    /// (cmd, powershell template) in table order
    basic: Vec<(String, String)>,
    basic_index: HashMap<String, usize>,
    parameters: HashMap<String, ParameterTable>,
    value_switches: HashMap<String, Vec<String>>,
    path_rules: HashMap<String, &'static [&'static str]>,
    /// (cmdlet as written, cmd) in first-seen order
    reverse: Vec<(String, String)>,
    reverse_index: HashMap<String, usize>,
    reverse_parameters: HashMap<String, HashMap<String, String>>,
    cmd_patterns: Vec<ComplexPattern>,
    powershell_patterns: Vec<ComplexPattern>,
    examples: Vec<Example>,
}

impl MappingStore {
    /// Build the store from the built-in tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern fails to compile.
    pub fn new() -> Result<Self, MappingError> {
        MappingStoreBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> MappingStoreBuilder {
        MappingStoreBuilder::new()
    }

    /// PowerShell template for a CMD command (case-insensitive).
    #[must_use]
    pub fn basic_mapping(&self, command: &str) -> Option<&str> {
        self.basic_index
            .get(&command.to_ascii_lowercase())
            .map(|&i| self.basic[i].1.as_str())
    }

    #[must_use]
    pub fn parameter_mappings(&self, command: &str) -> Option<&ParameterTable> {
        self.parameters.get(&command.to_ascii_lowercase())
    }

    /// PowerShell fragment for a CMD switch. `Some("")` means the switch has no
    /// equivalent and should be dropped.
    #[must_use]
    pub fn parameter_mapping(&self, command: &str, switch: &str) -> Option<&str> {
        self.parameter_mappings(command)
            .and_then(|table| table.get(&switch.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Whether `switch` takes the following token as its value.
    #[must_use]
    pub fn is_value_switch(&self, command: &str, switch: &str) -> bool {
        self.value_switches
            .get(&command.to_ascii_lowercase())
            .is_some_and(|switches| switches.iter().any(|s| s.eq_ignore_ascii_case(switch)))
    }

    /// Named PowerShell parameters that positional arguments of `command` bind to.
    #[must_use]
    pub fn path_rule(&self, command: &str) -> Option<&'static [&'static str]> {
        self.path_rules.get(&command.to_ascii_lowercase()).copied()
    }

    /// Ordered complex patterns for the given source dialect.
    #[must_use]
    pub fn complex_patterns(&self, source: Dialect) -> &[ComplexPattern] {
        match source {
            Dialect::Cmd => &self.cmd_patterns,
            Dialect::PowerShell => &self.powershell_patterns,
        }
    }

    /// CMD command for a cmdlet (case-insensitive).
    #[must_use]
    pub fn reverse_mapping(&self, cmdlet: &str) -> Option<&str> {
        let key = cmdlet.to_ascii_lowercase();
        if let Some(&i) = self.reverse_index.get(&key) {
            return Some(self.reverse[i].1.as_str());
        }
        tables::REVERSE_FALLBACKS
            .iter()
            .find(|(ps, _)| *ps == key)
            .map(|(_, cmd)| *cmd)
    }

    /// CMD switch for a PowerShell flag of `command` (case-insensitive).
    #[must_use]
    pub fn reverse_parameter(&self, command: &str, flag: &str) -> Option<&str> {
        self.reverse_parameters
            .get(&command.to_ascii_lowercase())
            .and_then(|table| table.get(&flag.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Known source commands of `dialect` paired with their target, in table order.
    pub fn source_commands(&self, dialect: Dialect) -> impl Iterator<Item = (&str, &str)> + '_ {
        let entries = match dialect {
            Dialect::Cmd => &self.basic,
            Dialect::PowerShell => &self.reverse,
        };
        entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// Microsoft Learn page for a command written in `dialect`.
    #[must_use]
    pub fn documentation(&self, command: &str, dialect: Dialect) -> Option<String> {
        match dialect {
            Dialect::Cmd => {
                let key = command.to_ascii_lowercase();
                tables::CMD_DOCS
                    .iter()
                    .find(|c| **c == key)
                    .map(|c| format!("{}{c}", tables::CMD_DOCS_BASE))
            }
            Dialect::PowerShell => tables::POWERSHELL_DOCS
                .iter()
                .find(|(cmdlet, _)| cmdlet.eq_ignore_ascii_case(command))
                .map(|(_, path)| format!("{}{path}", tables::POWERSHELL_DOCS_BASE)),
        }
    }

    #[must_use]
    pub fn description(&self, command: &str) -> Option<&'static str> {
        let key = command.to_ascii_lowercase();
        tables::DESCRIPTIONS.iter().find(|(c, _)| *c == key).map(|(_, d)| *d)
    }

    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}

/// Builder that accepts custom mappings before the indexes are derived.
#[derive(Debug, Default)]
pub struct MappingStoreBuilder {
    custom: Vec<(String, String)>,
}

impl MappingStoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override a CMD -> PowerShell mapping.
    #[must_use]
    pub fn custom_mapping(mut self, cmd: impl Into<String>, powershell: impl Into<String>) -> Self {
        self.custom.push((cmd.into(), powershell.into()));
        self
    }

    /// Compile patterns and derive the reverse indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile or a custom mapping is
    /// malformed.
    pub fn build(self) -> Result<MappingStore, MappingError> {
        let mut basic: Vec<(String, String)> = tables::BASIC_MAPPINGS
            .iter()
            .map(|(c, p)| ((*c).to_string(), (*p).to_string()))
            .collect();

        for (cmd, powershell) in self.custom {
            validate_custom(&cmd, &powershell)?;
            let key = cmd.trim().to_ascii_lowercase();
            let target = powershell.trim().to_string();
            match basic.iter_mut().find(|(c, _)| *c == key) {
                Some(entry) => {
                    debug!("Custom mapping overrides `{}`: {} -> {}", key, entry.1, target);
                    entry.1 = target;
                }
                None => {
                    debug!("Custom mapping added: {} -> {}", key, target);
                    basic.push((key, target));
                }
            }
        }

        let basic_index = basic
            .iter()
            .enumerate()
            .map(|(i, (c, _))| (c.clone(), i))
            .collect();

        let mut reverse: Vec<(String, String)> = Vec::new();
        let mut reverse_index = HashMap::new();
        for (cmd, target) in &basic {
            let Some(cmdlet) = target.split_whitespace().next() else {
                continue;
            };
            let key = cmdlet.to_ascii_lowercase();
            if reverse_index.contains_key(&key) {
                trace!("Reverse slot for {} already taken, skipping {}", cmdlet, cmd);
                continue;
            }
            reverse_index.insert(key, reverse.len());
            reverse.push((cmdlet.to_string(), cmd.clone()));
        }

        let mut parameters = HashMap::new();
        let mut reverse_parameters = HashMap::new();
        for (cmd, switches) in tables::PARAMETER_MAPPINGS {
            let mut forward = ParameterTable::new();
            let mut backward: HashMap<String, String> = HashMap::new();
            for (switch, fragment) in *switches {
                forward.insert((*switch).to_string(), (*fragment).to_string());
                if let Some(flag) = fragment.split_whitespace().next().filter(|f| f.starts_with('-')) {
                    backward
                        .entry(flag.to_ascii_lowercase())
                        .or_insert_with(|| (*switch).to_string());
                }
            }
            parameters.insert((*cmd).to_string(), forward);
            reverse_parameters.insert((*cmd).to_string(), backward);
        }

        let value_switches = tables::VALUE_SWITCHES
            .iter()
            .map(|(c, s)| ((*c).to_string(), s.iter().map(|x| (*x).to_string()).collect()))
            .collect();

        let path_rules = tables::PATH_RULES
            .iter()
            .map(|(c, names)| ((*c).to_string(), *names))
            .collect();

        let cmd_patterns = CMD_PATTERNS
            .iter()
            .map(ComplexPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        let powershell_patterns = POWERSHELL_PATTERNS
            .iter()
            .map(ComplexPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let examples = tables::EXAMPLES
            .iter()
            .map(|&(cmd, powershell, description)| Example {
                cmd,
                powershell,
                description,
            })
            .collect();

        debug!(
            "Mapping store ready: {} basic, {} reverse, {} + {} patterns",
            basic.len(),
            reverse.len(),
            cmd_patterns.len(),
            powershell_patterns.len()
        );

        Ok(MappingStore {
            basic,
            basic_index,
            parameters,
            value_switches,
            path_rules,
            reverse,
            reverse_index,
            reverse_parameters,
            cmd_patterns,
            powershell_patterns,
            examples,
        })
    }
}

fn validate_custom(cmd: &str, powershell: &str) -> Result<(), MappingError> {
    let reason = if cmd.trim().is_empty() {
        Some("command is empty")
    } else if cmd.trim().contains(char::is_whitespace) {
        Some("command must be a single word")
    } else if powershell.trim().is_empty() {
        Some("target is empty")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(MappingError::InvalidCustomMapping {
            source_cmd: cmd.to_string(),
            target: powershell.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation() {
        let store = MappingStore::new().unwrap();
        assert_eq!(store.basic_mapping("DIR"), Some("Get-ChildItem"));
        assert_eq!(store.basic_mapping("nope"), None);
    }

    #[test]
    fn test_reverse_first_entry_wins() {
        let store = MappingStore::new().unwrap();
        // dir and ls both map to Get-ChildItem; dir comes first
        assert_eq!(store.reverse_mapping("get-childitem"), Some("dir"));
        assert_eq!(store.reverse_mapping("Remove-Item"), Some("rd"));
        assert_eq!(store.reverse_mapping("Get-Location"), Some("cd"));
    }

    #[test]
    fn test_parameter_lookup_is_case_insensitive() {
        let store = MappingStore::new().unwrap();
        assert_eq!(store.parameter_mapping("DIR", "/S"), Some("-Recurse"));
        assert_eq!(store.parameter_mapping("find", "/i"), Some(""));
        assert_eq!(store.parameter_mapping("dir", "/zz"), None);
        assert_eq!(store.reverse_parameter("dir", "-Recurse"), Some("/s"));
        assert_eq!(store.reverse_parameter("ipconfig", "-detailed"), Some("/all"));
    }

    #[test]
    fn test_custom_mapping_overrides_and_appends() {
        let store = MappingStore::builder()
            .custom_mapping("ll", "Get-ChildItem -Force")
            .custom_mapping("CLS", "Clear-Host -Verbose")
            .build()
            .unwrap();
        assert_eq!(store.basic_mapping("ll"), Some("Get-ChildItem -Force"));
        assert_eq!(store.basic_mapping("cls"), Some("Clear-Host -Verbose"));
        assert_eq!(store.source_commands(Dialect::Cmd).last(), Some(("ll", "Get-ChildItem -Force")));
    }

    #[test]
    fn test_malformed_custom_mapping_is_rejected() {
        let err = MappingStore::builder().custom_mapping("two words", "X").build().unwrap_err();
        assert!(matches!(err, MappingError::InvalidCustomMapping { .. }));
        assert!(MappingStore::builder().custom_mapping("x", "  ").build().is_err());
    }

    #[test]
    fn test_documentation_links() {
        let store = MappingStore::new().unwrap();
        assert!(store.documentation("dir", Dialect::Cmd).unwrap().ends_with("windows-commands/dir"));
        assert!(store
            .documentation("get-childitem", Dialect::PowerShell)
            .unwrap()
            .ends_with("microsoft.powershell.management/get-childitem"));
        assert!(store.documentation("frobnicate", Dialect::Cmd).is_none());
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MappingStore>();
    }
}
