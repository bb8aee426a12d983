//! Single-command converter.
//!
//! Converts one command (no `&&`/`;` separators) from its source dialect into
//! the other one: complex patterns first, then the basic table with switch
//! rewriting, then an unknown-command fallback with suggestions.

pub(crate) mod patterns;
pub(crate) mod tables;
pub mod tokens;

use crate::dialect::Dialect;
use crate::mappings::MappingStore;
use crate::suggest::{Suggestion, SuggestionEngine};
use serde::Serialize;
use std::sync::Arc;
use tokens::{quote_cmd, quote_ps, tokenize, Token};
use tracing::{debug, trace};

/// PowerShell parameters whose value becomes a positional CMD argument.
const POSITIONAL_VALUE_PARAMS: &[&str] = &[
    "-path",
    "-literalpath",
    "-destination",
    "-filter",
    "-newname",
    "-computername",
    "-name",
    "-filepath",
    "-pattern",
    "-targetname",
];

/// How a result was produced, from most to least specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Nothing to convert
    Empty,
    /// A complex pattern matched
    LocalPattern,
    /// Basic table lookup with switch rewriting
    LocalExact,
    /// Answered by the remote lookup collaborator
    Remote,
    /// No conversion known; output is a comment
    FallbackUnknown,
}

/// Documentation links for both sides of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Documentation {
    pub cmd: Option<String>,
    pub powershell: Option<String>,
}

impl Documentation {
    fn from_parts(cmd: Option<String>, powershell: Option<String>) -> Option<Self> {
        (cmd.is_some() || powershell.is_some()).then_some(Self { cmd, powershell })
    }
}

/// Outcome of converting one or more commands. Never fails; unknown and empty
/// input are expressed through `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub output: String,
    pub suggestions: Vec<String>,
    pub similar: Vec<Suggestion>,
    pub documentation: Option<Documentation>,
    pub kind: SourceKind,
    pub source: Option<Dialect>,
    pub target: Option<Dialect>,
}

impl ConversionResult {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            output: String::new(),
            suggestions: Vec::new(),
            similar: Vec::new(),
            documentation: None,
            kind: SourceKind::Empty,
            source: None,
            target: None,
        }
    }

    fn converted(output: String, kind: SourceKind, source: Dialect) -> Self {
        Self {
            output,
            kind,
            source: Some(source),
            target: Some(source.other()),
            ..Self::empty()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind == SourceKind::Empty
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.kind == SourceKind::FallbackUnknown
    }

    /// Combine per-command results in input order.
    ///
    /// Outputs are joined with the target dialect's separator, suggestions keep
    /// their first occurrence, the first documentation wins and the kind is the
    /// least specific one seen.
    #[must_use]
    pub fn merge(parts: Vec<ConversionResult>, source: Dialect) -> Self {
        if parts.len() == 1 {
            return parts.into_iter().next().unwrap_or_else(Self::empty);
        }
        if parts.is_empty() {
            return Self::empty();
        }

        let target = source.other();
        let mut merged = Self::converted(String::new(), SourceKind::LocalPattern, source);
        let mut outputs = Vec::with_capacity(parts.len());

        for part in parts {
            outputs.push(part.output);
            for suggestion in part.suggestions {
                if !merged.suggestions.contains(&suggestion) {
                    merged.suggestions.push(suggestion);
                }
            }
            for similar in part.similar {
                if !merged.similar.iter().any(|s| s.command == similar.command) {
                    merged.similar.push(similar);
                }
            }
            if merged.documentation.is_none() {
                merged.documentation = part.documentation;
            }
            merged.kind = merged.kind.max(part.kind);
        }

        merged.output = outputs.join(target.join_separator());
        merged
    }
}

/// Converts single commands using a shared [`MappingStore`].
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    store: Arc<MappingStore>,
    suggestions: SuggestionEngine,
}

impl CommandTranslator {
    #[must_use]
    pub fn new(store: Arc<MappingStore>) -> Self {
        let suggestions = SuggestionEngine::new(Arc::clone(&store));
        Self { store, suggestions }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<MappingStore> {
        &self.store
    }

    /// Convert one command written in `source`.
    #[must_use]
    pub fn convert_one(&self, command: &str, source: Dialect) -> ConversionResult {
        let command = command.trim();
        if command.is_empty() {
            return ConversionResult::empty();
        }

        if let Some(result) = self.try_patterns(command, source) {
            return result;
        }

        let tokens = tokenize(command, source);
        let Some(base) = tokens.first() else {
            return ConversionResult::empty();
        };

        let converted = match source {
            Dialect::Cmd => self.convert_cmd(&base.text, &tokens[1..]),
            Dialect::PowerShell => self.convert_powershell(&base.text, &tokens[1..]),
        };

        match converted {
            Some(result) => result,
            None => self.fallback(command, &base.text, source),
        }
    }

    fn try_patterns(&self, command: &str, source: Dialect) -> Option<ConversionResult> {
        self.store.complex_patterns(source).iter().find_map(|pattern| {
            let output = pattern.apply(command)?;
            trace!("Pattern `{}` matched {}", pattern.pattern(), command);

            let mut result = ConversionResult::converted(output, SourceKind::LocalPattern, source);
            result.suggestions = vec![pattern.description.to_string(), pattern.example.to_string()];
            result.documentation = self.documentation_for(command, &result.output, source);
            Some(result)
        })
    }

    fn convert_cmd(&self, base: &str, args: &[Token]) -> Option<ConversionResult> {
        let template = self.store.basic_mapping(base)?;
        let base = base.to_ascii_lowercase();

        let mut flags: Vec<String> = Vec::new();
        let mut pipes: Vec<String> = Vec::new();
        let mut unknown: Vec<&str> = Vec::new();
        let mut positionals: Vec<&Token> = Vec::new();

        let mut iter = args.iter().peekable();
        while let Some(token) = iter.next() {
            if !token.is_switch() {
                positionals.push(token);
                continue;
            }

            // `-x` is accepted as a spelling of `/x`
            let switch = match token.text.strip_prefix('-') {
                Some(rest) => format!("/{rest}"),
                None => token.text.clone(),
            };
            let Some(fragment) = self.store.parameter_mapping(&base, &switch) else {
                unknown.push(&token.text);
                continue;
            };

            let value = if self.store.is_value_switch(&base, &switch) {
                iter.next_if(|next| !next.is_switch()).map(|t| t.text.as_str())
            } else {
                None
            };

            if fragment.is_empty() {
                continue;
            }
            let mut fragment = fragment.to_string();
            if let Some(value) = value {
                fragment.push(' ');
                fragment.push_str(&ps_value(value));
            }
            if fragment.starts_with('|') {
                pipes.push(fragment);
            } else if !flags.contains(&fragment) {
                flags.push(fragment);
            }
        }

        let mut output = template.to_string();
        for flag in &flags {
            output.push(' ');
            output.push_str(flag);
        }
        output.push_str(&self.path_clause(&base, &positionals));
        for pipe in &pipes {
            output.push(' ');
            output.push_str(pipe);
        }
        if !unknown.is_empty() {
            output.push(' ');
            output.push_str(&Dialect::PowerShell.comment(&unknown_parameters(&unknown)));
        }

        debug!("Converted CMD `{}` to `{}`", base, output);

        let cmdlet = template.split_whitespace().next().unwrap_or(template);
        let mut result = ConversionResult::converted(output, SourceKind::LocalExact, Dialect::Cmd);
        result.suggestions = self.store.description(&base).map(str::to_string).into_iter().collect();
        result.documentation = Documentation::from_parts(
            self.store.documentation(&base, Dialect::Cmd),
            self.store.documentation(cmdlet, Dialect::PowerShell),
        );
        Some(result)
    }

    /// Bind positional arguments to the command's named parameters, or pass
    /// them as one quoted argument.
    fn path_clause(&self, base: &str, positionals: &[&Token]) -> String {
        if positionals.is_empty() {
            return String::new();
        }

        let Some(names) = self.store.path_rule(base) else {
            let joined = positionals.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
            return format!(" {}", quote_ps(&joined));
        };

        let mut clause = String::new();
        for (i, name) in names.iter().enumerate() {
            let values: &[&Token] = if i + 1 == names.len() {
                positionals.get(i..).unwrap_or_default()
            } else {
                positionals.get(i..=i).unwrap_or_default()
            };
            if values.is_empty() {
                break;
            }
            let rendered = values.iter().map(|t| quote_ps(&t.text)).collect::<Vec<_>>().join(",");
            clause.push_str(&format!(" {name} {rendered}"));
        }
        clause
    }

    fn convert_powershell(&self, base: &str, args: &[Token]) -> Option<ConversionResult> {
        let cmd = self.store.reverse_mapping(base)?;
        // Fallback targets may carry a sub-command (`net stop`)
        let cmd_base = cmd.split_whitespace().next().unwrap_or(cmd);

        let mut switches: Vec<String> = Vec::new();
        let mut positionals: Vec<String> = Vec::new();
        let mut unknown: Vec<&str> = Vec::new();

        let mut iter = args.iter().peekable();
        while let Some(token) = iter.next() {
            if !token.is_switch() || !token.text.starts_with('-') {
                positionals.push(quote_cmd(&token.text));
                continue;
            }

            let (flag, inline_value) = match token.text.split_once(':') {
                Some((flag, value)) => (flag, Some(value)),
                None => (token.text.as_str(), None),
            };
            let lower = flag.to_ascii_lowercase();

            if let Some(switch) = self.store.reverse_parameter(cmd_base, flag) {
                let mut switch = switch.to_string();
                if self.store.is_value_switch(cmd_base, &switch) {
                    let value = inline_value
                        .or_else(|| iter.next_if(|next| !next.is_switch()).map(|t| t.text.as_str()));
                    if let Some(value) = value {
                        switch.push(' ');
                        switch.push_str(&quote_cmd(value));
                    }
                }
                if !switches.contains(&switch) {
                    switches.push(switch);
                }
            } else if POSITIONAL_VALUE_PARAMS.contains(&lower.as_str()) {
                let value = inline_value
                    .or_else(|| iter.next_if(|next| !next.is_switch()).map(|t| t.text.as_str()));
                if let Some(value) = value {
                    positionals.push(quote_cmd(value));
                }
            } else {
                unknown.push(flag);
            }
        }

        let mut output = cmd.to_string();
        for part in positionals.iter().chain(&switches) {
            output.push(' ');
            output.push_str(part);
        }
        if !unknown.is_empty() {
            output.push_str(" & ");
            output.push_str(&Dialect::Cmd.comment(&unknown_parameters(&unknown)));
        }

        debug!("Converted PowerShell `{}` to `{}`", base, output);

        let mut result = ConversionResult::converted(output, SourceKind::LocalExact, Dialect::PowerShell);
        result.suggestions = self.store.description(cmd_base).map(str::to_string).into_iter().collect();
        result.documentation = Documentation::from_parts(
            self.store.documentation(cmd_base, Dialect::Cmd),
            self.store.documentation(base, Dialect::PowerShell),
        );
        Some(result)
    }

    fn fallback(&self, command: &str, base: &str, source: Dialect) -> ConversionResult {
        debug!("No conversion known for {} command `{}`", source, base);

        let message = match source {
            Dialect::Cmd => format!("No direct PowerShell equivalent found for: {command}"),
            Dialect::PowerShell => format!("No direct CMD equivalent for: {command}"),
        };
        let similar = self.suggestions.suggest_for(base, source);

        let mut result =
            ConversionResult::converted(source.other().comment(&message), SourceKind::FallbackUnknown, source);
        result.suggestions = similar
            .iter()
            .map(|s| format!("Did you mean `{}` ({}% similar)? It converts to `{}`", s.command, s.similarity_percent, s.target))
            .collect();
        result.similar = similar;
        result
    }

    /// Links for the first word of both the input and the produced command.
    fn documentation_for(&self, input: &str, output: &str, source: Dialect) -> Option<Documentation> {
        let first = |s: &str| s.split_whitespace().next().map(str::to_string).unwrap_or_default();
        let (cmd, powershell) = match source {
            Dialect::Cmd => (first(input), first(output)),
            Dialect::PowerShell => (first(output), first(input)),
        };
        Documentation::from_parts(
            self.store.documentation(&cmd, Dialect::Cmd),
            self.store.documentation(&powershell, Dialect::PowerShell),
        )
    }
}

/// Switch value rendered for PowerShell: numbers stay bare, text is quoted.
fn ps_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        value.to_string()
    } else {
        quote_ps(value)
    }
}

fn unknown_parameters(names: &[&str]) -> String {
    let label = if names.len() == 1 { "unknown parameter" } else { "unknown parameters" };
    format!("{label}: {}", names.join(" "))
}
