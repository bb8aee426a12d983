//! Tokenizing and quoting helpers shared by the converter and pattern handlers.

use crate::dialect::Dialect;
use once_cell::sync::Lazy;
use regex::Regex;

// Constant patterns; compilation cannot fail.
static CMD_ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%").unwrap());
static PS_ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$env:([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// A whitespace-delimited word with its quotes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Some part of the word was quoted; quoted words are never switches.
    pub quoted: bool,
}

impl Token {
    /// `/x` style switch (CMD) or `-x` style flag.
    #[must_use]
    pub fn is_switch(&self) -> bool {
        if self.quoted || self.text.len() < 2 {
            return false;
        }
        let mut chars = self.text.chars();
        match chars.next() {
            Some('/') => true,
            // `-5` is a number, not a flag
            Some('-') => chars.next().is_some_and(|c| !c.is_ascii_digit()),
            _ => false,
        }
    }
}

/// Split a single command into tokens.
///
/// Double quotes group words in both dialects; single quotes only group in
/// PowerShell, where they delimit literal strings.
#[must_use]
pub fn tokenize(input: &str, dialect: Dialect) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' => {
                    quote = Some('"');
                    quoted = true;
                    in_token = true;
                }
                '\'' if dialect == Dialect::PowerShell => {
                    quote = Some('\'');
                    quoted = true;
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(Token {
                            text: std::mem::take(&mut current),
                            quoted,
                        });
                        quoted = false;
                        in_token = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if in_token {
        tokens.push(Token { text: current, quoted });
    }

    tokens
}

/// Remove one pair of surrounding quotes, if present.
#[must_use]
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Quote an argument for PowerShell, translating `%VAR%` references.
#[must_use]
pub fn quote_ps(arg: &str) -> String {
    let arg = strip_quotes(arg);
    if arg.contains('"') {
        return format!("'{}'", arg.replace('\'', "''"));
    }
    let translated = CMD_ENV_VAR.replace_all(arg, "$$env:$1");
    format!("\"{translated}\"")
}

/// Quote an argument for CMD only when it needs it, translating `$env:VAR`.
#[must_use]
pub fn quote_cmd(arg: &str) -> String {
    let arg = strip_quotes(arg);
    let translated = PS_ENV_VAR.replace_all(arg, "%$1%");
    let needs_quotes = translated.is_empty()
        || translated.chars().any(|c| c.is_whitespace() || matches!(c, '&' | '|' | '<' | '>' | '^'));
    if needs_quotes {
        format!("\"{translated}\"")
    } else {
        translated.into_owned()
    }
}

/// Parsed PowerShell parameters of a single cmdlet invocation.
#[derive(Debug, Default)]
pub struct PsArgs {
    /// (lowercase name without the dash, value)
    pub named: Vec<(String, Option<String>)>,
    pub positional: Vec<String>,
}

impl PsArgs {
    /// Parse everything after the cmdlet name. Parameters listed in
    /// `value_params` (lowercase, no dash) take the following token as value.
    #[must_use]
    pub fn parse(rest: &str, value_params: &[&str]) -> Self {
        let mut args = PsArgs::default();
        let mut tokens = tokenize(rest, Dialect::PowerShell).into_iter().peekable();

        while let Some(token) = tokens.next() {
            if !token.is_switch() || token.text.starts_with('/') {
                args.positional.push(token.text);
                continue;
            }

            let flag = token.text[1..].to_ascii_lowercase();
            if let Some((name, value)) = flag.split_once(':') {
                args.named.push((name.to_string(), Some(value.to_string())));
                continue;
            }

            let takes_value = value_params.contains(&flag.as_str());
            let value = if takes_value && tokens.peek().is_some_and(|next| !next.is_switch()) {
                tokens.next().map(|t| t.text)
            } else {
                None
            };
            args.named.push((flag, value));
        }

        args
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.named.iter().any(|(n, _)| n == name)
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Value of the first named parameter present, else the positional at `index`.
    #[must_use]
    pub fn value_or_positional(&self, names: &[&str], index: usize) -> Option<&str> {
        names
            .iter()
            .find_map(|n| self.value(n))
            .or_else(|| self.positional.get(index).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_respects_quotes() {
        let tokens = tokenize(r#"copy "My File.txt" D:\backup /y"#, Dialect::Cmd);
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["copy", "My File.txt", "D:\\backup", "/y"]);
        assert!(tokens[1].quoted);
        assert!(tokens[3].is_switch());
    }

    #[test]
    fn test_single_quotes_only_group_in_powershell() {
        assert_eq!(tokenize("echo 'a b'", Dialect::Cmd).len(), 3);
        assert_eq!(tokenize("Write-Host 'a b'", Dialect::PowerShell).len(), 2);
    }

    #[test]
    fn test_negative_number_is_not_a_switch() {
        let token = Token { text: "-5".to_string(), quoted: false };
        assert!(!token.is_switch());
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ps("%USERPROFILE%\\docs"), "\"$env:USERPROFILE\\docs\"");
        assert_eq!(quote_ps("\"a b\""), "\"a b\"");
        assert_eq!(quote_cmd("$env:TEMP\\x"), "%TEMP%\\x");
        assert_eq!(quote_cmd("My Docs"), "\"My Docs\"");
    }

    #[test]
    fn test_ps_args() {
        let args = PsArgs::parse(r#"-Path "C:\x y" -Recurse -Confirm:$false extra"#, &["path"]);
        assert_eq!(args.value("path"), Some("C:\\x y"));
        assert!(args.has("recurse"));
        assert_eq!(args.value("confirm"), Some("$false"));
        assert_eq!(args.positional, vec!["extra"]);
    }
}
