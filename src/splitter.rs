//! Split multi-command input and join converted pieces.

use crate::dialect::Dialect;

/// Split `text` into trimmed, non-empty commands.
///
/// CMD separates commands with `&&`, `||` and `&`; PowerShell with `;`.
/// Separators inside double quotes do not split; in PowerShell single quotes
/// protect them too.
#[must_use]
pub fn split(text: &str, dialect: Dialect) -> Vec<String> {
    let mut commands = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            current.push(c);
            continue;
        }

        match (c, dialect) {
            ('"', _) | ('\'', Dialect::PowerShell) => {
                quote = Some(c);
                current.push(c);
            }
            // `2>&1` is a redirection, not a separator
            ('&', Dialect::Cmd) if !current.ends_with(['>', '<']) => {
                chars.next_if_eq(&'&');
                push_command(&mut commands, &mut current);
            }
            ('|', Dialect::Cmd) if chars.peek() == Some(&'|') => {
                chars.next();
                push_command(&mut commands, &mut current);
            }
            (';', Dialect::PowerShell) => push_command(&mut commands, &mut current),
            _ => current.push(c),
        }
    }

    push_command(&mut commands, &mut current);
    commands
}

fn push_command(commands: &mut Vec<String>, current: &mut String) {
    let command = current.trim();
    if !command.is_empty() {
        commands.push(command.to_string());
    }
    current.clear();
}

/// Join converted commands with the separator of the `target` dialect.
#[must_use]
pub fn join<S: AsRef<str>>(outputs: &[S], target: Dialect) -> String {
    outputs
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(target.join_separator())
}
