//! Complex pattern rules.
//!
//! Each rule is a regex over the whole trimmed command plus a pure handler of
//! its captures. Rules are tried in table order and the first match wins, so
//! multi-flag forms must stay above the single-flag forms they extend.

use super::tokens::{quote_cmd, quote_ps, strip_quotes, PsArgs};
use regex::Captures;

/// Pure function from regex captures to a complete target command line.
pub type PatternHandler = fn(&Captures<'_>) -> String;

/// Uncompiled rule as written in the tables below.
#[derive(Debug, Clone, Copy)]
pub struct PatternDef {
    pub pattern: &'static str,
    pub handler: PatternHandler,
    pub description: &'static str,
    pub example: &'static str,
}

fn cap<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str().trim())
}

/// ` -Path "<p>"`, or nothing for an empty or current-directory path.
fn path_clause(path: &str) -> String {
    let path = strip_quotes(path);
    if path.is_empty() || path == "." {
        String::new()
    } else {
        format!(" -Path {}", quote_ps(path))
    }
}

fn process_stem(image: &str) -> &str {
    let image = strip_quotes(image);
    match image.len().checked_sub(4) {
        Some(cut) if image.get(cut..).is_some_and(|ext| ext.eq_ignore_ascii_case(".exe")) => &image[..cut],
        _ => image,
    }
}

// CMD -> PowerShell handlers

fn dir_recurse_bare(caps: &Captures<'_>) -> String {
    format!("Get-ChildItem{} -Recurse -Name", path_clause(cap(caps, 1)))
}

fn dir_recurse_filter(caps: &Captures<'_>) -> String {
    format!(
        "Get-ChildItem{} -Recurse -Filter {}",
        path_clause(cap(caps, 1)),
        quote_ps(cap(caps, 2))
    )
}

fn dir_recurse(caps: &Captures<'_>) -> String {
    format!("Get-ChildItem{} -Recurse", path_clause(cap(caps, 1)))
}

fn dir_bare(caps: &Captures<'_>) -> String {
    format!("Get-ChildItem{} -Name", path_clause(cap(caps, 1)))
}

fn dir_directories(caps: &Captures<'_>) -> String {
    format!("Get-ChildItem{} -Directory", path_clause(cap(caps, 1)))
}

fn dir_files(caps: &Captures<'_>) -> String {
    format!("Get-ChildItem{} -File", path_clause(cap(caps, 1)))
}

fn cd_print(_caps: &Captures<'_>) -> String {
    "Get-Location".to_string()
}

fn cd_drive(caps: &Captures<'_>) -> String {
    format!("Set-Location -Path {}", quote_ps(cap(caps, 1)))
}

fn copy_force(caps: &Captures<'_>) -> String {
    format!(
        "Copy-Item -Path {} -Destination {} -Force",
        quote_ps(cap(caps, 1)),
        quote_ps(cap(caps, 2))
    )
}

fn xcopy_tree(caps: &Captures<'_>) -> String {
    format!(
        "Copy-Item -Path {} -Destination {} -Recurse -Force",
        quote_ps(cap(caps, 1)),
        quote_ps(cap(caps, 2))
    )
}

fn del_recurse_quiet(caps: &Captures<'_>) -> String {
    format!("Remove-Item -Path {} -Recurse -Force", quote_ps(cap(caps, 1)))
}

fn rd_tree(caps: &Captures<'_>) -> String {
    format!("Remove-Item -Path {} -Recurse -Force", quote_ps(cap(caps, 1)))
}

fn find_text(caps: &Captures<'_>) -> String {
    format!(
        "Select-String -Pattern {} -Path {}",
        quote_ps(cap(caps, 1)),
        quote_ps(cap(caps, 2))
    )
}

fn type_find(caps: &Captures<'_>) -> String {
    format!(
        "Select-String -Path {} -Pattern {}",
        quote_ps(cap(caps, 1)),
        quote_ps(cap(caps, 2))
    )
}

fn type_more(caps: &Captures<'_>) -> String {
    format!("Get-Content -Path {} | Out-Host -Paging", quote_ps(cap(caps, 1)))
}

fn taskkill_name_force(caps: &Captures<'_>) -> String {
    format!("Stop-Process -Name \"{}\" -Force", process_stem(cap(caps, 1)))
}

fn taskkill_name(caps: &Captures<'_>) -> String {
    format!("Stop-Process -Name \"{}\"", process_stem(cap(caps, 1)))
}

fn taskkill_pid_force(caps: &Captures<'_>) -> String {
    format!("Stop-Process -Id {} -Force", cap(caps, 1))
}

fn ping_count(caps: &Captures<'_>) -> String {
    format!("Test-Connection -ComputerName {} -Count {}", quote_ps(cap(caps, 1)), cap(caps, 2))
}

fn ping_forever(caps: &Captures<'_>) -> String {
    let target = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
    format!("Test-Connection -ComputerName {} -Count ([int]::MaxValue)", quote_ps(target))
}

fn attrib_set(caps: &Captures<'_>) -> String {
    let flags = cap(caps, 1).to_ascii_lowercase();
    let path = quote_ps(cap(caps, 2));
    let mut commands = Vec::new();

    let mut sign = '+';
    for c in flags.chars() {
        match c {
            '+' | '-' => sign = c,
            'r' => {
                let value = if sign == '+' { "$true" } else { "$false" };
                commands.push(format!("Set-ItemProperty -Path {path} -Name IsReadOnly -Value {value}"));
            }
            'h' | 's' | 'a' => {
                let attribute = match c {
                    'h' => "Hidden",
                    's' => "System",
                    _ => "Archive",
                };
                let op = if sign == '+' { "-bor" } else { "-band -bnot" };
                commands.push(format!(
                    "(Get-Item {path} -Force).Attributes = (Get-Item {path} -Force).Attributes {op} [System.IO.FileAttributes]::{attribute}"
                ));
            }
            _ => {}
        }
    }

    if commands.is_empty() {
        format!("Get-ItemProperty -Path {path}")
    } else {
        commands.join("; ")
    }
}

fn set_variable(caps: &Captures<'_>) -> String {
    format!("$env:{} = {}", cap(caps, 1), quote_ps(cap(caps, 2)))
}

fn show_variable(caps: &Captures<'_>) -> String {
    format!("Get-ChildItem Env:{}*", cap(caps, 1))
}

fn set_path(caps: &Captures<'_>) -> String {
    format!("$env:PATH = {}", quote_ps(cap(caps, 1)))
}

fn echo_blank(_caps: &Captures<'_>) -> String {
    "Write-Host \"\"".to_string()
}

fn flush_dns(_caps: &Captures<'_>) -> String {
    "Clear-DnsClientCache".to_string()
}

fn display_dns(_caps: &Captures<'_>) -> String {
    "Get-DnsClientCache".to_string()
}

fn register_dns(_caps: &Captures<'_>) -> String {
    "Register-DnsClient".to_string()
}

fn net_start_service(caps: &Captures<'_>) -> String {
    format!("Start-Service -Name {}", quote_ps(cap(caps, 1)))
}

fn net_stop_service(caps: &Captures<'_>) -> String {
    format!("Stop-Service -Name {}", quote_ps(cap(caps, 1)))
}

fn net_running_services(_caps: &Captures<'_>) -> String {
    "Get-Service | Where-Object Status -eq 'Running'".to_string()
}

fn net_users(_caps: &Captures<'_>) -> String {
    "Get-LocalUser".to_string()
}

fn tasklist_filter(caps: &Captures<'_>) -> String {
    format!("Get-Process -Name \"{}\"", process_stem(cap(caps, 1)))
}

/// CMD -> PowerShell rules, most specific first.
pub(crate) static CMD_PATTERNS: &[PatternDef] = &[
    PatternDef {
        pattern: r#"(?i)^(?:dir|ls)\s+(?:("[^"]*"|[^/\s]\S*)\s+)?(?:/s\s*/b|/b\s*/s)\s*$"#,
        handler: dir_recurse_bare,
        description: "Lists all files recursively in bare format",
        example: "dir /s /b → Get-ChildItem -Recurse -Name",
    },
    PatternDef {
        pattern: r#"(?i)^(?:dir|ls)\s+(?:("[^"]*"|[^/\s]\S*)\s+)?/s\s+(\S*[*?]\S*)\s*$"#,
        handler: dir_recurse_filter,
        description: "Searches subdirectories for files matching a wildcard",
        example: "dir /s *.txt → Get-ChildItem -Recurse -Filter \"*.txt\"",
    },
    PatternDef {
        pattern: r#"(?i)^(?:dir|ls)\s+(?:("[^"]*"|[^/\s]\S*)\s+)?/s\s*$"#,
        handler: dir_recurse,
        description: "Lists files in a directory and all subdirectories",
        example: "dir C:\\Windows /s → Get-ChildItem -Path \"C:\\Windows\" -Recurse",
    },
    PatternDef {
        pattern: r#"(?i)^(?:dir|ls)\s+(?:("[^"]*"|[^/\s]\S*)\s+)?/b\s*$"#,
        handler: dir_bare,
        description: "Displays a bare list of files and directories",
        example: "dir /b → Get-ChildItem -Name",
    },
    PatternDef {
        pattern: r#"(?i)^(?:dir|ls)\s+(?:("[^"]*"|[^/\s]\S*)\s+)?/a:?d\s*$"#,
        handler: dir_directories,
        description: "Lists directories only",
        example: "dir /a:d → Get-ChildItem -Directory",
    },
    PatternDef {
        pattern: r#"(?i)^(?:dir|ls)\s+(?:("[^"]*"|[^/\s]\S*)\s+)?/a:?-d\s*$"#,
        handler: dir_files,
        description: "Lists files only (excludes directories)",
        example: "dir /a:-d → Get-ChildItem -File",
    },
    PatternDef {
        pattern: r"(?i)^(?:cd|chdir)\s*$",
        handler: cd_print,
        description: "Displays the current directory",
        example: "cd → Get-Location",
    },
    PatternDef {
        pattern: r"(?i)^(?:cd|chdir)\s+/d\s+(.+)$",
        handler: cd_drive,
        description: "Changes drive and directory at once",
        example: "cd /d D:\\work → Set-Location -Path \"D:\\work\"",
    },
    PatternDef {
        pattern: r#"(?i)^copy\s+("[^"]+"|[^/\s]+)\s+("[^"]+"|[^/\s]+)\s*/y\s*$"#,
        handler: copy_force,
        description: "Copies files with overwrite confirmation suppressed",
        example: "copy file1.txt file2.txt /y → Copy-Item -Path \"file1.txt\" -Destination \"file2.txt\" -Force",
    },
    PatternDef {
        pattern: r#"(?i)^xcopy\s+("[^"]+"|[^/\s]+)\s+("[^"]+"|[^/\s]+)\s*/s\s*/e(?:\s*/[iyhq])*\s*$"#,
        handler: xcopy_tree,
        description: "Copies directories and subdirectories including empty ones",
        example: "xcopy C:\\Source D:\\Backup /s /e → Copy-Item -Path \"C:\\Source\" -Destination \"D:\\Backup\" -Recurse -Force",
    },
    PatternDef {
        pattern: r"(?i)^(?:del|erase)\s+(.+?)\s*/s\s*/q\s*$",
        handler: del_recurse_quiet,
        description: "Deletes files from all subdirectories quietly",
        example: "del *.tmp /s /q → Remove-Item -Path \"*.tmp\" -Recurse -Force",
    },
    PatternDef {
        pattern: r"(?i)^(?:rd|rmdir)\s+/s\s*/q\s+(.+)$",
        handler: rd_tree,
        description: "Removes a directory tree without prompting",
        example: "rd /s /q build → Remove-Item -Path \"build\" -Recurse -Force",
    },
    PatternDef {
        pattern: r#"(?i)^find\s+"([^"]+)"\s+(.+)$"#,
        handler: find_text,
        description: "Searches for a text string in files",
        example: "find \"error\" *.log → Select-String -Pattern \"error\" -Path \"*.log\"",
    },
    PatternDef {
        pattern: r#"(?i)^type\s+(.+?)\s*\|\s*(?:find|findstr)\s+(?:/i\s+)?"([^"]+)"\s*$"#,
        handler: type_find,
        description: "Searches the contents of a file",
        example: "type log.txt | find \"error\" → Select-String -Path \"log.txt\" -Pattern \"error\"",
    },
    PatternDef {
        pattern: r"(?i)^type\s+(.+?)\s*\|\s*more\s*$",
        handler: type_more,
        description: "Pages through a file",
        example: "type log.txt | more → Get-Content -Path \"log.txt\" | Out-Host -Paging",
    },
    PatternDef {
        pattern: r"(?i)^taskkill\s+/im\s+(\S+)\s*/f\s*$",
        handler: taskkill_name_force,
        description: "Forcefully terminates a process by name",
        example: "taskkill /im notepad.exe /f → Stop-Process -Name \"notepad\" -Force",
    },
    PatternDef {
        pattern: r"(?i)^taskkill\s+/f\s+/im\s+(\S+)\s*$",
        handler: taskkill_name_force,
        description: "Forcefully terminates a process by name",
        example: "taskkill /f /im notepad.exe → Stop-Process -Name \"notepad\" -Force",
    },
    PatternDef {
        pattern: r"(?i)^taskkill\s+/im\s+(\S+)\s*$",
        handler: taskkill_name,
        description: "Terminates a process by name",
        example: "taskkill /im notepad.exe → Stop-Process -Name \"notepad\"",
    },
    PatternDef {
        pattern: r"(?i)^taskkill\s+/pid\s+(\d+)\s*/f\s*$",
        handler: taskkill_pid_force,
        description: "Forcefully terminates a process by ID",
        example: "taskkill /pid 1234 /f → Stop-Process -Id 1234 -Force",
    },
    PatternDef {
        pattern: r"(?i)^taskkill\s+/f\s+/pid\s+(\d+)\s*$",
        handler: taskkill_pid_force,
        description: "Forcefully terminates a process by ID",
        example: "taskkill /f /pid 1234 → Stop-Process -Id 1234 -Force",
    },
    PatternDef {
        pattern: r#"(?i)^tasklist\s+/fi\s+"imagename\s+eq\s+([^"]+)"\s*$"#,
        handler: tasklist_filter,
        description: "Lists processes with a given image name",
        example: "tasklist /fi \"imagename eq chrome.exe\" → Get-Process -Name \"chrome\"",
    },
    PatternDef {
        pattern: r"(?i)^ping\s+(\S+)\s+[-/]n\s+(\d+)\s*$",
        handler: ping_count,
        description: "Pings a target with a specified count",
        example: "ping google.com -n 4 → Test-Connection -ComputerName \"google.com\" -Count 4",
    },
    PatternDef {
        pattern: r"(?i)^ping\s+(?:[-/]t\s+(\S+)|(\S+)\s+[-/]t)\s*$",
        handler: ping_forever,
        description: "Pings a target until stopped",
        example: "ping -t host → Test-Connection -ComputerName \"host\" -Count ([int]::MaxValue)",
    },
    PatternDef {
        pattern: r"(?i)^attrib\s+((?:[+-][rhas]+\s*)+)\s+(.+)$",
        handler: attrib_set,
        description: "Sets or removes file attributes",
        example: "attrib +r file.txt → Set-ItemProperty -Path \"file.txt\" -Name IsReadOnly -Value $true",
    },
    PatternDef {
        pattern: r"(?i)^set\s+([A-Za-z_][A-Za-z0-9_]*)=(.*)$",
        handler: set_variable,
        description: "Sets an environment variable for the session",
        example: "set NAME=value → $env:NAME = \"value\"",
    },
    PatternDef {
        pattern: r"(?i)^set\s+([A-Za-z_][A-Za-z0-9_]*)\s*$",
        handler: show_variable,
        description: "Shows environment variables starting with a prefix",
        example: "set PATH → Get-ChildItem Env:PATH*",
    },
    PatternDef {
        pattern: r"(?i)^path\s+(.+)$",
        handler: set_path,
        description: "Replaces the command search path",
        example: "path C:\\tools → $env:PATH = \"C:\\tools\"",
    },
    PatternDef {
        pattern: r"(?i)^echo\.\s*$",
        handler: echo_blank,
        description: "Prints an empty line",
        example: "echo. → Write-Host \"\"",
    },
    PatternDef {
        pattern: r"(?i)^ipconfig\s+/flushdns\s*$",
        handler: flush_dns,
        description: "Flushes the DNS resolver cache",
        example: "ipconfig /flushdns → Clear-DnsClientCache",
    },
    PatternDef {
        pattern: r"(?i)^ipconfig\s+/displaydns\s*$",
        handler: display_dns,
        description: "Displays the DNS resolver cache",
        example: "ipconfig /displaydns → Get-DnsClientCache",
    },
    PatternDef {
        pattern: r"(?i)^ipconfig\s+/registerdns\s*$",
        handler: register_dns,
        description: "Re-registers DNS names",
        example: "ipconfig /registerdns → Register-DnsClient",
    },
    PatternDef {
        pattern: r"(?i)^net\s+start\s*$",
        handler: net_running_services,
        description: "Lists running services",
        example: "net start → Get-Service | Where-Object Status -eq 'Running'",
    },
    PatternDef {
        pattern: r"(?i)^net\s+start\s+(.+)$",
        handler: net_start_service,
        description: "Starts a service",
        example: "net start spooler → Start-Service -Name \"spooler\"",
    },
    PatternDef {
        pattern: r"(?i)^net\s+stop\s+(.+)$",
        handler: net_stop_service,
        description: "Stops a service",
        example: "net stop spooler → Stop-Service -Name \"spooler\"",
    },
    PatternDef {
        pattern: r"(?i)^net\s+users?\s*$",
        handler: net_users,
        description: "Lists local user accounts",
        example: "net user → Get-LocalUser",
    },
];

// PowerShell -> CMD handlers

fn get_childitem_to_dir(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath", "filter"]);
    let mut dir = String::from("dir");

    let path = args.value_or_positional(&["path", "literalpath"], 0);
    let filter = args.value("filter").or_else(|| args.positional.get(1).map(String::as_str));
    match (path, filter) {
        (Some(path), Some(filter)) => {
            let joined = format!("{}\\{}", path.trim_end_matches('\\'), filter);
            dir.push(' ');
            dir.push_str(&quote_cmd(&joined));
        }
        (Some(p), None) | (None, Some(p)) => {
            dir.push(' ');
            dir.push_str(&quote_cmd(p));
        }
        (None, None) => {}
    }

    for (flag, switch) in [
        ("recurse", " /s"),
        ("name", " /b"),
        ("force", " /a"),
        ("hidden", " /a:h"),
        ("directory", " /a:d"),
        ("file", " /a:-d"),
    ] {
        if args.has(flag) {
            dir.push_str(switch);
        }
    }
    dir
}

fn remove_item_to_del(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath"]);
    let mut del = String::from("del");
    if let Some(path) = args.value_or_positional(&["path", "literalpath"], 0) {
        del.push(' ');
        del.push_str(&quote_cmd(path));
    }
    if args.has("force") {
        del.push_str(" /f");
    }
    if args.has("recurse") {
        del.push_str(" /s");
    }
    if args.value("confirm") == Some("$false") || (args.has("force") && args.has("recurse")) {
        del.push_str(" /q");
    }
    del
}

fn copy_item_to_copy(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath", "destination"]);
    let source = args.value_or_positional(&["path", "literalpath"], 0);
    let destination = args
        .value("destination")
        .or_else(|| args.positional.get(usize::from(args.value("path").is_none() && args.value("literalpath").is_none())).map(String::as_str));

    let recurse = args.has("recurse");
    let mut copy = String::from(if recurse { "xcopy" } else { "copy" });
    for part in [source, destination].into_iter().flatten() {
        copy.push(' ');
        copy.push_str(&quote_cmd(part));
    }
    if recurse {
        copy.push_str(" /s /e /i");
    }
    if args.has("force") {
        copy.push_str(" /y");
    }
    copy
}

fn move_item_to_move(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath", "destination"]);
    let mut parts = vec![args.value_or_positional(&["path", "literalpath"], 0)];
    let dest_index = usize::from(args.value("path").is_none() && args.value("literalpath").is_none());
    parts.push(args.value("destination").or_else(|| args.positional.get(dest_index).map(String::as_str)));

    let mut mv = String::from("move");
    if args.has("force") {
        mv.push_str(" /y");
    }
    for part in parts.into_iter().flatten() {
        mv.push(' ');
        mv.push_str(&quote_cmd(part));
    }
    mv
}

fn rename_item_to_ren(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath", "newname"]);
    let path = args.value_or_positional(&["path", "literalpath"], 0);
    let new_index = usize::from(path.is_some() && args.value("path").is_none() && args.value("literalpath").is_none());
    let new_name = args.value("newname").or_else(|| args.positional.get(new_index).map(String::as_str));

    let mut ren = String::from("ren");
    for part in [path, new_name].into_iter().flatten() {
        ren.push(' ');
        ren.push_str(&quote_cmd(part));
    }
    ren
}

fn stop_process_to_taskkill(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["name", "id", "processname"]);
    let mut kill = String::from("taskkill");
    if let Some(id) = args.value("id") {
        kill.push_str(&format!(" /pid {id}"));
    } else if let Some(name) = args.value_or_positional(&["name", "processname"], 0) {
        let name = strip_quotes(name);
        let image = if name.contains('.') { name.to_string() } else { format!("{name}.exe") };
        kill.push_str(&format!(" /im {}", quote_cmd(&image)));
    }
    if args.has("force") {
        kill.push_str(" /f");
    }
    kill
}

fn get_process_to_tasklist(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["name", "id"]);
    if let Some(name) = args.value_or_positional(&["name"], 0) {
        let name = strip_quotes(name);
        return format!("tasklist /fi \"imagename eq {name}.exe\"");
    }
    if let Some(id) = args.value("id") {
        return format!("tasklist /fi \"pid eq {id}\"");
    }
    "tasklist".to_string()
}

fn test_connection_to_ping(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["computername", "targetname", "count", "port"]);
    let target = args.value_or_positional(&["computername", "targetname"], 0).unwrap_or("");
    if args.has("traceroute") {
        return format!("tracert {}", quote_cmd(target));
    }
    let mut ping = format!("ping {}", quote_cmd(target));
    if let Some(count) = args.value("count") {
        if count.chars().all(|c| c.is_ascii_digit()) {
            ping.push_str(&format!(" -n {count}"));
        } else {
            ping.push_str(" -t");
        }
    }
    ping
}

fn select_string_to_find(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["pattern", "path", "literalpath"]);
    let pattern = args.value_or_positional(&["pattern"], 0).unwrap_or("");
    let path_index = usize::from(args.value("pattern").is_none());
    let path = args
        .value("path")
        .or_else(|| args.value("literalpath"))
        .or_else(|| args.positional.get(path_index).map(String::as_str));

    let mut find = String::from("findstr");
    if !args.has("casesensitive") {
        find.push_str(" /i");
    }
    if args.has("notmatch") {
        find.push_str(" /v");
    }
    if args.has("simplematch") {
        find.push_str(" /l");
    }
    find.push_str(&format!(" \"{}\"", strip_quotes(pattern)));
    if let Some(path) = path {
        find.push(' ');
        find.push_str(&quote_cmd(path));
    }
    find
}

fn new_directory_to_md(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "name", "itemtype"]);
    let path = args.value_or_positional(&["path", "name"], 0).unwrap_or("");
    format!("md {}", quote_cmd(path))
}

fn new_file_to_type_nul(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "name", "itemtype"]);
    let path = args.value_or_positional(&["path", "name"], 0).unwrap_or("");
    format!("type nul > {}", quote_cmd(path))
}

fn get_content_to_type(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath"]);
    let path = args.value_or_positional(&["path", "literalpath"], 0).unwrap_or("");
    format!("type {}", quote_cmd(path))
}

fn set_location_to_cd(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["path", "literalpath"]);
    match args.value_or_positional(&["path", "literalpath"], 0) {
        Some(path) if path.len() > 1 && path.as_bytes()[1] == b':' => {
            format!("cd /d {}", quote_cmd(path))
        }
        Some(path) => format!("cd {}", quote_cmd(path)),
        None => "cd".to_string(),
    }
}

fn get_location_to_cd(_caps: &Captures<'_>) -> String {
    "cd".to_string()
}

fn write_to_echo(caps: &Captures<'_>) -> String {
    let text = strip_quotes(cap(caps, 1));
    if text.is_empty() {
        "echo.".to_string()
    } else {
        format!("echo {text}")
    }
}

fn env_assign_to_set(caps: &Captures<'_>) -> String {
    format!("set {}={}", cap(caps, 1), strip_quotes(cap(caps, 2)))
}

fn env_read_to_echo(caps: &Captures<'_>) -> String {
    format!("echo %{}%", cap(caps, 1))
}

fn start_sleep_to_timeout(caps: &Captures<'_>) -> String {
    let args = PsArgs::parse(cap(caps, 1), &["seconds", "s"]);
    let seconds = args.value_or_positional(&["seconds", "s"], 0).unwrap_or("1");
    format!("timeout /t {seconds} /nobreak")
}

/// PowerShell -> CMD rules, most specific first.
pub(crate) static POWERSHELL_PATTERNS: &[PatternDef] = &[
    PatternDef {
        pattern: r"(?i)^(?:Get-ChildItem|gci)\b(.*)$",
        handler: get_childitem_to_dir,
        description: "Convert PowerShell 'Get-ChildItem' to DIR",
        example: "Get-ChildItem C:\\ -Recurse → dir C:\\ /s",
    },
    PatternDef {
        pattern: r"(?i)^(?:Remove-Item|ri)\b(.*)$",
        handler: remove_item_to_del,
        description: "Convert PowerShell 'Remove-Item' to DEL",
        example: "Remove-Item *.tmp -Force → del *.tmp /f",
    },
    PatternDef {
        pattern: r"(?i)^(?:Copy-Item|cpi)\b(.*)$",
        handler: copy_item_to_copy,
        description: "Convert PowerShell 'Copy-Item' to COPY or XCOPY",
        example: "Copy-Item -Path \"a\" -Destination \"b\" -Recurse → xcopy a b /s /e /i",
    },
    PatternDef {
        pattern: r"(?i)^(?:Move-Item|mi)\b(.*)$",
        handler: move_item_to_move,
        description: "Convert PowerShell 'Move-Item' to MOVE",
        example: "Move-Item a.txt dir\\ -Force → move /y a.txt dir\\",
    },
    PatternDef {
        pattern: r"(?i)^(?:Rename-Item|rni)\b(.*)$",
        handler: rename_item_to_ren,
        description: "Convert PowerShell 'Rename-Item' to REN",
        example: "Rename-Item old.txt new.txt → ren old.txt new.txt",
    },
    PatternDef {
        pattern: r"(?i)^(?:Stop-Process|spps)\b(.*)$",
        handler: stop_process_to_taskkill,
        description: "Convert PowerShell 'Stop-Process' to TASKKILL",
        example: "Stop-Process -Name notepad -Force → taskkill /im notepad.exe /f",
    },
    PatternDef {
        pattern: r"(?i)^(?:Get-Process|gps)\b(.*)$",
        handler: get_process_to_tasklist,
        description: "Convert PowerShell 'Get-Process' to TASKLIST",
        example: "Get-Process -Name chrome → tasklist /fi \"imagename eq chrome.exe\"",
    },
    PatternDef {
        pattern: r"(?i)^(?:Test-Connection|Test-NetConnection|tnc)\b(.*)$",
        handler: test_connection_to_ping,
        description: "Convert PowerShell connectivity tests to PING or TRACERT",
        example: "Test-Connection google.com -Count 4 → ping google.com -n 4",
    },
    PatternDef {
        pattern: r"(?i)^(?:Select-String|sls)\b(.*)$",
        handler: select_string_to_find,
        description: "Convert PowerShell 'Select-String' to FINDSTR",
        example: "Select-String -Pattern \"error\" -Path log.txt → findstr /i \"error\" log.txt",
    },
    PatternDef {
        pattern: r#"(?i)^(?:New-Item|ni)\b(.*-ItemType\s+["']?Directory["']?.*)$"#,
        handler: new_directory_to_md,
        description: "Convert PowerShell directory creation to MD",
        example: "New-Item -ItemType Directory -Path logs → md logs",
    },
    PatternDef {
        pattern: r#"(?i)^(?:New-Item|ni)\b(.*-ItemType\s+["']?File["']?.*)$"#,
        handler: new_file_to_type_nul,
        description: "Convert PowerShell file creation to an empty redirect",
        example: "New-Item -ItemType File -Path a.txt → type nul > a.txt",
    },
    PatternDef {
        pattern: r"(?i)^(?:Get-Content|gc|cat)\b(.*)$",
        handler: get_content_to_type,
        description: "Convert PowerShell 'Get-Content' to TYPE",
        example: "Get-Content config.txt → type config.txt",
    },
    PatternDef {
        pattern: r"(?i)^(?:Set-Location|sl|chdir)\b(.*)$",
        handler: set_location_to_cd,
        description: "Convert PowerShell 'Set-Location' to CD",
        example: "Set-Location D:\\work → cd /d D:\\work",
    },
    PatternDef {
        pattern: r"(?i)^(?:Get-Location|gl|pwd)\s*$",
        handler: get_location_to_cd,
        description: "Convert PowerShell 'Get-Location' to CD",
        example: "Get-Location → cd",
    },
    PatternDef {
        pattern: r"(?i)^(?:Write-Host|Write-Output|echo)(?:\s+(.*))?$",
        handler: write_to_echo,
        description: "Convert PowerShell output cmdlets to ECHO",
        example: "Write-Host \"hello\" → echo hello",
    },
    PatternDef {
        pattern: r"(?i)^\$env:([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$",
        handler: env_assign_to_set,
        description: "Convert environment variable assignment to SET",
        example: "$env:NAME = \"value\" → set NAME=value",
    },
    PatternDef {
        pattern: r"(?i)^\$env:([A-Za-z_][A-Za-z0-9_]*)\s*$",
        handler: env_read_to_echo,
        description: "Convert environment variable read to ECHO",
        example: "$env:USERNAME → echo %USERNAME%",
    },
    PatternDef {
        pattern: r"(?i)^(?:Start-Sleep|sleep)\b(.*)$",
        handler: start_sleep_to_timeout,
        description: "Convert PowerShell 'Start-Sleep' to TIMEOUT",
        example: "Start-Sleep -Seconds 5 → timeout /t 5 /nobreak",
    },
];
