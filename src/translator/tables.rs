//! Static conversion tables.
//!
//! Plain data only. `MappingStore` indexes these once at construction; nothing
//! reads them at conversion time.

/// CMD command -> PowerShell template. Order matters: the reverse index keeps
/// the first CMD command seen for each cmdlet, and suggestions break ties by
/// position.
pub(crate) static BASIC_MAPPINGS: &[(&str, &str)] = &[
    // Files and directories
    ("dir", "Get-ChildItem"),
    ("ls", "Get-ChildItem"),
    ("cd", "Set-Location"),
    ("chdir", "Set-Location"),
    ("pushd", "Push-Location"),
    ("popd", "Pop-Location"),
    ("md", "New-Item -ItemType Directory"),
    ("mkdir", "New-Item -ItemType Directory"),
    ("rd", "Remove-Item"),
    ("rmdir", "Remove-Item"),
    ("del", "Remove-Item"),
    ("erase", "Remove-Item"),
    ("copy", "Copy-Item"),
    ("xcopy", "Copy-Item"),
    ("move", "Move-Item"),
    ("ren", "Rename-Item"),
    ("rename", "Rename-Item"),
    ("tree", "Get-ChildItem -Recurse"),
    // Display and content
    ("cls", "Clear-Host"),
    ("type", "Get-Content"),
    ("more", "Get-Content"),
    ("echo", "Write-Host"),
    ("clip", "Set-Clipboard"),
    // Search, sort, compare
    ("find", "Select-String"),
    ("findstr", "Select-String"),
    ("where", "Get-Command"),
    ("sort", "Sort-Object"),
    ("fc", "Compare-Object"),
    ("comp", "Compare-Object"),
    // Network
    ("ping", "Test-Connection"),
    ("ipconfig", "Get-NetIPConfiguration"),
    ("nslookup", "Resolve-DnsName"),
    ("netstat", "Get-NetTCPConnection"),
    ("tracert", "Test-NetConnection -TraceRoute"),
    // Processes
    ("tasklist", "Get-Process"),
    ("taskkill", "Stop-Process"),
    ("start", "Start-Process"),
    ("timeout", "Start-Sleep"),
    ("shutdown", "Stop-Computer"),
    // System information
    ("systeminfo", "Get-ComputerInfo"),
    ("whoami", "$env:USERNAME"),
    ("hostname", "$env:COMPUTERNAME"),
    ("ver", "Get-Host"),
    ("date", "Get-Date"),
    ("time", "Get-Date"),
    // Environment
    ("set", "Get-ChildItem Env:"),
    ("path", "$env:PATH"),
    // Attributes and permissions
    ("attrib", "Get-ItemProperty"),
    ("cacls", "Get-Acl"),
    ("icacls", "Get-Acl"),
    // Services
    ("sc", "Get-Service"),
    ("net", "Get-Service"),
    ("exit", "exit"),
];

/// Per-command switch tables. An empty fragment means the switch has no
/// PowerShell counterpart and is dropped. Fragments starting with `|` are
/// pipeline stages and are emitted after all arguments.
pub(crate) static PARAMETER_MAPPINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "dir",
        &[
            ("/s", "-Recurse"),
            ("/b", "-Name"),
            ("/w", "| Format-Wide"),
            ("/p", "| Out-Host -Paging"),
            ("/a", "-Force"),
            ("/ah", "-Hidden"),
            ("/a:h", "-Hidden"),
            ("/as", "-System"),
            ("/a:s", "-System"),
            ("/ar", "-ReadOnly"),
            ("/a:r", "-ReadOnly"),
            ("/ad", "-Directory"),
            ("/a:d", "-Directory"),
            ("/a-d", "-File"),
            ("/a:-d", "-File"),
            ("/o:n", "| Sort-Object Name"),
            ("/on", "| Sort-Object Name"),
            ("/o:s", "| Sort-Object Length"),
            ("/os", "| Sort-Object Length"),
            ("/o:d", "| Sort-Object LastWriteTime"),
            ("/od", "| Sort-Object LastWriteTime"),
            ("/o:e", "| Sort-Object Extension"),
            ("/o:-n", "| Sort-Object Name -Descending"),
            ("/o:-s", "| Sort-Object Length -Descending"),
            ("/o:-d", "| Sort-Object LastWriteTime -Descending"),
            (
                "/q",
                "| Select-Object Name,@{n='Owner';e={(Get-Acl $_.FullName).Owner}}",
            ),
            ("/t:c", "| Sort-Object CreationTime"),
            ("/t:a", "| Sort-Object LastAccessTime"),
            ("/t:w", "| Sort-Object LastWriteTime"),
            ("/c", ""),
            ("/4", ""),
            ("/l", "| ForEach-Object { $_.Name.ToLower() }"),
            ("/x", "-Force"),
        ],
    ),
    (
        "copy",
        &[
            ("/y", "-Force"),
            ("/-y", "-Confirm"),
            ("/z", ""),
            ("/v", ""),
            ("/a", ""),
            ("/b", ""),
            ("/d", ""),
        ],
    ),
    (
        "xcopy",
        &[
            ("/s", "-Recurse"),
            ("/e", "-Recurse"),
            ("/y", "-Force"),
            ("/-y", "-Confirm"),
            ("/i", ""),
            ("/q", ""),
            ("/f", "-Verbose"),
            ("/l", "-WhatIf"),
            ("/h", "-Force"),
            ("/r", "-Force"),
            ("/k", ""),
            ("/o", ""),
            ("/x", ""),
            ("/v", ""),
            ("/w", "-Confirm"),
            ("/c", "-ErrorAction SilentlyContinue"),
        ],
    ),
    (
        "del",
        &[
            ("/p", "-Confirm"),
            ("/f", "-Force"),
            ("/s", "-Recurse"),
            ("/q", ""),
            ("/a", "-Force"),
            ("/ar", "-Force"),
            ("/ah", "-Force"),
            ("/as", "-Force"),
        ],
    ),
    (
        "rd",
        &[("/s", "-Recurse"), ("/q", "-Force")],
    ),
    (
        "move",
        &[("/y", "-Force"), ("/-y", "-Confirm")],
    ),
    (
        "find",
        &[
            ("/i", ""),
            ("/v", "-NotMatch"),
            ("/c", "| Measure-Object -Line"),
            ("/n", ""),
        ],
    ),
    (
        "findstr",
        &[
            ("/i", ""),
            ("/v", "-NotMatch"),
            ("/r", ""),
            ("/s", ""),
            ("/m", "-List"),
            ("/l", "-SimpleMatch"),
            ("/n", ""),
            ("/b", ""),
            ("/e", ""),
            ("/x", ""),
            ("/off", ""),
            ("/offline", ""),
        ],
    ),
    (
        "tasklist",
        &[
            ("/m", "| Select-Object ProcessName,Modules"),
            ("/svc", "| Select-Object ProcessName,Id"),
            ("/v", "| Format-List *"),
            ("/fo", ""),
            ("/nh", ""),
        ],
    ),
    (
        "taskkill",
        &[
            ("/f", "-Force"),
            ("/im", "-Name"),
            ("/pid", "-Id"),
            ("/t", ""),
        ],
    ),
    (
        "ping",
        &[
            ("/t", ""),
            ("/n", "-Count"),
            ("/l", "-BufferSize"),
            ("/f", ""),
            ("/i", "-TimeToLive"),
            ("/w", ""),
            ("/4", ""),
            ("/6", ""),
        ],
    ),
    (
        "ipconfig",
        &[("/all", "-Detailed"), ("/showclassid", ""), ("/setclassid", "")],
    ),
    (
        "timeout",
        &[("/t", "-Seconds"), ("/nobreak", "")],
    ),
    (
        "shutdown",
        &[("/s", ""), ("/f", "-Force"), ("/t", "")],
    ),
];

/// Switches whose following token is their value (`/pid 42`, `/n 4`).
pub(crate) static VALUE_SWITCHES: &[(&str, &[&str])] = &[
    ("taskkill", &["/im", "/pid"]),
    ("ping", &["/n", "/l", "/i", "/w"]),
    ("tasklist", &["/fo", "/fi"]),
    ("timeout", &["/t"]),
    ("shutdown", &["/t"]),
];

/// Commands whose positional arguments bind to named PowerShell parameters, in
/// order. The last name absorbs any remaining positionals as an array. Commands
/// not listed here take a single quoted positional argument.
pub(crate) static PATH_RULES: &[(&str, &[&str])] = &[
    ("dir", &["-Path"]),
    ("ls", &["-Path"]),
    ("del", &["-Path"]),
    ("erase", &["-Path"]),
    ("rd", &["-Path"]),
    ("rmdir", &["-Path"]),
    ("md", &["-Path"]),
    ("mkdir", &["-Path"]),
    ("cd", &["-Path"]),
    ("chdir", &["-Path"]),
    ("pushd", &["-Path"]),
    ("copy", &["-Path", "-Destination"]),
    ("xcopy", &["-Path", "-Destination"]),
    ("move", &["-Path", "-Destination"]),
    ("ren", &["-Path", "-NewName"]),
    ("rename", &["-Path", "-NewName"]),
    ("type", &["-Path"]),
    ("more", &["-Path"]),
    ("find", &["-Pattern", "-Path"]),
    ("findstr", &["-Pattern", "-Path"]),
    ("ping", &["-ComputerName"]),
    ("tracert", &["-ComputerName"]),
    ("nslookup", &["-Name"]),
    ("start", &["-FilePath"]),
    ("where", &["-Name"]),
    ("fc", &["-ReferenceObject", "-DifferenceObject"]),
    ("comp", &["-ReferenceObject", "-DifferenceObject"]),
];

/// Cmdlets that only appear inside complex patterns or aliases, so they are not
/// reachable through the derived reverse index.
pub(crate) static REVERSE_FALLBACKS: &[(&str, &str)] = &[
    ("get-location", "cd"),
    ("write-output", "echo"),
    ("get-netipaddress", "ipconfig"),
    ("test-netconnection", "ping"),
    ("stop-service", "net stop"),
    ("start-service", "net start"),
    ("get-localuser", "net user"),
    ("clear-dnsclientcache", "ipconfig /flushdns"),
    ("set-itemproperty", "attrib"),
];

pub(crate) const CMD_DOCS_BASE: &str =
    "https://learn.microsoft.com/en-us/windows-server/administration/windows-commands/";

pub(crate) const POWERSHELL_DOCS_BASE: &str = "https://learn.microsoft.com/en-us/powershell/module/";

/// CMD commands with a page under `CMD_DOCS_BASE`.
pub(crate) static CMD_DOCS: &[&str] = &[
    "dir", "cd", "copy", "xcopy", "del", "md", "rd", "move", "ren", "type", "find", "findstr",
    "tasklist", "taskkill", "ping", "ipconfig", "netstat", "tracert", "systeminfo", "whoami",
    "hostname", "ver", "date", "time", "echo", "cls", "attrib", "cacls", "icacls", "tree",
    "nslookup", "sort", "fc", "comp", "start", "timeout", "shutdown", "where", "pushd", "popd",
    "clip", "set", "path", "sc", "net", "more", "erase", "rename", "rmdir", "mkdir", "chdir",
];

/// Cmdlet -> module path under `POWERSHELL_DOCS_BASE`.
pub(crate) static POWERSHELL_DOCS: &[(&str, &str)] = &[
    ("Get-ChildItem", "microsoft.powershell.management/get-childitem"),
    ("Set-Location", "microsoft.powershell.management/set-location"),
    ("Get-Location", "microsoft.powershell.management/get-location"),
    ("Push-Location", "microsoft.powershell.management/push-location"),
    ("Pop-Location", "microsoft.powershell.management/pop-location"),
    ("New-Item", "microsoft.powershell.management/new-item"),
    ("Remove-Item", "microsoft.powershell.management/remove-item"),
    ("Copy-Item", "microsoft.powershell.management/copy-item"),
    ("Move-Item", "microsoft.powershell.management/move-item"),
    ("Rename-Item", "microsoft.powershell.management/rename-item"),
    ("Get-Content", "microsoft.powershell.management/get-content"),
    ("Get-ItemProperty", "microsoft.powershell.management/get-itemproperty"),
    ("Set-ItemProperty", "microsoft.powershell.management/set-itemproperty"),
    ("Set-Clipboard", "microsoft.powershell.management/set-clipboard"),
    ("Select-String", "microsoft.powershell.utility/select-string"),
    ("Sort-Object", "microsoft.powershell.utility/sort-object"),
    ("Compare-Object", "microsoft.powershell.utility/compare-object"),
    ("Get-Process", "microsoft.powershell.management/get-process"),
    ("Stop-Process", "microsoft.powershell.management/stop-process"),
    ("Start-Process", "microsoft.powershell.management/start-process"),
    ("Get-Service", "microsoft.powershell.management/get-service"),
    ("Start-Service", "microsoft.powershell.management/start-service"),
    ("Stop-Service", "microsoft.powershell.management/stop-service"),
    ("Stop-Computer", "microsoft.powershell.management/stop-computer"),
    ("Get-ComputerInfo", "microsoft.powershell.management/get-computerinfo"),
    ("Test-Connection", "microsoft.powershell.management/test-connection"),
    ("Test-NetConnection", "nettcpip/test-netconnection"),
    ("Get-NetIPConfiguration", "nettcpip/get-netipconfiguration"),
    ("Get-NetTCPConnection", "nettcpip/get-nettcpconnection"),
    ("Resolve-DnsName", "dnsclient/resolve-dnsname"),
    ("Clear-DnsClientCache", "dnsclient/clear-dnsclientcache"),
    ("Get-Date", "microsoft.powershell.utility/get-date"),
    ("Get-Host", "microsoft.powershell.utility/get-host"),
    ("Write-Host", "microsoft.powershell.utility/write-host"),
    ("Write-Output", "microsoft.powershell.utility/write-output"),
    ("Start-Sleep", "microsoft.powershell.utility/start-sleep"),
    ("Clear-Host", "microsoft.powershell.core/clear-host"),
    ("Get-Command", "microsoft.powershell.core/get-command"),
    ("Get-Acl", "microsoft.powershell.security/get-acl"),
    ("Get-LocalUser", "microsoft.powershell.localaccounts/get-localuser"),
];

/// Short descriptions for the most common CMD commands.
pub(crate) static DESCRIPTIONS: &[(&str, &str)] = &[
    ("dir", "Displays a list of files and subdirectories in a directory"),
    ("cd", "Changes the current directory or displays the current directory name"),
    ("copy", "Copies one or more files to another location"),
    ("xcopy", "Copies files and directories, including subdirectories"),
    ("del", "Deletes one or more files"),
    ("md", "Creates a directory or subdirectory"),
    ("rd", "Deletes a directory"),
    ("move", "Moves one or more files from one directory to another"),
    ("ren", "Renames files or directories"),
    ("type", "Displays the contents of a text file"),
    ("find", "Searches for a text string in a file or files"),
    ("findstr", "Searches for patterns of text in files"),
    ("ping", "Tests network connectivity to a host"),
    ("ipconfig", "Displays network configuration information"),
    ("tasklist", "Displays currently running processes"),
    ("taskkill", "Ends one or more tasks or processes"),
    ("systeminfo", "Displays detailed system configuration information"),
    ("cls", "Clears the screen"),
    ("echo", "Displays messages"),
];

/// (cmd, powershell, description) pairs shown by an embedding UI.
pub(crate) static EXAMPLES: &[(&str, &str, &str)] = &[
    ("dir", "Get-ChildItem", "List the current directory"),
    ("dir /s *.txt", "Get-ChildItem -Recurse -Filter \"*.txt\"", "Find .txt files recursively"),
    ("cd C:\\Windows", "Set-Location -Path \"C:\\Windows\"", "Change to the Windows directory"),
    ("md newfolder", "New-Item -ItemType Directory -Path \"newfolder\"", "Create a folder"),
    (
        "copy file.txt backup.txt",
        "Copy-Item -Path \"file.txt\" -Destination \"backup.txt\"",
        "Copy a file",
    ),
    ("del *.tmp", "Remove-Item -Path \"*.tmp\"", "Delete temporary files"),
    ("type config.txt", "Get-Content -Path \"config.txt\"", "Show file contents"),
    ("cls", "Clear-Host", "Clear the screen"),
    ("tasklist", "Get-Process", "List running processes"),
    ("ipconfig", "Get-NetIPConfiguration", "Show network configuration"),
    ("ping google.com", "Test-Connection -ComputerName \"google.com\"", "Test connectivity"),
    (
        "find \"error\" log.txt",
        "Select-String -Pattern \"error\" -Path \"log.txt\"",
        "Search text in a file",
    ),
];
