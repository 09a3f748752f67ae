// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command catalog: named command keys to platform shell commands.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// `(key, linux, macos, windows)`
const CATALOG: &[(&str, &str, &str, &str)] = &[
    ("open_calculator", "gnome-calculator", "open -a Calculator", "calc"),
    (
        "open_browser",
        "xdg-open https://duckduckgo.com",
        "open https://duckduckgo.com",
        "start https://duckduckgo.com",
    ),
    ("open_text_editor", "gedit", "open -a TextEdit", "notepad"),
    (
        "take_screenshot",
        "gnome-screenshot -f screenshot.png",
        "screencapture -x screenshot.png",
        "snippingtool",
    ),
    ("list_files", "ls -la", "ls -la", "dir"),
    ("show_directory", "pwd", "pwd", "cd"),
    ("system_info", "uname -a", "uname -a", "systeminfo"),
];

#[derive(Debug, Clone, Copy)]
pub struct CommandCatalog {
    platform: Platform,
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl CommandCatalog {
    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }

    /// Shell command for `key` on this catalog's platform.
    pub fn resolve(&self, key: &str) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|(k, ..)| *k == key)
            .map(|(_, linux, macos, windows)| match self.platform {
                Platform::Linux => *linux,
                Platform::MacOs => *macos,
                Platform::Windows => *windows,
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|(k, ..)| *k)
    }
}
