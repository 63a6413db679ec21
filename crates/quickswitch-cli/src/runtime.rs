// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use quickswitch_app::model::{ClosedEntry, TabEntry};
use quickswitch_app::nav::HostCommand;
use quickswitch_tui::PopupRuntime;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// The browser's side of the conversation, exported as a JSON file by the
/// companion extension: open tabs plus the recently-closed list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub tabs: Vec<TabEntry>,
    #[serde(default)]
    pub recently_closed: Vec<ClosedEntry>,
}

/// Runtime over a session file. URLs open through the platform opener
/// right away; every command is recorded, and `replay_lines` picks the
/// ones the extension side still has to deliver when the popup exits.
#[derive(Debug)]
pub struct SnapshotRuntime {
    session: SessionSnapshot,
    executed: Vec<HostCommand>,
    spawn_opener: bool,
}

impl SnapshotRuntime {
    pub fn new(session: SessionSnapshot, spawn_opener: bool) -> Self {
        Self {
            session,
            executed: Vec::new(),
            spawn_opener,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read session file {}", path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("parse session file {}", path.display()))?;
        Ok(Self::new(session, true))
    }

    pub fn demo() -> Self {
        let tab = |id, title: &str, url: &str| TabEntry {
            id,
            window_id: 1,
            title: title.to_owned(),
            url: url.to_owned(),
            audible: false,
            active: false,
        };
        let session = SessionSnapshot {
            tabs: vec![
                tab(1, "The Rust Programming Language", "https://doc.rust-lang.org/book/"),
                tab(2, "ratatui docs", "https://docs.rs/ratatui/"),
                tab(3, "NRK", "https://www.nrk.no/"),
                tab(4, "Open-Meteo", "https://open-meteo.com/"),
            ],
            recently_closed: vec![ClosedEntry {
                session_index: 0,
                title: "Frankfurter API".to_owned(),
                url: "https://frankfurter.dev/".to_owned(),
            }],
        };
        Self::new(session, false)
    }

    pub fn executed(&self) -> &[HostCommand] {
        &self.executed
    }

    pub fn opens_urls_directly(&self) -> bool {
        self.spawn_opener
    }
}

impl PopupRuntime for SnapshotRuntime {
    fn load_tabs(&mut self) -> Result<Vec<TabEntry>> {
        Ok(self.session.tabs.clone())
    }

    fn load_recently_closed(&mut self) -> Result<Vec<ClosedEntry>> {
        Ok(self.session.recently_closed.clone())
    }

    fn execute(&mut self, command: &HostCommand) -> Result<()> {
        if self.spawn_opener {
            if let HostCommand::OpenUrl(url) = command {
                open_in_browser(url)?;
            }
        }
        self.executed.push(command.clone());
        Ok(())
    }
}

fn open_in_browser(url: &str) -> Result<()> {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    Command::new(program)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {program} for {url}"))?;
    Ok(())
}

/// JSON lines for the extension side to replay. URLs that already went
/// through the platform opener are excluded, so one commit is delivered
/// exactly once.
pub fn replay_lines(commands: &[HostCommand], urls_already_opened: bool) -> Vec<String> {
    commands
        .iter()
        .filter(|command| !(urls_already_opened && matches!(command, HostCommand::OpenUrl(_))))
        .map(command_line)
        .collect()
}

/// One command as a JSON line for the extension side.
pub fn command_line(command: &HostCommand) -> String {
    let value = match command {
        HostCommand::SwitchToTab(tab_id) => {
            serde_json::json!({ "command": "switch_to_tab", "tab_id": tab_id })
        }
        HostCommand::RestoreClosed(session_index) => {
            serde_json::json!({ "command": "restore_closed", "session_index": session_index })
        }
        HostCommand::CloseTab(tab_id) => {
            serde_json::json!({ "command": "close_tab", "tab_id": tab_id })
        }
        HostCommand::OpenUrl(url) => {
            serde_json::json!({ "command": "open_url", "url": url })
        }
    };
    value.to_string()
}
