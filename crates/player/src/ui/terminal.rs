//! Terminal front-end
//!
//! A line-based REPL over the session store. Game text goes to stdout;
//! tracing output goes to stderr (see `main.rs`).

use anyhow::Result;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use textquest_protocol::Difficulty;

use crate::application::dto::{LogEntry, LogKind, SessionData};
use crate::ports::outbound::ConfirmationPort;
use crate::state::{PersistedSettings, SessionStore, StoreEvent, StoreSnapshot, Toast, ToastKind};
use crate::ui::commands::{ClientCommand, ParseError, VolumeChannel, HELP_TEXT};

/// Shared stdin reader. Also answers confirmation prompts, so the store can
/// ask "Drop Sword?" in the middle of a command.
#[derive(Clone)]
pub struct TerminalInput {
    lines: Arc<tokio::sync::Mutex<Lines<BufReader<Stdin>>>>,
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(tokio::sync::Mutex::new(
                BufReader::new(tokio::io::stdin()).lines(),
            )),
        }
    }

    /// Next line, or `None` once stdin is closed
    pub async fn read_line(&self) -> Option<String> {
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }

    pub async fn prompt(&self, text: &str) -> Option<String> {
        print!("{text}");
        flush();
        self.read_line().await
    }
}

#[async_trait::async_trait]
impl ConfirmationPort for TerminalInput {
    async fn confirm(&self, prompt: &str) -> bool {
        let answer = self.prompt(&format!("{prompt} [y/N] ")).await;
        is_yes(answer.as_deref().unwrap_or_default())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn flush() {
    if let Err(e) = std::io::stdout().flush() {
        tracing::debug!(error = %e, "Failed to flush stdout");
    }
}

/// Prints whatever changed since the last render
struct Renderer {
    last_entry_id: u64,
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl Renderer {
    fn new(store: &SessionStore) -> Self {
        let toasts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&toasts);
        store.subscribe(move |event| {
            if let StoreEvent::Toast(toast) = event {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(toast.clone());
            }
        });
        Self {
            last_entry_id: 0,
            toasts,
        }
    }

    async fn render(&mut self, store: &SessionStore) {
        let snapshot = store.snapshot();
        let entries: Vec<LogEntry> = snapshot
            .session
            .log
            .since(self.last_entry_id)
            .cloned()
            .collect();

        for entry in &entries {
            self.last_entry_id = entry.id;
            print_entry(entry, snapshot.settings.animation_speed).await;
        }

        if let Some(cue) = store.take_sound_cue() {
            println!("  [sound: {cue}]");
        }

        let toasts: Vec<Toast> = std::mem::take(
            &mut *self
                .toasts
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for toast in toasts {
            // Messages already shown as a log line are not repeated.
            if entries.iter().any(|entry| entry.text == toast.message) {
                continue;
            }
            let marker = match toast.kind {
                ToastKind::Success => "+",
                ToastKind::Error => "!",
                ToastKind::Info => "*",
            };
            println!("  {marker} {}", toast.message);
        }

        if !entries.is_empty() {
            print_status(&snapshot.session);
        }
        flush();
    }
}

async fn print_entry(entry: &LogEntry, animation_speed: u32) {
    match entry.kind {
        LogKind::Player => println!("> {}", entry.text),
        LogKind::System => println!("-- {} --", entry.text),
        LogKind::Error => println!("!! {}", entry.text),
        LogKind::Narration => {
            typewrite(&entry.text, animation_speed).await;
            println!();
        }
    }
}

/// Reveal text at `cps` characters per second; 0 prints it at once.
async fn typewrite(text: &str, cps: u32) {
    if cps == 0 {
        print!("{text}");
        return;
    }
    let delay = Duration::from_secs_f64(1.0 / f64::from(cps));
    for ch in text.chars() {
        print!("{ch}");
        flush();
        tokio::time::sleep(delay).await;
    }
}

fn print_status(session: &SessionData) {
    let Some(stats) = session.stats else {
        return;
    };
    let mut line = String::new();
    if let Some(title) = &session.room_title {
        line.push_str(&format!("[{title}] "));
    }
    line.push_str(&format!(
        "HP {}/{} | Gold {}",
        stats.current_health, stats.max_health, stats.gold
    ));
    if let Some(level) = stats.level {
        line.push_str(&format!(" | Lv {level}"));
    }
    if let (Some(xp), Some(max_xp)) = (stats.experience, stats.max_experience) {
        line.push_str(&format!(" (XP {xp}/{max_xp})"));
    }
    println!("{line}");
    if let Some(suggestions) = session.suggested_actions.as_ref().filter(|s| !s.is_empty()) {
        println!("Try: {}", suggestions.join(", "));
    }
}

fn print_inventory(snapshot: &StoreSnapshot) {
    let inventory = &snapshot.session.inventory;
    if inventory.is_empty() {
        println!("Your pack is empty.");
        return;
    }
    println!("Inventory:");
    for item in inventory.iter() {
        let mut actions = Vec::new();
        if item.can_use.unwrap_or(false) {
            actions.push("use");
        }
        if item.can_equip.unwrap_or(false) {
            actions.push("equip");
        }
        if item.can_drop.unwrap_or(true) {
            actions.push("drop");
        }
        println!(
            "  {} x{} ({}) [{}] {}",
            item.name,
            item.quantity,
            item.rarity.display_name(),
            item.id,
            actions.join("/")
        );
        if !item.description.is_empty() {
            println!("      {}", item.description);
        }
    }
}

fn print_settings(settings: &PersistedSettings) {
    let speed = match settings.animation_speed {
        0 => "instant".to_string(),
        cps => format!("{cps} chars/s"),
    };
    println!("Settings:");
    println!("  narration speed: {speed}");
    println!("  master volume:   {}", settings.master_volume);
    println!(
        "  effects volume:  {} (effective {})",
        settings.effects_volume,
        settings.effective_effects_volume()
    );
}

async fn start_new_game(store: &SessionStore, input: &TerminalInput) -> Option<bool> {
    let name = input.prompt("What is your name? ").await?;
    let difficulty = input
        .prompt("Difficulty (easy/medium/hard) [medium]: ")
        .await?;
    let difficulty = difficulty.parse::<Difficulty>().unwrap_or_else(|e| {
        println!("{e}; playing on medium.");
        Difficulty::Medium
    });
    let name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
    Some(store.start_game(name, difficulty).await)
}

/// Run the REPL until `/quit` or end of input.
pub async fn run(store: Arc<SessionStore>, input: TerminalInput) -> Result<()> {
    let mut renderer = Renderer::new(&store);

    println!("textquest - type /help for commands");
    let resumed = store.resume_session().await;
    if !resumed
        && !store.snapshot().session.is_active()
        && start_new_game(&store, &input).await.is_none()
    {
        return Ok(());
    }
    renderer.render(&store).await;

    loop {
        let Some(line) = input.prompt("> ").await else {
            break;
        };

        let command = match ClientCommand::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            ClientCommand::Game(text) => store.send_command(&text).await,
            ClientCommand::Inventory => {
                if store.toggle_inventory_view(None) {
                    print_inventory(&store.snapshot());
                }
            }
            ClientCommand::Use(id) => {
                store.use_item(&id).await;
            }
            ClientCommand::Equip(id) => {
                store.equip_item(&id).await;
            }
            ClientCommand::Drop(id) => {
                store.drop_item(&id).await;
            }
            ClientCommand::Settings => {
                if store.toggle_settings_view(None) {
                    print_settings(&store.snapshot().settings);
                }
            }
            ClientCommand::Speed(cps) => {
                let applied = store.set_animation_speed(cps);
                println!("Narration speed set to {applied}.");
            }
            ClientCommand::Volume(VolumeChannel::Master, level) => {
                let applied = store.set_master_volume(level);
                println!("Master volume set to {applied}.");
            }
            ClientCommand::Volume(VolumeChannel::Effects, level) => {
                let applied = store.set_effects_volume(level);
                println!("Effects volume set to {applied}.");
            }
            ClientCommand::NewGame => {
                store.reset_session();
                renderer.render(&store).await;
                if start_new_game(&store, &input).await.is_none() {
                    break;
                }
            }
            ClientCommand::Refresh => {
                store.refresh_state().await;
            }
            ClientCommand::Help => println!("{HELP_TEXT}"),
            ClientCommand::Quit => break,
        }

        renderer.render(&store).await;
    }

    println!("Farewell, adventurer.");
    Ok(())
}
