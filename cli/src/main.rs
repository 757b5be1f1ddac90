// Chorus CLI - Command Line Interface Entry Point

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chorus_config::{Config, ConfigLoader};
use chorus_core::assist::{ASSIST_TASKS, run_assist};
use chorus_core::translate::LANGUAGES;
use chorus_core::{
    GraphAnalyzer, MindsetPreset, Orchestrator, Session, Translator, TurnEvent, TurnReply,
    endpoints_from_config,
};
use chorus_model_provider::catalog::lookup;
use chorus_model_provider::{MODEL_GROUPS, is_usable_key};
use chorus_state::{CREDENTIAL_SLOTS, NO_TEMPLATE, StateStore, default_data_dir};

/// Chorus - ask several chat models the same question, one after another
#[derive(Parser, Debug)]
#[command(name = "chorus")]
#[command(version, about, long_about = None)]
struct TopCli {
    #[clap(flatten)]
    config_overrides: CliConfigOverrides,

    #[clap(subcommand)]
    command: Option<Commands>,

    /// Models for interactive mode, in dispatch order
    #[arg(short = 'm', long = "model")]
    models: Vec<String>,
}

/// CLI configuration overrides
#[derive(Debug, clap::Args)]
struct CliConfigOverrides {
    /// Configuration override in key=value format
    #[arg(short = 'c', long = "config", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,
}

impl CliConfigOverrides {
    fn parse_pairs(&self) -> Result<Vec<(String, String)>> {
        self.overrides
            .iter()
            .map(|raw| {
                let Some((key, value)) = raw.split_once('=') else {
                    bail!("Invalid override '{}', expected KEY=VALUE", raw);
                };
                Ok((key.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Send one prompt to the selected models
    Chat {
        /// Model label, repeat for several; replies arrive in this order
        #[arg(short = 'm', long = "model", required = true)]
        models: Vec<String>,

        /// Image to attach
        #[arg(short = 'i', long = "image")]
        images: Vec<PathBuf>,

        /// Do not read or write the memory log for this turn
        #[arg(long)]
        no_remember: bool,

        /// Blueprint to apply, repeatable; defaults to the active one
        #[arg(short = 'b', long = "blueprint")]
        blueprints: Vec<String>,

        /// Prompt text
        prompt: Vec<String>,
    },

    /// Resend the last remembered prompt
    Regen {
        /// Models to ask; defaults to the models of the last prompt
        #[arg(short = 'm', long = "model")]
        models: Vec<String>,
    },

    /// Inspect or clear the memory log
    Memory {
        #[command(subcommand)]
        memory_command: MemoryCommands,
    },

    /// Manage blueprints
    Blueprint {
        #[command(subcommand)]
        blueprint_command: BlueprintCommands,
    },

    /// Manage API keys
    Keys {
        #[command(subcommand)]
        keys_command: KeysCommands,
    },

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        prefs_command: PrefsCommands,
    },

    /// List available models
    Models,

    /// Translate text
    Translate {
        /// Source language name, or "auto"
        #[arg(short = 'f', long = "from", default_value = "auto")]
        from: String,

        /// Target language name
        #[arg(short = 't', long = "to", default_value = "english")]
        to: String,

        /// Text to translate
        text: Vec<String>,
    },

    /// Run a business assist task
    Assist {
        /// Task preset name
        #[arg(short = 't', long = "task", default_value = "Summarize Text")]
        task: String,

        /// Input text
        input: Vec<String>,
    },

    /// Ask Gemini for equations that draw the subject of an image
    Graph {
        /// Image file
        image: PathBuf,
    },
}

/// Memory log commands
#[derive(Debug, Subcommand)]
enum MemoryCommands {
    /// List recent entries
    List {
        #[arg(short = 'n', long = "count", default_value_t = 100)]
        count: usize,
    },

    /// Delete every entry
    Clear,

    /// Show a remembered prompt by timestamp
    Load { timestamp: String },
}

/// Blueprint commands
#[derive(Debug, Subcommand)]
enum BlueprintCommands {
    /// List blueprints
    List,

    /// Create an empty blueprint
    Create { name: String },

    /// Set a blueprint's text
    Save {
        name: String,

        /// Instruction text
        text: Vec<String>,
    },

    /// Delete a blueprint
    Delete { name: String },

    /// Make a blueprint the default for chat
    Activate { name: String },
}

/// Key commands
#[derive(Debug, Subcommand)]
enum KeysCommands {
    /// Save a key for a provider slot
    Set { slot: String, key: String },

    /// Show saved keys, masked
    Show,
}

/// Preference commands
#[derive(Debug, Subcommand)]
enum PrefsCommands {
    /// Show preferences
    Show,

    /// Set a preference
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they stay out of revealed replies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = TopCli::parse();

    let mut loader = ConfigLoader::new();
    if let Ok(cwd) = std::env::current_dir() {
        loader = loader.with_project_dir(cwd);
    }
    let config = loader.load_with_cli_overrides(cli.config_overrides.parse_pairs()?)?;

    let app = App::new(config);
    info!("Chorus data directory: {}", app.data_dir.display());

    match cli.command {
        Some(Commands::Chat {
            models,
            images,
            no_remember,
            blueprints,
            prompt,
        }) => {
            let mut session = app.session()?;
            run_chat(
                &app,
                &mut session,
                ChatInput {
                    models,
                    images,
                    blueprints,
                    prompt: prompt.join(" "),
                },
                no_remember,
            )
            .await?;
        }
        Some(Commands::Regen { models }) => {
            let mut session = app.session()?;
            run_regen(&app, &mut session, models).await?;
        }
        Some(Commands::Memory { memory_command }) => {
            handle_memory_command(&app, memory_command)?;
        }
        Some(Commands::Blueprint { blueprint_command }) => {
            handle_blueprint_command(&app, blueprint_command)?;
        }
        Some(Commands::Keys { keys_command }) => {
            handle_keys_command(&app, keys_command)?;
        }
        Some(Commands::Prefs { prefs_command }) => {
            handle_prefs_command(&app, prefs_command)?;
        }
        Some(Commands::Models) => {
            list_models();
        }
        Some(Commands::Translate { from, to, text }) => {
            let translator = Translator::new(app.config.network.translate_timeout_secs);
            let translated = translator.translate(&text.join(" "), &from, &to).await?;
            println!("{}", translated);
        }
        Some(Commands::Assist { task, input }) => {
            let session = app.session()?;
            let reply = run_assist(
                app.orchestrator.registry(),
                &session.credential_resolver(),
                &task,
                &input.join(" "),
            )
            .await?;
            println!("{}", reply);
        }
        Some(Commands::Graph { image }) => {
            let session = app.session()?;
            let analyzer = GraphAnalyzer::new(endpoints_from_config(&app.config));
            let equations = analyzer
                .analyze(&session.credential_resolver(), image)
                .await?;
            println!("{}", equations);
        }
        None => {
            let mut session = app.session()?;
            run_repl(&app, &mut session, cli.models).await?;
        }
    }

    Ok(())
}

/// Loaded configuration plus what every command needs from it
struct App {
    config: Config,
    data_dir: PathBuf,
    orchestrator: Orchestrator,
}

impl App {
    fn new(config: Config) -> Self {
        let data_dir = config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(default_data_dir);
        let orchestrator = Orchestrator::from_config(&config);
        Self {
            config,
            data_dir,
            orchestrator,
        }
    }

    fn store(&self) -> Result<StateStore> {
        StateStore::open(&self.data_dir, self.config.dispatch.memory_capacity)
            .with_context(|| format!("Failed to open state in {}", self.data_dir.display()))
    }

    fn session(&self) -> Result<Session> {
        Ok(Session::new(
            self.store()?,
            self.config.dispatch.max_attachments,
        ))
    }

    fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.config.dispatch.reveal_interval_ms)
    }
}

struct ChatInput {
    models: Vec<String>,
    images: Vec<PathBuf>,
    blueprints: Vec<String>,
    prompt: String,
}

/// One chat turn
async fn run_chat(
    app: &App,
    session: &mut Session,
    input: ChatInput,
    no_remember: bool,
) -> Result<()> {
    session.select_models(input.models);

    if input.blueprints.is_empty() {
        let active = session.state.preferences.get().active_template.clone();
        session.set_active_blueprints([active]);
    } else {
        session.set_active_blueprints(input.blueprints);
    }

    if !input.images.is_empty() {
        let outcome = session.attach_images(input.images)?;
        if outcome.truncated {
            eprintln!(
                "Only {} images can be attached; the rest were skipped.",
                session.max_attachments()
            );
        }
    }

    if no_remember {
        session.set_remember(false);
    }

    let orchestrator = &app.orchestrator;
    let prompt = input.prompt.as_str();
    let turn_session = &mut *session;
    let result = dispatch_with_renderer(app, |tx| async move {
        orchestrator.send(turn_session, prompt, &tx).await
    })
    .await;
    result.map(|_| ())
}

/// Resend the last remembered prompt
async fn run_regen(app: &App, session: &mut Session, models: Vec<String>) -> Result<()> {
    if models.is_empty() {
        let last = session
            .state
            .memory
            .regenerate_source()
            .map(|p| p.model_list.clone())
            .unwrap_or_default();
        session.select_models(last);
    } else {
        session.select_models(models);
    }

    let orchestrator = &app.orchestrator;
    dispatch_with_renderer(app, |tx| async move {
        orchestrator.regenerate(session, &tx).await
    })
    .await
    .map(|_| ())
}

/// Run a turn while a renderer task reveals replies as they arrive.
async fn dispatch_with_renderer<F, Fut>(app: &App, turn: F) -> Result<Vec<TurnReply>>
where
    F: FnOnce(mpsc::UnboundedSender<TurnEvent>) -> Fut,
    Fut: std::future::Future<Output = chorus_core::Result<Vec<TurnReply>>>,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(render_events(rx, app.reveal_interval()));

    let replies = turn(tx).await;

    // The turn future owned the sender; the renderer drains and exits.
    renderer.await??;
    Ok(replies?)
}

/// Print turn events, revealing each reply word by word.
async fn render_events(
    mut rx: mpsc::UnboundedReceiver<TurnEvent>,
    interval: Duration,
) -> Result<()> {
    let mut stdout = std::io::stdout();

    while let Some(event) = rx.recv().await {
        match event {
            TurnEvent::Started {
                display_prompt,
                image_count,
                queue_len,
                regenerated,
            } => {
                let label = if regenerated { "Regenerating" } else { "You" };
                println!("{}: {}", label, display_prompt);
                if image_count > 0 {
                    println!("  ({} image(s) attached)", image_count);
                }
                info!("Dispatching to {} model(s)", queue_len);
            }
            TurnEvent::Querying { model } => {
                info!("Querying {}", model);
            }
            TurnEvent::Reply { model, reveal, .. } => {
                println!();
                println!("[{}]", model);
                let mut words = std::pin::pin!(reveal.paced(interval));
                let mut first = true;
                while let Some(word) = words.next().await {
                    if !first {
                        write!(stdout, " ")?;
                    }
                    write!(stdout, "{}", word)?;
                    stdout.flush()?;
                    first = false;
                }
                writeln!(stdout)?;
            }
            TurnEvent::Finished { replies } => {
                println!();
                info!("Turn finished with {} reply(ies)", replies.len());
            }
        }
    }

    Ok(())
}

/// Handle memory commands
fn handle_memory_command(app: &App, cmd: MemoryCommands) -> Result<()> {
    let mut store = app.store()?;
    match cmd {
        MemoryCommands::List { count } => {
            let rows = store.memory.recent_summaries(count);
            if rows.is_empty() {
                println!("Memory is empty.");
            }
            for row in rows {
                println!("{}  {:<24} {}", row.timestamp, row.speaker, row.preview);
            }
        }
        MemoryCommands::Clear => {
            store.memory.clear()?;
            println!("Memory cleared.");
        }
        MemoryCommands::Load { timestamp } => {
            let Some(prompt) = store.memory.find_user_prompt(&timestamp) else {
                bail!("No prompt found at {}", timestamp);
            };
            println!("{}", prompt.display_prompt);
            for path in &prompt.image_paths {
                println!("  image: {}", path.display());
            }
            if !prompt.model_list.is_empty() {
                println!("  models: {}", prompt.model_list.join(", "));
            }
        }
    }
    Ok(())
}

/// Handle blueprint commands
fn handle_blueprint_command(app: &App, cmd: BlueprintCommands) -> Result<()> {
    let mut store = app.store()?;
    match cmd {
        BlueprintCommands::List => {
            let active = store.preferences.get().active_template.clone();
            for name in store.blueprints.names() {
                let marker = if name == active { "*" } else { " " };
                println!("{} {}", marker, name);
            }
        }
        BlueprintCommands::Create { name } => {
            store.blueprints.create(&name)?;
            println!("Created blueprint: {}", name.trim());
        }
        BlueprintCommands::Save { name, text } => {
            store.blueprints.save(&name, &text.join(" "))?;
            println!("Saved blueprint: {}", name.trim());
        }
        BlueprintCommands::Delete { name } => {
            store.delete_blueprint(&name)?;
            println!("Deleted blueprint: {}", name);
        }
        BlueprintCommands::Activate { name } => {
            store.set_active_blueprint(&name)?;
            if name == NO_TEMPLATE {
                println!("No blueprint active.");
            } else {
                println!("Active blueprint: {}", name);
            }
        }
    }
    Ok(())
}

/// Handle key commands
fn handle_keys_command(app: &App, cmd: KeysCommands) -> Result<()> {
    let mut store = app.store()?;
    match cmd {
        KeysCommands::Set { slot, key } => {
            if !CREDENTIAL_SLOTS.contains(&slot.as_str()) {
                bail!(
                    "Unknown key slot '{}'. Expected one of: {}",
                    slot,
                    CREDENTIAL_SLOTS.join(", ")
                );
            }
            store.credentials.set(&slot, &key)?;
            println!("Saved {} key.", slot);
        }
        KeysCommands::Show => {
            for slot in CREDENTIAL_SLOTS {
                let key = store.credentials.get(slot).unwrap_or_default();
                println!("{:<14} {}", slot, mask_key(key));
            }
        }
    }
    Ok(())
}

/// Short, non-reversible rendering of a stored key
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    if !is_usable_key(key) {
        return "(placeholder)".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Handle preference commands
fn handle_prefs_command(app: &App, cmd: PrefsCommands) -> Result<()> {
    let mut store = app.store()?;
    match cmd {
        PrefsCommands::Show => {
            println!("{}", serde_json::to_string_pretty(store.preferences.get())?);
        }
        PrefsCommands::Set { key, value } => {
            let value = if key == "ai_mindset_preset" {
                let preset: MindsetPreset = value.parse().map_err(anyhow::Error::msg)?;
                preset.to_string()
            } else {
                value
            };
            store.preferences.set(&key, &value)?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

/// List available models
fn list_models() {
    println!("Available models:");
    for group in MODEL_GROUPS {
        println!();
        println!("  {}:", group.name);
        for label in group.labels {
            let wire = lookup(label).map_or("", |e| e.wire_model);
            println!("    {:<28} {}", label, wire);
        }
    }
    println!();
    println!("Any other label gets a local echo reply.");
    println!();
    println!("Assist tasks:");
    for (name, _) in ASSIST_TASKS {
        println!("  {}", name);
    }
    println!();
    println!(
        "Translate languages: {}",
        LANGUAGES
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// Simple REPL
async fn run_repl(app: &App, session: &mut Session, models: Vec<String>) -> Result<()> {
    session.select_models(models);
    let active = session.state.preferences.get().active_template.clone();
    session.set_active_blueprints([active]);

    println!("Chorus Interactive Mode");
    println!("Type '/help' for commands, '/exit' to quit");
    println!();

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("chorus> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match command {
            "/exit" | "/quit" => {
                println!("Goodbye!");
                break;
            }
            "/help" => {
                println!("Commands:");
                println!("  /models a, b   - Select models, in order");
                println!("  /image <path>  - Attach an image to the next prompt");
                println!("  /clear-images  - Drop pending images");
                println!("  /regen         - Resend the last remembered prompt");
                println!("  /exit          - Exit Chorus");
                println!();
                println!("Or type any message to send it to the selected models.");
            }
            "/models" => {
                session.select_models(rest.split(',').map(str::trim));
                println!("Selected: {}", session.selected_models().join(", "));
            }
            "/image" => match session.attach_images([PathBuf::from(rest)]) {
                Ok(_) => println!("{} image(s) pending", session.attachments().len()),
                Err(e) => eprintln!("{}", e),
            },
            "/clear-images" => {
                session.clear_images();
                println!("Images cleared.");
            }
            "/regen" => {
                let turn_session = &mut *session;
                let result = dispatch_with_renderer(app, |tx| async move {
                    app.orchestrator.regenerate(turn_session, &tx).await
                })
                .await;
                if let Err(e) = result {
                    eprintln!("{}", e);
                }
            }
            _ => {
                let turn_session = &mut *session;
                let result = dispatch_with_renderer(app, |tx| async move {
                    app.orchestrator.send(turn_session, line, &tx).await
                })
                .await;
                if let Err(e) = result {
                    eprintln!("{}", e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_split_on_first_equals() {
        let overrides = CliConfigOverrides {
            overrides: vec![
                "dispatch.history_limit=4".to_string(),
                "providers.openai.base_url=http://localhost:9000/v1?a=b".to_string(),
            ],
        };
        assert_eq!(
            overrides.parse_pairs().unwrap(),
            vec![
                ("dispatch.history_limit".to_string(), "4".to_string()),
                (
                    "providers.openai.base_url".to_string(),
                    "http://localhost:9000/v1?a=b".to_string()
                ),
            ]
        );

        let bad = CliConfigOverrides {
            overrides: vec!["no-equals".to_string()],
        };
        assert!(bad.parse_pairs().is_err());
    }

    #[test]
    fn keys_are_masked() {
        assert_eq!(mask_key(""), "(not set)");
        assert_eq!(mask_key("sk-your-default-openai-key"), "(placeholder)");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("sk-abcdefghijkl"), "sk-a...ijkl");
    }

    #[test]
    fn chat_accepts_repeated_models() {
        let cli = TopCli::parse_from([
            "chorus", "chat", "-m", "Grok 3", "-m", "Local Echo", "--no-remember", "hello", "there",
        ]);
        match cli.command {
            Some(Commands::Chat {
                models,
                no_remember,
                prompt,
                ..
            }) => {
                assert_eq!(models, vec!["Grok 3", "Local Echo"]);
                assert!(no_remember);
                assert_eq!(prompt.join(" "), "hello there");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn graph_takes_an_image_path() {
        let cli = TopCli::parse_from(["chorus", "graph", "sketch.png"]);
        match cli.command {
            Some(Commands::Graph { image }) => assert_eq!(image, PathBuf::from("sketch.png")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
