//! Omni - persona-driven chat client
//!
//! Chats with a model through one of several personas, renders replies with
//! a safe markdown subset, and keeps a bounded history plus memory notes on
//! disk.

use clap::{Parser, Subcommand, Args};
use omni::{ChatModel, ChatSession, Config, EchoModel, PersonaRegistry};
use omni::chat::Role;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Omni - persona-driven chat client with persistent memory
#[derive(Parser)]
#[command(
    name = "omni",
    author,
    version,
    about = "Persona-driven chat client with persistent memory notes",
    long_about = r#"
Omni is a terminal chat client built around personas.

Features:
  - Seven built-in personas with their own instructions
  - Safe markdown rendering (headings, lists, code, emphasis)
  - Conversation history kept across sessions (last 40 messages)
  - Memory notes injected into every request
  - Optional web search capability flag

Examples:
  omni                          Start the TUI chat
  omni chat --simple            Start the line console
  omni --persona coder chat     Chat with the coder persona
  omni render notes.md --html   Render markup to HTML
  omni memory add "I use vim"   Save a memory note
  omni history show             Print the stored conversation
"#
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data directory for persistence
    #[arg(short, long, global = true, default_value = "./data")]
    data_dir: PathBuf,

    /// Persona to start with
    #[arg(short, long, global = true, default_value = omni::DEFAULT_PERSONA)]
    persona: String,

    /// Offer web search to the model
    #[arg(long, global = true)]
    web_search: bool,

    /// Do not inject memory notes into requests
    #[arg(long, global = true)]
    no_memory: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat (default)
    #[command(alias = "console", alias = "repl")]
    Chat(ChatArgs),

    /// Render markup from a file or stdin
    Render(RenderArgs),

    /// List the available personas
    #[command(alias = "modes")]
    Personas,

    /// Manage memory notes
    Memory(MemoryArgs),

    /// Inspect or clear the stored conversation
    History(HistoryArgs),

    /// Display version and build information
    Info,
}

#[derive(Args)]
struct ChatArgs {
    /// Use simple line interface instead of TUI
    #[arg(short, long)]
    simple: bool,
}

#[derive(Args)]
struct RenderArgs {
    /// Input file; reads stdin when omitted
    file: Option<PathBuf>,

    /// Emit HTML instead of plain text
    #[arg(long)]
    html: bool,
}

#[derive(Args)]
struct MemoryArgs {
    #[command(subcommand)]
    action: MemoryAction,
}

#[derive(Subcommand)]
enum MemoryAction {
    /// List saved notes
    List,

    /// Save a new note
    Add {
        /// Note text
        text: String,
    },

    /// Delete a note by id
    Remove {
        /// Note id as shown by `memory list`
        id: u64,
    },
}

#[derive(Args)]
struct HistoryArgs {
    #[command(subcommand)]
    action: HistoryAction,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Print the stored conversation
    Show,

    /// Delete the stored conversation
    Clear,
}

fn print_info(cli: &Cli) {
    println!("Omni - persona-driven chat client");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Features:");
    #[cfg(feature = "tui")]
    println!("  - TUI chat (ratatui)");
    #[cfg(not(feature = "tui"))]
    println!("  - TUI chat: disabled");
    println!("  - Storage: fjall");
    println!("  - Model: {}", EchoModel::new().name());
    println!();
    println!("Data directory: {}", cli.data_dir.display());
}

fn render_input(args: &RenderArgs) -> Result<()> {
    let raw = match &args.file {
        Some(file) => std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let doc = omni::render(&raw);
    if args.html {
        println!("{}", doc.to_html());
    } else {
        println!("{}", doc.to_plain_text());
    }
    Ok(())
}

fn print_personas(current: &str) {
    let registry = PersonaRegistry::builtin();
    for p in registry.iter() {
        let marker = if p.key == current { "*" } else { " " };
        println!("{} {:<11} {} {:<9} {}", marker, p.key, p.icon, p.label, p.description);
    }
}

async fn run_chat(session: ChatSession, simple: bool) -> Result<()> {
    let model: Arc<dyn ChatModel> = Arc::new(EchoModel::new());
    if simple {
        return omni::cli::console::run(session, model.as_ref()).await;
    }
    #[cfg(feature = "tui")]
    {
        omni::cli::tui::run(session, model).await
    }
    #[cfg(not(feature = "tui"))]
    {
        omni::cli::console::run(session, model.as_ref()).await
    }
}

async fn run_command(command: Option<Commands>, mut session: ChatSession) -> Result<()> {
    match command {
        None => run_chat(session, false).await?,

        Some(Commands::Chat(args)) => run_chat(session, args.simple).await?,

        Some(Commands::Memory(args)) => match args.action {
            MemoryAction::List => {
                if session.notes().is_empty() {
                    println!("No memory notes.");
                }
                for note in session.notes() {
                    println!("{}  {}  {}", note.id, note.created_at.format("%Y-%m-%d %H:%M"), note.text);
                }
            }
            MemoryAction::Add { text } => match session.add_note(&text) {
                Some(id) => println!("Saved note {}", id),
                None => bail!("note text is empty"),
            },
            MemoryAction::Remove { id } => {
                if session.remove_note(id) {
                    println!("Removed note {}", id);
                } else {
                    bail!("no note with id {}", id);
                }
            }
        },

        Some(Commands::History(args)) => match args.action {
            HistoryAction::Show => {
                if session.messages().is_empty() {
                    println!("No stored conversation.");
                }
                for message in session.messages() {
                    let who = match message.role {
                        Role::User => "you".to_string(),
                        Role::Assistant => session.registry().get(&message.mode).label.to_string(),
                    };
                    println!("[{}] {}:", message.timestamp.format("%Y-%m-%d %H:%M"), who);
                    println!("{}\n", omni::render(&message.content).to_plain_text());
                }
            }
            HistoryAction::Clear => {
                session.clear_history();
                println!("Conversation cleared.");
            }
        },

        Some(Commands::Render(_)) | Some(Commands::Personas) | Some(Commands::Info) => {
            // Handled early, before opening storage
            unreachable!()
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only when RUST_LOG is set, the TUI owns the terminal otherwise)
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt::init();
    }

    let cli = Cli::parse();

    // Handle commands that don't touch storage first
    match &cli.command {
        Some(Commands::Info) => {
            print_info(&cli);
            return Ok(());
        }
        Some(Commands::Personas) => {
            print_personas(&cli.persona);
            return Ok(());
        }
        Some(Commands::Render(args)) => return render_input(args),
        _ => {}
    }

    let config = Config {
        data_dir: cli.data_dir.clone(),
        persona: cli.persona.clone(),
        web_search: cli.web_search,
        memory_enabled: !cli.no_memory,
    };

    let store = config
        .open_store()
        .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?;
    let session = ChatSession::open(store.clone(), &config);

    // Flush even when the command fails
    let outcome = run_command(cli.command, session).await;
    store.flush()?;
    outcome
}


#[cfg(test)]
mod tests {
    use super::*;
    use omni::MemoryKvStore;

    fn session() -> ChatSession {
        ChatSession::open(Arc::new(MemoryKvStore::new()), &Config::default())
    }

    fn memory(action: MemoryAction) -> Option<Commands> {
        Some(Commands::Memory(MemoryArgs { action }))
    }

    #[tokio::test]
    async fn test_memory_command_failures_are_errors() {
        let err = run_command(memory(MemoryAction::Add { text: "  ".into() }), session())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "note text is empty");

        let err = run_command(memory(MemoryAction::Remove { id: 7 }), session())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no note with id 7");
    }

    #[tokio::test]
    async fn test_memory_add_succeeds() {
        let result = run_command(memory(MemoryAction::Add { text: "likes tea".into() }), session()).await;
        assert!(result.is_ok());
    }
}
