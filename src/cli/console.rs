use std::io::{self, Write};
use anyhow::Result;

use crate::chat::{Message, NoteId, Role};
use crate::markup::render;
use crate::model::ChatModel;
use crate::session::ChatSession;

const HELP: &str = "\
Commands:
  :mode <key>        switch persona
  :modes             list personas
  :search on|off     toggle web search
  :memory on|off     toggle memory injection
  :note <text>       save a memory note
  :notes             list memory notes
  :forget <id>       delete a memory note
  :clear             clear the conversation
  :help              show this help
  exit               quit";

/// A line typed at the console prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Send(String),
    Mode(String),
    Modes,
    Search(bool),
    Memory(bool),
    Note(String),
    Notes,
    Forget(NoteId),
    Clear,
    Help,
    Exit,
    Empty,
    Invalid(String),
}

fn parse_switch(arg: Option<&str>) -> Option<bool> {
    match arg?.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

pub fn parse_command(line: &str) -> ConsoleCommand {
    let input = line.trim();
    if input.is_empty() {
        return ConsoleCommand::Empty;
    }
    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
        return ConsoleCommand::Exit;
    }
    let Some(rest) = input.strip_prefix(':') else {
        return ConsoleCommand::Send(input.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };

    match (name, arg) {
        ("mode", Some(key)) => ConsoleCommand::Mode(key.to_string()),
        ("modes", None) => ConsoleCommand::Modes,
        ("search", arg) => parse_switch(arg)
            .map(ConsoleCommand::Search)
            .unwrap_or_else(|| ConsoleCommand::Invalid("Usage: :search on|off".into())),
        ("memory", arg) => parse_switch(arg)
            .map(ConsoleCommand::Memory)
            .unwrap_or_else(|| ConsoleCommand::Invalid("Usage: :memory on|off".into())),
        ("note", Some(text)) => ConsoleCommand::Note(text.to_string()),
        ("notes", None) => ConsoleCommand::Notes,
        ("forget", Some(id)) => id
            .parse()
            .map(ConsoleCommand::Forget)
            .unwrap_or_else(|_| ConsoleCommand::Invalid(format!("Not a note id: {}", id))),
        ("clear", None) => ConsoleCommand::Clear,
        ("help", None) => ConsoleCommand::Help,
        _ => ConsoleCommand::Invalid("Unknown command. Type :help for the list.".into()),
    }
}

fn print_message(session: &ChatSession, message: &Message) {
    let persona = session.registry().get(&message.mode);
    let who = match message.role {
        Role::User => "you".to_string(),
        Role::Assistant => format!("{} {}", persona.icon, persona.label),
    };
    let search = if message.searched { " [searched]" } else { "" };
    println!("{}{}:", who, search);
    println!("{}\n", render(&message.content).to_plain_text());
}

fn print_notes(session: &ChatSession) {
    if session.notes().is_empty() {
        println!("No memory notes.");
        return;
    }
    for note in session.notes() {
        println!("  [{}] {}", note.id, note.text);
    }
}

/// Line-oriented chat loop on stdin/stdout
pub async fn run(mut session: ChatSession, model: &dyn ChatModel) -> Result<()> {
    println!("Omni console ({} model)", model.name());
    println!("Type a message, :help for commands, or 'exit' to quit");

    loop {
        let persona = session.persona();
        print!("{} {}> ", persona.icon, persona.label);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match parse_command(&input) {
            ConsoleCommand::Empty => {}
            ConsoleCommand::Exit => break,
            ConsoleCommand::Send(text) => {
                if let Some(reply) = session.send(&text, model).await.cloned() {
                    print_message(&session, &reply);
                }
            }
            ConsoleCommand::Mode(key) => match session.set_persona(&key) {
                Ok(p) => println!("Mode: {} {} - {}", p.icon, p.label, p.description),
                Err(e) => eprintln!("Error: {}", e),
            },
            ConsoleCommand::Modes => {
                for p in session.registry().iter() {
                    println!("  {:<11} {} {:<9} {}", p.key, p.icon, p.label, p.description);
                }
            }
            ConsoleCommand::Search(on) => {
                session.set_web_search(on);
                println!("Web search {}", if on { "on" } else { "off" });
            }
            ConsoleCommand::Memory(on) => {
                session.set_memory_enabled(on);
                println!("Memory {}", if on { "on" } else { "off" });
            }
            ConsoleCommand::Note(text) => match session.add_note(&text) {
                Some(id) => println!("Saved note {}", id),
                None => eprintln!("Error: note text is empty"),
            },
            ConsoleCommand::Notes => print_notes(&session),
            ConsoleCommand::Forget(id) => {
                if session.remove_note(id) {
                    println!("Forgot note {}", id);
                } else {
                    eprintln!("No note with id {}", id);
                }
            }
            ConsoleCommand::Clear => {
                session.clear_history();
                println!("Conversation cleared.");
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Invalid(reason) => eprintln!("{}", reason),
        }
    }

    tracing::info!("Console closed after {} tokens", session.total_tokens());
    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text_is_send() {
        assert_eq!(parse_command("  hello there \n"), ConsoleCommand::Send("hello there".into()));
        assert_eq!(parse_command("   "), ConsoleCommand::Empty);
        assert_eq!(parse_command("EXIT"), ConsoleCommand::Exit);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(":mode coder"), ConsoleCommand::Mode("coder".into()));
        assert_eq!(parse_command(":modes"), ConsoleCommand::Modes);
        assert_eq!(parse_command(":search on"), ConsoleCommand::Search(true));
        assert_eq!(parse_command(":memory OFF"), ConsoleCommand::Memory(false));
        assert_eq!(parse_command(":note likes  tea "), ConsoleCommand::Note("likes  tea".into()));
        assert_eq!(parse_command(":forget 1700000000000"), ConsoleCommand::Forget(1_700_000_000_000));
        assert_eq!(parse_command(":clear"), ConsoleCommand::Clear);
    }

    #[test]
    fn test_parse_invalid_commands() {
        assert!(matches!(parse_command(":search maybe"), ConsoleCommand::Invalid(_)));
        assert!(matches!(parse_command(":forget abc"), ConsoleCommand::Invalid(_)));
        assert!(matches!(parse_command(":mode"), ConsoleCommand::Invalid(_)));
        assert!(matches!(parse_command(":note   "), ConsoleCommand::Invalid(_)));
        assert!(matches!(parse_command(":bogus"), ConsoleCommand::Invalid(_)));
    }
}
