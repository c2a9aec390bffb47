//! UI rendering for TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::chat::{Message, Role};
use crate::markup::render;
use crate::persona::{Persona, STARTER_PROMPTS};
use super::app::App;
use super::events::InputMode;
use super::markdown::{document_lines, StyledLines};

fn accent(persona: &Persona) -> Color {
    persona
        .rgb()
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Cyan)
}

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title bar
            Constraint::Min(10),    // Conversation
            Constraint::Length(3),  // Input
            Constraint::Length(1),  // Status bar
        ])
        .split(f.area());

    draw_title_bar(f, app, chunks[0]);
    draw_conversation(f, app, chunks[1]);
    draw_input(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);

    // Draw overlays
    if app.show_help {
        draw_help_popup(f);
    }
    if app.show_modes {
        draw_mode_popup(f, app);
    }
    if app.show_notes {
        draw_notes_popup(f, app);
    }
}

fn toggle_span(name: &str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{}:{}", name, if on { "on" } else { "off" }), style)
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Insert => Span::styled(" INSERT ", Style::default().bg(Color::Green).fg(Color::Black)),
    };

    let session = app.session();
    let persona = session.persona();

    let title = Line::from(vec![
        mode,
        Span::raw(" "),
        Span::styled("Omni", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        Span::styled(
            format!("{} {}", persona.icon, persona.label),
            Style::default().fg(accent(persona)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        toggle_span("search", session.web_search()),
        Span::raw(" "),
        toggle_span("memory", session.memory_enabled()),
        Span::raw(" | "),
        Span::styled(format!("tokens: {}", session.total_tokens()), Style::default().fg(Color::DarkGray)),
    ]);

    let title_bar = Paragraph::new(title)
        .style(Style::default().bg(Color::Rgb(30, 30, 30)));

    f.render_widget(title_bar, area);
}

fn message_lines(app: &App, message: &Message) -> StyledLines {
    let persona = app.session().registry().get(&message.mode);
    let mut header = match message.role {
        Role::User => vec![Span::styled("You", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))],
        Role::Assistant => vec![Span::styled(
            format!("{} {}", persona.icon, persona.label),
            Style::default().fg(accent(persona)).add_modifier(Modifier::BOLD),
        )],
    };
    if message.searched {
        header.push(Span::styled("  [searched]", Style::default().fg(Color::DarkGray)));
    }

    let mut lines = vec![Line::from(header)];
    match message.role {
        Role::User => {
            lines.extend(message.content.lines().map(|l| Line::from(l.to_string())));
        }
        Role::Assistant => {
            let base = if message.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            lines.extend(document_lines(&render(&message.content), base));
        }
    }
    lines.push(Line::default());
    lines
}

fn draw_welcome(f: &mut Frame, app: &App, area: Rect) {
    let persona = app.session().persona();
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", persona.icon, persona.label),
            Style::default().fg(accent(persona)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("  {}", persona.description), Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled("  Try one of these (press the number in normal mode):", Style::default().fg(Color::DarkGray))),
    ];
    for (i, prompt) in STARTER_PROMPTS.iter().enumerate() {
        text.push(Line::from(vec![
            Span::styled(format!("    {} ", i + 1), Style::default().fg(Color::Cyan)),
            Span::raw(*prompt),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "  Press ? or F1 for help, 'm' to switch persona",
        Style::default().fg(Color::DarkGray),
    )));

    let welcome = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Conversation "));
    f.render_widget(welcome, area);
}

/// Rows a line occupies once wrapped to `width` columns
fn wrapped_rows(line: &Line<'_>, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    line.width().div_ceil(width).max(1)
}

fn draw_conversation(f: &mut Frame, app: &App, area: Rect) {
    let messages = app.session().messages();
    if messages.is_empty() && !app.session().is_waiting() {
        draw_welcome(f, app, area);
        return;
    }

    let mut lines: StyledLines = messages.iter().flat_map(|m| message_lines(app, m)).collect();
    if app.session().is_waiting() {
        lines.push(Line::from(Span::styled(
            format!("{} thinking...", app.session().persona().icon),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let total: usize = lines.iter().map(|l| wrapped_rows(l, inner_width)).sum();
    let max_scroll = total.saturating_sub(inner_height);
    let top = max_scroll.saturating_sub(app.scroll_from_bottom);

    let title = if app.scroll_from_bottom > 0 && max_scroll > 0 {
        format!(" Conversation ({} messages, scrolled) ", messages.len())
    } else {
        format!(" Conversation ({} messages) ", messages.len())
    };

    let conversation = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0))
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title));

    f.render_widget(conversation, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input_style = match app.input_mode {
        InputMode::Normal => Style::default().fg(Color::DarkGray),
        InputMode::Insert => Style::default().fg(Color::White),
    };

    let border_style = match app.input_mode {
        InputMode::Normal => Style::default().fg(Color::DarkGray),
        InputMode::Insert => Style::default().fg(accent(app.session().persona())),
    };

    let prompt = match app.input_mode {
        InputMode::Normal => "Press 'i' to type › ",
        InputMode::Insert => "› ",
    };

    let input_widget = Paragraph::new(format!("{}{}", prompt, app.input))
        .style(input_style)
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Message "));

    f.render_widget(input_widget, area);

    // Set cursor position in insert mode
    if app.input_mode == InputMode::Insert {
        let offset = prompt.chars().count() + app.cursor_position;
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        f.set_cursor_position((
            area.x.saturating_add(1).saturating_add(offset),
            area.y + 1,
        ));
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_str = if let Some((msg, _)) = &app.status_message {
        msg.clone()
    } else {
        match app.input_mode {
            InputMode::Normal => " i:insert  ?:help  m:persona  n:notes  s:search  M:memory  j/k:scroll  Ctrl+Q:quit ".to_string(),
            InputMode::Insert => " Enter:send  Esc:normal  ↑↓:history  PgUp/PgDn:scroll  :help for commands ".to_string(),
        }
    };

    let status_style = if app.status_message.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let session = app.session();
    let waiting = if session.is_waiting() { " waiting " } else { "" };
    let right_info = format!(
        "{} notes:{}  {}  {}s ",
        waiting,
        session.notes().len(),
        app.model_name(),
        app.start_time.elapsed().as_secs()
    );

    // Calculate padding
    let status_len = status_str.chars().count();
    let right_len = right_info.chars().count();
    let padding_len = (area.width as usize).saturating_sub(status_len + right_len);

    let status_bar = Paragraph::new(Line::from(vec![
        Span::styled(status_str, status_style),
        Span::styled(" ".repeat(padding_len), Style::default()),
        Span::styled(right_info, Style::default().fg(Color::Cyan)),
    ]))
    .style(Style::default().bg(Color::Rgb(30, 30, 30)));

    f.render_widget(status_bar, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Omni Help", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Normal Mode Keys:", bold)),
        Line::from("  i, Enter    Enter insert mode"),
        Line::from("  j/k, ↓/↑    Scroll conversation"),
        Line::from("  PgUp/PgDn   Scroll by page"),
        Line::from("  G, End      Jump to latest"),
        Line::from("  m           Persona picker"),
        Line::from("  n           Toggle memory notes"),
        Line::from("  s           Toggle web search"),
        Line::from("  M           Toggle memory injection"),
        Line::from("  1-6         Use a starter prompt (empty chat)"),
        Line::from("  ?, F1       Toggle this help"),
        Line::from("  Ctrl+Q      Quit"),
        Line::from(""),
        Line::from(Span::styled("Insert Mode Keys:", bold)),
        Line::from("  Enter       Send message"),
        Line::from("  Esc         Return to normal mode"),
        Line::from("  ↑, ↓        Input history"),
        Line::from("  Ctrl+C      Clear input"),
        Line::from("  Ctrl+U/K    Clear before/after cursor"),
        Line::from("  Ctrl+W      Delete word before cursor"),
        Line::from(""),
        Line::from(Span::styled("Commands (prefix with :):", bold)),
        Line::from("  :mode <key>         Switch persona"),
        Line::from("  :modes              Persona picker"),
        Line::from("  :search on|off      Web search"),
        Line::from("  :memory on|off      Memory injection"),
        Line::from("  :note <text>        Save a memory note"),
        Line::from("  :notes              Show memory notes"),
        Line::from("  :forget <id>        Delete a memory note"),
        Line::from("  :clear              Clear the conversation"),
        Line::from("  exit                Quit"),
        Line::from(""),
        Line::from(Span::styled("Press ? or Esc to close", Style::default().fg(Color::DarkGray))),
    ];

    let help_widget = Paragraph::new(help_text)
        .wrap(Wrap { trim: true })
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help "));

    f.render_widget(help_widget, area);
}

fn draw_mode_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let current = app.session().persona().key;
    let items: Vec<ListItem> = app.session().registry().iter().enumerate().map(|(i, persona)| {
        let color = accent(persona);
        let style = if i == app.mode_index {
            Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(color)
        };
        let prefix = if persona.key == current { "● " } else { "  " };

        ListItem::new(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(format!("{} {:<9}", persona.icon, persona.label), style),
            Span::styled(format!(" {}", persona.description), Style::default().fg(Color::DarkGray)),
        ]))
    }).collect();

    let list = List::new(items)
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Persona (Enter to select, Esc to close) "));

    f.render_widget(list, area);
}

fn draw_notes_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let notes = app.session().notes();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" Memory notes ({}) ", notes.len()));

    if notes.is_empty() {
        let empty_msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No notes saved yet", Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(Span::styled("  Add one with:", Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled("  :note <text>", Style::default().fg(Color::Cyan))),
        ])
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let items: Vec<ListItem> = notes.iter().map(|note| {
        ListItem::new(Line::from(vec![
            Span::styled(format!("{} ", note.id), Style::default().fg(Color::DarkGray)),
            Span::raw(note.text.clone()),
        ]))
    }).collect();

    f.render_widget(List::new(items).block(block), area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
