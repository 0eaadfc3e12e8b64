use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, DeleteTarget, LoginFocus, LoginMode, Tab};

use super::forms;
use super::styles;
use super::tabs::{closet, outfits, profile};

// ASCII art logo rows (shared by the overlays)
const LOGO: [&str; 3] = [
    "╔╦╗╦ ╦╦═╗╔═╗╔═╗╔╦╗╔═╗╔═╗╔═╗╦ ╦╔═╗",
    " ║ ╠═╣╠╦╝║╣ ╠═╣ ║║║  ╠═╣║  ╠═╣║╣ ",
    " ╩ ╩ ╩╩╚═╚═╝╩ ╩═╩╝╚═╝╩ ╩╚═╝╩ ╩╚═╝",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::EditingItem => forms::render_item_form(frame, app),
        AppState::EditingOutfit => forms::render_outfit_form(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingOffline => render_offline_overlay(frame),
        AppState::ConfirmingOnline => render_online_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  threadcache";
    let offline_badge = if app.offline_mode { " [offline]" } else { "" };
    let help_hint = "[?] Help";
    let left = format!("{}{}", title, offline_badge);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(offline_badge, styles::highlight_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(left.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let main_tabs = [Tab::Closet, Tab::Outfits, Tab::Profile];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in main_tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    // Show the active search on the right side of the tab bar
    if !app.search_query.is_empty() {
        let search_text = format!("search: {}", app.search_query);
        let main_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let padding = (area.width as usize).saturating_sub(main_width + search_text.chars().count() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(search_text, styles::search_style()));
    }

    let line = Line::from(spans);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Closet => closet::render(frame, app, area),
        Tab::Outfits => outfits::render(frame, app, area),
        Tab::Profile => profile::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let last_updated = app.cache_ages.last_updated();
    let shortcuts = "[/]search [u]pdate [q]uit";

    let left_text = if matches!(app.state, AppState::Searching) {
        format!(" Search: {}▌ (Enter apply, Esc clear) ", app.search_query)
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" Updated {} ", last_updated)
    };

    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let left_style = if matches!(app.state, AppState::Searching) {
        styles::search_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    // Fixed size dialog matching login/quit overlays
    let area = centered_rect_fixed(52, 28, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = Vec::new();
    for row in LOGO {
        help_text.push(Line::from(Span::styled(
            format!("      {}", row),
            styles::title_style(),
        )));
    }
    help_text.push(Line::from(Span::styled(
        format!("              version {}", version),
        styles::muted_style(),
    )));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Navigation", styles::highlight_style())));
    help_text.push(Line::from(vec![
        Span::styled("  1-3       ", styles::help_key_style()),
        Span::styled("Switch tabs", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  ←/→       ", styles::help_key_style()),
        Span::styled("Prev/next tab", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  Tab       ", styles::help_key_style()),
        Span::styled("Switch focus (list ↔ detail)", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  ↑/↓       ", styles::help_key_style()),
        Span::styled("Navigate list", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Closet & Outfits", styles::highlight_style())));
    help_text.push(Line::from(vec![
        Span::styled("  a/e/x     ", styles::help_key_style()),
        Span::styled("Add / edit / delete", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  f         ", styles::help_key_style()),
        Span::styled("Toggle favorite", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  w         ", styles::help_key_style()),
        Span::styled("Mark worn today", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  c         ", styles::help_key_style()),
        Span::styled("Cycle category filter (closet)", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  F         ", styles::help_key_style()),
        Span::styled("Favorites only on/off", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  n/t/l/d/s ", styles::help_key_style()),
        Span::styled("Sort columns", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Actions", styles::highlight_style())));
    help_text.push(Line::from(vec![
        Span::styled("  /         ", styles::help_key_style()),
        Span::styled("Search", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  u         ", styles::help_key_style()),
        Span::styled("Update from server", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  o         ", styles::help_key_style()),
        Span::styled("Toggle offline mode", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  q         ", styles::help_key_style()),
        Span::styled("Quit", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("       Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let registering = app.login_mode == LoginMode::Register;

    // Fixed size dialog - compact
    let mut height = if registering { 15 } else { 14 };
    if app.login_error.is_some() {
        height += 2;
    }
    let area = centered_rect_fixed(48, height, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = vec![];

    for row in LOGO {
        lines.push(Line::from(Span::styled(
            format!("      {}", row),
            styles::title_style(),
        )));
    }
    lines.push(Line::from(""));

    let field = |label: &str, value: &str, masked: bool, focused: bool| -> Line<'static> {
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let shown: String = if masked {
            "*".repeat(value.chars().count().min(20))
        } else {
            value.chars().rev().take(20).collect::<Vec<_>>().into_iter().rev().collect()
        };
        let display = format!("{:<20}", shown);
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{:<10}[", label), styles::muted_style()),
            Span::styled(format!("{}{}", display, cursor), style),
            Span::styled("]", styles::muted_style()),
        ])
    };

    lines.push(field(
        "Email:",
        &app.login_email,
        false,
        app.login_focus == LoginFocus::Email,
    ));
    lines.push(field(
        "Password:",
        &app.login_password,
        true,
        app.login_focus == LoginFocus::Password,
    ));
    if registering {
        lines.push(field(
            "Name:",
            &app.login_name,
            false,
            app.login_focus == LoginFocus::Name,
        ));
    }

    // Button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if registering { " Register " } else { "  Sign In " };
    lines.push(Line::from(""));
    if button_focused {
        lines.push(Line::from(vec![
            Span::raw("             ["),
            Span::styled(format!("▶{}◀", label), button_style),
            Span::raw("]"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("             ["),
            Span::styled(format!(" {} ", label), button_style),
            Span::raw("]"),
        ]));
    }

    lines.push(Line::from(""));
    let mode_hint = if registering {
        "   Ctrl+R: sign in with an existing account"
    } else {
        "   Ctrl+R: create a new account"
    };
    lines.push(Line::from(Span::styled(mode_hint, styles::muted_style())));

    // Error message
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(48, 9, frame.area());
    frame.render_widget(Clear, area);

    let (kind, name) = match app.pending_delete {
        Some(DeleteTarget::Item(ref id)) => (
            "item",
            app.get_item_by_id(id).map(|i| i.name.clone()).unwrap_or_default(),
        ),
        Some(DeleteTarget::Outfit(ref id)) => (
            "outfit",
            app.get_outfit_by_id(id).map(|o| o.name.clone()).unwrap_or_default(),
        ),
        None => ("item", String::new()),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   Delete {} \"{}\"?", kind, crate::utils::truncate(&name, 24)),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   This cannot be undone.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub(super) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    // Fixed size dialog matching login screen
    let area = centered_rect_fixed(48, 10, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for row in LOGO {
        lines.push(Line::from(Span::styled(
            format!("      {}", row),
            styles::title_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   Are you sure you want to quit?",
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(" to quit, ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_offline_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(48, 10, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Go offline?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   The wardrobe will be cached locally and",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "   changes will stay on this device.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to go offline, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_online_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(48, 10, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Go back online?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   You will be asked to sign in again and the",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "   next sync replaces local-only changes.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[O]", styles::help_key_style()),
            Span::styled(" to go online, any other key to stay offline", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
