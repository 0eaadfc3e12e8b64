use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format_optional;

/// Render the Profile tab - account info and wardrobe statistics
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_account(frame, app, chunks[0]);
    render_stats(frame, app, chunks[1]);
}

fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = "-";
    let mut lines = vec![];

    match app.user {
        Some(ref user) => {
            lines.push(Line::from(Span::styled(user.display_name(), styles::title_style())));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("Email:        ", styles::muted_style()),
                Span::raw(user.email.clone()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Member since: ", styles::muted_style()),
                Span::raw(user.member_since()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Avatar:       ", styles::muted_style()),
                Span::raw(format_optional(&user.avatar, placeholder)),
            ]));
        }
        None => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Not signed in",
                styles::muted_style(),
            )));
        }
    }

    lines.push(Line::from(""));

    if let Some(ref data) = app.session.data {
        let session_line = if data.is_expired() {
            Line::from(vec![
                Span::styled("Session:      ", styles::muted_style()),
                Span::styled("expired", styles::error_style()),
            ])
        } else {
            Line::from(vec![
                Span::styled("Session:      ", styles::muted_style()),
                Span::styled(
                    format!("{}m remaining", data.minutes_until_expiry()),
                    styles::success_style(),
                ),
            ])
        };
        lines.push(session_line);
    }

    let mode = if app.offline_mode {
        Line::from(vec![
            Span::styled("Mode:         ", styles::muted_style()),
            Span::styled("offline (local cache only)", styles::highlight_style()),
        ])
    } else {
        Line::from(vec![
            Span::styled("Mode:         ", styles::muted_style()),
            Span::styled("online", styles::success_style()),
        ])
    };
    lines.push(mode);

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[L]og out  [o]ffline toggle",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Account ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.wardrobe_stats();
    let mut lines = vec![];

    lines.push(Line::from(Span::styled("Wardrobe", styles::title_style())));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Items:            ", styles::muted_style()),
        Span::raw(stats.total_items.to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Outfits:          ", styles::muted_style()),
        Span::raw(stats.total_outfits.to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Favorite items:   ", styles::muted_style()),
        Span::styled(stats.favorite_items.to_string(), styles::favorite_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Favorite outfits: ", styles::muted_style()),
        Span::styled(stats.favorite_outfits.to_string(), styles::favorite_style()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("By Category", styles::highlight_style())));

    for (category, count) in app.category_counts() {
        // Simple bar so the closet balance is visible at a glance
        let bar = "█".repeat(count.min(30));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", category.label()), styles::muted_style()),
            Span::styled(format!("{:>3} ", count), styles::list_item_style()),
            Span::styled(bar, styles::success_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Cache updated: ", styles::muted_style()),
        Span::raw(app.cache_ages.last_updated()),
    ]));

    let block = Block::default()
        .title(" Statistics ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
