use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::OutfitSortColumn;
use crate::ui::styles;
use crate::utils::truncate;

/// Render the Outfits tab - outfit table with a detail panel resolving
/// member items
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_outfit_table(frame, app, chunks[0]);
    render_outfit_detail(frame, app, chunks[1]);
}

fn render_outfit_table(frame: &mut Frame, app: &App, area: Rect) {
    let outfits = app.get_filtered_outfits();
    let focused = matches!(app.focus, Focus::List);

    let sort_indicator = |col: OutfitSortColumn| {
        if app.outfit_sort_column == col {
            if app.outfit_sort_ascending { " ▲" } else { " ▼" }
        } else {
            ""
        }
    };

    let header_cells = [
        Cell::from(format!("Name{}", sort_indicator(OutfitSortColumn::Name))),
        Cell::from("Items"),
        Cell::from("Occasions"),
        Cell::from(format!("Added{}", sort_indicator(OutfitSortColumn::Added))),
    ];

    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = outfits
        .iter()
        .enumerate()
        .map(|(i, outfit)| {
            let style = if i == app.outfit_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let star = if outfit.favorite { "★ " } else { "  " };
            // Count only items that still exist
            let member_count = app.outfit_items(outfit).len();

            Row::new(vec![
                Cell::from(format!("{}{}", star, outfit.name)),
                Cell::from(format!("{:>3}", member_count)),
                Cell::from(outfit.occasions_display()),
                Cell::from(outfit.created_at.format("%b %d").to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(40), // Name
        Constraint::Length(5),      // Items
        Constraint::Fill(2),        // Occasions
        Constraint::Length(7),      // Added
    ];

    let filter_text = if app.favorites_only { " [favorites]" } else { "" };
    let sort_help = "sort [n]ame a[d]ded";
    let title = format!(" Outfits ({}){} - {} ", outfits.len(), filter_text, sort_help);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.outfit_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_outfit_detail(frame: &mut Frame, app: &App, area: Rect) {
    let outfits = app.get_filtered_outfits();
    let selected = outfits.get(app.outfit_selection);
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(outfit) => {
            let mut lines = vec![];

            let name_line = if outfit.favorite {
                Line::from(vec![
                    Span::styled("★ ", styles::favorite_style()),
                    Span::styled(outfit.name.clone(), styles::title_style()),
                ])
            } else {
                Line::from(Span::styled(outfit.name.clone(), styles::title_style()))
            };
            lines.push(name_line);
            lines.push(Line::from(""));

            if let Some(ref description) = outfit.description {
                lines.push(Line::from(Span::raw(truncate(description, 60))));
                lines.push(Line::from(""));
            }

            lines.push(Line::from(Span::styled("Details", styles::highlight_style())));

            lines.push(Line::from(vec![
                Span::styled("Seasons:   ", styles::muted_style()),
                Span::raw(outfit.seasons_display()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Occasions: ", styles::muted_style()),
                Span::raw(outfit.occasions_display()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Added:     ", styles::muted_style()),
                Span::raw(outfit.added_display()),
            ]));

            let worn = match outfit.last_worn {
                Some(dt) => dt.format("%b %d, %Y").to_string(),
                None => "never".to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled("Last worn: ", styles::muted_style()),
                Span::raw(worn),
            ]));

            // Member items, dangling ids dropped
            let members = app.outfit_items(outfit);
            let missing = outfit.items.len() - members.len();

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Items ({})", members.len()),
                styles::highlight_style(),
            )));

            for item in members {
                lines.push(Line::from(vec![
                    Span::styled("  • ", styles::muted_style()),
                    Span::raw(item.name.clone()),
                    Span::styled(
                        format!("  ({}, {})", item.category.label(), item.color.label()),
                        styles::muted_style(),
                    ),
                ]));
            }

            if missing > 0 {
                lines.push(Line::from(Span::styled(
                    format!("  ({} item{} no longer in closet)", missing, if missing == 1 { "" } else { "s" }),
                    styles::muted_style(),
                )));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[a]dd [e]dit [x]delete [f]avorite [w]orn",
                styles::muted_style(),
            )));

            lines
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No outfits to show",
                styles::muted_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press [a] to create your first outfit",
                styles::muted_style(),
            )),
        ],
    };

    let block = Block::default()
        .title(" Outfit ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
