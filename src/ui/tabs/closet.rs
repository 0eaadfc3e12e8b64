use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::ItemSortColumn;
use crate::ui::styles;
use crate::utils::{format_optional, truncate};

/// Render the Closet tab - sortable item table with a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_item_table(frame, app, chunks[0]);
    render_item_detail(frame, app, chunks[1]);
}

fn render_item_table(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.get_filtered_items();
    let focused = matches!(app.focus, Focus::List);

    // Build header with sort indicators
    let sort_indicator = |col: ItemSortColumn| {
        if app.item_sort_column == col {
            if app.item_sort_ascending { " ▲" } else { " ▼" }
        } else {
            ""
        }
    };

    let header_cells = [
        Cell::from(format!("Name{}", sort_indicator(ItemSortColumn::Name))),
        Cell::from(format!("Category{}", sort_indicator(ItemSortColumn::Category))),
        Cell::from(format!("Color{}", sort_indicator(ItemSortColumn::Color))),
        Cell::from(format!("Added{}", sort_indicator(ItemSortColumn::Added))),
        Cell::from(format!("Worn{}", sort_indicator(ItemSortColumn::Worn))),
    ];

    let header = Row::new(header_cells)
        .style(styles::title_style())
        .height(1);

    // Build rows
    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.closet_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let star = if item.favorite { "★ " } else { "  " };

            Row::new(vec![
                Cell::from(format!("{}{}", star, item.name)),
                Cell::from(item.category.label()),
                Cell::from(item.color.label()),
                Cell::from(item.created_at.format("%b %d").to_string()),
                Cell::from(item.worn_display()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(38), // Name
        Constraint::Fill(2),        // Category
        Constraint::Fill(2),        // Color
        Constraint::Length(7),      // Added
        Constraint::Length(7),      // Worn
    ];

    // Title reflects active filters so users see why rows are missing
    let mut filters = Vec::new();
    if let Some(category) = app.category_filter {
        filters.push(category.label().to_string());
    }
    if app.favorites_only {
        filters.push("favorites".to_string());
    }
    let filter_text = if filters.is_empty() {
        String::new()
    } else {
        format!(" [{}]", filters.join(", "))
    };

    let sort_help = "sort [n]ame [t]ype co[l]or a[d]ded la[s]t";
    let title = format!(" Closet ({}){} - {} ", items.len(), filter_text, sort_help);

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
    state.select(Some(app.closet_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.get_filtered_items();
    let selected = items.get(app.closet_selection);
    let focused = matches!(app.focus, Focus::Detail);

    let placeholder = "-";

    let content = match selected {
        Some(item) => {
            let mut lines = vec![];

            let name_line = if item.favorite {
                Line::from(vec![
                    Span::styled("★ ", styles::favorite_style()),
                    Span::styled(item.name.clone(), styles::title_style()),
                ])
            } else {
                Line::from(Span::styled(item.name.clone(), styles::title_style()))
            };
            lines.push(name_line);
            lines.push(Line::from(""));

            if let Some(ref description) = item.description {
                lines.push(Line::from(Span::raw(truncate(description, 60))));
                lines.push(Line::from(""));
            }

            lines.push(Line::from(Span::styled("Details", styles::highlight_style())));

            lines.push(Line::from(vec![
                Span::styled("Category:  ", styles::muted_style()),
                Span::raw(item.category.label()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Color:     ", styles::muted_style()),
                Span::raw(item.color.label()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Brand:     ", styles::muted_style()),
                Span::raw(format_optional(&item.brand, placeholder)),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Seasons:   ", styles::muted_style()),
                Span::raw(item.seasons_display()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Occasions: ", styles::muted_style()),
                Span::raw(item.occasions_display()),
            ]));

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("History", styles::highlight_style())));

            lines.push(Line::from(vec![
                Span::styled("Added:     ", styles::muted_style()),
                Span::raw(item.added_display()),
            ]));

            let worn = match item.last_worn {
                Some(dt) => dt.format("%b %d, %Y").to_string(),
                None => "never".to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled("Last worn: ", styles::muted_style()),
                Span::raw(worn),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Image:     ", styles::muted_style()),
                Span::raw(truncate(&item.image_url, 32)),
            ]));

            // Outfits that include this item
            let in_outfits: Vec<&str> = app
                .outfits
                .iter()
                .filter(|o| o.items.iter().any(|id| id == &item.id))
                .map(|o| o.name.as_str())
                .collect();
            if !in_outfits.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("In Outfits", styles::highlight_style())));
                for name in in_outfits {
                    lines.push(Line::from(vec![
                        Span::styled("  • ", styles::muted_style()),
                        Span::raw(name.to_string()),
                    ]));
                }
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
                "  No items to show",
                styles::muted_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press [a] to add your first item",
                styles::muted_style(),
            )),
        ],
    };

    let block = Block::default()
        .title(" Item ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
