//! Item and outfit form overlays.
//!
//! Both forms follow the login overlay's conventions: bracketed text
//! fields with a block cursor on the focused field, arrow-cycled
//! selects, and space-toggled multi-select rows.

use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, ItemForm, ItemFormField, OutfitForm, OutfitFormField};
use crate::models::{Occasion, Season};
use crate::utils::truncate;

use super::render::centered_rect_fixed;
use super::styles;

/// Visible width of bracketed text fields
const TEXT_FIELD_WIDTH: usize = 32;

/// Number of closet items shown at once in the outfit item picker
const ITEM_PICKER_ROWS: usize = 6;

fn text_field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let display = format!("{:<width$}", truncate(value, TEXT_FIELD_WIDTH), width = TEXT_FIELD_WIDTH);
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}[", label), styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn select_field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let arrows = if focused {
        format!("◀ {:<12} ▶", value)
    } else {
        format!("  {:<12}  ", value)
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", label), styles::muted_style()),
        Span::styled(arrows, style),
    ])
}

fn season_toggle_line(
    label: &str,
    selected: &[Season],
    cursor: usize,
    focused: bool,
) -> Line<'static> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", label), styles::muted_style()),
    ];
    for (i, season) in Season::ALL.iter().enumerate() {
        let marker = if selected.contains(season) { "x" } else { " " };
        let text = format!("[{}]{} ", marker, season.label());
        let style = if focused && i == cursor {
            styles::selected_style()
        } else if selected.contains(season) {
            styles::highlight_style()
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn occasion_toggle_line(
    label: &str,
    selected: &[Occasion],
    cursor: usize,
    focused: bool,
) -> Line<'static> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", label), styles::muted_style()),
    ];
    for (i, occasion) in Occasion::ALL.iter().enumerate() {
        let marker = if selected.contains(occasion) { "x" } else { " " };
        let text = format!("[{}]{} ", marker, occasion.label());
        let style = if focused && i == cursor {
            styles::selected_style()
        } else if selected.contains(occasion) {
            styles::highlight_style()
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn submit_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    if focused {
        Line::from(vec![
            Span::raw("              ["),
            Span::styled(format!(" ▶ {} ◀ ", label), style),
            Span::raw("]"),
        ])
    } else {
        Line::from(vec![
            Span::raw("              ["),
            Span::styled(format!("   {}   ", label), style),
            Span::raw("]"),
        ])
    }
}

/// Render the item add/edit form overlay
pub fn render_item_form(frame: &mut Frame, app: &App) {
    let form: &ItemForm = &app.item_form;
    let height = if form.error.is_some() { 22 } else { 20 };
    let area = centered_rect_fixed(80, height, frame.area());

    frame.render_widget(Clear, area);

    let title = if form.editing_id.is_some() {
        " Edit Item "
    } else {
        " Add Item "
    };

    let mut lines = vec![Line::from("")];

    lines.push(text_field_line("Name:", &form.name, form.focus == ItemFormField::Name));
    lines.push(text_field_line(
        "Description:",
        &form.description,
        form.focus == ItemFormField::Description,
    ));
    lines.push(text_field_line("Brand:", &form.brand, form.focus == ItemFormField::Brand));
    lines.push(text_field_line(
        "Image:",
        &form.image_path,
        form.focus == ItemFormField::ImagePath,
    ));
    lines.push(Line::from(Span::styled(
        "              (local files go through background removal)",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    lines.push(select_field_line(
        "Category:",
        form.category.label(),
        form.focus == ItemFormField::Category,
    ));
    lines.push(select_field_line(
        "Color:",
        form.color.label(),
        form.focus == ItemFormField::Color,
    ));
    lines.push(Line::from(""));

    lines.push(season_toggle_line(
        "Seasons:",
        &form.seasons,
        form.season_cursor,
        form.focus == ItemFormField::Seasons,
    ));
    lines.push(occasion_toggle_line(
        "Occasions:",
        &form.occasions,
        form.occasion_cursor,
        form.focus == ItemFormField::Occasions,
    ));
    lines.push(Line::from(""));

    let favorite_marker = if form.favorite { "★ favorite" } else { "  favorite" };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("[F] ", styles::help_key_style()),
        Span::styled(
            favorite_marker,
            if form.favorite {
                styles::favorite_style()
            } else {
                styles::muted_style()
            },
        ),
    ]));
    lines.push(Line::from(""));

    let submit_label = if form.editing_id.is_some() { "Save" } else { "Add" };
    lines.push(submit_line(submit_label, form.focus == ItemFormField::Submit));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab/↑↓ move · ←→ change · Space toggle · Esc cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the outfit add/edit form overlay
pub fn render_outfit_form(frame: &mut Frame, app: &App) {
    let form: &OutfitForm = &app.outfit_form;
    let height = if form.error.is_some() { 24 } else { 22 };
    let area = centered_rect_fixed(80, height, frame.area());

    frame.render_widget(Clear, area);

    let title = if form.editing_id.is_some() {
        " Edit Outfit "
    } else {
        " New Outfit "
    };

    let mut lines = vec![Line::from("")];

    lines.push(text_field_line("Name:", &form.name, form.focus == OutfitFormField::Name));
    lines.push(text_field_line(
        "Description:",
        &form.description,
        form.focus == OutfitFormField::Description,
    ));
    lines.push(Line::from(""));

    lines.push(season_toggle_line(
        "Seasons:",
        &form.seasons,
        form.season_cursor,
        form.focus == OutfitFormField::Seasons,
    ));
    lines.push(occasion_toggle_line(
        "Occasions:",
        &form.occasions,
        form.occasion_cursor,
        form.focus == OutfitFormField::Occasions,
    ));
    lines.push(Line::from(""));

    // Closet item picker with a window around the cursor
    let picker_focused = form.focus == OutfitFormField::Items;
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("Items ({} selected):", form.selected_items.len()),
            styles::muted_style(),
        ),
    ]));

    if app.items.is_empty() {
        lines.push(Line::from(Span::styled(
            "    (closet is empty - add items first)",
            styles::muted_style(),
        )));
    } else {
        let start = form
            .item_cursor
            .saturating_sub(ITEM_PICKER_ROWS.saturating_sub(1))
            .min(app.items.len().saturating_sub(ITEM_PICKER_ROWS));
        let window = app.items.iter().enumerate().skip(start).take(ITEM_PICKER_ROWS);

        for (i, item) in window {
            let marker = if form.selected_items.contains(&item.id) { "x" } else { " " };
            let text = format!(
                "    [{}] {} ({}, {})",
                marker,
                truncate(&item.name, 28),
                item.category.label(),
                item.color.label()
            );
            let style = if picker_focused && i == form.item_cursor {
                styles::selected_style()
            } else if form.selected_items.contains(&item.id) {
                styles::highlight_style()
            } else {
                styles::list_item_style()
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        if app.items.len() > ITEM_PICKER_ROWS {
            lines.push(Line::from(Span::styled(
                format!("    ({} of {} shown)", ITEM_PICKER_ROWS.min(app.items.len()), app.items.len()),
                styles::muted_style(),
            )));
        }
    }

    lines.push(Line::from(""));

    let submit_label = if form.editing_id.is_some() { "Save" } else { "Create" };
    lines.push(submit_line(submit_label, form.focus == OutfitFormField::Submit));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab/↑↓ move · Space toggle · Esc cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
