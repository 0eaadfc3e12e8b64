//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    can_add_email_char, can_add_field_char, can_add_password_char, App, AppState, Focus,
    ItemFormField, LoginFocus, LoginMode, OutfitFormField, Tab, PAGE_SCROLL_SIZE,
};
use crate::models::{ItemSortColumn, Occasion, OutfitSortColumn, Season};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle form overlays
    if matches!(app.state, AppState::EditingItem) {
        handle_item_form_input(app, key);
        return Ok(false);
    }
    if matches!(app.state, AppState::EditingOutfit) {
        handle_outfit_form_input(app, key);
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_delete();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.pending_delete = None;
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle offline mode confirmation
    if matches!(app.state, AppState::ConfirmingOffline) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Normal;
                app.go_offline().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle online mode confirmation (when returning from offline)
    if matches!(app.state, AppState::ConfirmingOnline) {
        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') => {
                app.state = AppState::Normal;
                app.go_online();
            }
            _ => {
                // Any other key stays offline
                app.state = AppState::Normal;
            }
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Closet;
            app.focus = Focus::List;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Outfits;
            app.focus = Focus::List;
        }
        KeyCode::Char('3') => {
            app.current_tab = Tab::Profile;
            app.focus = Focus::List;
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
            app.focus = Focus::List;
        }
        KeyCode::Right => {
            app.current_tab = app.current_tab.next();
            app.focus = Focus::List;
        }
        KeyCode::Char('u') => {
            if !app.offline_mode {
                app.refresh_all_background().await;
            }
        }
        KeyCode::Char('o') => {
            if app.offline_mode {
                app.state = AppState::ConfirmingOnline;
            } else {
                app.state = AppState::ConfirmingOffline;
            }
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
        }
        KeyCode::Tab => {
            // Toggle focus between list and detail panels
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Esc => {
            if !app.search_query.is_empty() {
                app.search_query.clear();
            } else {
                app.focus = Focus::List;
            }
        }
        _ => {
            // Tab-specific keys
            match app.current_tab {
                Tab::Closet => handle_closet_keys(app, key),
                Tab::Outfits => handle_outfit_keys(app, key),
                Tab::Profile => handle_profile_keys(app, key),
            }
        }
    }

    Ok(false)
}

/// Move a selection index up/down within a list of the given length
fn move_selection(selection: &mut usize, len: usize, delta: isize) {
    if len == 0 {
        *selection = 0;
        return;
    }
    let new = (*selection as isize + delta).clamp(0, len as isize - 1);
    *selection = new as usize;
}

fn handle_closet_keys(app: &mut App, key: KeyEvent) {
    let len = app.get_filtered_items().len();
    match key.code {
        KeyCode::Up => move_selection(&mut app.closet_selection, len, -1),
        KeyCode::Down => move_selection(&mut app.closet_selection, len, 1),
        KeyCode::PageUp => {
            move_selection(&mut app.closet_selection, len, -(PAGE_SCROLL_SIZE as isize))
        }
        KeyCode::PageDown => {
            move_selection(&mut app.closet_selection, len, PAGE_SCROLL_SIZE as isize)
        }
        KeyCode::Home => app.closet_selection = 0,
        KeyCode::End => app.closet_selection = len.saturating_sub(1),
        KeyCode::Enter => app.focus = Focus::Detail,

        // Mutations
        KeyCode::Char('a') => app.open_add_item_form(),
        KeyCode::Char('e') => app.open_edit_item_form(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete_item(),
        KeyCode::Char('f') => app.toggle_item_favorite(),
        KeyCode::Char('w') => app.mark_item_worn(),

        // Filters
        KeyCode::Char('c') => app.cycle_category_filter(),
        KeyCode::Char('F') => app.toggle_favorites_filter(),

        // Sorting
        KeyCode::Char('n') => app.toggle_item_sort(ItemSortColumn::Name),
        KeyCode::Char('t') => app.toggle_item_sort(ItemSortColumn::Category),
        KeyCode::Char('l') => app.toggle_item_sort(ItemSortColumn::Color),
        KeyCode::Char('d') => app.toggle_item_sort(ItemSortColumn::Added),
        KeyCode::Char('s') => app.toggle_item_sort(ItemSortColumn::Worn),
        _ => {}
    }
}

fn handle_outfit_keys(app: &mut App, key: KeyEvent) {
    let len = app.get_filtered_outfits().len();
    match key.code {
        KeyCode::Up => move_selection(&mut app.outfit_selection, len, -1),
        KeyCode::Down => move_selection(&mut app.outfit_selection, len, 1),
        KeyCode::PageUp => {
            move_selection(&mut app.outfit_selection, len, -(PAGE_SCROLL_SIZE as isize))
        }
        KeyCode::PageDown => {
            move_selection(&mut app.outfit_selection, len, PAGE_SCROLL_SIZE as isize)
        }
        KeyCode::Home => app.outfit_selection = 0,
        KeyCode::End => app.outfit_selection = len.saturating_sub(1),
        KeyCode::Enter => app.focus = Focus::Detail,

        // Mutations
        KeyCode::Char('a') => app.open_add_outfit_form(),
        KeyCode::Char('e') => app.open_edit_outfit_form(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete_outfit(),
        KeyCode::Char('f') => app.toggle_outfit_favorite(),
        KeyCode::Char('w') => app.mark_outfit_worn(),

        // Filters
        KeyCode::Char('F') => app.toggle_favorites_filter(),

        // Sorting
        KeyCode::Char('n') => app.toggle_outfit_sort(OutfitSortColumn::Name),
        KeyCode::Char('d') => app.toggle_outfit_sort(OutfitSortColumn::Added),
        _ => {}
    }
}

fn handle_profile_keys(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('L') {
        app.logout();
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            // Keep the query applied and return to browsing
            app.state = AppState::Normal;
            app.closet_selection = 0;
            app.outfit_selection = 0;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            if can_add_field_char(app.search_query.len(), c) {
                app.search_query.push(c);
            }
        }
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+R toggles between sign-in and registration
    if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.login_mode = match app.login_mode {
            LoginMode::SignIn => LoginMode::Register,
            LoginMode::Register => LoginMode::SignIn,
        };
        app.login_focus = LoginFocus::Email;
        app.login_error = None;
        return Ok(false);
    }

    let next_focus = |focus: LoginFocus, mode: LoginMode| match (focus, mode) {
        (LoginFocus::Email, _) => LoginFocus::Password,
        (LoginFocus::Password, LoginMode::Register) => LoginFocus::Name,
        (LoginFocus::Password, LoginMode::SignIn) => LoginFocus::Button,
        (LoginFocus::Name, _) => LoginFocus::Button,
        (LoginFocus::Button, _) => LoginFocus::Email,
    };
    let prev_focus = |focus: LoginFocus, mode: LoginMode| match (focus, mode) {
        (LoginFocus::Email, _) => LoginFocus::Button,
        (LoginFocus::Password, _) => LoginFocus::Email,
        (LoginFocus::Name, _) => LoginFocus::Password,
        (LoginFocus::Button, LoginMode::Register) => LoginFocus::Name,
        (LoginFocus::Button, LoginMode::SignIn) => LoginFocus::Password,
    };

    match key.code {
        KeyCode::Esc => {
            // Browse whatever is cached behind the login
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = next_focus(app.login_focus, app.login_mode);
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = prev_focus(app.login_focus, app.login_mode);
        }
        KeyCode::Enter => {
            if app.login_focus == LoginFocus::Button {
                // Errors stay on the form; a success kicks off a sync
                if app.attempt_login().await.is_ok() {
                    app.refresh_all_background().await;
                }
            } else {
                app.login_focus = next_focus(app.login_focus, app.login_mode);
            }
        }
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Name => {
                app.login_name.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Name => {
                if can_add_field_char(app.login_name.len(), c) {
                    app.login_name.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}

fn handle_item_form_input(app: &mut App, key: KeyEvent) {
    let focus = app.item_form.focus;

    // Non-text fields accept action keys
    let in_text_field = matches!(
        focus,
        ItemFormField::Name | ItemFormField::Description | ItemFormField::Brand | ItemFormField::ImagePath
    );

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.item_form.focus = focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.item_form.focus = focus.prev();
        }
        KeyCode::Enter => {
            if focus == ItemFormField::Submit {
                app.submit_item_form();
            } else {
                app.item_form.focus = focus.next();
            }
        }
        KeyCode::Left => match focus {
            ItemFormField::Category => app.item_form.category = app.item_form.category.prev(),
            ItemFormField::Color => app.item_form.color = app.item_form.color.prev(),
            ItemFormField::Seasons => {
                app.item_form.season_cursor = app.item_form.season_cursor.saturating_sub(1);
            }
            ItemFormField::Occasions => {
                app.item_form.occasion_cursor = app.item_form.occasion_cursor.saturating_sub(1);
            }
            _ => {}
        },
        KeyCode::Right => match focus {
            ItemFormField::Category => app.item_form.category = app.item_form.category.next(),
            ItemFormField::Color => app.item_form.color = app.item_form.color.next(),
            ItemFormField::Seasons => {
                app.item_form.season_cursor =
                    (app.item_form.season_cursor + 1).min(Season::ALL.len() - 1);
            }
            ItemFormField::Occasions => {
                app.item_form.occasion_cursor =
                    (app.item_form.occasion_cursor + 1).min(Occasion::ALL.len() - 1);
            }
            _ => {}
        },
        KeyCode::Char(' ') if !in_text_field => match focus {
            ItemFormField::Seasons => app.item_form.toggle_season_at_cursor(),
            ItemFormField::Occasions => app.item_form.toggle_occasion_at_cursor(),
            _ => {}
        },
        KeyCode::Char('F') if !in_text_field => {
            app.item_form.favorite = !app.item_form.favorite;
        }
        KeyCode::Backspace if in_text_field => {
            let field = item_form_text_field(app, focus);
            field.pop();
        }
        KeyCode::Char(c) if in_text_field => {
            let len = item_form_text_field(app, focus).len();
            if can_add_field_char(len, c) {
                item_form_text_field(app, focus).push(c);
            }
        }
        _ => {}
    }
}

/// Borrow the String behind a text-entry field of the item form
fn item_form_text_field(app: &mut App, focus: ItemFormField) -> &mut String {
    match focus {
        ItemFormField::Name => &mut app.item_form.name,
        ItemFormField::Description => &mut app.item_form.description,
        ItemFormField::Brand => &mut app.item_form.brand,
        ItemFormField::ImagePath => &mut app.item_form.image_path,
        // Callers only pass text fields
        _ => &mut app.item_form.name,
    }
}

fn handle_outfit_form_input(app: &mut App, key: KeyEvent) {
    let focus = app.outfit_form.focus;

    let in_text_field = matches!(focus, OutfitFormField::Name | OutfitFormField::Description);
    let item_count = app.items.len();

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Tab => {
            app.outfit_form.focus = focus.next();
        }
        KeyCode::BackTab => {
            app.outfit_form.focus = focus.prev();
        }
        KeyCode::Down => {
            if focus == OutfitFormField::Items && item_count > 0 {
                app.outfit_form.item_cursor =
                    (app.outfit_form.item_cursor + 1).min(item_count - 1);
            } else {
                app.outfit_form.focus = focus.next();
            }
        }
        KeyCode::Up => {
            if focus == OutfitFormField::Items && app.outfit_form.item_cursor > 0 {
                app.outfit_form.item_cursor -= 1;
            } else {
                app.outfit_form.focus = focus.prev();
            }
        }
        KeyCode::Enter => {
            if focus == OutfitFormField::Submit {
                app.submit_outfit_form();
            } else if focus == OutfitFormField::Items {
                // Enter also toggles in the picker
                toggle_picker_item(app);
            } else {
                app.outfit_form.focus = focus.next();
            }
        }
        KeyCode::Left => match focus {
            OutfitFormField::Seasons => {
                app.outfit_form.season_cursor = app.outfit_form.season_cursor.saturating_sub(1);
            }
            OutfitFormField::Occasions => {
                app.outfit_form.occasion_cursor = app.outfit_form.occasion_cursor.saturating_sub(1);
            }
            _ => {}
        },
        KeyCode::Right => match focus {
            OutfitFormField::Seasons => {
                app.outfit_form.season_cursor =
                    (app.outfit_form.season_cursor + 1).min(Season::ALL.len() - 1);
            }
            OutfitFormField::Occasions => {
                app.outfit_form.occasion_cursor =
                    (app.outfit_form.occasion_cursor + 1).min(Occasion::ALL.len() - 1);
            }
            _ => {}
        },
        KeyCode::Char(' ') if !in_text_field => match focus {
            OutfitFormField::Seasons => app.outfit_form.toggle_season_at_cursor(),
            OutfitFormField::Occasions => app.outfit_form.toggle_occasion_at_cursor(),
            OutfitFormField::Items => toggle_picker_item(app),
            _ => {}
        },
        KeyCode::Backspace if in_text_field => {
            match focus {
                OutfitFormField::Name => {
                    app.outfit_form.name.pop();
                }
                OutfitFormField::Description => {
                    app.outfit_form.description.pop();
                }
                _ => {}
            };
        }
        KeyCode::Char(c) if in_text_field => match focus {
            OutfitFormField::Name => {
                if can_add_field_char(app.outfit_form.name.len(), c) {
                    app.outfit_form.name.push(c);
                }
            }
            OutfitFormField::Description => {
                if can_add_field_char(app.outfit_form.description.len(), c) {
                    app.outfit_form.description.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
}

/// Toggle the item under the picker cursor in the outfit form
fn toggle_picker_item(app: &mut App) {
    let id = app
        .items
        .get(app.outfit_form.item_cursor)
        .map(|i| i.id.clone());
    if let Some(id) = id {
        app.outfit_form.toggle_item(&id);
    }
}
