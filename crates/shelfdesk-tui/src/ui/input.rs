//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    App, AppState, AuthMode, BookFormFocus, IssueFocus, LoginFocus, Tab, MAX_EMAIL_LENGTH,
    MAX_PASSWORD_LENGTH, MAX_QUANTITY_DIGITS, MAX_TEXT_LENGTH, MAX_USERNAME_LENGTH,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::AddingBook => {
            handle_add_book_input(app, key);
            return Ok(false);
        }
        AppState::RegisteringMember => {
            handle_register_member_input(app, key);
            return Ok(false);
        }
        AppState::IssuingBook => {
            handle_issue_input(app, key);
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Normal;
                    app.delete_selected_book();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
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
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.current_tab = Tab::Books,
        KeyCode::Char('2') => app.current_tab = Tab::Members,
        KeyCode::Char('3') => app.current_tab = Tab::Loans,
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Char('u') => app.refresh_all(),
        KeyCode::Char('o') => app.logout(),
        KeyCode::Char('a') => match app.current_tab {
            Tab::Books => app.open_add_book_form(),
            Tab::Members => app.open_register_member_form(),
            Tab::Loans => {}
        },
        KeyCode::Char('d') => {
            if app.current_tab == Tab::Books && app.selected_book().is_some() {
                app.state = AppState::ConfirmingDelete;
            }
        }
        KeyCode::Char('i') => {
            if app.current_tab == Tab::Loans {
                app.open_issue_form();
            }
        }
        KeyCode::Char('r') => {
            if app.current_tab == Tab::Loans {
                app.return_selected_loan();
            }
        }
        _ => {}
    }

    Ok(false)
}

/// Focus order for the login form, depending on mode
fn login_focus_ring(mode: AuthMode) -> &'static [LoginFocus] {
    match mode {
        AuthMode::Login => &[LoginFocus::Username, LoginFocus::Password, LoginFocus::Button],
        AuthMode::Signup => &[
            LoginFocus::Username,
            LoginFocus::Email,
            LoginFocus::Password,
            LoginFocus::Button,
        ],
    }
}

fn cycle_login_focus(app: &mut App, forward: bool) {
    let ring = login_focus_ring(app.auth_mode);
    let pos = ring
        .iter()
        .position(|f| *f == app.login_focus)
        .unwrap_or(0);
    let next = if forward {
        (pos + 1) % ring.len()
    } else {
        (pos + ring.len() - 1) % ring.len()
    };
    app.login_focus = ring[next];
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Without a credential there is nothing to go back to
            if app.is_authenticated() {
                app.state = AppState::Normal;
            } else {
                app.state = AppState::ConfirmingQuit;
            }
        }
        KeyCode::F(2) => {
            app.auth_mode = match app.auth_mode {
                AuthMode::Login => AuthMode::Signup,
                AuthMode::Signup => AuthMode::Login,
            };
            app.login_error = None;
            if app.auth_mode == AuthMode::Login && app.login_focus == LoginFocus::Email {
                app.login_focus = LoginFocus::Password;
            }
        }
        KeyCode::Tab | KeyCode::Down => cycle_login_focus(app, true),
        KeyCode::BackTab | KeyCode::Up => cycle_login_focus(app, false),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username | LoginFocus::Email => cycle_login_focus(app, true),
            LoginFocus::Password | LoginFocus::Button => {
                // Errors stay on the form; nothing to do here
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if app.login_username.chars().count() < MAX_USERNAME_LENGTH {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Email => {
                if app.login_email.chars().count() < MAX_EMAIL_LENGTH {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if app.login_password.chars().count() < MAX_PASSWORD_LENGTH {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_add_book_input(app: &mut App, key: KeyEvent) {
    let next_focus = |focus: BookFormFocus| match focus {
        BookFormFocus::Title => BookFormFocus::Author,
        BookFormFocus::Author => BookFormFocus::Quantity,
        BookFormFocus::Quantity => BookFormFocus::Title,
    };

    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Tab | KeyCode::Down => app.book_form_focus = next_focus(app.book_form_focus),
        KeyCode::Enter => {
            if app.book_form_focus == BookFormFocus::Quantity {
                app.submit_add_book();
            } else {
                app.book_form_focus = next_focus(app.book_form_focus);
            }
        }
        KeyCode::Backspace => {
            match app.book_form_focus {
                BookFormFocus::Title => app.book_title_input.pop(),
                BookFormFocus::Author => app.book_author_input.pop(),
                BookFormFocus::Quantity => app.book_quantity_input.pop(),
            };
        }
        KeyCode::Char(c) => match app.book_form_focus {
            BookFormFocus::Title => {
                if app.book_title_input.chars().count() < MAX_TEXT_LENGTH {
                    app.book_title_input.push(c);
                }
            }
            BookFormFocus::Author => {
                if app.book_author_input.chars().count() < MAX_TEXT_LENGTH {
                    app.book_author_input.push(c);
                }
            }
            BookFormFocus::Quantity => {
                if c.is_ascii_digit()
                    && app.book_quantity_input.chars().count() < MAX_QUANTITY_DIGITS
                {
                    app.book_quantity_input.push(c);
                }
            }
        },
        _ => {}
    }
}

fn handle_register_member_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => app.submit_register_member(),
        KeyCode::Backspace => {
            app.member_name_input.pop();
        }
        KeyCode::Char(c) => {
            if app.member_name_input.chars().count() < MAX_TEXT_LENGTH {
                app.member_name_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_issue_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            app.issue_focus = match app.issue_focus {
                IssueFocus::Books => IssueFocus::Members,
                IssueFocus::Members => IssueFocus::Books,
            };
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_issue_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_issue_selection(1),
        KeyCode::Enter => app.submit_issue(),
        _ => {}
    }
}
