//! Application state management for Shelfdesk.
//!
//! This module contains the core `App` struct that manages all
//! application state: the loaded collections, UI state, the login form,
//! and background task coordination over the UI event channel.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use shelfdesk_core::models::{Book, IssueRequest, Loan, Member, NewBook, NewMember};
use shelfdesk_core::{
    ApiClient, ApiError, Config, CredentialStore, Navigator, Notifier, Toast, ToastKind,
    TokenStore,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input.
/// The service caps usernames at 50 characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for email input.
pub const MAX_EMAIL_LENGTH: usize = 80;

/// Maximum length for book title and author inputs.
pub const MAX_TEXT_LENGTH: usize = 120;

/// Maximum digits for the quantity input.
pub const MAX_QUANTITY_DIGITS: usize = 4;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Books,
    Members,
    Loans,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Books => "Books",
            Tab::Members => "Members",
            Tab::Loans => "Loans",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Books => Tab::Members,
            Tab::Members => Tab::Loans,
            Tab::Loans => Tab::Books,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Books => Tab::Loans,
            Tab::Members => Tab::Books,
            Tab::Loans => Tab::Members,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    AddingBook,
    RegisteringMember,
    IssuingBook,
    ConfirmingDelete,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Whether the auth overlay is logging in or creating an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Email,
    Password,
    Button,
}

/// Add-book form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookFormFocus {
    Title,
    Author,
    Quantity,
}

/// Issue form focus: which selection pane is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueFocus {
    Books,
    Members,
}

// ============================================================================
// UI Events
// ============================================================================

/// Events delivered to the UI thread from background tasks and from the
/// request client's notification/navigation hooks. Drained once per
/// event-loop tick; whichever refresh result arrives last wins.
pub enum UiEvent {
    /// Book catalog fetched successfully
    Books(Vec<Book>),
    /// Member list fetched successfully
    Members(Vec<Member>),
    /// Active loan list fetched successfully
    Loans(Vec<Loan>),
    /// A notification to display
    Toast(String, ToastKind),
    /// The session guard or a 401 asked for the login screen
    LoginRequested,
}

/// Notifier implementation that forwards toasts onto the UI channel.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        let _ = self.tx.send(UiEvent::Toast(message.to_string(), kind));
    }
}

/// Navigator implementation that forwards the login redirect onto the
/// UI channel. Results of requests still in flight are superseded by
/// this event.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn request_login(&self) {
        let _ = self.tx.send(UiEvent::LoginRequested);
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub tokens: TokenStore,
    pub api: ApiClient,
    pub navigator: Arc<dyn Navigator>,
    pub server_url: String,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub toasts: Vec<Toast>,

    // Login form state
    pub auth_mode: AuthMode,
    pub login_username: String,
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Add-book form state
    pub book_title_input: String,
    pub book_author_input: String,
    pub book_quantity_input: String,
    pub book_form_focus: BookFormFocus,

    // Register-member form state
    pub member_name_input: String,

    // Issue form state
    pub issue_focus: IssueFocus,
    pub issue_book_selection: usize,
    pub issue_member_selection: usize,

    // Loaded data
    pub books: Vec<Book>,
    pub members: Vec<Member>,
    pub loans: Vec<Loan>,

    // Selection indices
    pub books_selection: usize,
    pub members_selection: usize,
    pub loans_selection: usize,

    // True once a credential has been accepted this run; used to label
    // the login overlay when the server later rejects it
    session_active: bool,

    // UI event channel
    events_rx: mpsc::UnboundedReceiver<UiEvent>,
    events_tx: mpsc::UnboundedSender<UiEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let tokens = TokenStore::new(cache_dir);

        let (tx, rx) = mpsc::unbounded_channel();
        let notifier: Arc<dyn Notifier> = Arc::new(ChannelNotifier::new(tx.clone()));
        let navigator: Arc<dyn Navigator> = Arc::new(ChannelNavigator::new(tx.clone()));

        let server_url = std::env::var("SHELFDESK_SERVER")
            .ok()
            .unwrap_or_else(|| config.server_url.clone());
        debug!(server_url = %server_url, "Server configured");

        let api = ApiClient::new(
            &server_url,
            tokens.clone(),
            notifier,
            Arc::clone(&navigator),
        )?;

        // Prefill the login form from env vars, the stored session, or
        // the config, in that order
        let login_username = std::env::var("SHELFDESK_USERNAME")
            .ok()
            .or_else(|| tokens.username())
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var("SHELFDESK_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            tokens,
            api,
            navigator,
            server_url,

            state: AppState::Normal,
            current_tab: Tab::Books,
            toasts: Vec::new(),

            auth_mode: AuthMode::Login,
            login_username,
            login_email: String::new(),
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            book_title_input: String::new(),
            book_author_input: String::new(),
            book_quantity_input: String::new(),
            book_form_focus: BookFormFocus::Title,

            member_name_input: String::new(),

            issue_focus: IssueFocus::Books,
            issue_book_selection: 0,
            issue_member_selection: 0,

            books: Vec::new(),
            members: Vec::new(),
            loans: Vec::new(),

            books_selection: 0,
            members_selection: 0,
            loans_selection: 0,

            session_active: false,

            events_rx: rx,
            events_tx: tx,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if a credential is present
    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some()
    }

    /// Record that the current credential has been accepted for use
    pub fn mark_session_active(&mut self) {
        self.session_active = true;
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;

        // Prefill the password from the keychain when available
        if self.login_password.is_empty() && !self.login_username.is_empty() {
            if let Ok(password) = CredentialStore::password_for(&self.login_username) {
                self.login_password = password;
            }
        }
    }

    /// Clear the credential and return to the login overlay
    pub fn logout(&mut self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear stored credential");
        }
        self.session_active = false;
        self.books.clear();
        self.members.clear();
        self.loans.clear();
        self.login_password.clear();
        info!("Logged out");
        self.start_login();
    }

    /// Attempt login (or signup) with the credentials from the form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }
        if self.auth_mode == AuthMode::Signup && self.login_email.trim().is_empty() {
            self.login_error = Some("Email required".to_string());
            return Err(anyhow::anyhow!("Email required"));
        }

        self.login_error = None;

        let result = match self.auth_mode {
            AuthMode::Login => self.api.login(&username, &password).await,
            AuthMode::Signup => {
                self.api
                    .signup(&username, self.login_email.trim(), &password)
                    .await
            }
        };

        match result {
            Ok(token) => {
                self.tokens.store(&token.access_token, &username)?;

                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.session_active = true;
                self.state = AppState::Normal;
                info!("Login successful");

                self.refresh_all();
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Login failed");
                self.login_error = Some(Self::login_error_message(&e));
                Err(e.into())
            }
        }
    }

    /// Translate an auth failure into something worth showing on the form
    fn login_error_message(error: &ApiError) -> String {
        match error {
            ApiError::Rejected(message) => message.clone(),
            ApiError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => format!("Login failed: {}", other),
        }
    }

    /// Interactive login for the --login CLI flow
    pub async fn login_interactive(&mut self) -> Result<()> {
        println!("\n=== Shelfdesk Login ===\n");

        let username = {
            let default = self.login_username.clone();
            if default.is_empty() {
                Self::prompt_line("Username: ")?
            } else {
                print!("Username [{}]: ", default);
                io::stdout().flush()?;
                let input = Self::read_line()?;
                if input.is_empty() {
                    default
                } else {
                    input
                }
            }
        };

        let password = if CredentialStore::has_password(&username) {
            print!("Use stored password? [Y/n]: ");
            io::stdout().flush()?;
            if Self::read_line()?.to_lowercase() != "n" {
                CredentialStore::password_for(&username)?
            } else {
                rpassword::prompt_password("Password: ")?
            }
        } else {
            rpassword::prompt_password("Password: ")?
        };

        println!("\nAuthenticating...");

        let token = self.api.login(&username, &password).await?;
        self.tokens.store(&token.access_token, &username)?;

        if let Err(e) = CredentialStore::store(&username, &password) {
            warn!(error = %e, "Failed to store credentials");
        }

        self.config.last_username = Some(username);
        self.config.save()?;

        println!("Login successful!\n");
        Ok(())
    }

    fn prompt_line(prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        Self::read_line()
    }

    fn read_line() -> Result<String> {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    // =========================================================================
    // Background data loading
    // =========================================================================

    /// Refresh all three collections in one background task
    pub fn refresh_all(&mut self) {
        info!("Starting background refresh of all data");
        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let (books, members, loans) =
                tokio::join!(api.list_books(), api.list_members(), api.active_loans());

            match books {
                Ok(data) => {
                    let _ = tx.send(UiEvent::Books(data));
                }
                Err(e) => debug!(error = %e, "Book list refresh failed"),
            }
            match members {
                Ok(data) => {
                    let _ = tx.send(UiEvent::Members(data));
                }
                Err(e) => debug!(error = %e, "Member list refresh failed"),
            }
            match loans {
                Ok(data) => {
                    let _ = tx.send(UiEvent::Loans(data));
                }
                Err(e) => debug!(error = %e, "Loan list refresh failed"),
            }
        });
    }

    async fn fetch_books(api: &ApiClient, tx: &mpsc::UnboundedSender<UiEvent>) {
        match api.list_books().await {
            Ok(data) => {
                let _ = tx.send(UiEvent::Books(data));
            }
            Err(e) => debug!(error = %e, "Book list refresh failed"),
        }
    }

    async fn fetch_members(api: &ApiClient, tx: &mpsc::UnboundedSender<UiEvent>) {
        match api.list_members().await {
            Ok(data) => {
                let _ = tx.send(UiEvent::Members(data));
            }
            Err(e) => debug!(error = %e, "Member list refresh failed"),
        }
    }

    async fn fetch_loans(api: &ApiClient, tx: &mpsc::UnboundedSender<UiEvent>) {
        match api.active_loans().await {
            Ok(data) => {
                let _ = tx.send(UiEvent::Loans(data));
            }
            Err(e) => debug!(error = %e, "Loan list refresh failed"),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit the add-book form. Failures are already toasted by the
    /// request client; the book list only refreshes on success.
    pub fn submit_add_book(&mut self) {
        let title = self.book_title_input.trim().to_string();
        let author = self.book_author_input.trim().to_string();

        if title.is_empty() || author.is_empty() {
            self.toast("Please enter a title and an author.", ToastKind::Error);
            return;
        }
        let quantity: i64 = match self.book_quantity_input.trim().parse() {
            Ok(q) => q,
            Err(_) => {
                self.toast("Quantity must be a whole number.", ToastKind::Error);
                return;
            }
        };

        self.state = AppState::Normal;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        let payload = NewBook {
            title,
            author,
            quantity,
        };

        tokio::spawn(async move {
            match api.create_book(&payload).await {
                Ok(book) => {
                    let _ = tx.send(UiEvent::Toast(
                        format!("\"{}\" added successfully!", book.title),
                        ToastKind::Success,
                    ));
                    Self::fetch_books(&api, &tx).await;
                }
                Err(e) => debug!(error = %e, "Add book failed"),
            }
        });
    }

    /// Delete the selected book after confirmation
    pub fn delete_selected_book(&mut self) {
        let Some(book) = self.books.get(self.books_selection) else {
            return;
        };
        let book_id = book.id;

        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            match api.delete_book(book_id).await {
                Ok(()) => {
                    let _ = tx.send(UiEvent::Toast("Book deleted.".to_string(), ToastKind::Success));
                    Self::fetch_books(&api, &tx).await;
                }
                Err(e) => debug!(error = %e, "Delete book failed"),
            }
        });
    }

    /// Submit the register-member form
    pub fn submit_register_member(&mut self) {
        let name = self.member_name_input.trim().to_string();
        if name.is_empty() {
            self.toast("Please enter a member name.", ToastKind::Error);
            return;
        }

        self.state = AppState::Normal;

        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            match api.register_member(&NewMember { name }).await {
                Ok(member) => {
                    let _ = tx.send(UiEvent::Toast(
                        format!("Member \"{}\" registered!", member.name),
                        ToastKind::Success,
                    ));
                    Self::fetch_members(&api, &tx).await;
                }
                Err(e) => debug!(error = %e, "Register member failed"),
            }
        });
    }

    /// Submit the issue form. The quantity changes server-side, so both
    /// the book list and the loan list refresh - but only on success.
    pub fn submit_issue(&mut self) {
        let book_id = self.books.get(self.issue_book_selection).map(|b| b.id);
        let member_id = self.members.get(self.issue_member_selection).map(|m| m.id);

        let (Some(book_id), Some(member_id)) = (book_id, member_id) else {
            self.toast("Please select both a book and a member.", ToastKind::Error);
            return;
        };

        self.state = AppState::Normal;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        let payload = IssueRequest { book_id, member_id };

        tokio::spawn(async move {
            match api.issue_book(&payload).await {
                Ok(loan) => {
                    let _ = tx.send(UiEvent::Toast(
                        format!("\"{}\" issued to {}!", loan.book_label(), loan.member_label()),
                        ToastKind::Success,
                    ));
                    Self::fetch_books(&api, &tx).await;
                    Self::fetch_loans(&api, &tx).await;
                }
                Err(e) => debug!(error = %e, "Issue book failed"),
            }
        });
    }

    /// Return the selected loan
    pub fn return_selected_loan(&mut self) {
        let Some(loan) = self.loans.get(self.loans_selection) else {
            return;
        };
        let loan_id = loan.id;

        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            match api.return_book(loan_id).await {
                Ok(loan) => {
                    let _ = tx.send(UiEvent::Toast(
                        format!(
                            "\"{}\" returned by {}.",
                            loan.book_label(),
                            loan.member_label()
                        ),
                        ToastKind::Success,
                    ));
                    Self::fetch_books(&api, &tx).await;
                    Self::fetch_loans(&api, &tx).await;
                }
                Err(e) => debug!(error = %e, "Return book failed"),
            }
        });
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    /// Drain and apply pending UI events from background tasks
    pub fn process_events(&mut self) {
        // Collect first to avoid holding the receiver across mutations
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }

        for event in events {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Books(data) => {
                self.books = data;
                self.books_selection = Self::clamp(self.books_selection, self.books.len());
                self.issue_book_selection =
                    Self::clamp(self.issue_book_selection, self.books.len());
            }
            UiEvent::Members(data) => {
                self.members = data;
                self.members_selection = Self::clamp(self.members_selection, self.members.len());
                self.issue_member_selection =
                    Self::clamp(self.issue_member_selection, self.members.len());
            }
            UiEvent::Loans(data) => {
                self.loans = data;
                self.loans_selection = Self::clamp(self.loans_selection, self.loans.len());
            }
            UiEvent::Toast(message, kind) => {
                self.toasts.push(Toast::new(message, kind));
            }
            UiEvent::LoginRequested => {
                let expired = self.session_active;
                self.session_active = false;

                // The redirect is terminal for the current page state
                self.books.clear();
                self.members.clear();
                self.loans.clear();

                if self.state != AppState::LoggingIn {
                    self.start_login();
                }
                if expired {
                    self.login_error = Some("Session expired. Please log in again.".to_string());
                }
            }
        }
    }

    /// Drop toasts that have outlived their display duration
    pub fn prune_toasts(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    /// Push an app-level toast (validation feedback, success messages)
    pub fn toast(&mut self, message: &str, kind: ToastKind) {
        self.toasts.push(Toast::new(message, kind));
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn move_selection(&mut self, delta: i64) {
        let (selection, len) = match self.current_tab {
            Tab::Books => (&mut self.books_selection, self.books.len()),
            Tab::Members => (&mut self.members_selection, self.members.len()),
            Tab::Loans => (&mut self.loans_selection, self.loans.len()),
        };
        *selection = Self::step(*selection, delta, len);
    }

    pub fn move_issue_selection(&mut self, delta: i64) {
        let (selection, len) = match self.issue_focus {
            IssueFocus::Books => (&mut self.issue_book_selection, self.books.len()),
            IssueFocus::Members => (&mut self.issue_member_selection, self.members.len()),
        };
        *selection = Self::step(*selection, delta, len);
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.books.get(self.books_selection)
    }

    fn step(current: usize, delta: i64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let moved = current as i64 + delta;
        moved.clamp(0, len as i64 - 1) as usize
    }

    fn clamp(current: usize, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            current.min(len - 1)
        }
    }

    // =========================================================================
    // Form helpers
    // =========================================================================

    /// Reset the add-book form before showing it
    pub fn open_add_book_form(&mut self) {
        self.book_title_input.clear();
        self.book_author_input.clear();
        self.book_quantity_input = "1".to_string();
        self.book_form_focus = BookFormFocus::Title;
        self.state = AppState::AddingBook;
    }

    /// Reset the register-member form before showing it
    pub fn open_register_member_form(&mut self) {
        self.member_name_input.clear();
        self.state = AppState::RegisteringMember;
    }

    /// Open the issue form, seeded from the current book selection
    pub fn open_issue_form(&mut self) {
        if self.books.is_empty() || self.members.is_empty() {
            self.toast("Please select both a book and a member.", ToastKind::Error);
            return;
        }
        self.issue_focus = IssueFocus::Books;
        self.issue_book_selection = self.books_selection.min(self.books.len() - 1);
        self.issue_member_selection = 0;
        self.state = AppState::IssuingBook;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Books.next(), Tab::Members);
        assert_eq!(Tab::Loans.next(), Tab::Books);
        assert_eq!(Tab::Books.prev(), Tab::Loans);
    }

    #[test]
    fn test_step_clamps_to_bounds() {
        assert_eq!(App::step(0, -1, 5), 0);
        assert_eq!(App::step(4, 1, 5), 4);
        assert_eq!(App::step(2, 1, 5), 3);
        assert_eq!(App::step(0, 1, 0), 0);
    }

    #[test]
    fn test_clamp_handles_shrinking_lists() {
        assert_eq!(App::clamp(4, 2), 1);
        assert_eq!(App::clamp(0, 0), 0);
        assert_eq!(App::clamp(1, 5), 1);
    }
}
