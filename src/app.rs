//! Application state management for Threadcache.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, the in-memory closet synchronized with the backend,
//! session management, and background task coordination.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::{ApiClient, ProcessedImage};
use crate::auth::{CredentialStore, Session};
use crate::cache::CacheManager;
use crate::config::Config;
use crate::models::{
    Category, ClothingItem, Color, ItemDraft, ItemPatch, ItemSortColumn, Occasion, Outfit,
    OutfitDraft, OutfitPatch, OutfitSortColumn, Season, User,
};
use crate::seed;
use crate::utils::cmp_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 is sufficient for a full refresh (3 fetches) plus queued mutations.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for free-text form fields (names, brands, paths).
const MAX_FIELD_LENGTH: usize = 120;

/// Number of items to scroll on page up/down.
/// 10 rows provides a good balance of speed without losing context.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Closet,
    Outfits,
    Profile,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Closet => "Closet",
            Tab::Outfits => "Outfits",
            Tab::Profile => "Profile",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Closet => Tab::Outfits,
            Tab::Outfits => Tab::Profile,
            Tab::Profile => Tab::Closet,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Closet => Tab::Profile,
            Tab::Outfits => Tab::Closet,
            Tab::Profile => Tab::Outfits,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    EditingItem,
    EditingOutfit,
    ConfirmingDelete,
    ConfirmingQuit,
    ConfirmingOffline,
    ConfirmingOnline,
    Quitting,
}

/// Login overlay mode: existing account or new registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    Register,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Name,
    Button,
}

/// What a pending delete confirmation refers to
#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Item(String),
    Outfit(String),
}

// ============================================================================
// Form State
// ============================================================================

/// Fields of the item form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormField {
    Name,
    Description,
    Brand,
    ImagePath,
    Category,
    Color,
    Seasons,
    Occasions,
    Submit,
}

impl ItemFormField {
    pub fn next(&self) -> Self {
        match self {
            ItemFormField::Name => ItemFormField::Description,
            ItemFormField::Description => ItemFormField::Brand,
            ItemFormField::Brand => ItemFormField::ImagePath,
            ItemFormField::ImagePath => ItemFormField::Category,
            ItemFormField::Category => ItemFormField::Color,
            ItemFormField::Color => ItemFormField::Seasons,
            ItemFormField::Seasons => ItemFormField::Occasions,
            ItemFormField::Occasions => ItemFormField::Submit,
            ItemFormField::Submit => ItemFormField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ItemFormField::Name => ItemFormField::Submit,
            ItemFormField::Description => ItemFormField::Name,
            ItemFormField::Brand => ItemFormField::Description,
            ItemFormField::ImagePath => ItemFormField::Brand,
            ItemFormField::Category => ItemFormField::ImagePath,
            ItemFormField::Color => ItemFormField::Category,
            ItemFormField::Seasons => ItemFormField::Color,
            ItemFormField::Occasions => ItemFormField::Seasons,
            ItemFormField::Submit => ItemFormField::Occasions,
        }
    }
}

/// Item add/edit form state
#[derive(Debug, Clone)]
pub struct ItemForm {
    /// Some(id) when editing an existing item, None when adding
    pub editing_id: Option<String>,
    pub name: String,
    pub description: String,
    pub brand: String,
    /// Local file path to upload for background removal, or a URL used as-is
    pub image_path: String,
    pub category: Category,
    pub color: Color,
    pub seasons: Vec<Season>,
    pub season_cursor: usize,
    pub occasions: Vec<Occasion>,
    pub occasion_cursor: usize,
    pub favorite: bool,
    pub focus: ItemFormField,
    pub error: Option<String>,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            editing_id: None,
            name: String::new(),
            description: String::new(),
            brand: String::new(),
            image_path: String::new(),
            category: Category::Tops,
            color: Color::Black,
            seasons: vec![Season::All],
            season_cursor: 0,
            occasions: vec![Occasion::Casual],
            occasion_cursor: 0,
            favorite: false,
            focus: ItemFormField::Name,
            error: None,
        }
    }
}

impl ItemForm {
    pub fn from_item(item: &ClothingItem) -> Self {
        Self {
            editing_id: Some(item.id.clone()),
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            brand: item.brand.clone().unwrap_or_default(),
            image_path: item.image_url.clone(),
            category: item.category,
            color: item.color,
            seasons: item.season.clone(),
            season_cursor: 0,
            occasions: item.occasion.clone(),
            occasion_cursor: 0,
            favorite: item.favorite,
            focus: ItemFormField::Name,
            error: None,
        }
    }

    pub fn toggle_season_at_cursor(&mut self) {
        let season = Season::ALL[self.season_cursor];
        if let Some(pos) = self.seasons.iter().position(|s| *s == season) {
            self.seasons.remove(pos);
        } else {
            self.seasons.push(season);
        }
    }

    pub fn toggle_occasion_at_cursor(&mut self) {
        let occasion = Occasion::ALL[self.occasion_cursor];
        if let Some(pos) = self.occasions.iter().position(|o| *o == occasion) {
            self.occasions.remove(pos);
        } else {
            self.occasions.push(occasion);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.seasons.is_empty() {
            return Err("Select at least one season".to_string());
        }
        if self.occasions.is_empty() {
            return Err("Select at least one occasion".to_string());
        }
        Ok(())
    }

    fn optional(text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn to_draft(&self) -> ItemDraft {
        let image_url = if self.image_path.trim().is_empty() {
            "/placeholder.svg".to_string()
        } else {
            self.image_path.trim().to_string()
        };

        ItemDraft {
            name: self.name.trim().to_string(),
            description: Self::optional(&self.description),
            image_url,
            category: self.category,
            color: self.color,
            season: self.seasons.clone(),
            occasion: self.occasions.clone(),
            brand: Self::optional(&self.brand),
            favorite: self.favorite,
        }
    }

    /// Edit form patches every field it shows
    pub fn to_patch(&self) -> ItemPatch {
        let draft = self.to_draft();
        ItemPatch {
            name: Some(draft.name),
            description: draft.description,
            image_url: Some(draft.image_url),
            category: Some(draft.category),
            color: Some(draft.color),
            season: Some(draft.season),
            occasion: Some(draft.occasion),
            brand: draft.brand,
            favorite: Some(draft.favorite),
            last_worn: None,
        }
    }
}

/// Fields of the outfit form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutfitFormField {
    Name,
    Description,
    Seasons,
    Occasions,
    Items,
    Submit,
}

impl OutfitFormField {
    pub fn next(&self) -> Self {
        match self {
            OutfitFormField::Name => OutfitFormField::Description,
            OutfitFormField::Description => OutfitFormField::Seasons,
            OutfitFormField::Seasons => OutfitFormField::Occasions,
            OutfitFormField::Occasions => OutfitFormField::Items,
            OutfitFormField::Items => OutfitFormField::Submit,
            OutfitFormField::Submit => OutfitFormField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            OutfitFormField::Name => OutfitFormField::Submit,
            OutfitFormField::Description => OutfitFormField::Name,
            OutfitFormField::Seasons => OutfitFormField::Description,
            OutfitFormField::Occasions => OutfitFormField::Seasons,
            OutfitFormField::Items => OutfitFormField::Occasions,
            OutfitFormField::Submit => OutfitFormField::Items,
        }
    }
}

/// Outfit add/edit form state
#[derive(Debug, Clone)]
pub struct OutfitForm {
    pub editing_id: Option<String>,
    pub name: String,
    pub description: String,
    pub seasons: Vec<Season>,
    pub season_cursor: usize,
    pub occasions: Vec<Occasion>,
    pub occasion_cursor: usize,
    /// Ids of closet items included in this outfit
    pub selected_items: Vec<String>,
    /// Cursor into the closet item picker list
    pub item_cursor: usize,
    pub favorite: bool,
    pub focus: OutfitFormField,
    pub error: Option<String>,
}

impl Default for OutfitForm {
    fn default() -> Self {
        Self {
            editing_id: None,
            name: String::new(),
            description: String::new(),
            seasons: vec![Season::All],
            season_cursor: 0,
            occasions: vec![Occasion::Casual],
            occasion_cursor: 0,
            selected_items: Vec::new(),
            item_cursor: 0,
            favorite: false,
            focus: OutfitFormField::Name,
            error: None,
        }
    }
}

impl OutfitForm {
    pub fn from_outfit(outfit: &Outfit) -> Self {
        Self {
            editing_id: Some(outfit.id.clone()),
            name: outfit.name.clone(),
            description: outfit.description.clone().unwrap_or_default(),
            seasons: outfit.season.clone(),
            season_cursor: 0,
            occasions: outfit.occasion.clone(),
            occasion_cursor: 0,
            selected_items: outfit.items.clone(),
            item_cursor: 0,
            favorite: outfit.favorite,
            focus: OutfitFormField::Name,
            error: None,
        }
    }

    pub fn toggle_season_at_cursor(&mut self) {
        let season = Season::ALL[self.season_cursor];
        if let Some(pos) = self.seasons.iter().position(|s| *s == season) {
            self.seasons.remove(pos);
        } else {
            self.seasons.push(season);
        }
    }

    pub fn toggle_occasion_at_cursor(&mut self) {
        let occasion = Occasion::ALL[self.occasion_cursor];
        if let Some(pos) = self.occasions.iter().position(|o| *o == occasion) {
            self.occasions.remove(pos);
        } else {
            self.occasions.push(occasion);
        }
    }

    pub fn toggle_item(&mut self, id: &str) {
        if let Some(pos) = self.selected_items.iter().position(|i| i == id) {
            self.selected_items.remove(pos);
        } else {
            self.selected_items.push(id.to_string());
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.selected_items.is_empty() {
            return Err("Select at least one item".to_string());
        }
        if self.seasons.is_empty() {
            return Err("Select at least one season".to_string());
        }
        if self.occasions.is_empty() {
            return Err("Select at least one occasion".to_string());
        }
        Ok(())
    }

    pub fn to_draft(&self) -> OutfitDraft {
        let description = self.description.trim();
        OutfitDraft {
            name: self.name.trim().to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            items: self.selected_items.clone(),
            occasion: self.occasions.clone(),
            season: self.seasons.clone(),
            favorite: self.favorite,
        }
    }

    /// Edit form patches every field it shows
    pub fn to_patch(&self) -> OutfitPatch {
        let draft = self.to_draft();
        OutfitPatch {
            name: Some(draft.name),
            description: draft.description,
            items: Some(draft.items),
            occasion: Some(draft.occasion),
            season: Some(draft.season),
            favorite: Some(draft.favorite),
            last_worn: None,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// A mutation waiting on image processing before it can be submitted
#[derive(Debug, Clone)]
pub enum PendingItemAction {
    Create(ItemDraft),
    Update(String, ItemPatch),
}

/// Result types from background tasks.
///
/// These variants are sent through an MPSC channel from spawned refresh
/// and mutation tasks back to the main application.
enum RefreshResult {
    /// Full item collection fetched successfully
    Items(Vec<ClothingItem>),
    /// Full outfit collection fetched successfully
    Outfits(Vec<Outfit>),
    /// Account profile fetched successfully
    Profile(User),
    /// Server accepted an item create
    ItemCreated(ClothingItem),
    /// Server accepted an item update
    ItemUpdated(ClothingItem),
    /// Server accepted an item delete
    ItemDeleted(String),
    /// Server accepted an outfit create
    OutfitCreated(Outfit),
    /// Server accepted an outfit update
    OutfitUpdated(Outfit),
    /// Server accepted an outfit delete
    OutfitDeleted(String),
    /// Background-removal finished; the mutation still needs submitting
    ImageProcessed(ProcessedImage, PendingItemAction),
    /// Signal that a full refresh has completed
    RefreshComplete,
    /// An error occurred in a background task
    Error(String),
}

/// Wardrobe statistics for the profile tab
#[derive(Debug, Default, Clone, Copy)]
pub struct WardrobeStats {
    pub total_items: usize,
    pub total_outfits: usize,
    pub favorite_items: usize,
    pub favorite_outfits: usize,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    pub cache: CacheManager,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,

    // Closet tab state
    pub closet_selection: usize,
    pub item_sort_column: ItemSortColumn,
    pub item_sort_ascending: bool,
    pub category_filter: Option<Category>,
    pub favorites_only: bool,

    // Outfits tab state
    pub outfit_selection: usize,
    pub outfit_sort_column: OutfitSortColumn,
    pub outfit_sort_ascending: bool,

    // Login form state
    pub login_mode: LoginMode,
    pub login_email: String,
    pub login_password: String,
    pub login_name: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Item/outfit form state
    pub item_form: ItemForm,
    pub outfit_form: OutfitForm,
    pub pending_delete: Option<DeleteTarget>,

    // Closet data
    pub items: Vec<ClothingItem>,
    pub outfits: Vec<Outfit>,
    pub user: Option<User>,

    // Background task channel
    refresh_rx: Option<mpsc::Receiver<RefreshResult>>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,

    // Cache ages for status bar
    pub cache_ages: crate::cache::CacheAges,

    // Offline mode - when true, mutations apply to the local cache only
    pub offline_mode: bool,
}

impl App {
    /// Create a new application instance
    pub async fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(api_url = %config.api_url(), "Config loaded");

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        // Load session from disk if it exists
        let mut session = Session::new(cache_dir.clone());
        let load_result = session.load();
        debug!(?load_result, has_data = session.data.is_some(), "Session loaded");

        let mut api = ApiClient::new(&config.api_url())?;

        // If we have a valid session, set the token on the API client
        if let Some(ref data) = session.data {
            if !data.is_expired() {
                api.set_token(data.token.clone());
                debug!("Token set on API client");
            }
        }

        let cache = CacheManager::new(cache_dir)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Get credentials from env vars or config
        let login_email = std::env::var("THREADCACHE_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let login_password = std::env::var("THREADCACHE_PASSWORD").unwrap_or_default();

        let offline_mode = config.offline_mode;

        Ok(Self {
            config,
            session,
            api,
            cache,

            state: AppState::Normal,
            current_tab: Tab::Closet,
            focus: Focus::List,
            search_query: String::new(),

            closet_selection: 0,
            item_sort_column: ItemSortColumn::Name,
            item_sort_ascending: true,
            category_filter: None,
            favorites_only: false,

            outfit_selection: 0,
            outfit_sort_column: OutfitSortColumn::Name,
            outfit_sort_ascending: true,

            login_mode: LoginMode::SignIn,
            login_email,
            login_password,
            login_name: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,

            item_form: ItemForm::default(),
            outfit_form: OutfitForm::default(),
            pending_delete: None,

            items: Vec::new(),
            outfits: Vec::new(),
            user: None,

            refresh_rx: Some(rx),
            refresh_tx: tx,

            status_message: None,
            cache_ages: Default::default(),
            offline_mode,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if the user is authenticated with a valid session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_valid()
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_mode = LoginMode::SignIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;

        // Offer the stored password for a returning user
        if self.login_password.is_empty() && !self.login_email.is_empty() {
            if let Ok(password) = CredentialStore::get_password(&self.login_email) {
                self.login_password = password;
            }
        }
    }

    /// Attempt login or registration with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return Err(anyhow::anyhow!("Email and password required"));
        }

        if self.login_mode == LoginMode::Register && self.login_name.trim().is_empty() {
            self.login_error = Some("Name is required to register".to_string());
            return Err(anyhow::anyhow!("Name is required to register"));
        }

        self.login_error = None;

        let result = match self.login_mode {
            LoginMode::SignIn => self.api.login(&email, &password).await,
            LoginMode::Register => {
                self.api
                    .register(&email, &password, self.login_name.trim())
                    .await
            }
        };

        match result {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.user = Some(session_data.user.clone());
                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                if let Some(ref data) = self.session.data {
                    self.api.set_token(data.token.clone());
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                // Provide user-friendly error messages based on error type
                let text = e.to_string();
                let lower = text.to_lowercase();
                let user_message = if lower.contains("unauthorized") || text.contains("401") {
                    "Incorrect email or password".to_string()
                } else if lower.contains("already registered") {
                    "An account with this email already exists".to_string()
                } else if lower.contains("network") || lower.contains("connect") {
                    "Unable to connect to server. Check your internet connection.".to_string()
                } else if lower.contains("timeout") {
                    "Connection timed out. Please try again.".to_string()
                } else {
                    format!("Login failed: {}", e)
                };
                self.login_error = Some(user_message);
                Err(e)
            }
        }
    }

    /// Log out: clear the session and in-memory closet, keep the cache files
    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.items.clear();
        self.outfits.clear();
        self.user = None;
        self.status_message = Some("You have been logged out".to_string());
        self.start_login();
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Load all data from cache
    pub async fn load_from_cache(&mut self) -> Result<()> {
        if let Ok(Some(cached)) = self.cache.load_items() {
            self.items = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_outfits() {
            self.outfits = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_profile() {
            self.user = Some(cached.data);
        }

        // A saved session carries the user too
        if self.user.is_none() {
            if let Some(user) = self.session.user() {
                self.user = Some(user.clone());
            }
        }

        self.cache_ages = self.cache.get_cache_ages();
        Ok(())
    }

    /// Check if any cache data is stale
    pub fn is_cache_stale(&self) -> bool {
        self.cache.any_stale()
    }

    /// Fall back to the starter wardrobe when there is nothing to show
    pub fn seed_if_empty(&mut self) {
        if self.items.is_empty() && self.outfits.is_empty() {
            info!("No cached data available, loading starter wardrobe");
            self.items = seed::sample_items();
            self.outfits = seed::sample_outfits();
            self.status_message = Some("Showing sample wardrobe (not synced)".to_string());
        }
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Clone the API client with the current session token, if any
    fn authed_api(&self) -> Option<ApiClient> {
        self.session.token().map(|t| self.api.with_token(t.to_string()))
    }

    /// Spawn a background task to refresh all data
    pub async fn refresh_all_background(&mut self) {
        info!("Starting background refresh of all data");

        let api = match self.authed_api() {
            Some(api) => api,
            None => {
                warn!("No token available for refresh");
                return;
            }
        };

        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        self.status_message = Some("Refreshing wardrobe...".to_string());
    }

    /// Enter offline mode - the current cache becomes the working copy.
    pub async fn go_offline(&mut self) {
        info!("Entering offline mode - syncing cache first");

        // Do a final refresh so the cache is as current as possible
        if let Some(api) = self.authed_api() {
            let tx = self.refresh_tx.clone();
            tokio::spawn(async move {
                Self::execute_background_refresh(tx, api).await;
            });
            self.status_message = Some("Caching wardrobe for offline mode...".to_string());
        } else {
            self.status_message = Some("Offline mode (using cached data)".to_string());
        }

        self.offline_mode = true;
        self.config.offline_mode = true;
        let _ = self.config.save();
        self.seed_if_empty();
    }

    /// Exit offline mode - resume normal online operation.
    /// Forces reauthentication to ensure fresh credentials.
    pub fn go_online(&mut self) {
        info!("Exiting offline mode - forcing reauthentication");
        self.offline_mode = false;
        self.config.offline_mode = false;
        let _ = self.config.save();
        // Force reauthentication when coming back online
        self.start_login();
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Execute the background refresh task.
    ///
    /// Runs in a spawned Tokio task and fetches items, outfits, and the
    /// profile concurrently. Results are sent back through the MPSC
    /// channel as `RefreshResult` variants.
    async fn execute_background_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient) {
        info!("Background refresh task started");

        let (items_res, outfits_res, profile_res) = tokio::join!(
            api.fetch_items(),
            api.fetch_outfits(),
            api.fetch_profile(),
        );

        match items_res {
            Ok(data) => {
                debug!(count = data.len(), "Items fetched");
                Self::send_result(&tx, RefreshResult::Items(data)).await;
            }
            Err(e) => {
                error!(error = %e, "Items fetch failed");
                Self::send_result(&tx, RefreshResult::Error(format!("Items: {}", e))).await;
            }
        }

        match outfits_res {
            Ok(data) => {
                debug!(count = data.len(), "Outfits fetched");
                Self::send_result(&tx, RefreshResult::Outfits(data)).await;
            }
            Err(e) => {
                error!(error = %e, "Outfits fetch failed");
                Self::send_result(&tx, RefreshResult::Error(format!("Outfits: {}", e))).await;
            }
        }

        match profile_res {
            Ok(user) => {
                debug!("Profile fetched");
                Self::send_result(&tx, RefreshResult::Profile(user)).await;
            }
            Err(e) => {
                // Profile is non-critical; cached copy stays
                debug!(error = %e, "Profile fetch failed");
            }
        }

        info!("Background refresh complete");
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Check for completed background tasks and process results
    pub async fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let results: Vec<RefreshResult> = {
            if let Some(ref mut rx) = self.refresh_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        // Now process all results
        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Process a single result from a background task.
    ///
    /// Updates the corresponding app state and writes through to the cache.
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Items(data) => {
                if let Err(e) = self.cache.save_items(&data) {
                    warn!(error = %e, "Failed to cache items");
                }
                self.items = data;
                self.clamp_selections();
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Outfits(data) => {
                if let Err(e) = self.cache.save_outfits(&data) {
                    warn!(error = %e, "Failed to cache outfits");
                }
                self.outfits = data;
                self.clamp_selections();
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Profile(user) => {
                if let Err(e) = self.cache.save_profile(&user) {
                    warn!(error = %e, "Failed to cache profile");
                }
                self.user = Some(user);
            }
            RefreshResult::ItemCreated(item) => {
                self.items.push(item);
                self.save_items_cache();
                self.status_message = Some("Item added to your wardrobe".to_string());
            }
            RefreshResult::ItemUpdated(item) => {
                if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                    *existing = item;
                }
                self.save_items_cache();
                self.status_message = Some("Item updated".to_string());
            }
            RefreshResult::ItemDeleted(id) => {
                self.items.retain(|i| i.id != id);
                self.clamp_selections();
                self.save_items_cache();
                self.status_message = Some("Item removed from your wardrobe".to_string());
            }
            RefreshResult::OutfitCreated(outfit) => {
                self.outfits.push(outfit);
                self.save_outfits_cache();
                self.status_message = Some("Outfit created".to_string());
            }
            RefreshResult::OutfitUpdated(outfit) => {
                if let Some(existing) = self.outfits.iter_mut().find(|o| o.id == outfit.id) {
                    *existing = outfit;
                }
                self.save_outfits_cache();
                self.status_message = Some("Outfit updated".to_string());
            }
            RefreshResult::OutfitDeleted(id) => {
                self.outfits.retain(|o| o.id != id);
                self.clamp_selections();
                self.save_outfits_cache();
                self.status_message = Some("Outfit removed".to_string());
            }
            RefreshResult::ImageProcessed(image, action) => {
                debug!(
                    filename = %image.filename,
                    content_type = %image.content_type,
                    "Applying processed image"
                );
                // Persist the processed image and resume the pending mutation
                match self.cache.save_image(&image.filename, &image.bytes) {
                    Ok(path) => {
                        let image_url = path.display().to_string();
                        let action = match action {
                            PendingItemAction::Create(mut draft) => {
                                draft.image_url = image_url;
                                PendingItemAction::Create(draft)
                            }
                            PendingItemAction::Update(id, mut patch) => {
                                patch.image_url = Some(image_url);
                                PendingItemAction::Update(id, patch)
                            }
                        };
                        self.submit_item_remote(action);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to save processed image");
                        // Submit anyway with whatever image path the form had
                        self.submit_item_remote(action);
                    }
                }
            }
            RefreshResult::RefreshComplete => {
                // Only clear status if it's a progress message, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                // Simplify common error messages for the user
                let lower = msg.to_lowercase();
                let user_message = if lower.contains("rate limit") {
                    "Server is busy. Please wait a moment and try again.".to_string()
                } else if lower.contains("unauthorized") || msg.contains("401") {
                    "Session expired. Please log in again.".to_string()
                } else if lower.contains("network") || lower.contains("connect") {
                    "Network error. Check your connection.".to_string()
                } else {
                    format!("Error: {}", msg)
                };
                self.status_message = Some(user_message);
                // A failed first sync still deserves a usable closet
                self.seed_if_empty();
            }
        }
    }

    fn save_items_cache(&mut self) {
        if let Err(e) = self.cache.save_items(&self.items) {
            warn!(error = %e, "Failed to cache items");
        }
        self.cache_ages = self.cache.get_cache_ages();
    }

    fn save_outfits_cache(&mut self) {
        if let Err(e) = self.cache.save_outfits(&self.outfits) {
            warn!(error = %e, "Failed to cache outfits");
        }
        self.cache_ages = self.cache.get_cache_ages();
    }

    /// Keep selections in range after the underlying lists change
    fn clamp_selections(&mut self) {
        let item_count = self.get_filtered_items().len();
        if self.closet_selection >= item_count {
            self.closet_selection = item_count.saturating_sub(1);
        }
        let outfit_count = self.get_filtered_outfits().len();
        if self.outfit_selection >= outfit_count {
            self.outfit_selection = outfit_count.saturating_sub(1);
        }
    }

    // =========================================================================
    // Item Mutations
    // =========================================================================

    /// Open the item form for a new item
    pub fn open_add_item_form(&mut self) {
        self.item_form = ItemForm::default();
        self.state = AppState::EditingItem;
    }

    /// Open the item form pre-filled from the selected item
    pub fn open_edit_item_form(&mut self) {
        let selected = self
            .get_filtered_items()
            .get(self.closet_selection)
            .map(|i| (*i).clone());
        if let Some(item) = selected {
            self.item_form = ItemForm::from_item(&item);
            self.state = AppState::EditingItem;
        }
    }

    /// Submit the item form: create or update, locally or via the API
    pub fn submit_item_form(&mut self) {
        if let Err(msg) = self.item_form.validate() {
            self.item_form.error = Some(msg);
            return;
        }

        let form = self.item_form.clone();
        self.state = AppState::Normal;

        if self.offline_mode {
            match form.editing_id {
                Some(ref id) => self.apply_item_patch_local(id.clone(), form.to_patch()),
                None => self.apply_item_draft_local(form.to_draft()),
            }
            return;
        }

        let action = match form.editing_id {
            Some(ref id) => PendingItemAction::Update(id.clone(), form.to_patch()),
            None => PendingItemAction::Create(form.to_draft()),
        };

        // Route local image files through the background-removal service
        let image_path = form.image_path.trim().to_string();
        if PathBuf::from(&image_path).is_file() {
            self.process_image_then_submit(image_path.into(), action);
        } else {
            self.submit_item_remote(action);
        }
    }

    /// Spawn a create/update request for an item
    fn submit_item_remote(&mut self, action: PendingItemAction) {
        let api = match self.authed_api() {
            Some(api) => api,
            None => {
                self.status_message = Some("Not signed in".to_string());
                return;
            }
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match action {
                PendingItemAction::Create(draft) => match api.create_item(&draft).await {
                    Ok(item) => Self::send_result(&tx, RefreshResult::ItemCreated(item)).await,
                    Err(e) => {
                        Self::send_result(&tx, RefreshResult::Error(format!("Add item: {}", e)))
                            .await
                    }
                },
                PendingItemAction::Update(id, patch) => match api.update_item(&id, &patch).await {
                    Ok(item) => Self::send_result(&tx, RefreshResult::ItemUpdated(item)).await,
                    Err(e) => {
                        Self::send_result(&tx, RefreshResult::Error(format!("Update item: {}", e)))
                            .await
                    }
                },
            }
        });

        self.status_message = Some("Saving item...".to_string());
    }

    /// Upload the image for processing, then submit the pending mutation
    fn process_image_then_submit(&mut self, path: PathBuf, action: PendingItemAction) {
        let api = match self.authed_api() {
            Some(api) => api,
            None => {
                self.status_message = Some("Not signed in".to_string());
                return;
            }
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.remove_background(&path).await {
                Ok(image) => {
                    Self::send_result(&tx, RefreshResult::ImageProcessed(image, action)).await;
                }
                Err(e) => {
                    warn!(error = %e, "Background removal failed, submitting without processing");
                    // The item is still worth saving with the raw image path
                    match action {
                        PendingItemAction::Create(draft) => match api.create_item(&draft).await {
                            Ok(item) => {
                                Self::send_result(&tx, RefreshResult::ItemCreated(item)).await
                            }
                            Err(e) => {
                                Self::send_result(
                                    &tx,
                                    RefreshResult::Error(format!("Add item: {}", e)),
                                )
                                .await
                            }
                        },
                        PendingItemAction::Update(id, patch) => {
                            match api.update_item(&id, &patch).await {
                                Ok(item) => {
                                    Self::send_result(&tx, RefreshResult::ItemUpdated(item)).await
                                }
                                Err(e) => {
                                    Self::send_result(
                                        &tx,
                                        RefreshResult::Error(format!("Update item: {}", e)),
                                    )
                                    .await
                                }
                            }
                        }
                    }
                }
            }
        });

        self.status_message = Some("Processing image...".to_string());
    }

    /// Create an item in the local cache only (offline mode)
    fn apply_item_draft_local(&mut self, draft: ItemDraft) {
        let item = ClothingItem {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description,
            image_url: draft.image_url,
            category: draft.category,
            color: draft.color,
            season: draft.season,
            occasion: draft.occasion,
            brand: draft.brand,
            favorite: draft.favorite,
            last_worn: None,
            created_at: Utc::now(),
        };
        self.items.push(item);
        self.save_items_cache();
        self.status_message = Some("Item saved locally".to_string());
    }

    /// Patch an item in the local cache only (offline mode)
    fn apply_item_patch_local(&mut self, id: String, patch: ItemPatch) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.apply(&patch);
            self.save_items_cache();
            self.status_message = Some("Item saved locally".to_string());
        }
    }

    /// Ask for confirmation before deleting the selected item
    pub fn request_delete_item(&mut self) {
        if let Some(item) = self.get_filtered_items().get(self.closet_selection) {
            self.pending_delete = Some(DeleteTarget::Item(item.id.clone()));
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Ask for confirmation before deleting the selected outfit
    pub fn request_delete_outfit(&mut self) {
        if let Some(outfit) = self.get_filtered_outfits().get(self.outfit_selection) {
            self.pending_delete = Some(DeleteTarget::Outfit(outfit.id.clone()));
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Execute a confirmed delete.
    /// The local copy is removed immediately; the API call runs in the
    /// background and a failure surfaces as a status message + refresh.
    pub fn confirm_delete(&mut self) {
        let target = match self.pending_delete.take() {
            Some(t) => t,
            None => return,
        };
        self.state = AppState::Normal;

        match target {
            DeleteTarget::Item(id) => {
                self.items.retain(|i| i.id != id);
                self.clamp_selections();
                self.save_items_cache();

                if !self.offline_mode {
                    if let Some(api) = self.authed_api() {
                        let tx = self.refresh_tx.clone();
                        tokio::spawn(async move {
                            match api.delete_item(&id).await {
                                Ok(()) => {
                                    Self::send_result(&tx, RefreshResult::ItemDeleted(id)).await;
                                }
                                Err(e) => {
                                    Self::send_result(
                                        &tx,
                                        RefreshResult::Error(format!("Delete item: {}", e)),
                                    )
                                    .await;
                                }
                            }
                        });
                    }
                }
                self.status_message = Some("Item removed from your wardrobe".to_string());
            }
            DeleteTarget::Outfit(id) => {
                self.outfits.retain(|o| o.id != id);
                self.clamp_selections();
                self.save_outfits_cache();

                if !self.offline_mode {
                    if let Some(api) = self.authed_api() {
                        let tx = self.refresh_tx.clone();
                        tokio::spawn(async move {
                            match api.delete_outfit(&id).await {
                                Ok(()) => {
                                    Self::send_result(&tx, RefreshResult::OutfitDeleted(id)).await;
                                }
                                Err(e) => {
                                    Self::send_result(
                                        &tx,
                                        RefreshResult::Error(format!("Delete outfit: {}", e)),
                                    )
                                    .await;
                                }
                            }
                        });
                    }
                }
                self.status_message = Some("Outfit removed".to_string());
            }
        }
    }

    /// Toggle the favorite flag on the selected item.
    /// Applied optimistically; the PATCH runs in the background.
    pub fn toggle_item_favorite(&mut self) {
        let id = match self.get_filtered_items().get(self.closet_selection) {
            Some(item) => item.id.clone(),
            None => return,
        };

        let favorite = match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.favorite = !item.favorite;
                item.favorite
            }
            None => return,
        };
        self.save_items_cache();

        self.patch_item_background(
            id,
            ItemPatch {
                favorite: Some(favorite),
                ..Default::default()
            },
        );
    }

    /// Stamp the selected item as worn now.
    /// Applied optimistically; the PATCH runs in the background.
    pub fn mark_item_worn(&mut self) {
        let id = match self.get_filtered_items().get(self.closet_selection) {
            Some(item) => item.id.clone(),
            None => return,
        };

        let now = Utc::now();
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => item.last_worn = Some(now),
            None => return,
        }
        self.save_items_cache();
        self.status_message = Some("Marked as worn today".to_string());

        self.patch_item_background(
            id,
            ItemPatch {
                last_worn: Some(now),
                ..Default::default()
            },
        );
    }

    /// Toggle the favorite flag on the selected outfit.
    pub fn toggle_outfit_favorite(&mut self) {
        let id = match self.get_filtered_outfits().get(self.outfit_selection) {
            Some(outfit) => outfit.id.clone(),
            None => return,
        };

        let favorite = match self.outfits.iter_mut().find(|o| o.id == id) {
            Some(outfit) => {
                outfit.favorite = !outfit.favorite;
                outfit.favorite
            }
            None => return,
        };
        self.save_outfits_cache();

        self.patch_outfit_background(
            id,
            OutfitPatch {
                favorite: Some(favorite),
                ..Default::default()
            },
        );
    }

    /// Stamp the selected outfit (and its items) as worn now.
    pub fn mark_outfit_worn(&mut self) {
        let (id, member_ids) = match self.get_filtered_outfits().get(self.outfit_selection) {
            Some(outfit) => (outfit.id.clone(), outfit.items.clone()),
            None => return,
        };

        let now = Utc::now();
        match self.outfits.iter_mut().find(|o| o.id == id) {
            Some(outfit) => outfit.last_worn = Some(now),
            None => return,
        }
        // Wearing an outfit wears every member item
        for item in self.items.iter_mut().filter(|i| member_ids.contains(&i.id)) {
            item.last_worn = Some(now);
        }
        self.save_outfits_cache();
        self.save_items_cache();
        self.status_message = Some("Marked as worn today".to_string());

        self.patch_outfit_background(
            id,
            OutfitPatch {
                last_worn: Some(now),
                ..Default::default()
            },
        );

        // Patch every member item in one task
        if self.offline_mode {
            return;
        }
        let api = match self.authed_api() {
            Some(api) => api,
            None => return,
        };
        let tx = self.refresh_tx.clone();
        let patch = ItemPatch {
            last_worn: Some(now),
            ..Default::default()
        };

        tokio::spawn(async move {
            let futures: Vec<_> = member_ids
                .iter()
                .map(|member_id| {
                    let api = api.clone();
                    let patch = patch.clone();
                    async move { api.update_item(member_id, &patch).await }
                })
                .collect();

            let results = futures::future::join_all(futures).await;
            for result in results {
                match result {
                    Ok(item) => Self::send_result(&tx, RefreshResult::ItemUpdated(item)).await,
                    Err(e) => {
                        Self::send_result(&tx, RefreshResult::Error(format!("Update item: {}", e)))
                            .await
                    }
                }
            }
        });
    }

    /// Fire-and-report a PATCH for an item; skipped entirely offline
    fn patch_item_background(&mut self, id: String, patch: ItemPatch) {
        if self.offline_mode {
            return;
        }
        let api = match self.authed_api() {
            Some(api) => api,
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.update_item(&id, &patch).await {
                Ok(item) => Self::send_result(&tx, RefreshResult::ItemUpdated(item)).await,
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Update item: {}", e)))
                        .await
                }
            }
        });
    }

    /// Fire-and-report a PATCH for an outfit; skipped entirely offline
    fn patch_outfit_background(&mut self, id: String, patch: OutfitPatch) {
        if self.offline_mode {
            return;
        }
        let api = match self.authed_api() {
            Some(api) => api,
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.update_outfit(&id, &patch).await {
                Ok(outfit) => Self::send_result(&tx, RefreshResult::OutfitUpdated(outfit)).await,
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::Error(format!("Update outfit: {}", e)))
                        .await
                }
            }
        });
    }

    // =========================================================================
    // Outfit Mutations
    // =========================================================================

    /// Open the outfit form for a new outfit
    pub fn open_add_outfit_form(&mut self) {
        self.outfit_form = OutfitForm::default();
        self.state = AppState::EditingOutfit;
    }

    /// Open the outfit form pre-filled from the selected outfit
    pub fn open_edit_outfit_form(&mut self) {
        let selected = self
            .get_filtered_outfits()
            .get(self.outfit_selection)
            .map(|o| (*o).clone());
        if let Some(outfit) = selected {
            self.outfit_form = OutfitForm::from_outfit(&outfit);
            self.state = AppState::EditingOutfit;
        }
    }

    /// Submit the outfit form: create or update, locally or via the API
    pub fn submit_outfit_form(&mut self) {
        if let Err(msg) = self.outfit_form.validate() {
            self.outfit_form.error = Some(msg);
            return;
        }

        // The server rejects unknown item ids with 400; catching it here
        // gives the user an actionable message instead
        let missing = self
            .outfit_form
            .selected_items
            .iter()
            .find(|id| !self.items.iter().any(|i| &i.id == *id));
        if let Some(id) = missing {
            self.outfit_form.error = Some(format!("Item {} no longer exists", id));
            return;
        }

        let form = self.outfit_form.clone();
        self.state = AppState::Normal;

        if self.offline_mode {
            match form.editing_id {
                Some(ref id) => self.apply_outfit_patch_local(id.clone(), form.to_patch()),
                None => self.apply_outfit_draft_local(form.to_draft()),
            }
            return;
        }

        let api = match self.authed_api() {
            Some(api) => api,
            None => {
                self.status_message = Some("Not signed in".to_string());
                return;
            }
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match form.editing_id {
                Some(ref id) => match api.update_outfit(id, &form.to_patch()).await {
                    Ok(outfit) => {
                        Self::send_result(&tx, RefreshResult::OutfitUpdated(outfit)).await
                    }
                    Err(e) => {
                        Self::send_result(&tx, RefreshResult::Error(format!("Update outfit: {}", e)))
                            .await
                    }
                },
                None => match api.create_outfit(&form.to_draft()).await {
                    Ok(outfit) => {
                        Self::send_result(&tx, RefreshResult::OutfitCreated(outfit)).await
                    }
                    Err(e) => {
                        Self::send_result(&tx, RefreshResult::Error(format!("Create outfit: {}", e)))
                            .await
                    }
                },
            }
        });

        self.status_message = Some("Saving outfit...".to_string());
    }

    /// Create an outfit in the local cache only (offline mode)
    fn apply_outfit_draft_local(&mut self, draft: OutfitDraft) {
        let outfit = Outfit {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description,
            items: draft.items,
            occasion: draft.occasion,
            season: draft.season,
            favorite: draft.favorite,
            last_worn: None,
            created_at: Utc::now(),
        };
        self.outfits.push(outfit);
        self.save_outfits_cache();
        self.status_message = Some("Outfit saved locally".to_string());
    }

    /// Patch an outfit in the local cache only (offline mode)
    fn apply_outfit_patch_local(&mut self, id: String, patch: OutfitPatch) {
        if let Some(outfit) = self.outfits.iter_mut().find(|o| o.id == id) {
            outfit.apply(&patch);
            self.save_outfits_cache();
            self.status_message = Some("Outfit saved locally".to_string());
        }
    }

    // =========================================================================
    // Data Access Methods
    // =========================================================================

    /// Look up an item by id
    pub fn get_item_by_id(&self, id: &str) -> Option<&ClothingItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an outfit by id
    pub fn get_outfit_by_id(&self, id: &str) -> Option<&Outfit> {
        self.outfits.iter().find(|o| o.id == id)
    }

    /// Resolve an outfit's member items.
    /// Dangling ids (deleted items) are silently dropped.
    pub fn outfit_items(&self, outfit: &Outfit) -> Vec<&ClothingItem> {
        outfit
            .items
            .iter()
            .filter_map(|id| self.get_item_by_id(id))
            .collect()
    }

    /// Get items filtered by category/favorites/search and sorted by the
    /// current sort settings
    pub fn get_filtered_items(&self) -> Vec<&ClothingItem> {
        let mut filtered: Vec<&ClothingItem> = self.items.iter().collect();

        if let Some(category) = self.category_filter {
            filtered.retain(|i| i.category == category);
        }

        if self.favorites_only {
            filtered.retain(|i| i.favorite);
        }

        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            filtered.retain(|i| i.matches_search(&query));
        }

        filtered.sort_by(|a, b| {
            let name_cmp = |x: &ClothingItem, y: &ClothingItem| cmp_ignore_case(&x.name, &y.name);

            let cmp = match self.item_sort_column {
                ItemSortColumn::Name => name_cmp(a, b),
                ItemSortColumn::Category => cmp_ignore_case(a.category.label(), b.category.label())
                    .then_with(|| name_cmp(a, b)),
                ItemSortColumn::Color => {
                    cmp_ignore_case(a.color.label(), b.color.label()).then_with(|| name_cmp(a, b))
                }
                ItemSortColumn::Added => a.created_at.cmp(&b.created_at).then_with(|| name_cmp(a, b)),
                ItemSortColumn::Worn => a.last_worn.cmp(&b.last_worn).then_with(|| name_cmp(a, b)),
            };

            if self.item_sort_ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        filtered
    }

    /// Get outfits filtered by search and sorted by the current sort settings
    pub fn get_filtered_outfits(&self) -> Vec<&Outfit> {
        let mut filtered: Vec<&Outfit> = self.outfits.iter().collect();

        if self.favorites_only {
            filtered.retain(|o| o.favorite);
        }

        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            filtered.retain(|o| o.matches_search(&query));
        }

        filtered.sort_by(|a, b| {
            let name_cmp = |x: &Outfit, y: &Outfit| cmp_ignore_case(&x.name, &y.name);

            let cmp = match self.outfit_sort_column {
                OutfitSortColumn::Name => name_cmp(a, b),
                OutfitSortColumn::Added => {
                    a.created_at.cmp(&b.created_at).then_with(|| name_cmp(a, b))
                }
            };

            if self.outfit_sort_ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        filtered
    }

    /// Wardrobe statistics for the profile tab
    pub fn wardrobe_stats(&self) -> WardrobeStats {
        WardrobeStats {
            total_items: self.items.len(),
            total_outfits: self.outfits.len(),
            favorite_items: self.items.iter().filter(|i| i.favorite).count(),
            favorite_outfits: self.outfits.iter().filter(|o| o.favorite).count(),
        }
    }

    /// Item counts per category, in category order, for the profile tab
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&c| (c, self.items.iter().filter(|i| i.category == c).count()))
            .collect()
    }

    // =========================================================================
    // Sort/Filter Toggle Helpers
    // =========================================================================

    /// Toggle item sort column - if already sorting by this column, flip direction;
    /// otherwise switch to this column with ascending=true. Resets selection to 0.
    pub fn toggle_item_sort(&mut self, column: ItemSortColumn) {
        if self.item_sort_column == column {
            self.item_sort_ascending = !self.item_sort_ascending;
        } else {
            self.item_sort_column = column;
            self.item_sort_ascending = true;
        }
        self.closet_selection = 0;
    }

    /// Toggle outfit sort column - same semantics as toggle_item_sort
    pub fn toggle_outfit_sort(&mut self, column: OutfitSortColumn) {
        if self.outfit_sort_column == column {
            self.outfit_sort_ascending = !self.outfit_sort_ascending;
        } else {
            self.outfit_sort_column = column;
            self.outfit_sort_ascending = true;
        }
        self.outfit_selection = 0;
    }

    /// Cycle the closet category filter: All -> Tops -> ... -> Accessories -> All
    pub fn cycle_category_filter(&mut self) {
        self.category_filter = match self.category_filter {
            None => Some(Category::ALL[0]),
            Some(current) => {
                let next = current.next();
                if next == Category::ALL[0] {
                    None
                } else {
                    Some(next)
                }
            }
        };
        self.closet_selection = 0;
    }

    /// Toggle the favorites-only filter (applies to both closet and outfits)
    pub fn toggle_favorites_filter(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.closet_selection = 0;
        self.outfit_selection = 0;
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a free-text form field character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Closet.next(), Tab::Outfits);
        assert_eq!(Tab::Outfits.next(), Tab::Profile);
        assert_eq!(Tab::Profile.next(), Tab::Closet); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Closet.prev(), Tab::Profile); // Wraps around
        assert_eq!(Tab::Profile.prev(), Tab::Outfits);
        assert_eq!(Tab::Outfits.prev(), Tab::Closet);
    }

    // -------------------------------------------------------------------------
    // Item Form Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_item_form_validation() {
        let mut form = ItemForm::default();
        assert!(form.validate().is_err()); // empty name

        form.name = "Wool Sweater".to_string();
        assert!(form.validate().is_ok());

        form.seasons.clear();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_item_form_to_draft_trims_and_defaults() {
        let mut form = ItemForm::default();
        form.name = "  Wool Sweater  ".to_string();
        form.brand = "   ".to_string();

        let draft = form.to_draft();
        assert_eq!(draft.name, "Wool Sweater");
        assert!(draft.brand.is_none());
        assert_eq!(draft.image_url, "/placeholder.svg");
    }

    #[test]
    fn test_item_form_toggle_season() {
        let mut form = ItemForm::default();
        assert_eq!(form.seasons, vec![Season::All]);

        form.season_cursor = 0; // Spring
        form.toggle_season_at_cursor();
        assert!(form.seasons.contains(&Season::Spring));

        form.toggle_season_at_cursor();
        assert!(!form.seasons.contains(&Season::Spring));
    }

    #[test]
    fn test_item_form_field_cycle() {
        let mut field = ItemFormField::Name;
        // A full forward cycle returns to the start
        for _ in 0..9 {
            field = field.next();
        }
        assert_eq!(field, ItemFormField::Name);
        assert_eq!(ItemFormField::Name.prev(), ItemFormField::Submit);
    }

    #[test]
    fn test_item_form_from_item_round_trip() {
        let item: ClothingItem = serde_json::from_str(
            r#"{
                "id": "i1",
                "name": "Black Dress",
                "description": "Elegant",
                "imageUrl": "/img/dress.png",
                "category": "dresses",
                "color": "black",
                "season": ["all"],
                "occasion": ["formal", "special"],
                "brand": "Elegance",
                "favorite": true,
                "createdAt": "2025-11-02T18:30:00Z"
            }"#,
        )
        .expect("item parses");

        let form = ItemForm::from_item(&item);
        assert_eq!(form.editing_id.as_deref(), Some("i1"));

        let patch = form.to_patch();
        assert_eq!(patch.name.as_deref(), Some("Black Dress"));
        assert_eq!(patch.category, Some(Category::Dresses));
        assert_eq!(patch.favorite, Some(true));
        assert!(patch.last_worn.is_none());
    }

    // -------------------------------------------------------------------------
    // Outfit Form Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_outfit_form_validation_requires_items() {
        let mut form = OutfitForm::default();
        form.name = "Rainy Day".to_string();
        assert!(form.validate().is_err()); // no items

        form.selected_items.push("i1".to_string());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_outfit_form_toggle_item() {
        let mut form = OutfitForm::default();
        form.toggle_item("i1");
        assert_eq!(form.selected_items, vec!["i1"]);
        form.toggle_item("i1");
        assert!(form.selected_items.is_empty());
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(49, '@'));
        assert!(!can_add_email_char(50, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }
}
