use crate::favorites::FavoritesStore;
use crate::lookup::WeatherLookup;
use crate::model::{EditState, FavoriteCity, FetchOutcome, WeatherSnapshot};

/// Owns the in-memory UI state and mediates between user actions and the
/// two services.
///
/// Everything is driven by discrete user actions plus the single startup
/// `init`; there are no timers and no de-duplication of overlapping
/// submits. A second search fired while one is in flight simply overwrites
/// the state when it lands, an inherited property of the design. Store
/// failures are logged and swallowed: the favorites list stays whatever it
/// last was, and every mutation is followed by a full re-list rather than
/// a local patch.
#[derive(Debug)]
pub struct Controller {
    lookup: Box<dyn WeatherLookup>,
    store: Box<dyn FavoritesStore>,

    city: String,
    snapshot: Option<WeatherSnapshot>,
    loading: bool,
    error: Option<String>,
    favorites: Vec<FavoriteCity>,
    edit: Option<EditState>,
}

impl Controller {
    pub fn new(lookup: Box<dyn WeatherLookup>, store: Box<dyn FavoritesStore>) -> Self {
        Self {
            lookup,
            store,
            city: String::new(),
            snapshot: None,
            loading: false,
            error: None,
            favorites: Vec::new(),
            edit: None,
        }
    }

    /// The one startup action: populate the favorites list.
    pub async fn init(&mut self) {
        self.refresh_favorites().await;
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// The search field; presentation writes it on every keystroke.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn favorites(&self) -> &[FavoriteCity] {
        &self.favorites
    }

    pub fn edit(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    /// Search for a city. Blank input is ignored without touching any
    /// state or calling the lookup service.
    pub async fn submit(&mut self, city: &str) {
        if city.trim().is_empty() {
            return;
        }

        self.loading = true;
        self.error = None;

        let result = self.lookup.fetch(city).await;
        if let FetchOutcome::Offline { message } = &result.outcome {
            self.error = Some(message.clone());
        }
        self.snapshot = Some(result.snapshot);

        self.loading = false;
    }

    /// Persist the current snapshot as a favorite, then re-list.
    pub async fn add_favorite(&mut self) {
        let Some(snapshot) = self.snapshot.clone() else {
            return;
        };

        if let Err(err) = self.store.add(&snapshot).await {
            tracing::warn!(%err, city = %snapshot.name, "failed to add favorite");
        }
        self.refresh_favorites().await;
    }

    /// Enter edit mode for one favorite, draft pre-filled with its notes.
    pub fn start_edit(&mut self, id: i64) {
        if let Some(favorite) = self.favorites.iter().find(|f| f.id == id) {
            self.edit = Some(EditState {
                id,
                draft: favorite.notes().to_string(),
            });
        }
    }

    /// Update the draft text while editing.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        if let Some(edit) = &mut self.edit {
            edit.draft = draft.into();
        }
    }

    /// Save new notes for a favorite, then re-list and leave edit mode.
    pub async fn save_edit(&mut self, id: i64, notes: &str) {
        if let Err(err) = self.store.update(id, notes).await {
            tracing::warn!(%err, id, "failed to save favorite notes");
        }
        self.refresh_favorites().await;
        self.edit = None;
    }

    /// Leave edit mode without touching the store.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Delete a favorite, then re-list. Edit state never survives the
    /// disappearance of the favorite it points at.
    pub async fn delete_favorite(&mut self, id: i64) {
        if let Err(err) = self.store.remove(id).await {
            tracing::warn!(%err, id, "failed to delete favorite");
        }
        self.refresh_favorites().await;
    }

    /// Put a favorite's city into the search field and search for it.
    pub async fn load_favorite(&mut self, favorite: &FavoriteCity) {
        self.city = favorite.city_name.clone();
        let city = self.city.clone();
        self.submit(&city).await;
    }

    async fn refresh_favorites(&mut self) {
        match self.store.list().await {
            Ok(favorites) => self.favorites = favorites,
            Err(err) => tracing::warn!(%err, "failed to load favorites"),
        }

        if let Some(edit) = &self.edit
            && !self.favorites.iter().any(|f| f.id == edit.id)
        {
            self.edit = None;
        }
    }
}
