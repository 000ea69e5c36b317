use chrono::Utc;
use std::sync::Arc;

use crate::accounts::{Account, AccountDirectory};
use crate::adverts::domain::{Advert, AdvertDraft, AdvertId, Author};
use crate::adverts::error::AdvertError;
use crate::adverts::pagination::{paginate, PageRequest};
use crate::adverts::repository::AdvertStore;
use crate::adverts::search::SearchQuery;
use crate::adverts::views::{AdListItem, AdvertDetail};
use crate::db::StoreError;

/// Listing, search and mutation of adverts on top of the two stores.
///
/// Holds no state of its own between calls. Every operation is a plain
/// read-modify-write against the stores with no locking, so two concurrent
/// writers to the same advert or account can lose an update.
#[derive(Clone)]
pub struct AdvertService {
    adverts: Arc<dyn AdvertStore>,
    accounts: Arc<dyn AccountDirectory>,
}

impl AdvertService {
    pub fn new(adverts: Arc<dyn AdvertStore>, accounts: Arc<dyn AccountDirectory>) -> Self {
        Self { adverts, accounts }
    }

    async fn caller(&self, token: Option<&str>) -> Result<Option<Account>, AdvertError> {
        match token {
            Some(token) => Ok(self.accounts.resolve_token(token).await?),
            None => Ok(None),
        }
    }

    /// filter -> newest first -> page -> project.
    async fn list_where<F>(&self, request: PageRequest, keep: F) -> Result<Vec<AdListItem>, AdvertError>
    where
        F: Fn(&Advert) -> bool + Send,
    {
        let mut adverts: Vec<Advert> = self
            .adverts
            .load_all()
            .await?
            .into_iter()
            .filter(|advert| keep(advert))
            .collect();

        // sort_by is stable: equal dates keep store order
        adverts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(paginate(adverts, request)
            .iter()
            .map(AdListItem::from)
            .collect())
    }

    // --- Listings ---

    pub async fn list_recent(&self, request: PageRequest) -> Result<Vec<AdListItem>, AdvertError> {
        self.list_where(request, |advert| advert.is_shown).await
    }

    /// The caller's own adverts, shown or not. No caller, no adverts.
    pub async fn list_mine(
        &self,
        token: Option<&str>,
        request: PageRequest,
    ) -> Result<Vec<AdListItem>, AdvertError> {
        let caller = self.caller(token).await?;
        self.list_where(request, |advert| advert.author.is_owned_by(caller.as_ref()))
            .await
    }

    pub async fn list_bookmarked(
        &self,
        token: Option<&str>,
        request: PageRequest,
    ) -> Result<Vec<AdListItem>, AdvertError> {
        let bookmarks = self
            .caller(token)
            .await?
            .map(|account| account.bookmark_ids)
            .unwrap_or_default();

        if bookmarks.is_empty() {
            return Ok(Vec::new());
        }

        self.list_where(request, |advert| {
            advert.is_shown && bookmarks.contains(&advert.id)
        })
        .await
    }

    /// Adverts awaiting approval.
    ///
    /// Open to every caller; the token is only used to log non-admin access.
    pub async fn list_pending_moderation(
        &self,
        token: Option<&str>,
        request: PageRequest,
    ) -> Result<Vec<AdListItem>, AdvertError> {
        let is_admin = self
            .caller(token)
            .await?
            .map(|account| account.is_admin)
            .unwrap_or(false);
        if !is_admin {
            tracing::warn!("Moderation queue listed by a non-admin caller");
        }

        self.list_where(request, |advert| !advert.is_shown).await
    }

    pub async fn search(
        &self,
        text: &str,
        request: PageRequest,
    ) -> Result<Vec<AdListItem>, AdvertError> {
        let query = SearchQuery::parse(text);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(terms = ?query.terms(), "Searching adverts");
        self.list_where(request, |advert| {
            advert.is_shown && query.matches_advert(advert)
        })
        .await
    }

    // --- Detail ---

    /// Full view of one advert. Every call counts as a view.
    ///
    /// An unknown id is not an error: it yields a placeholder and writes nothing.
    pub async fn get_detail(
        &self,
        token: Option<&str>,
        id: AdvertId,
    ) -> Result<AdvertDetail, AdvertError> {
        let Some(mut advert) = self.adverts.load_by_id(id).await? else {
            return Ok(AdvertDetail::missing(id));
        };

        advert.record_view();
        match self.adverts.save(&advert).await {
            Ok(()) => {}
            // deleted since the load
            Err(StoreError::NotFound(_)) => return Ok(AdvertDetail::missing(id)),
            Err(err) => return Err(err.into()),
        }

        let username = match advert.author.account_id() {
            Some(author_id) => self
                .accounts
                .find_by_id(author_id)
                .await?
                .map(|account| account.username)
                .unwrap_or_default(),
            None => String::new(),
        };

        let bookmarked = self
            .caller(token)
            .await?
            .map(|account| account.has_bookmark(id))
            .unwrap_or(false);

        Ok(AdvertDetail::from_advert(advert, username, bookmarked))
    }

    // --- Mutations ---

    /// Post a new advert. It starts hidden until an admin shows it.
    ///
    /// A missing or unknown token does not reject the advert; it is stored
    /// with no author and nobody can edit or delete it afterwards.
    pub async fn create(
        &self,
        token: Option<&str>,
        draft: AdvertDraft,
    ) -> Result<AdvertId, AdvertError> {
        let caller = self.caller(token).await?;
        let author = Author::from_caller(caller.as_ref());
        if author == Author::Unauthenticated {
            tracing::warn!("Advert created without an authenticated author");
        }

        let advert = self.adverts.insert(draft, author, Utc::now()).await?;
        tracing::info!(advert_id = %advert.id, "Advert created");
        Ok(advert.id)
    }

    /// Replace every editable field. Only the author may do this, and the
    /// advert goes back to moderation.
    pub async fn update(
        &self,
        token: Option<&str>,
        id: AdvertId,
        draft: AdvertDraft,
    ) -> Result<(), AdvertError> {
        let caller = self.caller(token).await?;
        let mut advert = self
            .adverts
            .load_by_id(id)
            .await?
            .ok_or(AdvertError::NotFound)?;

        if !advert.author.is_owned_by(caller.as_ref()) {
            tracing::warn!(advert_id = %id, "Update denied: caller is not the author");
            return Err(AdvertError::Forbidden);
        }

        advert.apply_draft(draft);
        self.adverts.save(&advert).await?;
        tracing::info!(advert_id = %id, "Advert updated");
        Ok(())
    }

    pub async fn delete(&self, token: Option<&str>, id: AdvertId) -> Result<(), AdvertError> {
        let caller = self.caller(token).await?;
        let advert = self
            .adverts
            .load_by_id(id)
            .await?
            .ok_or(AdvertError::NotFound)?;

        if !advert.author.is_owned_by(caller.as_ref()) {
            tracing::warn!(advert_id = %id, "Delete denied: caller is not the author");
            return Err(AdvertError::Forbidden);
        }

        if !self.adverts.delete(id).await? {
            return Err(AdvertError::NotFound);
        }
        tracing::info!(advert_id = %id, "Advert deleted");
        Ok(())
    }

    /// Admin-only moderation switch. Returns the new visibility.
    pub async fn toggle_shown(
        &self,
        token: Option<&str>,
        id: AdvertId,
    ) -> Result<bool, AdvertError> {
        let is_admin = self
            .caller(token)
            .await?
            .map(|account| account.is_admin)
            .unwrap_or(false);
        if !is_admin {
            tracing::warn!(advert_id = %id, "Visibility change denied: caller is not an admin");
            return Err(AdvertError::Forbidden);
        }

        let mut advert = self
            .adverts
            .load_by_id(id)
            .await?
            .ok_or(AdvertError::NotFound)?;
        advert.is_shown = !advert.is_shown;
        self.adverts.save(&advert).await?;

        tracing::info!(advert_id = %id, shown = advert.is_shown, "Advert visibility changed");
        Ok(advert.is_shown)
    }

    /// Add or remove the advert from the caller's bookmarks. Returns whether
    /// it is bookmarked afterwards. The advert itself is not looked up.
    pub async fn toggle_bookmark(
        &self,
        token: Option<&str>,
        id: AdvertId,
    ) -> Result<bool, AdvertError> {
        let mut account = self.caller(token).await?.ok_or(AdvertError::Forbidden)?;
        let bookmarked = account.toggle_bookmark(id);
        self.accounts.save(&account).await?;

        tracing::debug!(advert_id = %id, account_id = %account.id, bookmarked, "Bookmark toggled");
        Ok(bookmarked)
    }
}
