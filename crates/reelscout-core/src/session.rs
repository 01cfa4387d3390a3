//! Search/detail state machine driven by explicit commands.
//!
//! Each cycle runs `Idle → Loading → {Success | Empty | Failed} → Idle`.
//! Success renders the results progressively and returns to `Idle` when the
//! last card is appended; `Empty` and `Failed` show a banner and count as
//! `Idle` again once the banner expires. Every transition is also published
//! on [`Session::phase_events`], so a host can follow `Loading` and `Success`
//! while a command is still running.

use std::sync::Arc;
use std::time::Duration;

use reelscout_api::traits::{ApiKey, Lookup, MovieService};
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::UiConfig;
use crate::error::{LookupError, ValidationError};
use crate::render::{Container, ProgressiveRenderer, RenderOutcome, SharedContainer};
use crate::view::{Card, DetailView};

const SEARCH_FAILED_MESSAGE: &str =
    "Could not search movies. Check your connection and try again.";
/// Banner text when a details lookup comes back negative.
pub const DETAIL_NOT_FOUND_MESSAGE: &str = "Could not load movie details.";
const DETAIL_FAILED_MESSAGE: &str =
    "Could not fetch movie details. Check your connection and try again.";

/// Phase transitions buffered for a subscriber that falls behind.
const PHASE_EVENTS_CAPACITY: usize = 16;

/// Everything a session needs from startup: the service, the credential and
/// the UI settings.
pub struct AppContext<S> {
    pub service: S,
    pub api_key: Option<ApiKey>,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Empty,
    Failed,
}

/// User actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitQuery(String),
    RequestDetail(String),
    CloseDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Validation,
    NoResults,
    Error,
}

/// A transient message that hides itself after a fixed duration.
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    expires_at: Instant,
}

impl Banner {
    fn new(message: String, kind: BannerKind, ttl: Duration) -> Self {
        Self {
            message,
            kind,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct Session<S, C> {
    ctx: AppContext<S>,
    renderer: ProgressiveRenderer,
    results: SharedContainer<C>,
    phase: Phase,
    phase_tx: broadcast::Sender<Phase>,
    banner: Option<Banner>,
    detail: Option<DetailView>,
}

impl<S, C> Session<S, C>
where
    S: MovieService,
    C: Container<Element = Card>,
{
    pub fn new(ctx: AppContext<S>, container: C) -> Self {
        Self {
            renderer: ProgressiveRenderer::new(ctx.ui.pacing()),
            ctx,
            results: Arc::new(Mutex::new(container)),
            phase: Phase::Idle,
            phase_tx: broadcast::channel(PHASE_EVENTS_CAPACITY).0,
            banner: None,
            detail: None,
        }
    }

    /// Handle to the results container.
    pub fn results(&self) -> SharedContainer<C> {
        Arc::clone(&self.results)
    }

    pub fn context(&self) -> &AppContext<S> {
        &self.ctx
    }

    /// Current phase. `Empty` and `Failed` read as `Idle` once their banner
    /// has expired.
    pub fn phase(&self) -> Phase {
        match self.phase {
            Phase::Empty | Phase::Failed if self.banner().is_none() => Phase::Idle,
            phase => phase,
        }
    }

    /// Subscribe to phase transitions. Every change is sent once, in order,
    /// including the ones that happen while a command is still running.
    pub fn phase_events(&self) -> broadcast::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The banner, while it is still visible.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| !b.is_expired())
    }

    /// The open details view, if any.
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    /// Drop an expired banner and settle the phase.
    pub fn refresh(&mut self) {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
        self.set_phase(self.phase());
    }

    /// Run one command to completion.
    pub async fn dispatch(&mut self, command: Command) -> Result<(), LookupError> {
        self.refresh();
        match command {
            Command::SubmitQuery(text) => self.submit_query(&text).await.map(|_| ()),
            Command::RequestDetail(id) => self.request_detail(&id).await,
            Command::CloseDetail => {
                self.close_detail();
                Ok(())
            }
        }
    }

    /// Search for `text` and render the results progressively.
    pub async fn submit_query(&mut self, text: &str) -> Result<RenderOutcome, LookupError> {
        let query = text.trim();
        let key = match self.validate_query(query) {
            Ok(key) => key,
            Err(e) => return Err(self.reject(e)),
        };

        let ticket = self.results.lock().await.clear();
        self.banner = None;
        self.set_phase(Phase::Loading);
        info!(query, "search submitted");

        let page = match self.ctx.service.search(&key, query).await {
            Ok(Lookup::Found(page)) => page,
            Ok(Lookup::NotFound { message }) => return Err(self.no_results(message)),
            Err(e) => {
                warn!(error = %e, "search failed");
                return Err(self.fail(e.into(), SEARCH_FAILED_MESSAGE));
            }
        };

        if !page.items.is_empty() {
            self.set_phase(Phase::Success);
        }
        debug!(
            items = page.items.len(),
            total = ?page.total_results,
            "search results received"
        );

        let outcome = self
            .renderer
            .render(&page.items, &self.results, ticket, Card::from_item)
            .await;

        match outcome {
            RenderOutcome::Empty => Err(self.no_results(None)),
            outcome => {
                self.set_phase(Phase::Idle);
                Ok(outcome)
            }
        }
    }

    /// Fetch one title and open its details view.
    pub async fn request_detail(&mut self, id: &str) -> Result<(), LookupError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(self.reject(ValidationError::MissingTitleId));
        }
        let key = match self.ctx.api_key.clone() {
            Some(key) => key,
            None => return Err(self.reject(ValidationError::MissingCredential)),
        };

        self.detail = None;
        self.banner = None;
        self.set_phase(Phase::Loading);
        info!(id, "details requested");

        match self.ctx.service.detail(&key, id).await {
            Ok(Lookup::Found(record)) => {
                self.detail = Some(DetailView::from_record(&record));
                self.set_phase(Phase::Idle);
                Ok(())
            }
            Ok(Lookup::NotFound { message }) => {
                debug!(id, upstream = ?message, "title not found");
                self.show_banner(DETAIL_NOT_FOUND_MESSAGE.to_string(), BannerKind::NoResults);
                self.set_phase(Phase::Empty);
                Err(LookupError::NoResults(message))
            }
            Err(e) => {
                warn!(id, error = %e, "details request failed");
                Err(self.fail(e.into(), DETAIL_FAILED_MESSAGE))
            }
        }
    }

    pub fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            debug!("details closed");
        }
    }

    fn validate_query(&self, query: &str) -> Result<ApiKey, ValidationError> {
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        let min = self.ctx.ui.min_query_len;
        if query.chars().count() < min {
            return Err(ValidationError::QueryTooShort { min });
        }
        self.ctx
            .api_key
            .clone()
            .ok_or(ValidationError::MissingCredential)
    }

    /// Surface a validation message without leaving `Idle`.
    fn reject(&mut self, err: ValidationError) -> LookupError {
        debug!(reason = %err, "input rejected");
        self.show_banner(err.to_string(), BannerKind::Validation);
        self.set_phase(Phase::Idle);
        err.into()
    }

    fn no_results(&mut self, message: Option<String>) -> LookupError {
        let err = LookupError::NoResults(message);
        info!(reason = %err, "no results");
        self.show_banner(err.to_string(), BannerKind::NoResults);
        self.set_phase(Phase::Empty);
        err
    }

    fn fail(&mut self, err: LookupError, message: &str) -> LookupError {
        self.show_banner(message.to_string(), BannerKind::Error);
        self.set_phase(Phase::Failed);
        err
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            // No subscribers is fine.
            let _ = self.phase_tx.send(phase);
        }
    }

    fn show_banner(&mut self, message: String, kind: BannerKind) {
        self.banner = Some(Banner::new(message, kind, self.ctx.ui.banner_duration()));
    }
}
