//! Checkout State Management
//!
//! This module manages the application state shared by the handlers: the
//! remote API client, the pricing calculator and the per-session checkout
//! state (buy-now selection and submission status).

use super::models::BuyNowItem;
use super::submission::{SubmissionError, SubmissionState};
use crate::api::StoreApi;
use crate::config::AppConfig;
use crate::pricing::PricingCalculator;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// How often idle sessions are swept.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Checkout progress of one browser session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub buy_now: Option<BuyNowItem>,
    pub submission: SubmissionState,
    last_seen: Instant,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self {
            buy_now: None,
            submission: SubmissionState::default(),
            last_seen: Instant::now(),
        }
    }
}

impl CheckoutSession {
    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// Core application state.
pub struct AppState {
    /// Client for the remote store API.
    pub api: Arc<dyn StoreApi>,

    pub pricing: PricingCalculator,

    /// Currency code sent with every order line.
    pub currency: String,

    /// Checkout sessions keyed by session id.
    /// DashMap allows concurrent access without external Mutexes.
    pub sessions: DashMap<String, CheckoutSession>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn StoreApi>,
        pricing: PricingCalculator,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            api,
            pricing,
            currency: currency.into(),
            sessions: DashMap::new(),
        }
    }

    /// State wired from configuration.
    pub fn from_config(api: Arc<dyn StoreApi>, config: &AppConfig) -> Self {
        Self::new(api, config.pricing.calculator(), config.pricing.currency.clone())
    }

    /// Current buy-now selection of a session.
    pub fn buy_now(&self, session_id: &str) -> Option<BuyNowItem> {
        self.sessions
            .get(session_id)
            .and_then(|session| session.buy_now.clone())
    }

    /// Replaces the buy-now selection. A new selection starts a fresh
    /// submission; it is refused while an order is being submitted.
    pub fn select_buy_now(
        &self,
        session_id: &str,
        item: BuyNowItem,
    ) -> Result<(), SubmissionError> {
        let mut session = self.sessions.entry(session_id.to_string()).or_default();
        if session.submission.is_submitting() {
            return Err(SubmissionError::AlreadySubmitting);
        }
        session.buy_now = Some(item);
        session.submission.reset();
        session.touch();
        Ok(())
    }

    /// Stores freshly fetched price and stock for the selected item. Ignored
    /// when the selection changed in the meantime.
    pub fn refresh_buy_now(&self, session_id: &str, item: &BuyNowItem) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            if let Some(current) = session.buy_now.as_mut() {
                if current.book_id == item.book_id {
                    *current = item.clone();
                    session.touch();
                }
            }
        }
    }

    /// Drops the session entirely. Refused while an order is being submitted.
    pub fn clear_buy_now(&self, session_id: &str) -> Result<Option<BuyNowItem>, SubmissionError> {
        let removed = self
            .sessions
            .remove_if(session_id, |_, session| !session.submission.is_submitting());
        match removed {
            Some((_, session)) => Ok(session.buy_now),
            None if self.sessions.contains_key(session_id) => {
                Err(SubmissionError::AlreadySubmitting)
            }
            None => Ok(None),
        }
    }

    pub fn submission(&self, session_id: &str) -> SubmissionState {
        self.sessions
            .get(session_id)
            .map(|session| session.submission.clone())
            .unwrap_or_default()
    }

    /// Marks the session as submitting. The map entry is released before the
    /// caller goes on to await the remote call.
    pub fn begin_submission(&self, session_id: &str) -> Result<(), SubmissionError> {
        let mut session = self.sessions.entry(session_id.to_string()).or_default();
        session.submission.begin()?;
        session.touch();
        Ok(())
    }

    /// Records success and removes the session with its draft. Returns the
    /// confirmation path.
    pub fn complete_submission(
        &self,
        session_id: &str,
        order_id: &str,
    ) -> Result<String, SubmissionError> {
        let path = {
            let mut session = self
                .sessions
                .get_mut(session_id)
                .ok_or(SubmissionError::NotSubmitting)?;
            session.submission.succeed(order_id)?
        };
        self.sessions.remove(session_id);
        Ok(path)
    }

    /// Records failure; the draft stays as it was.
    pub fn fail_submission(&self, session_id: &str, message: &str) -> Result<(), SubmissionError> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or(SubmissionError::NotSubmitting)?;
        session.submission.fail(message)?;
        session.touch();
        Ok(())
    }

    /// Removes sessions untouched for `max_idle`. Sessions with a submission
    /// in flight are kept. Returns the number removed.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            session.submission.is_submitting() || session.last_seen.elapsed() < max_idle
        });
        before.saturating_sub(self.sessions.len())
    }
}

/// Periodically drops idle sessions for the lifetime of the server.
pub fn spawn_session_sweeper(state: SharedState, max_idle: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = state.sweep_idle(max_idle);
            if removed > 0 {
                debug!(removed, remaining = state.sessions.len(), "swept idle sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpStoreApi;
    use crate::config::ApiConfig;
    use crate::pricing::Money;

    fn state() -> AppState {
        let api = HttpStoreApi::new(&ApiConfig::default()).unwrap();
        AppState::new(Arc::new(api), PricingCalculator::default(), "USD")
    }

    fn item(book_id: &str) -> BuyNowItem {
        BuyNowItem {
            book_id: book_id.to_string(),
            title: "Dune".to_string(),
            unit_price: Money::from_major(20),
            stock: 3,
            quantity: 1,
        }
    }

    #[test]
    fn selection_is_refused_while_submitting() {
        let state = state();
        state.select_buy_now("s1", item("b1")).unwrap();
        state.begin_submission("s1").unwrap();

        assert_eq!(
            state.select_buy_now("s1", item("b2")),
            Err(SubmissionError::AlreadySubmitting)
        );
        assert_eq!(state.clear_buy_now("s1"), Err(SubmissionError::AlreadySubmitting));
        assert_eq!(state.buy_now("s1").unwrap().book_id, "b1");

        assert_eq!(state.complete_submission("s1", "o-1").unwrap(), "/orders/o-1");
    }

    #[test]
    fn completed_checkout_removes_the_session() {
        let state = state();
        state.select_buy_now("s1", item("b1")).unwrap();
        state.select_buy_now("s2", item("b2")).unwrap();
        assert_eq!(state.sessions.len(), 2);

        state.begin_submission("s1").unwrap();
        state.complete_submission("s1", "o-1").unwrap();

        assert_eq!(state.sessions.len(), 1);
        assert!(state.buy_now("s1").is_none());
        assert_eq!(state.submission("s1"), SubmissionState::Idle);
    }

    #[test]
    fn clearing_removes_the_session() {
        let state = state();
        state.select_buy_now("s1", item("b1")).unwrap();

        assert_eq!(state.clear_buy_now("s1").unwrap().unwrap().book_id, "b1");
        assert!(state.sessions.is_empty());
        assert_eq!(state.clear_buy_now("s1"), Ok(None));
    }

    #[test]
    fn failed_submission_keeps_the_draft() {
        let state = state();
        state.select_buy_now("s1", item("b1")).unwrap();
        state.begin_submission("s1").unwrap();
        state.fail_submission("s1", "Card declined").unwrap();

        assert_eq!(state.buy_now("s1").unwrap().book_id, "b1");
        assert_eq!(
            state.submission("s1"),
            SubmissionState::Failed {
                message: "Card declined".into()
            }
        );
    }

    #[test]
    fn sweep_keeps_pending_submissions() {
        let state = state();
        state.select_buy_now("idle", item("b1")).unwrap();
        state.select_buy_now("busy", item("b2")).unwrap();
        state.begin_submission("busy").unwrap();

        assert_eq!(state.sweep_idle(Duration::from_secs(3600)), 0);
        assert_eq!(state.sweep_idle(Duration::ZERO), 1);
        assert!(state.buy_now("idle").is_none());
        assert!(state.buy_now("busy").is_some());
    }
}
