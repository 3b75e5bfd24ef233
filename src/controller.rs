//! Form controller.
//!
//! Owns the form snapshot, the display locale and the loading flag, and
//! turns a valid snapshot into exactly one download trigger.
//!
//! # Loading state
//!
//! ```text
//! Idle --submit()--> Submitting --reset delay--> Idle
//! ```
//!
//! The reset is scheduled on the tokio runtime when one is available and
//! always fires, whether or not the download itself succeeded. While
//! `Submitting`, further submits are refused with [`GenError::Busy`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use mxtgen::controller::{ControllerSettings, FormController};
//! use mxtgen::form::FormField;
//! use mxtgen::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let mut form = FormController::initialize(store, trigger, ControllerSettings::default());
//! form.set_field(FormField::Name, "alice");
//! let submission = form.submit()?;
//! assert_eq!(submission.target, "./gen?name=alice&ver=25.2&count=1");
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{EndpointConfig, MxtgenConfig};
use crate::download::DownloadTrigger;
use crate::errors::{GenError, GenResult, ValidationError};
use crate::form::{FormField, FormState, SeatBounds};
use crate::locale::{Locale, Texts, LOCALE_STORAGE_KEY};
use crate::request::SubmissionRequest;
use crate::storage::PreferenceStore;
use crate::view::FormView;

/// Submission progress as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Submitting,
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Submitting)
    }
}

/// Outcome message shown after the last submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The download was started.
    Success,
    /// Input was refused or the download could not be started.
    Failure,
}

impl Notice {
    /// Localised message for this notice.
    pub fn message(&self, locale: Locale) -> &'static str {
        let texts = locale.texts();
        match self {
            Notice::Success => texts.success_msg,
            Notice::Failure => texts.error_msg,
        }
    }
}

/// Everything the controller needs besides its capabilities.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Initial field values
    pub initial: FormState,
    /// Accepted seat range
    pub bounds: SeatBounds,
    /// Endpoint path and suggested file name
    pub endpoint: EndpointConfig,
    /// Delay between trigger and loading reset
    pub reset_delay: Duration,
    /// Locale used when storage holds nothing usable
    pub default_locale: Locale,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&MxtgenConfig::default())
    }
}

impl From<&MxtgenConfig> for ControllerSettings {
    fn from(config: &MxtgenConfig) -> Self {
        Self {
            initial: FormState::from(&config.form),
            bounds: SeatBounds::from(&config.form),
            endpoint: config.endpoint.clone(),
            reset_delay: config.ui.reset_delay(),
            default_locale: config.ui.default_locale(),
        }
    }
}

/// A started submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Relative request target handed to the trigger
    pub target: String,
    /// Suggested file name handed to the trigger
    pub filename: String,
}

/// Form controller over a preference store `S` and a download trigger `D`.
pub struct FormController<S, D> {
    store: S,
    trigger: D,
    settings: ControllerSettings,
    state: FormState,
    locale: Locale,
    loading: Arc<watch::Sender<LoadingState>>,
    notice: Option<Notice>,
}

impl<S: PreferenceStore, D: DownloadTrigger> FormController<S, D> {
    /// Build a controller, reading the persisted locale once.
    ///
    /// An absent or unrecognised stored value selects the default locale.
    pub fn initialize(store: S, trigger: D, settings: ControllerSettings) -> Self {
        let locale = match store.get(LOCALE_STORAGE_KEY) {
            Some(token) => Locale::from_token(&token).unwrap_or_else(|| {
                debug!(%token, "ignoring unrecognised stored locale");
                settings.default_locale
            }),
            None => settings.default_locale,
        };

        let (loading, _) = watch::channel(LoadingState::Idle);

        Self {
            store,
            trigger,
            state: settings.initial.clone(),
            settings,
            locale,
            loading: Arc::new(loading),
            notice: None,
        }
    }

    /// Current form snapshot.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Replace one field. No validation happens here.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> &FormState {
        self.state = self.state.with_field(field, value);
        &self.state
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Text set for the current locale.
    pub fn texts(&self) -> &'static Texts {
        self.locale.texts()
    }

    /// Switch to the other locale and persist the choice.
    ///
    /// The display switches even if persisting fails; the failure is logged.
    pub fn toggle_locale(&mut self) -> Locale {
        self.locale = self.locale.toggled();
        if let Err(e) = self.store.set(LOCALE_STORAGE_KEY, self.locale.token()) {
            warn!(locale = %self.locale, error = %e, "failed to persist locale preference");
        }
        debug!(locale = %self.locale, "locale toggled");
        self.locale
    }

    pub fn loading_state(&self) -> LoadingState {
        *self.loading.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_state().is_loading()
    }

    /// Observe loading transitions.
    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.loading.subscribe()
    }

    /// Outcome of the last submit attempt, if any.
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Localised message for the last outcome.
    pub fn notice_message(&self) -> Option<&'static str> {
        self.notice.map(|n| n.message(self.locale))
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn trigger(&self) -> &D {
        &self.trigger
    }

    /// Request target the current snapshot would produce, without submitting.
    pub fn preview_target(&self) -> Result<String, ValidationError> {
        self.build_request().map(|req| req.target())
    }

    /// Presentation of the form for the current locale and loading state.
    pub fn view(&self) -> FormView {
        FormView::render(
            &self.state,
            self.locale,
            self.loading_state(),
            self.notice_message(),
            self.settings.bounds,
        )
    }

    fn build_request(&self) -> Result<SubmissionRequest, ValidationError> {
        SubmissionRequest::for_endpoint(&self.state, self.settings.bounds, &self.settings.endpoint)
    }

    /// Submit the current snapshot.
    ///
    /// - `Err(Busy)` while a previous submit is still `Submitting`; nothing changes.
    /// - `Err(Validation)` when the snapshot is out of contract; no target is
    ///   built, the loading flag is untouched, the failure notice is set.
    /// - Otherwise the loading flag goes to `Submitting`, exactly one download
    ///   is triggered and the reset is scheduled. A trigger failure is logged,
    ///   sets the failure notice and is returned as `Err(Trigger)`; the reset
    ///   still happens.
    pub fn submit(&mut self) -> GenResult<Submission> {
        if self.is_loading() {
            debug!("submit ignored while a submission is in flight");
            return Err(GenError::Busy);
        }

        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "submission blocked by validation");
                self.notice = Some(Notice::Failure);
                return Err(e.into());
            }
        };

        self.loading.send_replace(LoadingState::Submitting);

        let submission = Submission {
            target: request.target(),
            filename: request.suggested_filename().to_string(),
        };
        info!(
            request_target = %submission.target,
            filename = %submission.filename,
            "triggering license download"
        );

        let outcome = self
            .trigger
            .trigger_download(&submission.target, &submission.filename);

        self.schedule_reset();

        match outcome {
            Ok(()) => {
                self.notice = Some(Notice::Success);
                Ok(submission)
            }
            Err(e) => {
                error!(request_target = %submission.target, error = %e, "download trigger failed");
                self.notice = Some(Notice::Failure);
                Err(e.into())
            }
        }
    }

    /// Return to `Idle` after the configured delay.
    fn schedule_reset(&self) {
        let loading = Arc::clone(&self.loading);
        let delay = self.settings.reset_delay;

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    loading.send_replace(LoadingState::Idle);
                    debug!("loading state reset");
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    loading.send_replace(LoadingState::Idle);
                });
            }
        }
    }
}
