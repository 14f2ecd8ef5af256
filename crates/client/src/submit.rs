//! Submission flow shared by the order, private-room and event forms.
//!
//! ```text
//! Idle → Collecting → Submitting → Succeeded
//!                                → LoginRequired
//!                                → Failed
//! ```
//!
//! A submitter owns one form's in-flight flag: while a request is out, a
//! second submit returns [`SubmitOutcome::Busy`] and sends nothing.

use std::cell::Cell;
use std::fmt;

use bistro_core::api::SubmitResponse;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::platform::Host;
use crate::resume::redirect_to_login;
use crate::storage::keys;
use crate::transport::Transport;

/// Shown when the server rejects a submission without saying why.
pub const FALLBACK_ERROR: &str = "Something went wrong.";

/// Which form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Order,
    PrivateRoom,
    EventReservation,
}

impl FormKind {
    /// Endpoint the form posts to.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Order => "/customer/api/orders",
            Self::PrivateRoom => "/customer/api/private-room",
            Self::EventReservation => "/customer/api/event-reservation",
        }
    }

    /// Session key the unsent body is parked under when login is required.
    #[must_use]
    pub const fn pending_key(self) -> &'static str {
        match self {
            Self::Order => keys::PENDING_ORDER,
            Self::PrivateRoom => keys::PENDING_PRIVATE_ROOM,
            Self::EventReservation => keys::PENDING_EVENT,
        }
    }

    /// Page section to come back to after login.
    #[must_use]
    pub const fn redirect_fragment(self) -> &'static str {
        match self {
            Self::Order => "#order",
            Self::PrivateRoom => "#private-rooms",
            Self::EventReservation => "#event-reservation",
        }
    }

    /// Confirmation alert for a successful submit.
    #[must_use]
    pub fn success_message(self, response: &SubmitResponse) -> String {
        match self {
            Self::Order => {
                let id = response
                    .order_id
                    .as_ref()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string);
                format!("✅ Order confirmed! ID: {id}")
            }
            Self::PrivateRoom => "✅ Private room booked!".to_string(),
            Self::EventReservation => "✅ Event reserved!".to_string(),
        }
    }

    /// Alert for a request that never produced a readable reply.
    #[must_use]
    pub const fn network_error_message(self) -> &'static str {
        match self {
            Self::Order => "⚠️ Network error. Please try again.",
            Self::PrivateRoom | Self::EventReservation => "⚠️ Network error.",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => write!(f, "order"),
            Self::PrivateRoom => write!(f, "private-room"),
            Self::EventReservation => write!(f, "event-reservation"),
        }
    }
}

/// Where a submitter is in its flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Collecting,
    Submitting,
    Succeeded,
    LoginRequired,
    Failed,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Server accepted the submission.
    Succeeded(SubmitResponse),
    /// Body parked in session storage and the user sent to log in.
    LoginRequired,
    /// Server refused or the request failed; carries the alert shown.
    Failed(String),
    /// Form fields were not submittable; nothing was sent.
    Rejected(String),
    /// Another submit of the same form is still in flight.
    Busy,
}

impl SubmitOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Clears the in-flight flag however the submit ends.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Drives one form through [`SubmitState`].
#[derive(Debug)]
pub struct Submitter {
    kind: FormKind,
    state: Cell<SubmitState>,
    in_flight: Cell<bool>,
}

impl Submitter {
    #[must_use]
    pub const fn new(kind: FormKind) -> Self {
        Self {
            kind,
            state: Cell::new(SubmitState::Idle),
            in_flight: Cell::new(false),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> SubmitState {
        self.state.get()
    }

    /// Whether a request is out. The submit trigger is disabled meanwhile.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Collect, post and handle the reply.
    ///
    /// `collect` turns the form into a request body or refuses with a
    /// message for the user. Every outcome except `Busy` has already been
    /// shown to the user through `host` when this returns.
    #[instrument(skip_all, fields(form = %self.kind))]
    pub async fn submit<T, P>(
        &self,
        transport: &T,
        host: &Host,
        collect: impl FnOnce() -> Result<P, String>,
    ) -> SubmitOutcome
    where
        T: Transport,
        P: Serialize,
    {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("submit ignored, previous request still in flight");
            return SubmitOutcome::Busy;
        };

        self.state.set(SubmitState::Collecting);
        let body = match collect().and_then(|payload| {
            serde_json::to_value(&payload).map_err(|e| {
                error!(error = %e, "failed to encode request body");
                FALLBACK_ERROR.to_string()
            })
        }) {
            Ok(body) => body,
            Err(message) => {
                host.alert(&message);
                self.state.set(SubmitState::Idle);
                return SubmitOutcome::Rejected(message);
            }
        };

        self.state.set(SubmitState::Submitting);
        let reply = transport
            .post_json(self.kind.endpoint(), &body)
            .await
            .and_then(|response| {
                let ok = response.is_success();
                Ok((ok, serde_json::from_value::<SubmitResponse>(response.body)?))
            });

        match reply {
            Err(e) => {
                error!(error = %e, "submit request failed");
                let message = self.kind.network_error_message();
                host.alert(message);
                self.state.set(SubmitState::Failed);
                SubmitOutcome::Failed(message.to_string())
            }
            Ok((_, response)) if response.login_required => {
                if let Err(e) = host.storage.set(self.kind.pending_key(), &body.to_string()) {
                    error!(error = %e, "failed to park pending submission");
                }
                redirect_to_login(
                    host.storage.as_ref(),
                    host.navigator.as_ref(),
                    &host.login_url,
                    self.kind.redirect_fragment(),
                );
                self.state.set(SubmitState::LoginRequired);
                SubmitOutcome::LoginRequired
            }
            Ok((true, response)) if response.success => {
                info!(order_id = ?response.order_id, "submission accepted");
                host.alert(&self.kind.success_message(&response));
                self.state.set(SubmitState::Succeeded);
                SubmitOutcome::Succeeded(response)
            }
            Ok((_, response)) => {
                let reason = response.error.as_deref().unwrap_or(FALLBACK_ERROR);
                warn!(reason, "submission rejected by server");
                let message = format!("⚠️ {reason}");
                host.alert(&message);
                self.state.set(SubmitState::Failed);
                SubmitOutcome::Failed(message)
            }
        }
    }
}
