//! Confirmation dialogs - coordinates a yes/no decision between one or more participants.
//!
//! A [`ConfirmationSession`] tracks who has voted and the single terminal [`Outcome`].
//! The [`ConfirmationCoordinator`] drives a session: it asks a [`Presenter`] to show the
//! prompt, waits for the outcome or the deadline, removes the prompt's choices, and reports
//! whether the action was confirmed.
//!
//! Two authorization rules exist. With no required participants the initiator alone decides.
//! With required participants every one of them must confirm, and a deny from any of them
//! ends the session immediately.

use crate::errors::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Identifier of a user taking part in a confirmation (a Discord user id in practice).
pub type ParticipantId = u64;

/// How long a prompt stays answerable unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Lifecycle state of a session. Everything except `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Still waiting for votes
    Pending,
    /// Every required participant (or the sole decider) confirmed
    Confirmed,
    /// An authorized participant denied
    Denied,
    /// The caller aborted the decision
    Cancelled,
    /// The deadline passed before the decision was made
    TimedOut,
}

impl Outcome {
    /// Returns true once no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A single participant's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// Agree to the action
    Confirm,
    /// Reject the action
    Deny,
}

/// What happened to an accepted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteReceipt {
    /// The confirm was recorded and `remaining` participants still have to respond
    Recorded {
        /// Number of required participants who have not confirmed yet
        remaining: usize,
    },
    /// This vote moved the session to a terminal outcome
    Resolved(Outcome),
    /// The session was already resolved or past its deadline; nothing changed
    Ignored,
}

/// Reasons a vote is rejected. Rejections never change the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VoteError {
    /// The voter is not one of the participants allowed to answer
    #[error("You are not allowed to interact with this button.")]
    Unauthorized,
    /// The voter already cast a vote in this session
    #[error("You have already interacted with this button.")]
    DuplicateVote,
}

/// Snapshot handed to the progress hook after a confirm that did not resolve the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Who just confirmed
    pub voter: ParticipantId,
    /// Everyone who has confirmed so far, in ascending id order
    pub responded: Vec<ParticipantId>,
    /// Required participants still missing, in ascending id order
    pub remaining: Vec<ParticipantId>,
}

type ProgressHook = Box<dyn Fn(Progress) -> BoxFuture<'static, ()> + Send + Sync>;
type TimeoutHook = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

struct SessionState {
    responded: BTreeSet<ParticipantId>,
    deadline: Option<Instant>,
}

/// One in-flight confirmation decision.
///
/// All mutations go through an internal mutex, so votes, cancellation and the timer can race
/// freely and still produce exactly one terminal outcome.
pub struct ConfirmationSession {
    initiator: ParticipantId,
    required: BTreeSet<ParticipantId>,
    timeout: Duration,
    state: Mutex<SessionState>,
    outcome: watch::Sender<Outcome>,
    on_progress: Option<ProgressHook>,
    on_timeout: Option<TimeoutHook>,
}

impl fmt::Debug for ConfirmationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationSession")
            .field("initiator", &self.initiator)
            .field("required", &self.required)
            .field("timeout", &self.timeout)
            .field("outcome", &self.outcome())
            .finish_non_exhaustive()
    }
}

impl ConfirmationSession {
    /// Creates a session decided by `initiator` alone, using [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new(initiator: ParticipantId) -> Self {
        let (outcome, _) = watch::channel(Outcome::Pending);
        Self {
            initiator,
            required: BTreeSet::new(),
            timeout: DEFAULT_TIMEOUT,
            state: Mutex::new(SessionState {
                responded: BTreeSet::new(),
                deadline: None,
            }),
            outcome,
            on_progress: None,
            on_timeout: None,
        }
    }

    /// Requires every listed participant to confirm. An empty list keeps the single-decider rule.
    #[must_use]
    pub fn with_participants(mut self, participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        self.required = participants.into_iter().collect();
        self
    }

    /// Sets how long the prompt stays answerable once started.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers a hook run after each confirm that leaves a multi-party session pending.
    #[must_use]
    pub fn on_progress<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Progress) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_progress = Some(Box::new(move |progress| Box::pin(hook(progress))));
        self
    }

    /// Registers a hook run once if the session ends by timing out.
    #[must_use]
    pub fn on_timeout<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_timeout = Some(Box::new(move || Box::pin(hook())));
        self
    }

    /// The participant who issued the prompt.
    #[must_use]
    pub const fn initiator(&self) -> ParticipantId {
        self.initiator
    }

    /// Participants who must all confirm; empty for single-decider sessions.
    #[must_use]
    pub const fn required_participants(&self) -> &BTreeSet<ParticipantId> {
        &self.required
    }

    /// Participants who have confirmed so far.
    #[must_use]
    pub fn responded_participants(&self) -> BTreeSet<ParticipantId> {
        self.lock_state().responded.clone()
    }

    /// Current outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        *self.outcome.borrow()
    }

    /// The deadline armed by [`ConfirmationCoordinator::start`], if it has started.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.lock_state().deadline
    }

    /// Records a vote from `participant`.
    ///
    /// Votes arriving after the session resolved, or after its deadline, are ignored without
    /// error. Unauthorized and duplicate votes are rejected and leave the session untouched.
    pub async fn submit_vote(
        &self,
        participant: ParticipantId,
        vote: Vote,
    ) -> std::result::Result<VoteReceipt, VoteError> {
        let (receipt, pending) = self.apply_vote(participant, vote)?;
        if let Some(pending) = pending {
            self.notify_progress(pending).await;
        }
        Ok(receipt)
    }

    /// Aborts the decision. Returns false when the session had already resolved.
    pub fn cancel(&self) -> bool {
        let cancelled = self.resolve(Outcome::Cancelled);
        if cancelled {
            info!(initiator = self.initiator, "Confirmation cancelled");
        }
        cancelled
    }

    /// Runs a progress hook built by [`Self::apply_vote`] unless the session resolved since.
    async fn notify_progress(&self, pending: BoxFuture<'static, ()>) {
        if self.outcome().is_terminal() {
            debug!("Skipping progress hook on a resolved confirmation");
            return;
        }
        pending.await;
    }

    /// Applies `vote` under the state lock. A confirm that leaves the session pending also
    /// returns the progress hook's future, created before the lock is released.
    fn apply_vote(
        &self,
        participant: ParticipantId,
        vote: Vote,
    ) -> std::result::Result<(VoteReceipt, Option<BoxFuture<'static, ()>>), VoteError> {
        let mut state = self.lock_state();

        let past_deadline = state.deadline.is_some_and(|deadline| Instant::now() >= deadline);
        if self.outcome().is_terminal() || past_deadline {
            debug!(participant, "Ignoring vote on a resolved confirmation");
            return Ok((VoteReceipt::Ignored, None));
        }

        self.authorize(participant)?;

        if state.responded.contains(&participant) {
            return Err(VoteError::DuplicateVote);
        }

        if vote == Vote::Deny {
            self.outcome.send_replace(Outcome::Denied);
            info!(participant, "Confirmation denied");
            return Ok((VoteReceipt::Resolved(Outcome::Denied), None));
        }

        state.responded.insert(participant);

        if self.required.is_empty() || state.responded == self.required {
            self.outcome.send_replace(Outcome::Confirmed);
            info!(participant, "Confirmation confirmed");
            return Ok((VoteReceipt::Resolved(Outcome::Confirmed), None));
        }

        let remaining: Vec<ParticipantId> = self
            .required
            .difference(&state.responded)
            .copied()
            .collect();
        let receipt = VoteReceipt::Recorded {
            remaining: remaining.len(),
        };
        let pending = self.on_progress.as_ref().map(|hook| {
            hook(Progress {
                voter: participant,
                responded: state.responded.iter().copied().collect(),
                remaining,
            })
        });

        Ok((receipt, pending))
    }

    fn authorize(&self, participant: ParticipantId) -> std::result::Result<(), VoteError> {
        let allowed = if self.required.is_empty() {
            participant == self.initiator
        } else {
            self.required.contains(&participant)
        };

        if allowed {
            Ok(())
        } else {
            Err(VoteError::Unauthorized)
        }
    }

    /// Moves a pending session to `outcome`. Only the caller that wins the transition gets true.
    fn resolve(&self, outcome: Outcome) -> bool {
        let _state = self.lock_state();
        if self.outcome().is_terminal() {
            return false;
        }
        self.outcome.send_replace(outcome);
        true
    }

    fn arm(&self) -> Instant {
        let deadline = Instant::now() + self.timeout;
        self.lock_state().deadline = Some(deadline);
        deadline
    }

    async fn wait(&self) -> Outcome {
        let mut outcome = self.outcome.subscribe();
        let resolved = outcome.wait_for(|outcome| outcome.is_terminal()).await;
        resolved.map_or_else(|_| self.outcome(), |outcome| *outcome)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Displays a prompt with "Confirm" and "Deny" choices and removes them afterwards.
///
/// Implementations feed user interactions back through [`ConfirmationSession::submit_vote`].
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Handle to whatever was displayed, used to disable it later.
    type Surface: Send + Sync;

    /// Shows `prompt` with the two choices wired to `session`.
    async fn render(&self, prompt: &str, session: Arc<ConfirmationSession>) -> Result<Self::Surface>;

    /// Removes the choices from `surface`. Must tolerate being called more than once.
    async fn disable(&self, surface: &Self::Surface) -> Result<()>;
}

/// Drives confirmation sessions through a [`Presenter`].
#[derive(Debug)]
pub struct ConfirmationCoordinator<P> {
    presenter: P,
}

impl<P: Presenter> ConfirmationCoordinator<P> {
    /// Creates a coordinator rendering through `presenter`.
    pub const fn new(presenter: P) -> Self {
        Self { presenter }
    }

    /// The presenter this coordinator renders through.
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Shows the prompt and waits for the session to resolve or time out.
    ///
    /// Returns `Ok(true)` only when the outcome is [`Outcome::Confirmed`]. The prompt's choices
    /// are disabled before this returns on every path; a failure to disable is logged and does
    /// not affect the result. If rendering fails the session is cancelled and the error returned.
    pub async fn start(&self, session: &Arc<ConfirmationSession>, prompt: &str) -> Result<bool> {
        let surface = match self.presenter.render(prompt, Arc::clone(session)).await {
            Ok(surface) => surface,
            Err(e) => {
                session.cancel();
                return Err(e);
            }
        };

        let deadline = session.arm();
        let timed_out = match tokio::time::timeout_at(deadline, session.wait()).await {
            Ok(_) => false,
            Err(_) => session.resolve(Outcome::TimedOut),
        };

        if let Err(e) = self.presenter.disable(&surface).await {
            warn!(error = %e, "Failed to disable confirmation prompt");
        }

        if timed_out {
            info!(initiator = session.initiator, "Confirmation timed out");
            if let Some(hook) = &session.on_timeout {
                hook().await;
            }
        }

        let outcome = session.outcome();
        debug!(?outcome, "Confirmation finished");
        Ok(outcome == Outcome::Confirmed)
    }
}
