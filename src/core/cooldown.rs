//! Global per-user command cooldown.
//!
//! Every user may start a top-level command once per cooldown window. Subcommand invocations
//! always pass but still push the user's next-allowed time forward. Configured ids are immune.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Expired entries are swept once the cache holds more than this many users.
const PRUNE_THRESHOLD: usize = 1024;

/// Result of checking whether a user may run a command right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownCheck {
    /// The command may run; the user's window was restarted
    Allowed,
    /// The user is on the immune list and is never tracked
    Immune,
    /// The user must wait until `until`
    OnCooldown {
        /// When the user may run a command again
        until: DateTime<Utc>,
    },
}

impl CooldownCheck {
    /// Returns true when the command may run.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        !matches!(self, Self::OnCooldown { .. })
    }
}

/// Tracks the next time each user may invoke a command.
#[derive(Debug)]
pub struct Cooldowns {
    window: TimeDelta,
    immune: HashSet<u64>,
    next_allowed: Mutex<HashMap<u64, DateTime<Utc>>>,
}

impl Cooldowns {
    /// Creates a tracker with the given window and immune user ids.
    #[must_use]
    pub fn new(window: TimeDelta, immune: impl IntoIterator<Item = u64>) -> Self {
        Self {
            window,
            immune: immune.into_iter().collect(),
            next_allowed: Mutex::new(HashMap::new()),
        }
    }

    /// The cooldown window applied after each allowed command.
    #[must_use]
    pub const fn window(&self) -> TimeDelta {
        self.window
    }

    /// Checks `user` at time `now` and records the new expiry when the command is allowed.
    ///
    /// A user still cooling down is rejected without extending their wait. Subcommands are
    /// never rejected.
    pub fn check(&self, user: u64, is_subcommand: bool, now: DateTime<Utc>) -> CooldownCheck {
        if self.immune.contains(&user) {
            return CooldownCheck::Immune;
        }

        let mut next_allowed = self.lock();

        let pending = next_allowed
            .get(&user)
            .copied()
            .filter(|until| !is_subcommand && *until > now);

        if let Some(until) = pending {
            trace!(user, %until, "User is on cooldown");
            return CooldownCheck::OnCooldown { until };
        }

        let until = now
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        next_allowed.insert(user, until);

        if next_allowed.len() > PRUNE_THRESHOLD {
            let before = next_allowed.len();
            next_allowed.retain(|_, until| *until > now);
            debug!(pruned = before - next_allowed.len(), "Pruned expired cooldowns");
        }

        CooldownCheck::Allowed
    }

    /// Number of users currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, DateTime<Utc>>> {
        self.next_allowed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Formats a Discord relative timestamp (`<t:UNIX:R>`) for `until`.
#[must_use]
pub fn relative_timestamp(until: DateTime<Utc>) -> String {
    format!("<t:{}:R>", until.timestamp())
}
