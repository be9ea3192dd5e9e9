use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::{DashMap, mapref::entry::Entry};
use poise::serenity_prelude::UserId;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Clone, Copy, Debug)]
struct CooldownEntry {
    used_at: Instant,
    expires_at: Instant,
}

/// Per-command, per-user rate limit record.
///
/// Entries carry their own expiry and are checked lazily; `purge_expired`
/// drops the ones nobody came back for.
#[derive(Debug, Default)]
pub struct CooldownLedger {
    entries: DashMap<(String, UserId), CooldownEntry>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use of `command` by `user` at `now` unless an unexpired entry
    /// exists, in which case the remaining wait is returned.
    pub fn try_acquire(
        &self,
        command: &str,
        user_id: UserId,
        cooldown: Duration,
        now: Instant,
    ) -> Result<(), Duration> {
        let fresh = CooldownEntry {
            used_at: now,
            expires_at: now + cooldown,
        };

        match self.entries.entry((command.to_string(), user_id)) {
            Entry::Occupied(mut occupied) => {
                let expires_at = occupied.get().used_at + cooldown;
                if now < expires_at {
                    return Err(expires_at - now);
                }
                occupied.insert(fresh);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
            }
        }

        Ok(())
    }

    /// Drop every entry whose cooldown has elapsed at `now`
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Periodically purge expired cooldowns. The handle aborts the sweeper.
pub fn spawn_cooldown_sweeper(ledger: Arc<CooldownLedger>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let purged = ledger.purge_expired(Instant::now());
            if purged > 0 {
                debug!(
                    "Purged {} expired cooldown entries, {} still active",
                    purged,
                    ledger.len()
                );
            }
        }
    })
}
