//! Existence lookups for users and bots.
//!
//! The lobby core doesn't own user or bot storage — that lives behind
//! whatever persistence layer the host application uses. The [`Directory`]
//! trait is the seam: two opaque predicates the registry consults during
//! lobby creation. They are never retried; a `false` answer fails the
//! request immediately.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use skirmish_protocol::{BotId, UserId};

/// Answers "does this identity exist?" for users and bots.
///
/// Implementations may be backed by a database, an HTTP service, or a
/// plain in-memory set ([`MemoryDirectory`]). `Send + Sync + 'static`
/// because the registry is shared across Tokio tasks.
pub trait Directory: Send + Sync + 'static {
    /// Whether the given user is registered.
    fn user_exists(&self, user: UserId) -> impl Future<Output = bool> + Send;

    /// Whether the given bot has been uploaded.
    fn bot_exists(&self, bot: BotId) -> impl Future<Output = bool> + Send;
}

/// In-memory [`Directory`] backed by two hash sets.
///
/// Intended for tests and local demos; a real deployment points the
/// registry at its user/bot store instead.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Mutex<HashSet<UserId>>,
    bots: Mutex<HashSet<BotId>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn insert_user(&self, user: UserId) {
        self.users.lock().unwrap_or_else(PoisonError::into_inner).insert(user);
    }

    /// Registers a bot.
    pub fn insert_bot(&self, bot: BotId) {
        self.bots.lock().unwrap_or_else(PoisonError::into_inner).insert(bot);
    }
}

impl Directory for MemoryDirectory {
    async fn user_exists(&self, user: UserId) -> bool {
        self.users.lock().unwrap_or_else(PoisonError::into_inner).contains(&user)
    }

    async fn bot_exists(&self, bot: BotId) -> bool {
        self.bots.lock().unwrap_or_else(PoisonError::into_inner).contains(&bot)
    }
}
