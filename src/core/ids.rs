//! Opaque identifier newtypes.
//!
//! The engine never interprets these values; they come from the host
//! platform (user snowflakes, channel snowflakes, message handles) and are
//! only compared and passed back out.

use serde::{Deserialize, Serialize};

/// Identifier for a player, as minted by the host platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    /// Create a new user ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User({})", self.0)
    }
}

/// Identifier for a communication channel. One game session per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl ChannelId {
    /// Create a new channel ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Channel({})", self.0)
    }
}

/// Identifier for the guild/server a channel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub u64);

impl GuildId {
    /// Create a new guild ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque reference to a delivered message, used to edit it later.
///
/// Minted by the [`NotificationChannel`](crate::io::NotificationChannel)
/// implementation when a message is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub u64);

impl MessageHandle {
    /// Create a new message handle.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_basics() {
        let user = UserId::new(42);
        assert_eq!(user.raw(), 42);
        assert_eq!(format!("{}", user), "User(42)");

        let channel = ChannelId::new(7);
        assert_eq!(channel.raw(), 7);
        assert_eq!(format!("{}", channel), "Channel(7)");
    }

    #[test]
    fn test_id_serialization() {
        let channel = ChannelId::new(123);
        let json = serde_json::to_string(&channel).unwrap();
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(channel, back);
    }
}
