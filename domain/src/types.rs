use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct ParticipantId(pub uuid::Uuid);

impl Default for ParticipantId {
    fn default() -> Self {
        ParticipantId::new()
    }
}

impl ParticipantId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId::new()
    }
}

/// Identifies one recurring event (one pitch, one waiting line).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct GroupId(pub uuid::Uuid);

impl GroupId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        GroupId::new()
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Wall-clock instant in milliseconds since the Unix epoch.
///
/// The domain never reads the system clock itself; callers pass `now` into
/// every time-dependent operation, which keeps all clock arithmetic pure and
/// lets the same value round-trip through persistence.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Whole seconds elapsed since `earlier`, zero if `earlier` is in the future.
    #[must_use]
    pub fn seconds_since(
        self,
        earlier: Timestamp,
    ) -> u64 {
        self.0.saturating_sub(earlier.0) / 1000
    }

    #[must_use]
    pub fn plus(
        self,
        duration: Duration,
    ) -> Self {
        Self(self.0 + duration.as_millis() as u64)
    }

    #[must_use]
    pub fn minus(
        self,
        duration: Duration,
    ) -> Self {
        Self(self.0.saturating_sub(duration.as_millis() as u64))
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Score {
    pub side_a: u32,
    pub side_b: u32,
}

impl Score {
    #[must_use]
    pub fn for_side(
        &self,
        side: Side,
    ) -> u32 {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    pub fn increment(
        &mut self,
        side: Side,
    ) {
        match side {
            Side::A => self.side_a += 1,
            Side::B => self.side_b += 1,
        }
    }

    pub fn decrement(
        &mut self,
        side: Side,
    ) {
        match side {
            Side::A => self.side_a = self.side_a.saturating_sub(1),
            Side::B => self.side_b = self.side_b.saturating_sub(1),
        }
    }

    /// The side currently ahead, `None` when level.
    #[must_use]
    pub fn leader(&self) -> Option<Side> {
        match self.side_a.cmp(&self.side_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub fn is_level(&self) -> bool {
        self.side_a == self.side_b
    }
}
