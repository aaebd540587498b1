use serde::{Deserialize, Serialize};

use crate::ParticipantId;

use super::RotationError;

/// The waiting line: an ordered, duplicate-free list of participants.
/// Positions are 1-based and contiguous by construction of the vector.
///
/// The rotation engine only ever reads a queue as a snapshot and emits a
/// complete replacement ordering; partial deltas would race with manual
/// edits made by the queue collaborator.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationQueue {
    order: Vec<ParticipantId>,
}

#[derive(Clone, Copy, Debug)]
pub enum QueueCommand {
    Join(ParticipantId),
    Leave(ParticipantId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum QueueOutcome {
    Joined(ParticipantId),
    Left(ParticipantId),
    AlreadyQueued,
    NotQueued,
}

impl RotationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_order(order: Vec<ParticipantId>) -> Result<Self, RotationError> {
        for (i, player) in order.iter().enumerate() {
            if order[..i].contains(player) {
                return Err(RotationError::DuplicateEntry(*player));
            }
        }
        Ok(Self { order })
    }

    #[must_use]
    pub fn order(&self) -> &[ParticipantId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 1-based position of `player`, `None` if not queued.
    #[must_use]
    pub fn position(
        &self,
        player: ParticipantId,
    ) -> Option<usize> {
        self.order.iter().position(|&p| p == player).map(|i| i + 1)
    }

    /// Manual insert/remove path used by the queue collaborator; bulk
    /// reordering goes through the rotation engine instead.
    pub fn handle_command(
        &mut self,
        command: QueueCommand,
    ) -> QueueOutcome {
        match command {
            QueueCommand::Join(player) => {
                if self.order.contains(&player) {
                    QueueOutcome::AlreadyQueued
                } else {
                    self.order.push(player);
                    QueueOutcome::Joined(player)
                }
            }
            QueueCommand::Leave(player) => {
                if let Some(pos) = self.order.iter().position(|&p| p == player) {
                    self.order.remove(pos);
                    QueueOutcome::Left(player)
                } else {
                    QueueOutcome::NotQueued
                }
            }
        }
    }
}
