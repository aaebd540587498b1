use serde::{Deserialize, Serialize};

use crate::{ParticipantId, Side};

use super::MatchError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub player_out: ParticipantId,
    pub player_in: ParticipantId,
    pub side: Side,
    /// Match-clock reading (seconds played) captured at the swap.
    pub clock_at_swap_secs: u64,
}

/// Membership of the two active sides plus the ordered substitution log.
/// A participant id is fielded on at most one side at any instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterLedger {
    side_a: Vec<ParticipantId>,
    side_b: Vec<ParticipantId>,
    substitutions: Vec<Substitution>,
}

impl RosterLedger {
    pub fn new(
        side_a: Vec<ParticipantId>,
        side_b: Vec<ParticipantId>,
    ) -> Result<Self, MatchError> {
        for player in &side_a {
            if side_b.contains(player) {
                return Err(MatchError::InvalidRoster(*player));
            }
        }
        for roster in [&side_a, &side_b] {
            for (i, player) in roster.iter().enumerate() {
                if roster[..i].contains(player) {
                    return Err(MatchError::InvalidRoster(*player));
                }
            }
        }
        Ok(Self {
            side_a,
            side_b,
            substitutions: Vec::new(),
        })
    }

    #[must_use]
    pub fn side(
        &self,
        side: Side,
    ) -> &[ParticipantId] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    #[must_use]
    pub fn side_of(
        &self,
        player: ParticipantId,
    ) -> Option<Side> {
        if self.side_a.contains(&player) {
            Some(Side::A)
        } else if self.side_b.contains(&player) {
            Some(Side::B)
        } else {
            None
        }
    }

    #[must_use]
    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Swaps `player_out` for `player_in` on `side`, preserving the slot.
    /// Substituted-in players remain eligible to score and be swapped again.
    pub fn complete_swap(
        &mut self,
        player_out: ParticipantId,
        player_in: ParticipantId,
        side: Side,
        clock_at_swap_secs: u64,
    ) -> Result<Substitution, MatchError> {
        if self.side_of(player_in).is_some() {
            return Err(MatchError::InvalidSubstitution { player: player_in, side });
        }
        let roster = match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        };
        let slot = roster
            .iter()
            .position(|&p| p == player_out)
            .ok_or(MatchError::InvalidSubstitution {
                player: player_out,
                side,
            })?;
        roster[slot] = player_in;
        let swap = Substitution {
            player_out,
            player_in,
            side,
            clock_at_swap_secs,
        };
        self.substitutions.push(swap);
        Ok(swap)
    }

    /// Reverses the most recent swap, restoring the prior membership exactly.
    pub fn undo_last_swap(&mut self) -> Result<Substitution, MatchError> {
        let swap = self.substitutions.pop().ok_or(MatchError::NothingToUndo)?;
        let roster = match swap.side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        };
        if let Some(slot) = roster.iter().position(|&p| p == swap.player_in) {
            roster[slot] = swap.player_out;
        }
        Ok(swap)
    }
}
