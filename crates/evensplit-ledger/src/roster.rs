//! The participant roster for one computation run.

use std::collections::BTreeSet;

use evensplit_types::{ComputationWarning, ParticipantId};

/// Known participants, in the order the caller listed them.
///
/// Duplicate identifiers are dropped (first occurrence wins) and reported
/// as [`ComputationWarning::DuplicateParticipant`].
#[derive(Debug, Clone, Default)]
pub struct Roster {
    ordered: Vec<ParticipantId>,
    members: BTreeSet<ParticipantId>,
    duplicates: Vec<ParticipantId>,
}

impl Roster {
    pub fn new(participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        let mut roster = Self::default();
        for participant in participants {
            if roster.members.insert(participant.clone()) {
                roster.ordered.push(participant);
            } else {
                tracing::warn!(participant = %participant, "Duplicate participant ignored");
                roster.duplicates.push(participant);
            }
        }
        roster
    }

    #[must_use]
    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    /// Participants in listing order, without duplicates.
    #[must_use]
    pub fn participants(&self) -> &[ParticipantId] {
        &self.ordered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// One warning per dropped duplicate.
    #[must_use]
    pub fn warnings(&self) -> Vec<ComputationWarning> {
        self.duplicates
            .iter()
            .map(|participant| ComputationWarning::DuplicateParticipant {
                participant: participant.clone(),
            })
            .collect()
    }
}
