//! Participant registry.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use tradeflow_core::model::{NewParticipant, Participant, ParticipantCategory};
use tradeflow_core::types::ParticipantId;
use tradeflow_core::{FinanceError, FinanceResult};
use tradeflow_storage::StorageAdapter;

use crate::clock::Clock;
use crate::sequence::IdSequence;

/// Stores participants and enforces unique business identity.
///
/// Credit attributes are maintained by external reputation processes; the
/// registry exposes no way to change them.
pub struct ParticipantRegistry {
    storage: Arc<dyn StorageAdapter>,
    clock: Arc<dyn Clock>,
    sequence: IdSequence,
    // Serializes registration: the duplicate check spans every participant.
    register_lock: Mutex<()>,
}

impl ParticipantRegistry {
    pub(crate) fn new(
        storage: Arc<dyn StorageAdapter>,
        clock: Arc<dyn Clock>,
        last_sequence: u64,
    ) -> Self {
        Self {
            storage,
            clock,
            sequence: IdSequence::starting_after(last_sequence),
            register_lock: Mutex::new(()),
        }
    }

    /// Registers a participant and returns its id.
    ///
    /// Fails with `DuplicateParticipant` if a participant with the same
    /// normalized name and category already exists.
    pub fn register(&self, request: NewParticipant) -> FinanceResult<ParticipantId> {
        request.validate()?;
        let identity = request.identity_key();

        let _guard = self.register_lock.lock();
        if let Some(existing) = self
            .storage
            .list_participants()?
            .into_iter()
            .find(|p| p.identity_key() == identity)
        {
            return Err(FinanceError::DuplicateParticipant {
                name: existing.name,
                category: existing.category.to_string(),
                existing_id: existing.id.to_string(),
            });
        }

        let id = ParticipantId::from_sequence(self.sequence.next());
        let participant = request.into_participant(id.clone(), self.clock.now());
        self.storage.put_participant(&participant)?;

        info!(
            participant_id = %id,
            name = %participant.name,
            category = %participant.category,
            credit_rating = participant.credit_rating,
            "Participant registered"
        );
        Ok(id)
    }

    /// Looks up a participant; fails with `NotFound`.
    pub fn get(&self, id: &ParticipantId) -> FinanceResult<Participant> {
        self.storage
            .get_participant(id)?
            .ok_or_else(|| FinanceError::not_found("participant", id.as_str()))
    }

    /// Looks up a participant referenced by another entity; fails with
    /// `UnknownParticipant`.
    pub fn require(&self, id: &ParticipantId) -> FinanceResult<Participant> {
        self.storage
            .get_participant(id)?
            .ok_or_else(|| FinanceError::unknown_participant(id.as_str()))
    }

    /// Lists participants in registration order, optionally by category.
    pub fn list(&self, category: Option<ParticipantCategory>) -> FinanceResult<Vec<Participant>> {
        let participants = self.storage.list_participants()?;
        Ok(match category {
            Some(category) => participants
                .into_iter()
                .filter(|p| p.category == category)
                .collect(),
            None => participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use tradeflow_storage::InMemoryStorage;

    fn registry() -> ParticipantRegistry {
        ParticipantRegistry::new(Arc::new(InMemoryStorage::new()), Arc::new(SystemClock), 0)
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let registry = registry();
        let a = registry
            .register(NewParticipant::builder("Nakuru Dairy", ParticipantCategory::Supplier).build())
            .unwrap();
        let b = registry
            .register(NewParticipant::builder("Mombasa Mart", ParticipantCategory::Retailer).build())
            .unwrap();
        assert_eq!(a.as_str(), "PRT-00000001");
        assert_eq!(b.as_str(), "PRT-00000002");
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let registry = registry();
        registry
            .register(NewParticipant::builder("Nakuru Dairy", ParticipantCategory::Supplier).build())
            .unwrap();
        let err = registry
            .register(NewParticipant::builder(" nakuru  dairy", ParticipantCategory::Supplier).build())
            .unwrap_err();
        assert!(matches!(
            err,
            FinanceError::DuplicateParticipant { ref existing_id, .. } if existing_id == "PRT-00000001"
        ));

        // Same name in another role is a different business identity.
        registry
            .register(NewParticipant::builder("Nakuru Dairy", ParticipantCategory::Distributor).build())
            .unwrap();
    }

    #[test]
    fn test_get_vs_require_errors() {
        let registry = registry();
        let missing = ParticipantId::from_sequence(5);
        assert!(matches!(
            registry.get(&missing),
            Err(FinanceError::NotFound { entity: "participant", .. })
        ));
        assert!(matches!(
            registry.require(&missing),
            Err(FinanceError::UnknownParticipant { .. })
        ));
    }

    #[test]
    fn test_list_by_category() {
        let registry = registry();
        for (name, category) in [
            ("Eldoret Mills", ParticipantCategory::Manufacturer),
            ("Kisii Farms", ParticipantCategory::Supplier),
            ("Thika Foods", ParticipantCategory::Manufacturer),
        ] {
            registry
                .register(NewParticipant::builder(name, category).build())
                .unwrap();
        }

        let names: Vec<_> = registry
            .list(Some(ParticipantCategory::Manufacturer))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Eldoret Mills", "Thika Foods"]);
        assert_eq!(registry.list(None).unwrap().len(), 3);
    }
}
