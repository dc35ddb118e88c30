//! Application service for will commands.
//!
//! Each command loads the document snapshot, applies the mutation on the
//! aggregate, and saves the new snapshot together with the events the
//! mutation recorded. The store's optimistic concurrency check turns a
//! lost race into a retryable [`repository::StoreError::ConcurrencyConflict`].

use common::{AggregateId, PersonId};
use repository::{DocumentQuery, DocumentRecord, DocumentStore, EventRecord, Version};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::DomainError;

use super::aggregate::Will;
use super::bequest::BequestId;
use super::codicil::CodicilId;
use super::commands::{
    AddBequest, AddCodicil, AddDisinheritance, AddExecutor, AddWitness, AttestWill,
    CommandEnvelope, ContestWill, CreateWill, DeclareCapacity, OpenProbate, RecordWitnessSignature,
    ResolveContest, RevokeWill, SetFuneralWishes,
};
use super::disinheritance::DisinheritanceRecord;
use super::events::WillEvent;
use super::executor::ExecutorId;
use super::state::WillStatus;
use super::values::{PartyRef, Testator};
use super::witness::WitnessId;
use super::WillError;

const AGGREGATE_TYPE: &str = "Will";

/// The result of a successfully executed command.
#[derive(Debug)]
pub struct CommandOutcome {
    /// The aggregate after the mutation, at its new version.
    pub will: Will,

    /// The events the mutation emitted, in order.
    pub events: Vec<WillEvent>,

    /// The version the save produced.
    pub new_version: Version,
}

/// Command service over a document store.
#[derive(Debug, Clone)]
pub struct WillService<S> {
    store: S,
}

impl<S: DocumentStore> WillService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Creates a new will in draft for the acting testator.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn create_will(
        &self,
        envelope: CommandEnvelope<CreateWill>,
    ) -> Result<CommandOutcome, DomainError> {
        let mut will = Will::default();
        will.create(
            envelope.will_id,
            Testator::new(envelope.actor_id, envelope.payload.testator_name),
            envelope.payload.document_type,
        )?;

        let outcome = self
            .persist(will, Version::initial(), envelope.actor_id, envelope.correlation_id)
            .await?;
        info!(version = %outcome.new_version, "will created");
        Ok(outcome)
    }

    /// Records the testator's capacity assessment.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn declare_capacity(
        &self,
        envelope: CommandEnvelope<DeclareCapacity>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.declare_capacity(payload.declaration)
        })
        .await
    }

    /// Updates the funeral wishes clause.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn set_funeral_wishes(
        &self,
        envelope: CommandEnvelope<SetFuneralWishes>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.set_funeral_wishes(payload.wishes)
        })
        .await
    }

    /// Adds a witness to the signing ceremony.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn add_witness(
        &self,
        envelope: CommandEnvelope<AddWitness>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.add_witness(
                payload.party,
                payload.relationship,
                payload.age,
                payload.eligibility,
            )
            .map(|_| ())
        })
        .await
    }

    /// Records a witness signature during the ceremony.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn record_witness_signature(
        &self,
        envelope: CommandEnvelope<RecordWitnessSignature>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.record_witness_signature(
                payload.witness_id,
                payload.declarations,
                payload.signature,
            )
        })
        .await
    }

    /// Marks a witness signature as verified.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn verify_witness(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        witness_id: WitnessId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.verify_witness(witness_id)
        })
        .await
    }

    /// Strikes a witness from the ceremony.
    #[instrument(skip(self, reason), fields(will_id = %will_id))]
    pub async fn reject_witness(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        witness_id: WitnessId,
        reason: String,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.reject_witness(witness_id, reason)
        })
        .await
    }

    /// Nominates an executor.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn add_executor(
        &self,
        envelope: CommandEnvelope<AddExecutor>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.add_executor(
                payload.party,
                payload.relationship,
                payload.tier,
                payload.powers,
            )
            .map(|_| ())
        })
        .await
    }

    /// Records that an executor nominee was notified.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn mark_executor_notified(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        executor_id: ExecutorId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.mark_executor_notified(executor_id)
        })
        .await
    }

    /// Records an executor nominee's acceptance or declination.
    #[instrument(skip(self, decline_reason), fields(will_id = %will_id))]
    pub async fn record_executor_response(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        executor_id: ExecutorId,
        accepted: bool,
        decline_reason: Option<String>,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.record_executor_response(executor_id, accepted, decline_reason)
        })
        .await
    }

    /// Removes an executor nomination.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn remove_executor(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        executor_id: ExecutorId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.remove_executor(executor_id)
        })
        .await
    }

    /// Records a bequest.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn add_bequest(
        &self,
        envelope: CommandEnvelope<AddBequest>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.add_bequest(
                payload.beneficiary,
                payload.relationship,
                payload.share,
                payload.conditions,
            )
            .map(|_| ())
        })
        .await
    }

    /// Strikes a bequest from a draft.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn revoke_bequest(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        bequest_id: BequestId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.revoke_bequest(bequest_id)
        })
        .await
    }

    /// Attaches a codicil to an attested document.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn add_codicil(
        &self,
        envelope: CommandEnvelope<AddCodicil>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.add_codicil(
                payload.amendment,
                payload.referenced_clauses,
                payload.summary,
            )
            .map(|_| ())
        })
        .await
    }

    /// Adds a witness to a codicil.
    #[instrument(skip(self, party), fields(will_id = %will_id))]
    pub async fn add_codicil_witness(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        codicil_id: CodicilId,
        party: PartyRef,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.add_codicil_witness(codicil_id, party)
        })
        .await
    }

    /// Records a witness signature on a codicil.
    #[instrument(skip(self, party), fields(will_id = %will_id))]
    pub async fn record_codicil_signature(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
        codicil_id: CodicilId,
        party: PartyRef,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, move |will| {
            will.record_codicil_signature(codicil_id, &party)
        })
        .await
    }

    /// Records an explicit exclusion from the estate.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn add_disinheritance(
        &self,
        envelope: CommandEnvelope<AddDisinheritance>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            let mut record = DisinheritanceRecord::new(
                payload.excluded,
                payload.relationship,
                payload.reason,
                payload.justification,
                payload.severity,
            )
            .with_evidence(payload.evidence_refs);
            if let Some(provision) = payload.alternative_provision {
                record = record.with_alternative_provision(provision);
            }
            if let Some(statement) = payload.personal_statement {
                record = record.with_personal_statement(statement);
            }
            will.add_disinheritance(record).map(|_| ())
        })
        .await
    }

    /// Submits the document for its signing ceremony.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn submit_for_attestation(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, Will::submit_for_attestation)
            .await
    }

    /// Returns a pending document to draft.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn return_to_draft(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, Will::return_to_draft)
            .await
    }

    /// Completes the signing ceremony.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn attest(
        &self,
        envelope: CommandEnvelope<AttestWill>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.attest(payload.location)
        })
        .await
    }

    /// Brings an attested document into legal effect.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn activate(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, Will::activate).await
    }

    /// Records a challenge to the document's validity.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn contest(
        &self,
        envelope: CommandEnvelope<ContestWill>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.contest(payload.contested_by, payload.grounds)
        })
        .await
    }

    /// Resolves a pending contest.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn resolve_contest(
        &self,
        envelope: CommandEnvelope<ResolveContest>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.resolve_contest(payload.upheld, payload.resolution)
        })
        .await
    }

    /// Opens probate proceedings.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn open_probate(
        &self,
        envelope: CommandEnvelope<OpenProbate>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.open_probate(payload.court_reference)
        })
        .await
    }

    /// Records that the estate has been fully distributed.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn execute_will(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, Will::execute).await
    }

    /// Revokes the document at the testator's direction.
    #[instrument(skip(self, envelope), fields(will_id = %envelope.will_id))]
    pub async fn revoke(
        &self,
        envelope: CommandEnvelope<RevokeWill>,
    ) -> Result<CommandOutcome, DomainError> {
        let CommandEnvelope {
            actor_id,
            will_id,
            correlation_id,
            payload,
        } = envelope;
        self.execute(will_id, actor_id, correlation_id, move |will| {
            will.revoke(payload.reason, Some(actor_id))
        })
        .await
    }

    /// Reopens a revoked document as a draft.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn reopen_as_draft(
        &self,
        actor_id: PersonId,
        will_id: AggregateId,
    ) -> Result<CommandOutcome, DomainError> {
        self.execute(will_id, actor_id, None, Will::reopen_as_draft)
            .await
    }

    /// Supersedes an active will with a newly attested one, atomically.
    ///
    /// The old document moves to `Superseded` and the new one to `Active`
    /// in one transaction; if either document has changed since it was
    /// read, nothing is applied and the caller may retry.
    #[instrument(skip(self), fields(old = %old_will_id, new = %new_will_id))]
    pub async fn replace_active_will(
        &self,
        actor_id: PersonId,
        old_will_id: AggregateId,
        new_will_id: AggregateId,
    ) -> Result<(), DomainError> {
        let mut tx = self.store.begin_transaction().await?;

        let old_record = tx
            .find_for_update(old_will_id)
            .await?
            .ok_or_else(|| DomainError::DocumentNotFound {
                document_id: old_will_id.to_string(),
            })?;
        let new_record = tx
            .find_for_update(new_will_id)
            .await?
            .ok_or_else(|| DomainError::DocumentNotFound {
                document_id: new_will_id.to_string(),
            })?;

        let mut old_will: Will = old_record.to_state()?;
        old_will.set_version(old_record.version);
        let mut new_will: Will = new_record.to_state()?;
        new_will.set_version(new_record.version);

        let staged = (|| -> Result<_, WillError> {
            old_will.supersede(new_will_id)?;
            new_will.activate()?;
            Ok(())
        })();
        if let Err(err) = staged {
            tx.rollback().await?;
            return Err(err.into());
        }

        let old_expected = old_will.version();
        let old_events = self.event_records(&mut old_will, old_expected, actor_id, None)?;
        let old_doc = Self::record_for(&old_will, old_expected)?;
        tx.stage(old_doc, old_expected, old_events);

        let new_expected = new_will.version();
        let new_events = self.event_records(&mut new_will, new_expected, actor_id, None)?;
        let new_doc = Self::record_for(&new_will, new_expected)?;
        tx.stage(new_doc, new_expected, new_events);

        tx.commit().await?;
        info!("active will replaced");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Loads a will at its current version.
    #[instrument(skip(self), fields(will_id = %will_id))]
    pub async fn get_will(&self, will_id: AggregateId) -> Result<Will, DomainError> {
        self.load(will_id).await
    }

    /// Wills owned by a testator in a given status.
    pub async fn find_by_owner_and_status(
        &self,
        owner: PersonId,
        status: WillStatus,
    ) -> Result<Vec<Will>, DomainError> {
        let records = self
            .store
            .find_by_owner_and_status(owner, status.as_str())
            .await?;
        Self::hydrate_all(records)
    }

    /// All wills in a given status.
    pub async fn find_by_status(&self, status: WillStatus) -> Result<Vec<Will>, DomainError> {
        let records = self.store.find_by_status(status.as_str()).await?;
        Self::hydrate_all(records)
    }

    /// Wills on which a person stands nominated as executor.
    pub async fn find_by_nominated_executor(
        &self,
        executor: PersonId,
    ) -> Result<Vec<Will>, DomainError> {
        let records = self.store.find_by_nominated_executor(executor).await?;
        Self::hydrate_all(records)
    }

    /// Wills matching a filter/paginate query.
    pub async fn search(&self, query: DocumentQuery) -> Result<Vec<Will>, DomainError> {
        let records = self.store.search(query).await?;
        Self::hydrate_all(records)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn execute<F>(
        &self,
        will_id: AggregateId,
        actor_id: PersonId,
        correlation_id: Option<Uuid>,
        mutate: F,
    ) -> Result<CommandOutcome, DomainError>
    where
        F: FnOnce(&mut Will) -> Result<(), WillError>,
    {
        let mut will = self.load(will_id).await?;
        let expected = will.version();
        mutate(&mut will)?;

        let outcome = self.persist(will, expected, actor_id, correlation_id).await;
        if let Err(err) = &outcome {
            if err.is_concurrency_conflict() {
                warn!(%will_id, "concurrent update lost the race");
            }
        }
        outcome
    }

    async fn load(&self, will_id: AggregateId) -> Result<Will, DomainError> {
        let record = self
            .store
            .find_by_id(will_id)
            .await?
            .ok_or_else(|| DomainError::DocumentNotFound {
                document_id: will_id.to_string(),
            })?;
        let mut will: Will = record.to_state()?;
        will.set_version(record.version);
        Ok(will)
    }

    fn hydrate_all(records: Vec<DocumentRecord>) -> Result<Vec<Will>, DomainError> {
        records
            .into_iter()
            .map(|record| {
                let mut will: Will = record.to_state()?;
                will.set_version(record.version);
                Ok(will)
            })
            .collect()
    }

    async fn persist(
        &self,
        mut will: Will,
        expected: Version,
        actor_id: PersonId,
        correlation_id: Option<Uuid>,
    ) -> Result<CommandOutcome, DomainError> {
        let events = will.take_events();
        let records = Self::to_event_records(&will, &events, expected, actor_id, correlation_id)?;
        let record = Self::record_for(&will, expected)?;
        let new_version = self.store.save(record, expected, records).await?;
        will.set_version(new_version);
        Ok(CommandOutcome {
            will,
            events,
            new_version,
        })
    }

    fn event_records(
        &self,
        will: &mut Will,
        expected: Version,
        actor_id: PersonId,
        correlation_id: Option<Uuid>,
    ) -> Result<Vec<EventRecord>, DomainError> {
        let events = will.take_events();
        Self::to_event_records(will, &events, expected, actor_id, correlation_id)
    }

    fn to_event_records(
        will: &Will,
        events: &[WillEvent],
        expected: Version,
        actor_id: PersonId,
        correlation_id: Option<Uuid>,
    ) -> Result<Vec<EventRecord>, DomainError> {
        let will_id = will.id().ok_or(WillError::NotYetCreated)?;
        let mut records = Vec::with_capacity(events.len());
        for event in events {
            let mut record = EventRecord::new(
                will_id,
                AGGREGATE_TYPE,
                event.event_type(),
                expected,
                serde_json::to_value(event)?,
            )
            .with_metadata("actor_id", serde_json::json!(actor_id));
            if let Some(correlation_id) = correlation_id {
                record = record.with_metadata("correlation_id", serde_json::json!(correlation_id));
            }
            records.push(record);
        }
        Ok(records)
    }

    fn record_for(will: &Will, version: Version) -> Result<DocumentRecord, DomainError> {
        let will_id = will.id().ok_or(WillError::NotYetCreated)?;
        Ok(DocumentRecord::from_state(
            will_id,
            AGGREGATE_TYPE,
            will.testator().map(|t| t.person_id),
            will.status().as_str(),
            will.nominated_executor_ids(),
            version,
            will,
        )?)
    }
}
