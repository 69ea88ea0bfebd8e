//! Conversation controller.
//!
//! Orchestrates identity resolution, transcript hydration, and the
//! per-turn round trip with the assistant.

use crate::assistant::{AssistantClient, FALLBACK_REPLY};
use crate::error::Result;
use crate::greeting::seed_greeting;
use crate::identity::{Identity, IdentityWatcher};
use crate::transcript::{StorageKey, Turn, TranscriptRepository, TranscriptStore};
use std::sync::Arc;
use tokio::sync::watch;

/// The controller's interaction phase.
///
/// `AwaitingReply` covers exactly one in-flight assistant round trip; new
/// submissions are rejected while in it. This is the system's only
/// concurrency-control guarantee and it rules out interleaved appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    /// Waiting for user input.
    Idle,
    /// One assistant round trip is in flight.
    AwaitingReply,
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The turn was accepted and the round trip completed.
    Submitted,
    /// Empty or whitespace-only input; no state change.
    Ignored,
    /// A round trip is already in flight; no turn, no request.
    Busy,
}

/// Drives one conversation against one transcript store.
///
/// `ConversationController` is responsible for:
/// - Hydrating the correct transcript for the current identity on startup
///   and on every identity change (never merging across identities)
/// - Appending user turns optimistically, persisting before the network
///   call resolves
/// - Substituting [`FALLBACK_REPLY`] for any failed round trip
/// - Keeping the rendered transcript and its persisted copy consistent
///   after every completed append
///
/// Scheduling is cooperative: all methods take `&mut self`, so controller
/// logic never runs in parallel with itself. The only suspension point is
/// the assistant call. Identity changes arriving during that suspension are
/// deferred; the watch slot is only re-read once the in-flight turn has
/// settled, so the persistence target never switches under an unfinished
/// write. Dropping the controller drops any in-flight round trip with it,
/// which is what guarantees a late-resolving reply can never mutate a
/// disposed store.
pub struct ConversationController {
    store: TranscriptStore,
    repository: Arc<dyn TranscriptRepository>,
    assistant: Arc<dyn AssistantClient>,
    identity: IdentityWatcher,
    active_identity: Identity,
    phase: ConversationPhase,
}

impl ConversationController {
    /// Creates a controller. Call [`ConversationController::start`] before
    /// submitting turns.
    ///
    /// # Arguments
    ///
    /// * `repository` - The persistence backend, polymorphic over the
    ///   ephemeral and durable tiers
    /// * `assistant` - The assistant client for per-turn round trips
    /// * `identity` - Watcher over the shared identity slot
    pub fn new(
        repository: Arc<dyn TranscriptRepository>,
        assistant: Arc<dyn AssistantClient>,
        identity: IdentityWatcher,
    ) -> Self {
        Self {
            store: TranscriptStore::new(),
            repository,
            assistant,
            identity,
            active_identity: Identity::Anonymous,
            phase: ConversationPhase::Idle,
        }
    }

    /// Resolves the current identity and hydrates the transcript for it.
    ///
    /// If a prior transcript exists under the identity's key it is loaded
    /// as-is; otherwise the transcript is seeded with exactly one greeting
    /// turn and the seed is persisted.
    pub async fn start(&mut self) -> Result<()> {
        let identity = self.identity.latest();
        self.rebind(identity).await
    }

    /// Applies any pending identity change while idle.
    ///
    /// Returns true when the identity changed and the transcript was
    /// re-hydrated under the new key.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or seeding under the new key fails.
    pub async fn sync_identity(&mut self) -> Result<bool> {
        let latest = self.identity.latest();
        if latest == self.active_identity {
            return Ok(false);
        }
        self.rebind(latest).await?;
        Ok(true)
    }

    /// Submits one user turn and runs the full round trip.
    ///
    /// Blank input is ignored. While a round trip is in flight the
    /// controller is busy and new submissions are rejected without side
    /// effects. Otherwise the user turn is appended and persisted before
    /// the assistant is called; the reply (or the fallback text if the
    /// call failed) is appended and persisted once the call settles.
    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome> {
        if self.phase == ConversationPhase::AwaitingReply {
            return Ok(SubmitOutcome::Busy);
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }

        // Identity changes that arrived while idle take effect before the
        // turn is keyed.
        self.sync_identity().await?;
        let key = StorageKey::for_identity(&self.active_identity);

        // Optimistic append: the user turn is visible and persisted before
        // the network call resolves.
        self.store.append(Turn::user(text));
        self.repository.save(&key, self.store.turns()).await?;
        self.phase = ConversationPhase::AwaitingReply;

        let history = self.store.turns().to_vec();
        let reply = match self.assistant.ask(text, &history).await {
            Ok(reply) => reply,
            Err(_) => FALLBACK_REPLY.to_string(),
        };

        self.store.append(Turn::assistant(reply));
        self.phase = ConversationPhase::Idle;
        self.repository.save(&key, self.store.turns()).await?;

        // An identity change that arrived mid-flight was deferred until the
        // turn settled; apply it now.
        self.sync_identity().await?;

        Ok(SubmitOutcome::Submitted)
    }

    /// Returns the transcript in conversation order.
    pub fn transcript(&self) -> &[Turn] {
        self.store.turns()
    }

    /// Returns the identity the transcript is currently bound to.
    pub fn identity(&self) -> &Identity {
        &self.active_identity
    }

    /// Returns the current interaction phase.
    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    /// Subscribes to transcript revisions for render notifications.
    pub fn watch_revision(&self) -> watch::Receiver<u64> {
        self.store.watch_revision()
    }

    /// Re-selects the persistence key for `identity` and hydrates.
    ///
    /// A non-empty stored transcript is loaded verbatim; otherwise the
    /// store is seeded with one greeting turn. The previous transcript is
    /// never copied under the new key.
    async fn rebind(&mut self, identity: Identity) -> Result<()> {
        let key = StorageKey::for_identity(&identity);

        match self.repository.load(&key).await? {
            Some(turns) if !turns.is_empty() => {
                self.store.replace_all(turns);
            }
            _ => {
                self.store.replace_all(vec![seed_greeting(&identity)]);
                self.repository.save(&key, self.store.turns()).await?;
            }
        }

        self.active_identity = identity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::AssistantError;
    use crate::identity::IdentitySlot;
    use crate::transcript::TurnRole;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // In-memory repository recording every save, keyed by the storage key's
    // display form.
    struct MockRepository {
        entries: Mutex<HashMap<String, Vec<Turn>>>,
        save_count: AtomicUsize,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                save_count: AtomicUsize::new(0),
            }
        }

        fn stored(&self, key: &str) -> Option<Vec<Turn>> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn put(&self, key: &str, turns: Vec<Turn>) {
            self.entries.lock().unwrap().insert(key.to_string(), turns);
        }

        fn saves(&self) -> usize {
            self.save_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranscriptRepository for MockRepository {
        async fn load(&self, key: &StorageKey) -> Result<Option<Vec<Turn>>> {
            Ok(self.entries.lock().unwrap().get(&key.to_string()).cloned())
        }

        async fn save(&self, key: &StorageKey, turns: &[Turn]) -> Result<()> {
            self.save_count.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), turns.to_vec());
            Ok(())
        }
    }

    // Assistant that always answers with a fixed reply.
    struct FixedAssistant {
        reply: String,
        calls: AtomicUsize,
    }

    impl FixedAssistant {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssistantClient for FixedAssistant {
        async fn ask(&self, _message: &str, _history: &[Turn]) -> std::result::Result<String, AssistantError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    // Assistant whose round trip fails.
    struct FailingAssistant;

    #[async_trait]
    impl AssistantClient for FailingAssistant {
        async fn ask(&self, _message: &str, _history: &[Turn]) -> std::result::Result<String, AssistantError> {
            Err(AssistantError::MalformedResponse(
                "missing reply field".to_string(),
            ))
        }
    }

    // Assistant whose round trip never settles.
    struct PendingAssistant {
        calls: AtomicUsize,
    }

    impl PendingAssistant {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AssistantClient for PendingAssistant {
        async fn ask(&self, _message: &str, _history: &[Turn]) -> std::result::Result<String, AssistantError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    // Assistant that flips the identity slot mid round trip, simulating a
    // login in another tab while a request is in flight.
    struct LoginDuringAskAssistant {
        slot: IdentitySlot,
    }

    #[async_trait]
    impl AssistantClient for LoginDuringAskAssistant {
        async fn ask(&self, _message: &str, _history: &[Turn]) -> std::result::Result<String, AssistantError> {
            self.slot.set(Identity::named("Alice"));
            Ok("Bien reçu.".to_string())
        }
    }

    fn controller_with(
        repository: Arc<MockRepository>,
        assistant: Arc<dyn AssistantClient>,
        slot: &IdentitySlot,
    ) -> ConversationController {
        ConversationController::new(repository, assistant, slot.watch())
    }

    #[tokio::test]
    async fn test_fresh_anonymous_visitor_gets_session_greeting() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let mut controller = controller_with(
            repository.clone(),
            Arc::new(FixedAssistant::new("ok")),
            &slot,
        );

        controller.start().await.unwrap();

        assert_eq!(controller.transcript().len(), 1);
        let greeting = &controller.transcript()[0];
        assert_eq!(greeting.role, TurnRole::Assistant);
        assert!(greeting.text.contains("session"));

        // The seed is persisted under the ephemeral key.
        assert_eq!(
            repository.stored("ephemeral").unwrap(),
            controller.transcript().to_vec()
        );
    }

    #[tokio::test]
    async fn test_submit_appends_user_then_assistant_turn() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let assistant = Arc::new(FixedAssistant::new("Excellent ! Commençons."));
        let mut controller = controller_with(repository.clone(), assistant.clone(), &slot);

        controller.start().await.unwrap();
        let outcome = controller.submit("commencer").await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(assistant.calls(), 1);

        let turns = controller.transcript();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1], Turn::user("commencer"));
        assert_eq!(turns[2], Turn::assistant("Excellent ! Commençons."));

        // Rendered and persisted copies agree after the completed append.
        assert_eq!(repository.stored("ephemeral").unwrap(), turns.to_vec());
        assert_eq!(controller.phase(), ConversationPhase::Idle);
    }

    #[tokio::test]
    async fn test_failed_round_trip_appends_fallback_and_returns_idle() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let mut controller =
            controller_with(repository.clone(), Arc::new(FailingAssistant), &slot);

        controller.start().await.unwrap();
        controller.submit("commencer").await.unwrap();

        let turns = controller.transcript();
        assert_eq!(turns.last().unwrap(), &Turn::assistant(FALLBACK_REPLY));
        assert_eq!(controller.phase(), ConversationPhase::Idle);

        // The conversation stays usable: the next submission is accepted.
        let outcome = controller.submit("encore").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted);
    }

    #[tokio::test]
    async fn test_named_visitor_hydrates_prior_durable_transcript() {
        let repository = Arc::new(MockRepository::new());
        let prior = vec![
            Turn::assistant("Bonjour Alice !"),
            Turn::user("un design minimaliste"),
            Turn::assistant("Parfait."),
        ];
        repository.put("durable:Alice", prior.clone());

        let slot = IdentitySlot::new(Identity::named("Alice"));
        let mut controller = controller_with(
            repository.clone(),
            Arc::new(FixedAssistant::new("ok")),
            &slot,
        );

        controller.start().await.unwrap();

        // Exactly the stored sequence, no greeting re-seeded.
        assert_eq!(controller.transcript(), prior.as_slice());
    }

    #[tokio::test]
    async fn test_blank_submission_is_a_no_op() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let assistant = Arc::new(FixedAssistant::new("ok"));
        let mut controller = controller_with(repository.clone(), assistant.clone(), &slot);

        controller.start().await.unwrap();
        let saves_after_start = repository.saves();

        let outcome = controller.submit("   \t ").await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(assistant.calls(), 0);
        assert_eq!(repository.saves(), saves_after_start);
    }

    #[tokio::test]
    async fn test_submission_while_awaiting_reply_is_rejected() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let assistant = Arc::new(PendingAssistant::new());
        let mut controller = controller_with(repository.clone(), assistant.clone(), &slot);

        controller.start().await.unwrap();

        {
            // Drive the submission up to the assistant suspension point,
            // then abandon it (the page-teardown path).
            let submit = controller.submit("premier");
            tokio::pin!(submit);
            assert!(futures::poll!(submit.as_mut()).is_pending());
        }

        // The user turn was appended and persisted optimistically; the
        // abandoned round trip never appended a reply.
        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.phase(), ConversationPhase::AwaitingReply);
        assert_eq!(assistant.calls.load(Ordering::SeqCst), 1);

        // While awaiting, a new submission produces no turn and no call.
        let outcome = controller.submit("deuxième").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(assistant.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_identity_switch_never_merges_transcripts() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let mut controller = controller_with(
            repository.clone(),
            Arc::new(FixedAssistant::new("ok")),
            &slot,
        );

        controller.start().await.unwrap();
        controller.submit("commencer").await.unwrap();
        let anonymous_turns = controller.transcript().to_vec();

        // Login happens elsewhere; the controller observes it while idle.
        slot.set(Identity::named("Alice"));
        assert!(controller.sync_identity().await.unwrap());

        // Alice had no durable transcript: a fresh greeting, not a copy of
        // the anonymous conversation.
        assert_eq!(controller.transcript().len(), 1);
        assert!(controller.transcript()[0].text.contains("Alice"));
        assert_eq!(
            repository.stored("durable:Alice").unwrap(),
            controller.transcript().to_vec()
        );

        // The anonymous transcript stayed under its own key, untouched.
        assert_eq!(repository.stored("ephemeral").unwrap(), anonymous_turns);
    }

    #[tokio::test]
    async fn test_identity_change_mid_flight_is_deferred() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let assistant = Arc::new(LoginDuringAskAssistant { slot: slot.clone() });
        let mut controller = controller_with(repository.clone(), assistant, &slot);

        controller.start().await.unwrap();
        controller.submit("commencer").await.unwrap();

        // The in-flight turn settled under the ephemeral key it started
        // with, reply included.
        let ephemeral = repository.stored("ephemeral").unwrap();
        assert_eq!(ephemeral.len(), 3);
        assert_eq!(ephemeral[2], Turn::assistant("Bien reçu."));

        // Only then did the controller switch to Alice.
        assert_eq!(controller.identity(), &Identity::named("Alice"));
        assert_eq!(controller.transcript().len(), 1);
        assert!(controller.transcript()[0].text.contains("Alice"));
    }

    #[tokio::test]
    async fn test_revision_watch_signals_renders() {
        let repository = Arc::new(MockRepository::new());
        let slot = IdentitySlot::default();
        let mut controller = controller_with(
            repository.clone(),
            Arc::new(FixedAssistant::new("ok")),
            &slot,
        );

        let rx = controller.watch_revision();
        controller.start().await.unwrap();
        let after_start = *rx.borrow();
        assert!(after_start > 0);

        controller.submit("bonjour").await.unwrap();
        // One bump for the user turn, one for the reply.
        assert_eq!(*rx.borrow(), after_start + 2);
    }
}
