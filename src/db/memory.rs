//! In-memory stores for service tests
//!
//! Every operation runs under a single mutex, which gives the same
//! all-or-nothing guarantees the Postgres repositories get from row locks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    db::repositories::{MatchStore, QuestionCatalog, QueueStore},
    error::{AppError, AppResult},
    models::{Match, MatchKind, MatchMode, NewMatch, Question, QueueEntry},
};

#[derive(Default)]
struct State {
    queue: HashMap<Uuid, QueueEntry>,
    last_enqueued_at: Option<DateTime<Utc>>,
    /// Insertion order doubles as creation order
    matches: Vec<Match>,
    players: HashMap<Uuid, Vec<Uuid>>,
    questions: Vec<Question>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    pub fail_create: AtomicBool,
    pub fail_attach: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_catalog: AtomicBool,
    pub claim_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().questions = questions;
        store
    }

    /// Insert a ticket as-is, bypassing `enqueue`
    pub fn seed_ticket(&self, entry: QueueEntry) {
        self.state.lock().unwrap().queue.insert(entry.user_id, entry);
    }

    pub fn queue_len(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    pub fn ticket(&self, user_id: &Uuid) -> Option<QueueEntry> {
        self.state.lock().unwrap().queue.get(user_id).cloned()
    }

    pub fn all_matches(&self) -> Vec<Match> {
        self.state.lock().unwrap().matches.clone()
    }

    pub fn players_of(&self, match_id: &Uuid) -> Vec<Uuid> {
        self.state
            .lock()
            .unwrap()
            .players
            .get(match_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn insert_match(&self, m: Match, players: &[Uuid]) {
        let mut state = self.state.lock().unwrap();
        state.players.insert(m.id, players.to_vec());
        state.matches.push(m);
    }

    fn injected(flag: &AtomicBool, what: &str) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(AppError::Database(format!("injected {} failure", what)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn enqueue(
        &self,
        user_id: &Uuid,
        mode: MatchMode,
        time_limit_seconds: i32,
    ) -> AppResult<QueueEntry> {
        let mut state = self.state.lock().unwrap();

        // Strictly increasing stamps keep FIFO order deterministic
        let mut enqueued_at = Utc::now();
        if let Some(last) = state.last_enqueued_at {
            if enqueued_at <= last {
                enqueued_at = last + Duration::microseconds(1);
            }
        }
        state.last_enqueued_at = Some(enqueued_at);

        let entry = QueueEntry {
            user_id: *user_id,
            mode,
            time_limit_seconds,
            enqueued_at,
        };
        state.queue.insert(*user_id, entry.clone());
        Ok(entry)
    }

    async fn remove(&self, user_id: &Uuid) -> AppResult<bool> {
        Ok(self.state.lock().unwrap().queue.remove(user_id).is_some())
    }

    async fn find(&self, user_id: &Uuid) -> AppResult<Option<QueueEntry>> {
        Ok(self.ticket(user_id))
    }

    async fn oldest_opponent(
        &self,
        mode: MatchMode,
        excluded_user_id: &Uuid,
    ) -> AppResult<Option<QueueEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .queue
            .values()
            .filter(|e| e.mode == mode && e.user_id != *excluded_user_id)
            .min_by_key(|e| (e.enqueued_at, e.user_id))
            .cloned())
    }

    async fn claim_pair(&self, own: &QueueEntry, opponent: &QueueEntry) -> AppResult<bool> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        let holds = |ticket: &QueueEntry| {
            state
                .queue
                .get(&ticket.user_id)
                .is_some_and(|current| current.same_ticket(ticket))
        };
        if !(holds(own) && holds(opponent)) {
            return Ok(false);
        }

        state.queue.remove(&own.user_id);
        state.queue.remove(&opponent.user_id);
        Ok(true)
    }

    async fn restore(&self, entries: &[QueueEntry]) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        for entry in entries {
            state.queue.entry(entry.user_id).or_insert_with(|| entry.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn create(&self, new_match: &NewMatch) -> AppResult<Match> {
        Self::injected(&self.fail_create, "create")?;

        let m = Match {
            id: Uuid::new_v4(),
            mode: new_match.mode,
            question_id: new_match.question_id,
            time_limit_seconds: new_match.time_limit_seconds,
            started_at: new_match.started_at,
            kind: new_match.kind,
            inviter_id: new_match.inviter_id,
            invitee_id: new_match.invitee_id,
            language: new_match.language.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().matches.push(m.clone());
        Ok(m)
    }

    async fn attach_players(&self, match_id: &Uuid, players: [Uuid; 2]) -> AppResult<()> {
        Self::injected(&self.fail_attach, "attach")?;

        self.state
            .lock()
            .unwrap()
            .players
            .insert(*match_id, players.to_vec());
        Ok(())
    }

    async fn delete(&self, match_id: &Uuid) -> AppResult<()> {
        Self::injected(&self.fail_delete, "delete")?;

        let mut state = self.state.lock().unwrap();
        state.matches.retain(|m| m.id != *match_id);
        state.players.remove(match_id);
        Ok(())
    }

    async fn find_by_id(&self, match_id: &Uuid) -> AppResult<Option<Match>> {
        let state = self.state.lock().unwrap();
        Ok(state.matches.iter().find(|m| m.id == *match_id).cloned())
    }

    async fn players(&self, match_id: &Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self.players_of(match_id))
    }

    async fn latest_for_user(&self, user_id: &Uuid, kind: MatchKind) -> AppResult<Option<Match>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .matches
            .iter()
            .rev()
            .filter(|m| m.kind == kind)
            .find(|m| {
                state
                    .players
                    .get(&m.id)
                    .is_some_and(|players| players.contains(user_id))
            })
            .cloned())
    }

    async fn mark_started(&self, match_id: &Uuid) -> AppResult<Option<DateTime<Utc>>> {
        let mut state = self.state.lock().unwrap();
        let Some(m) = state.matches.iter_mut().find(|m| m.id == *match_id) else {
            return Ok(None);
        };
        Ok(Some(*m.started_at.get_or_insert_with(Utc::now)))
    }
}

#[async_trait]
impl QuestionCatalog for MemoryStore {
    async fn allowed_questions(&self, slugs: &[String]) -> AppResult<Vec<Question>> {
        Self::injected(&self.fail_catalog, "catalog")?;

        let state = self.state.lock().unwrap();
        Ok(state
            .questions
            .iter()
            .filter(|q| slugs.contains(&q.slug))
            .cloned()
            .collect())
    }

    async fn question_by_id(&self, id: &Uuid) -> AppResult<Option<Question>> {
        Self::injected(&self.fail_catalog, "catalog")?;

        let state = self.state.lock().unwrap();
        Ok(state.questions.iter().find(|q| q.id == *id).cloned())
    }
}
