//! Match lifecycle service
//!
//! Creates matches (queue flow and friend invites), picks their question,
//! anchors the start time and answers participant-only reads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    config::MatchmakingConfig,
    constants::{MAX_MATCH_TIME_LIMIT_SECONDS, MIN_MATCH_TIME_LIMIT_SECONDS},
    db::repositories::{MatchStore, QuestionCatalog},
    error::{AppError, AppResult},
    handlers::matches::response::{MatchResponse, QuestionSummary, SampleCase},
    judge::languages,
    models::{Match, MatchKind, MatchMode, NewMatch, Question},
};

use super::catalog_unavailable;

/// Same message whether the match is missing or belongs to someone else
const NOT_A_PARTICIPANT: &str = "You are not a participant of this match";

/// Match lifecycle service
pub struct MatchService {
    matches: Arc<dyn MatchStore>,
    catalog: Arc<dyn QuestionCatalog>,
    settings: MatchmakingConfig,
}

impl MatchService {
    pub fn new(
        matches: Arc<dyn MatchStore>,
        catalog: Arc<dyn QuestionCatalog>,
        settings: MatchmakingConfig,
    ) -> Self {
        Self {
            matches,
            catalog,
            settings,
        }
    }

    /// Clamp a requested time limit to the allowed window, defaulting when absent
    pub fn sanitize_time_limit(&self, requested: Option<i32>) -> i32 {
        requested
            .unwrap_or(self.settings.default_time_limit_seconds)
            .clamp(MIN_MATCH_TIME_LIMIT_SECONDS, MAX_MATCH_TIME_LIMIT_SECONDS)
    }

    /// Create a match for two players paired by the queue. The clock starts now.
    pub async fn create_queued_match(
        &self,
        players: [Uuid; 2],
        mode: MatchMode,
        time_limit_seconds: i32,
    ) -> AppResult<Match> {
        if players[0] == players[1] {
            return Err(AppError::Validation(
                "A match needs two different players".to_string(),
            ));
        }

        let question = self.pick_question(None).await?;

        let new_match = NewMatch {
            mode,
            question_id: question.id,
            time_limit_seconds: self.sanitize_time_limit(Some(time_limit_seconds)),
            started_at: Some(Utc::now()),
            kind: MatchKind::Queued,
            inviter_id: None,
            invitee_id: None,
            language: None,
        };

        let created = self.matches.create(&new_match).await?;
        self.attach_or_rollback(&created, players).await?;

        info!(
            match_id = %created.id,
            mode = %mode,
            question = %question.slug,
            "Queued match created"
        );

        Ok(created)
    }

    /// Create an unstarted match between an inviter and a chosen friend
    pub async fn create_friend_invite_match(
        &self,
        inviter_id: &Uuid,
        invitee_id: &Uuid,
        time_limit_seconds: Option<i32>,
        language: Option<&str>,
    ) -> AppResult<Match> {
        if inviter_id == invitee_id {
            return Err(AppError::Validation("You cannot invite yourself".to_string()));
        }

        let language = match language {
            Some(name) => Some(languages::normalize(name).ok_or_else(|| {
                AppError::Validation(format!("Unsupported language: {}", name))
            })?),
            None => None,
        };

        let time_limit_seconds = self.sanitize_time_limit(time_limit_seconds);
        let question = self.pick_question(language).await?;

        let new_match = NewMatch {
            mode: MatchMode::Unranked,
            question_id: question.id,
            time_limit_seconds,
            started_at: None,
            kind: MatchKind::FriendInvite,
            inviter_id: Some(*inviter_id),
            invitee_id: Some(*invitee_id),
            language: language.map(str::to_string),
        };

        let created = self.matches.create(&new_match).await?;
        self.attach_or_rollback(&created, [*inviter_id, *invitee_id])
            .await?;

        info!(
            match_id = %created.id,
            inviter_id = %inviter_id,
            invitee_id = %invitee_id,
            time_limit_seconds,
            "Friend match created"
        );

        Ok(created)
    }

    /// Start the clock. Idempotent: every caller gets the first writer's timestamp.
    pub async fn start_match(&self, match_id: &Uuid, user_id: &Uuid) -> AppResult<DateTime<Utc>> {
        self.authorize(match_id, user_id).await?;

        let started_at = self
            .matches
            .mark_started(match_id)
            .await?
            .ok_or_else(|| AppError::Forbidden(NOT_A_PARTICIPANT.to_string()))?;

        debug!(match_id = %match_id, user_id = %user_id, started_at = %started_at, "Match start requested");

        Ok(started_at)
    }

    /// Load a match on behalf of one of its players
    pub async fn match_for_participant(&self, match_id: &Uuid, user_id: &Uuid) -> AppResult<Match> {
        self.authorize(match_id, user_id).await?;

        self.matches
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| AppError::Forbidden(NOT_A_PARTICIPANT.to_string()))
    }

    /// Everything a player's match page needs, with server-computed remaining time
    pub async fn get_match(&self, match_id: &Uuid, user_id: &Uuid) -> AppResult<MatchResponse> {
        let players = self.matches.players(match_id).await?;
        if !players.contains(user_id) {
            return Err(AppError::Forbidden(NOT_A_PARTICIPANT.to_string()));
        }

        let record = self
            .matches
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| AppError::Forbidden(NOT_A_PARTICIPANT.to_string()))?;

        let question = self
            .catalog
            .question_by_id(&record.question_id)
            .await
            .map_err(catalog_unavailable)?
            .ok_or_else(|| {
                error!(match_id = %record.id, question_id = %record.question_id, "Match question missing from catalog");
                AppError::Configuration("Match question is missing from the catalog".to_string())
            })?;

        let now = Utc::now();

        Ok(MatchResponse {
            id: record.id,
            mode: record.mode,
            kind: record.kind,
            phase: record.phase_at(now),
            time_limit_seconds: record.time_limit_seconds,
            started_at: record.started_at,
            remaining_seconds: record.remaining_seconds_at(now),
            opponent_id: players.iter().copied().find(|p| p != user_id),
            inviter_id: record.inviter_id,
            invitee_id: record.invitee_id,
            language: record.language,
            question: QuestionSummary {
                id: question.id,
                slug: question.slug.clone(),
                title: question.title.clone(),
                description: question.description.clone(),
                difficulty: question.difficulty.clone(),
                languages: question.languages.clone(),
                sample: question.sample_case().map(|case| SampleCase {
                    input: case.input.clone(),
                    expected_output: case.expected_output.clone(),
                }),
                total_cases: question.test_cases.len(),
            },
            created_at: record.created_at,
        })
    }

    /// Latest queue-flow match of the user that is still running ("latest wins")
    pub async fn latest_active_queued_match(&self, user_id: &Uuid) -> AppResult<Option<Match>> {
        let latest = self
            .matches
            .latest_for_user(user_id, MatchKind::Queued)
            .await?;

        Ok(latest.filter(|m| !m.is_expired()))
    }

    /// Reject a match-bound submission outside the match's window
    pub async fn ensure_accepting_submissions(
        &self,
        match_id: &Uuid,
        user_id: &Uuid,
        question_id: &Uuid,
    ) -> AppResult<Match> {
        let record = self.match_for_participant(match_id, user_id).await?;

        if record.question_id != *question_id {
            return Err(AppError::Validation(
                "Question does not belong to this match".to_string(),
            ));
        }
        if record.started_at.is_none() {
            return Err(AppError::Validation("Match has not started yet".to_string()));
        }
        if record.is_expired() {
            return Err(AppError::Validation("Match time has expired".to_string()));
        }

        Ok(record)
    }

    async fn authorize(&self, match_id: &Uuid, user_id: &Uuid) -> AppResult<()> {
        let players = self.matches.players(match_id).await?;
        if players.contains(user_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(NOT_A_PARTICIPANT.to_string()))
        }
    }

    /// Uniformly random question from the PvP pool, optionally limited to one language
    async fn pick_question(&self, language: Option<&str>) -> AppResult<Question> {
        let mut pool = self
            .catalog
            .allowed_questions(&self.settings.pvp_question_slugs)
            .await
            .map_err(catalog_unavailable)?;

        if pool.is_empty() {
            error!(
                slugs = ?self.settings.pvp_question_slugs,
                "No PvP-eligible questions found in the catalog"
            );
            return Err(AppError::Configuration(
                "No PvP-eligible questions are configured".to_string(),
            ));
        }

        if let Some(language) = language {
            pool.retain(|q| q.allows_language(language));
            if pool.is_empty() {
                return Err(AppError::Validation(format!(
                    "No match questions support {}",
                    language
                )));
            }
        }

        let picked = {
            let mut rng = rand::rng();
            pool.choose(&mut rng).cloned()
        };

        picked.ok_or_else(|| {
            AppError::Configuration("No PvP-eligible questions are configured".to_string())
        })
    }

    /// Attach both players; on failure delete the match so none is left half-built
    async fn attach_or_rollback(&self, created: &Match, players: [Uuid; 2]) -> AppResult<()> {
        let Err(err) = self.matches.attach_players(&created.id, players).await else {
            return Ok(());
        };

        error!(match_id = %created.id, error = %err, "Attaching players failed, rolling back match");

        if let Err(rollback_err) = self.matches.delete(&created.id).await {
            // Players are attached all-or-nothing, so the orphan has none and stays unreachable
            error!(
                match_id = %created.id,
                error = %rollback_err,
                "Rollback failed, match left without players"
            );
        }

        Err(err)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::{MatchPhase, TestCase};
    use chrono::Duration;
    use std::sync::atomic::Ordering;

    pub(crate) fn question(slug: &str, languages: &[&str], cases: usize) -> Question {
        Question {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            description: format!("Solve {}", slug),
            difficulty: Some("easy".to_string()),
            languages: languages.iter().map(|l| l.to_string()).collect(),
            test_cases: (0..cases)
                .map(|i| TestCase {
                    input: i.to_string(),
                    expected_output: (i * 2).to_string(),
                })
                .collect(),
        }
    }

    pub(crate) fn settings(slugs: &[&str]) -> MatchmakingConfig {
        MatchmakingConfig {
            pvp_question_slugs: slugs.iter().map(|s| s.to_string()).collect(),
            default_time_limit_seconds: 600,
        }
    }

    fn service_with(store: Arc<MemoryStore>) -> MatchService {
        MatchService::new(store.clone(), store, settings(&["two-sum", "fizz-buzz"]))
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_questions(vec![
            question("two-sum", &["python", "javascript"], 3),
            question("fizz-buzz", &["cpp"], 2),
            question("not-for-pvp", &["python"], 2),
        ]))
    }

    #[tokio::test]
    async fn test_time_limit_is_clamped() {
        let service = service_with(store());
        assert_eq!(service.sanitize_time_limit(Some(500)), 500);
        assert_eq!(service.sanitize_time_limit(Some(10)), 60);
        assert_eq!(service.sanitize_time_limit(Some(-5)), 60);
        assert_eq!(service.sanitize_time_limit(Some(99_999)), 1800);
        assert_eq!(service.sanitize_time_limit(None), 600);
    }

    #[tokio::test]
    async fn test_queued_match_starts_immediately_with_pvp_question() {
        let store = store();
        let service = service_with(store.clone());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        for _ in 0..20 {
            let created = service
                .create_queued_match([a, b], MatchMode::Ranked, 300)
                .await
                .unwrap();

            assert!(created.started_at.is_some());
            assert_eq!(created.kind, MatchKind::Queued);
            assert_eq!(store.players_of(&created.id), vec![a, b]);

            let question = store.question_by_id(&created.question_id).await.unwrap().unwrap();
            assert_ne!(question.slug, "not-for-pvp");
        }
    }

    #[tokio::test]
    async fn test_attach_failure_rolls_back_match() {
        let store = store();
        store.fail_attach.store(true, Ordering::SeqCst);
        let service = service_with(store.clone());

        let result = service
            .create_queued_match([Uuid::new_v4(), Uuid::new_v4()], MatchMode::Unranked, 300)
            .await;

        assert!(result.is_err());
        assert!(store.all_matches().is_empty());
    }

    #[tokio::test]
    async fn test_failed_rollback_leaves_unreachable_orphan() {
        let store = store();
        store.fail_attach.store(true, Ordering::SeqCst);
        store.fail_delete.store(true, Ordering::SeqCst);
        let service = service_with(store.clone());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(service
            .create_queued_match([a, b], MatchMode::Unranked, 300)
            .await
            .is_err());

        let orphan = store.all_matches().pop().unwrap();
        assert!(store.players_of(&orphan.id).is_empty());
        assert!(service.latest_active_queued_match(&a).await.unwrap().is_none());
        assert!(matches!(
            service.start_match(&orphan.id, &a).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_pool_is_configuration_error() {
        let store = Arc::new(MemoryStore::with_questions(vec![question("other", &["c"], 1)]));
        let service = MatchService::new(store.clone(), store, settings(&["two-sum"]));

        let result = service
            .create_queued_match([Uuid::new_v4(), Uuid::new_v4()], MatchMode::Ranked, 300)
            .await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_catalog_failure_is_service_unavailable() {
        let store = store();
        store.fail_catalog.store(true, Ordering::SeqCst);
        let service = service_with(store);

        let result = service
            .create_queued_match([Uuid::new_v4(), Uuid::new_v4()], MatchMode::Ranked, 300)
            .await;

        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_self_invite_is_rejected() {
        let store = store();
        let service = service_with(store.clone());
        let user = Uuid::new_v4();

        let result = service
            .create_friend_invite_match(&user, &user, Some(300), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.all_matches().is_empty());
    }

    #[tokio::test]
    async fn test_friend_invite_is_created_unstarted() {
        let store = store();
        let service = service_with(store.clone());
        let (inviter, invitee) = (Uuid::new_v4(), Uuid::new_v4());

        let created = service
            .create_friend_invite_match(&inviter, &invitee, Some(10), Some("C++"))
            .await
            .unwrap();

        assert_eq!(created.started_at, None);
        assert_eq!(created.kind, MatchKind::FriendInvite);
        assert_eq!(created.mode, MatchMode::Unranked);
        assert_eq!(created.time_limit_seconds, 60);
        assert_eq!(created.inviter_id, Some(inviter));
        assert_eq!(created.invitee_id, Some(invitee));
        assert_eq!(created.language.as_deref(), Some("cpp"));

        // Only fizz-buzz allows cpp
        let question = store.question_by_id(&created.question_id).await.unwrap().unwrap();
        assert_eq!(question.slug, "fizz-buzz");
    }

    #[tokio::test]
    async fn test_friend_invite_rejects_unknown_language() {
        let service = service_with(store());
        let result = service
            .create_friend_invite_match(&Uuid::new_v4(), &Uuid::new_v4(), None, Some("cobol"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let store = store();
        let service = service_with(store.clone());
        let (inviter, invitee) = (Uuid::new_v4(), Uuid::new_v4());
        let created = service
            .create_friend_invite_match(&inviter, &invitee, Some(300), None)
            .await
            .unwrap();

        let first = service.start_match(&created.id, &invitee).await.unwrap();
        let second = service.start_match(&created.id, &inviter).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_starts_converge() {
        let store = store();
        let service = Arc::new(service_with(store.clone()));
        let (inviter, invitee) = (Uuid::new_v4(), Uuid::new_v4());
        let created = service
            .create_friend_invite_match(&inviter, &invitee, Some(300), None)
            .await
            .unwrap();

        let match_id = created.id;

        let calls = (0..16).map(|i| {
            let service = service.clone();
            let user = if i % 2 == 0 { inviter } else { invitee };
            tokio::spawn(async move { service.start_match(&match_id, &user).await })
        });

        let stamps: Vec<DateTime<Utc>> = futures::future::join_all(calls)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();

        assert!(stamps.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_non_participant_cannot_start_or_view() {
        let store = store();
        let service = service_with(store.clone());
        let created = service
            .create_friend_invite_match(&Uuid::new_v4(), &Uuid::new_v4(), Some(300), None)
            .await
            .unwrap();
        let stranger = Uuid::new_v4();

        assert!(matches!(
            service.start_match(&created.id, &stranger).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.get_match(&created.id, &stranger).await,
            Err(AppError::Forbidden(_))
        ));
        // Unknown match reads the same as someone else's
        assert!(matches!(
            service.get_match(&Uuid::new_v4(), &stranger).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(store.all_matches()[0].started_at, None);
    }

    #[tokio::test]
    async fn test_get_match_reports_opponent_and_clock() {
        let store = store();
        let service = service_with(store.clone());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let created = service
            .create_queued_match([a, b], MatchMode::Ranked, 300)
            .await
            .unwrap();

        let view = service.get_match(&created.id, &b).await.unwrap();

        assert_eq!(view.opponent_id, Some(a));
        assert_eq!(view.phase, MatchPhase::Started);
        assert!(view.remaining_seconds <= 300 && view.remaining_seconds >= 298);
        assert!(view.question.total_cases >= 2);
        let sample = view.question.sample.unwrap();
        assert_eq!(sample.input, "0");
        assert_eq!(sample.expected_output, "0");
    }

    #[tokio::test]
    async fn test_expired_match_is_not_active() {
        let store = store();
        let service = service_with(store.clone());
        let user = Uuid::new_v4();
        let expired = Match {
            id: Uuid::new_v4(),
            mode: MatchMode::Ranked,
            question_id: Uuid::new_v4(),
            time_limit_seconds: 60,
            started_at: Some(Utc::now() - Duration::seconds(61)),
            kind: MatchKind::Queued,
            inviter_id: None,
            invitee_id: None,
            language: None,
            created_at: Utc::now() - Duration::seconds(61),
        };
        store.insert_match(expired.clone(), &[user, Uuid::new_v4()]);

        assert!(service.latest_active_queued_match(&user).await.unwrap().is_none());
        assert!(matches!(
            service
                .ensure_accepting_submissions(&expired.id, &user, &expired.question_id)
                .await,
            Err(AppError::Validation(_))
        ));
    }
}
