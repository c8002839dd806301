//! Question catalog repository (read-only)

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Question, TestCase},
};

/// Read access to curated questions
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// Questions whose slug is in `slugs`. Unknown slugs are skipped.
    async fn allowed_questions(&self, slugs: &[String]) -> AppResult<Vec<Question>>;

    async fn question_by_id(&self, id: &Uuid) -> AppResult<Option<Question>>;
}

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    slug: String,
    title: String,
    description: String,
    difficulty: Option<String>,
    languages: Vec<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct TestCaseRow {
    question_id: Uuid,
    input: String,
    expected_output: String,
}

impl QuestionRow {
    fn into_question(self, test_cases: Vec<TestCase>) -> Question {
        Question {
            id: self.id,
            slug: self.slug,
            title: self.title,
            description: self.description,
            difficulty: self.difficulty,
            languages: self.languages,
            test_cases,
        }
    }
}

/// Postgres-backed catalog
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Test cases for the given questions, grouped per question in grading order
    async fn test_cases_for(&self, question_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<TestCase>>> {
        let rows = sqlx::query_as::<_, TestCaseRow>(
            r#"
            SELECT question_id, input, expected_output
            FROM question_test_cases
            WHERE question_id = ANY($1)
            ORDER BY question_id, position
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<TestCase>> = HashMap::new();
        for row in rows {
            grouped.entry(row.question_id).or_default().push(TestCase {
                input: row.input,
                expected_output: row.expected_output,
            });
        }

        Ok(grouped)
    }
}

#[async_trait]
impl QuestionCatalog for PgQuestionRepository {
    async fn allowed_questions(&self, slugs: &[String]) -> AppResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, slug, title, description, difficulty, languages
            FROM questions
            WHERE slug = ANY($1)
            ORDER BY slug
            "#,
        )
        .bind(slugs)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut test_cases = self.test_cases_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let cases = test_cases.remove(&row.id).unwrap_or_default();
                row.into_question(cases)
            })
            .collect())
    }

    async fn question_by_id(&self, id: &Uuid) -> AppResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, slug, title, description, difficulty, languages
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let cases = self
            .test_cases_for(std::slice::from_ref(id))
            .await?
            .remove(id)
            .unwrap_or_default();

        Ok(Some(row.into_question(cases)))
    }
}
