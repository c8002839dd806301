//! Question catalog model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::judge::languages;

/// A curated problem. Read-only from this service's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: Option<String>,
    pub languages: Vec<String>,
    /// Grading order. The first entry is graded first.
    pub test_cases: Vec<TestCase>,
}

/// One stdin / expected stdout pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl Question {
    /// Check whether `language` is in the question's allowed set (aliases resolved)
    pub fn allows_language(&self, language: &str) -> bool {
        let Some(requested) = languages::normalize(language) else {
            return false;
        };

        self.languages
            .iter()
            .filter_map(|l| languages::normalize(l))
            .any(|l| l == requested)
    }

    /// Test case shown to players before they submit
    pub fn sample_case(&self) -> Option<&TestCase> {
        self.test_cases.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(languages: &[&str]) -> Question {
        Question {
            id: Uuid::new_v4(),
            slug: "two-sum".to_string(),
            title: "Two Sum".to_string(),
            description: "Add them".to_string(),
            difficulty: Some("easy".to_string()),
            languages: languages.iter().map(|l| l.to_string()).collect(),
            test_cases: vec![],
        }
    }

    #[test]
    fn test_allows_language_resolves_aliases() {
        let q = question(&["javascript", "c++"]);
        assert!(q.allows_language("node"));
        assert!(q.allows_language("cpp"));
        assert!(!q.allows_language("python"));
        assert!(!q.allows_language("brainfuck"));
    }

    #[test]
    fn test_empty_language_set_allows_nothing() {
        assert!(!question(&[]).allows_language("python"));
    }
}
