//! Language table shared by request validation and the judge client

use crate::constants::{judge_language_ids, languages};

/// A language the judge can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    name: &'static str,
    judge_id: i32,
}

const TABLE: &[Language] = &[
    Language { name: languages::JAVASCRIPT, judge_id: judge_language_ids::JAVASCRIPT },
    Language { name: languages::PYTHON, judge_id: judge_language_ids::PYTHON },
    Language { name: languages::C, judge_id: judge_language_ids::C },
    Language { name: languages::CPP, judge_id: judge_language_ids::CPP },
    Language { name: languages::JAVA, judge_id: judge_language_ids::JAVA },
];

impl Language {
    /// Look up a language by name or alias (case-insensitive)
    pub fn for_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let canonical = match lowered.as_str() {
            "node" | "nodejs" | "js" => languages::JAVASCRIPT,
            "python3" | "py" => languages::PYTHON,
            "c++" | "cxx" => languages::CPP,
            other => other,
        };

        TABLE.iter().copied().find(|l| l.name == canonical)
    }

    /// Canonical language name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identifier the judge expects in `language_id`
    pub fn judge_id(&self) -> i32 {
        self.judge_id
    }
}

/// Canonical name for `name`, or `None` if unsupported
pub fn normalize(name: &str) -> Option<&'static str> {
    Language::for_name(name).map(|l| l.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_language_has_a_judge_id() {
        for name in languages::ALL {
            let language = Language::for_name(name).unwrap();
            assert_eq!(language.name(), *name);
            assert!(language.judge_id() > 0);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(normalize("Node"), Some("javascript"));
        assert_eq!(normalize("C++"), Some("cpp"));
        assert_eq!(normalize(" python3 "), Some("python"));
        assert_eq!(Language::for_name("cpp").map(|l| l.judge_id()), Some(54));
    }

    #[test]
    fn test_unknown_language() {
        assert_eq!(normalize("cobol"), None);
        assert_eq!(normalize(""), None);
    }
}
