//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// JUDGE DEFAULTS
// =============================================================================

/// Upper bound for a single blocking judge call
pub const DEFAULT_JUDGE_TIMEOUT_SECONDS: u64 = 15;

/// Status description the judge reports for a passing run
pub const JUDGE_ACCEPTED_STATUS: &str = "Accepted";

/// Header carrying the judge API key, when one is configured
pub const JUDGE_AUTH_HEADER: &str = "X-Auth-Token";

// =============================================================================
// MATCH SETTINGS
// =============================================================================

/// Shortest match a player may request
pub const MIN_MATCH_TIME_LIMIT_SECONDS: i32 = 60;

/// Longest match a player may request
pub const MAX_MATCH_TIME_LIMIT_SECONDS: i32 = 1800;

/// Time limit used when the request does not carry one
pub const DEFAULT_MATCH_TIME_LIMIT_SECONDS: i32 = 600;

/// Questions curated for timed 1v1 play
pub const DEFAULT_PVP_QUESTION_SLUGS: &[&str] = &[
    "two-sum",
    "valid-parentheses",
    "reverse-string",
    "fizz-buzz",
    "palindrome-number",
    "maximum-subarray",
    "climbing-stairs",
    "merge-intervals",
];

/// Matchmaking modes
pub mod modes {
    pub const RANKED: &str = "ranked";
    pub const UNRANKED: &str = "unranked";

    /// All matchmaking modes
    pub const ALL: &[&str] = &[RANKED, UNRANKED];
}

/// Match kinds
pub mod match_kinds {
    pub const QUEUED: &str = "queued";
    pub const FRIEND_INVITE: &str = "friend_invite";
}

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const JAVASCRIPT: &str = "javascript";
    pub const PYTHON: &str = "python";
    pub const C: &str = "c";
    pub const CPP: &str = "cpp";
    pub const JAVA: &str = "java";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[JAVASCRIPT, PYTHON, C, CPP, JAVA];
}

/// Judge language ids for each language
pub mod judge_language_ids {
    /// JavaScript (Node.js 12.14.0)
    pub const JAVASCRIPT: i32 = 63;
    /// Python (3.8.1)
    pub const PYTHON: i32 = 71;
    /// C (GCC 9.2.0)
    pub const C: i32 = 50;
    /// C++ (GCC 9.2.0)
    pub const CPP: i32 = 54;
    /// Java (OpenJDK 13.0.1)
    pub const JAVA: i32 = 62;
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

/// Upper bound on a whole request, grading included
pub const REQUEST_TIMEOUT_SECONDS: u64 = 300;

/// Seconds a client is told to wait before retrying a 429 or 503
pub const RETRY_AFTER_SECONDS: u32 = 5;

/// Room for the JSON envelope around the largest accepted source
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_SOURCE_CODE_SIZE as usize * 2;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Submission endpoint - max requests
    pub const SUBMISSION_MAX_REQUESTS: i64 = 10;
    /// Submission endpoint - window in seconds
    pub const SUBMISSION_WINDOW_SECS: i64 = 60;

    /// Queue endpoints - max requests
    pub const QUEUE_MAX_REQUESTS: i64 = 30;
    /// Queue endpoints - window in seconds
    pub const QUEUE_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum source code size in bytes (64 KB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 64 * 1024;

/// Maximum language identifier length
pub const MAX_LANGUAGE_LENGTH: u64 = 20;
