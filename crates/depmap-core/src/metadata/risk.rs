//! Keyword-driven risk tiering.

use crate::config::RiskLevel;

/// Execution primitives, process spawning, database drivers, credentials and
/// destructive filesystem calls.
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "eval(",
    "exec(",
    "__import__",
    "subprocess",
    "oracledb",
    "psycopg",
    "pymongo",
    "sqlalchemy",
    "database",
    "db_connection",
    "password",
    "secret",
    "token",
    "api_key",
    "os.remove",
    "shutil.rmtree",
    "os.system",
];

/// Error handling, configuration, file writes and network access.
const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "try:",
    "except",
    "raise",
    "error",
    "config",
    "settings",
    "environment",
    "file.write",
    "file.delete",
    "makedirs",
    "requests.",
    "http",
    "api",
];

/// Evaluated top to bottom; the first tier with a matching keyword wins.
const RISK_RULES: &[(RiskLevel, &[&str])] = &[
    (RiskLevel::High, HIGH_RISK_KEYWORDS),
    (RiskLevel::Medium, MEDIUM_RISK_KEYWORDS),
];

/// Outcome of a risk scan: the tier and the keyword that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub keyword: Option<&'static str>,
}

/// Classify file content. `None` means the file could not be read.
pub fn assess_risk(content: Option<&str>) -> RiskAssessment {
    let Some(content) = content else {
        return RiskAssessment {
            level: RiskLevel::Unknown,
            keyword: None,
        };
    };

    let lowered = content.to_lowercase();
    for (level, keywords) in RISK_RULES {
        if let Some(keyword) = keywords.iter().find(|k| lowered.contains(**k)) {
            return RiskAssessment {
                level: *level,
                keyword: Some(keyword),
            };
        }
    }

    RiskAssessment {
        level: RiskLevel::Low,
        keyword: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(content: &str) -> RiskLevel {
        assess_risk(Some(content)).level
    }

    #[test]
    fn unreadable_is_unknown() {
        let a = assess_risk(None);
        assert_eq!(a.level, RiskLevel::Unknown);
        assert_eq!(a.keyword, None);
    }

    #[test]
    fn plain_code_is_low() {
        assert_eq!(level("def add(a, b):\n    return a + b\n"), RiskLevel::Low);
    }

    #[test]
    fn subprocess_is_high() {
        let a = assess_risk(Some("import subprocess\n"));
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.keyword, Some("subprocess"));
    }

    #[test]
    fn high_overrides_medium() {
        let src = "try:\n    run()\nexcept ValueError:\n    raise\nPASSWORD = 'x'\n";
        assert_eq!(level(src), RiskLevel::High);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(level("DB = Database()"), RiskLevel::High);
        assert_eq!(level("from app import SETTINGS"), RiskLevel::Medium);
    }

    #[test]
    fn medium_keywords() {
        assert_eq!(level("try:\n    pass\n"), RiskLevel::Medium);
        assert_eq!(level("requests.get(url)"), RiskLevel::Medium);
    }
}
