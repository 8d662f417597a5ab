use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SqlWeaveError;

/// How a criterion joins the criteria before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AppendRule {
    #[default]
    And,
    Or,
}

impl AppendRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppendRule::And => "AND",
            AppendRule::Or => "OR",
        }
    }
}

impl FromStr for AppendRule {
    type Err = SqlWeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(AppendRule::And),
            "OR" => Ok(AppendRule::Or),
            other => Err(SqlWeaveError::invalid_argument(format!(
                "Unknown criterion append rule `{}`, expected AND or OR",
                other
            ))),
        }
    }
}

impl TryFrom<String> for AppendRule {
    type Error = SqlWeaveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AppendRule> for String {
    fn from(rule: AppendRule) -> Self {
        rule.as_str().to_string()
    }
}

impl std::fmt::Display for AppendRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
    Cross,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Outer => "OUTER",
            JoinType::Cross => "CROSS",
        }
    }
}

impl FromStr for JoinType {
    type Err = SqlWeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "OUTER" => Ok(JoinType::Outer),
            "CROSS" => Ok(JoinType::Cross),
            other => Err(SqlWeaveError::invalid_argument(format!(
                "Unknown join type `{}`",
                other
            ))),
        }
    }
}

impl TryFrom<String> for JoinType {
    type Error = SqlWeaveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<JoinType> for String {
    fn from(kind: JoinType) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_rule_is_case_insensitive() {
        assert_eq!("or".parse::<AppendRule>().unwrap(), AppendRule::Or);
        assert_eq!(" And ".parse::<AppendRule>().unwrap(), AppendRule::And);
        assert!(matches!(
            "xor".parse::<AppendRule>(),
            Err(SqlWeaveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_append_rule_serde_rejects_unknown() {
        let rule: AppendRule = serde_json::from_str("\"or\"").unwrap();
        assert_eq!(rule, AppendRule::Or);
        assert_eq!(serde_json::to_string(&rule).unwrap(), "\"OR\"");
        assert!(serde_json::from_str::<AppendRule>("\"nand\"").is_err());
    }

    #[test]
    fn test_join_type_parse() {
        assert_eq!("left".parse::<JoinType>().unwrap(), JoinType::Left);
        assert!("full".parse::<JoinType>().is_err());
    }
}
