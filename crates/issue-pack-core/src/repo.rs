use crate::error::IssuePackError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A GitHub repository in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

fn valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl std::str::FromStr for RepoRef {
    type Err = IssuePackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if valid_segment(owner) && valid_segment(name) => {
                Ok(RepoRef::new(owner, name))
            }
            _ => Err(IssuePackError::InvalidRepo(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Serialize for RepoRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let repo: RepoRef = "shichao402/cursor-toolset".parse().unwrap();
        assert_eq!(repo.owner, "shichao402");
        assert_eq!(repo.name, "cursor-toolset");
        assert_eq!(repo.to_string(), "shichao402/cursor-toolset");
    }

    #[test]
    fn rejects_malformed_repos() {
        for bad in ["", "owner", "/repo", "owner/", "a/b/c", "own er/repo", "o/r?x=1"] {
            assert!(
                matches!(bad.parse::<RepoRef>(), Err(IssuePackError::InvalidRepo(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn serializes_as_string() {
        let repo = RepoRef::new("o", "r");
        assert_eq!(serde_json::to_value(&repo).unwrap(), serde_json::json!("o/r"));
    }
}
