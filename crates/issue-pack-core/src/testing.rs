//! In-memory `TrackerGateway` that records every call.

use crate::error::{IssuePackError, Result};
use crate::gateway::{
    Gist, Issue, IssueQuery, IssueState, IssueUpdate, Label, NewGist, NewIssue, StateFilter,
    TrackerGateway, User,
};
use crate::repo::RepoRef;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateIssue { repo: String, issue: NewIssue },
    GetIssue { repo: String, number: u64 },
    ListIssues { repo: String, query: IssueQuery },
    UpdateIssue { repo: String, number: u64, update: IssueUpdate },
    AddComment { repo: String, number: u64, body: String },
    CreateGist { gist: NewGist },
    GetGist { id: String },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    issues: BTreeMap<u64, Issue>,
    gists: BTreeMap<String, Gist>,
    comments: Vec<(u64, String)>,
    fail_comments: bool,
    fail_gists: bool,
}

/// Cloning shares state, so a test can keep a handle after boxing one.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    state: Arc<Mutex<State>>,
}

fn unavailable() -> IssuePackError {
    IssuePackError::Api {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

fn not_found() -> IssuePackError {
    IssuePackError::Api {
        status: 404,
        body: r#"{"message":"Not Found"}"#.to_string(),
    }
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed an issue with the given state, labels and body.
    pub fn insert_issue(&self, number: u64, state: IssueState, labels: &[&str], body: &str) {
        let issue = Issue {
            number,
            title: format!("Issue {number}"),
            body: Some(body.to_string()),
            state,
            html_url: format!("https://github.com/o/r/issues/{number}"),
            labels: labels
                .iter()
                .map(|l| Label {
                    name: l.to_string(),
                })
                .collect(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap(),
            user: User {
                login: "agent".to_string(),
            },
            pull_request: None,
        };
        self.lock().issues.insert(number, issue);
    }

    pub fn insert_pull_request(&self, number: u64, labels: &[&str]) {
        self.insert_issue(number, IssueState::Open, labels, "");
        if let Some(issue) = self.lock().issues.get_mut(&number) {
            issue.pull_request = Some(serde_json::json!({"url": "pr"}));
        }
    }

    pub fn insert_gist(&self, id: &str, files: &[(&str, &str)]) {
        let gist = Gist {
            id: id.to_string(),
            description: None,
            html_url: format!("https://gist.github.com/agent/{id}"),
            files: files
                .iter()
                .map(|(name, content)| {
                    (
                        name.to_string(),
                        crate::gateway::GistFile {
                            content: content.to_string(),
                            truncated: false,
                        },
                    )
                })
                .collect(),
        };
        self.lock().gists.insert(id.to_string(), gist);
    }

    pub fn fail_comments(&self) {
        self.lock().fail_comments = true;
    }

    pub fn fail_gists(&self) {
        self.lock().fail_gists = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn issue(&self, number: u64) -> Option<Issue> {
        self.lock().issues.get(&number).cloned()
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        self.lock().comments.clone()
    }
}

impl TrackerGateway for RecordingGateway {
    fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<Issue> {
        let mut state = self.lock();
        state.calls.push(Call::CreateIssue {
            repo: repo.to_string(),
            issue: issue.clone(),
        });
        let number = state.issues.keys().next_back().copied().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = Issue {
            number,
            title: issue.title.clone(),
            body: Some(issue.body.clone()),
            state: IssueState::Open,
            html_url: format!("https://github.com/{repo}/issues/{number}"),
            labels: issue
                .labels
                .iter()
                .map(|l| Label { name: l.clone() })
                .collect(),
            created_at: now,
            updated_at: now,
            user: User {
                login: "agent".to_string(),
            },
            pull_request: None,
        };
        state.issues.insert(number, created.clone());
        Ok(created)
    }

    fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<Issue> {
        let mut state = self.lock();
        state.calls.push(Call::GetIssue {
            repo: repo.to_string(),
            number,
        });
        state.issues.get(&number).cloned().ok_or_else(not_found)
    }

    fn list_issues(&self, repo: &RepoRef, query: &IssueQuery) -> Result<Vec<Issue>> {
        let mut state = self.lock();
        state.calls.push(Call::ListIssues {
            repo: repo.to_string(),
            query: query.clone(),
        });
        Ok(state
            .issues
            .values()
            .filter(|i| match query.state {
                StateFilter::Open => i.state == IssueState::Open,
                StateFilter::Closed => i.state == IssueState::Closed,
                StateFilter::All => true,
            })
            .filter(|i| query.labels.iter().all(|l| i.has_label(l)))
            .take(query.per_page as usize)
            .cloned()
            .collect())
    }

    fn update_issue(&self, repo: &RepoRef, number: u64, update: &IssueUpdate) -> Result<Issue> {
        let mut state = self.lock();
        state.calls.push(Call::UpdateIssue {
            repo: repo.to_string(),
            number,
            update: update.clone(),
        });
        let issue = state.issues.get_mut(&number).ok_or_else(not_found)?;
        if let Some(new_state) = update.state {
            issue.state = new_state;
        }
        if let Some(labels) = &update.labels {
            issue.labels = labels.iter().map(|l| Label { name: l.clone() }).collect();
        }
        issue.updated_at = Utc::now();
        Ok(issue.clone())
    }

    fn add_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::AddComment {
            repo: repo.to_string(),
            number,
            body: body.to_string(),
        });
        if state.fail_comments {
            return Err(unavailable());
        }
        state.comments.push((number, body.to_string()));
        Ok(())
    }

    fn create_gist(&self, gist: &NewGist) -> Result<Gist> {
        let mut state = self.lock();
        state.calls.push(Call::CreateGist { gist: gist.clone() });
        if state.fail_gists {
            return Err(unavailable());
        }
        let id = format!("{:08x}", state.gists.len() + 0xa0);
        let created = Gist {
            id: id.clone(),
            description: Some(gist.description.clone()),
            html_url: format!("https://gist.github.com/agent/{id}"),
            files: gist.files.clone(),
        };
        state.gists.insert(id, created.clone());
        Ok(created)
    }

    fn get_gist(&self, id: &str) -> Result<Gist> {
        let mut state = self.lock();
        state.calls.push(Call::GetGist { id: id.to_string() });
        if state.fail_gists {
            return Err(unavailable());
        }
        state.gists.get(id).cloned().ok_or_else(not_found)
    }
}
