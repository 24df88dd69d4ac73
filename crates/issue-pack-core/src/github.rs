//! `TrackerGateway` over the GitHub REST API.

use crate::config::{ClientConfig, API_VERSION};
use crate::error::{IssuePackError, Result};
use crate::gateway::{Gist, Issue, IssueQuery, IssueUpdate, NewGist, NewIssue, TrackerGateway};
use crate::repo::RepoRef;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

pub struct GitHubClient {
    http: Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|_| {
            IssuePackError::InvalidArgument {
                name: "token".to_string(),
                reason: "contains characters not allowed in a header".to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn issues_path(repo: &RepoRef) -> String {
        format!("/repos/{}/{}/issues", repo.owner, repo.name)
    }

    /// Send and return the body of a 2xx response.
    fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(IssuePackError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &'static str) -> Result<T> {
        let body = self.send(request)?;
        serde_json::from_str(&body).map_err(|source| IssuePackError::Decode { what, source })
    }
}

impl TrackerGateway for GitHubClient {
    fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<Issue> {
        tracing::debug!(%repo, title = %issue.title, "POST issue");
        let request = self.http.post(self.url(&Self::issues_path(repo))).json(issue);
        self.send_json(request, "issue")
    }

    fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<Issue> {
        tracing::debug!(%repo, number, "GET issue");
        let path = format!("{}/{}", Self::issues_path(repo), number);
        self.send_json(self.http.get(self.url(&path)), "issue")
    }

    fn list_issues(&self, repo: &RepoRef, query: &IssueQuery) -> Result<Vec<Issue>> {
        tracing::debug!(%repo, labels = ?query.labels, state = query.state.as_str(), "GET issues");
        let mut params: Vec<(&str, String)> = vec![
            ("state", query.state.as_str().to_string()),
            ("per_page", query.per_page.to_string()),
        ];
        if !query.labels.is_empty() {
            params.push(("labels", query.labels.join(",")));
        }
        let request = self
            .http
            .get(self.url(&Self::issues_path(repo)))
            .query(&params);
        self.send_json(request, "issue list")
    }

    fn update_issue(&self, repo: &RepoRef, number: u64, update: &IssueUpdate) -> Result<Issue> {
        tracing::debug!(%repo, number, ?update, "PATCH issue");
        let path = format!("{}/{}", Self::issues_path(repo), number);
        self.send_json(self.http.patch(self.url(&path)).json(update), "issue")
    }

    fn add_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()> {
        tracing::debug!(%repo, number, "POST comment");
        let path = format!("{}/{}/comments", Self::issues_path(repo), number);
        let request = self
            .http
            .post(self.url(&path))
            .json(&serde_json::json!({ "body": body }));
        self.send(request).map(|_| ())
    }

    fn create_gist(&self, gist: &NewGist) -> Result<Gist> {
        tracing::debug!(description = %gist.description, files = gist.files.len(), "POST gist");
        self.send_json(self.http.post(self.url("/gists")).json(gist), "gist")
    }

    fn get_gist(&self, id: &str) -> Result<Gist> {
        tracing::debug!(id, "GET gist");
        self.send_json(self.http.get(self.url(&format!("/gists/{id}"))), "gist")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GistFile, IssueState, StateFilter};
    use mockito::Matcher;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn client(server: &mockito::Server) -> GitHubClient {
        GitHubClient::new(&ClientConfig::new("secret").with_api_url(server.url())).unwrap()
    }

    fn repo() -> RepoRef {
        RepoRef::new("o", "r")
    }

    fn issue_body(number: u64, state: &str, labels: &[&str]) -> String {
        json!({
            "number": number,
            "title": "T",
            "body": "b",
            "state": state,
            "html_url": format!("https://github.com/o/r/issues/{number}"),
            "labels": labels.iter().map(|l| json!({"name": l})).collect::<Vec<_>>(),
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-01-02T03:04:05Z",
            "user": {"login": "me"}
        })
        .to_string()
    }

    #[test]
    fn get_issue_sends_auth_headers() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/o/r/issues/7")
            .match_header("authorization", "Bearer secret")
            .match_header("accept", "application/vnd.github+json")
            .match_header("x-github-api-version", API_VERSION)
            .match_header("user-agent", Matcher::Regex("^github-issue-pack/".into()))
            .with_status(200)
            .with_body(issue_body(7, "open", &["pending"]))
            .create();

        let issue = client(&server).get_issue(&repo(), 7).unwrap();
        assert_eq!(issue.number, 7);
        assert_eq!(issue.state, IssueState::Open);
        mock.assert();
    }

    #[test]
    fn list_issues_encodes_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/o/r/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("labels".into(), "cursortoolset,pending".into()),
                Matcher::UrlEncoded("state".into(), "open".into()),
                Matcher::UrlEncoded("per_page".into(), "20".into()),
            ]))
            .with_status(200)
            .with_body(format!("[{}]", issue_body(1, "open", &["cursortoolset", "pending"])))
            .create();

        let query = IssueQuery {
            labels: vec!["cursortoolset".into(), "pending".into()],
            state: StateFilter::Open,
            per_page: 20,
        };
        let issues = client(&server).list_issues(&repo(), &query).unwrap();
        assert_eq!(issues.len(), 1);
        mock.assert();
    }

    #[test]
    fn update_issue_patches_state_and_labels() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PATCH", "/repos/o/r/issues/3")
            .match_body(Matcher::Json(json!({
                "state": "closed",
                "labels": ["cursortoolset", "processed"]
            })))
            .with_status(200)
            .with_body(issue_body(3, "closed", &["cursortoolset", "processed"]))
            .create();

        let update = IssueUpdate {
            state: Some(IssueState::Closed),
            labels: Some(vec!["cursortoolset".into(), "processed".into()]),
        };
        let issue = client(&server).update_issue(&repo(), 3, &update).unwrap();
        assert_eq!(issue.state, IssueState::Closed);
        mock.assert();
    }

    #[test]
    fn add_comment_posts_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/repos/o/r/issues/3/comments")
            .match_body(Matcher::Json(json!({"body": "done"})))
            .with_status(201)
            .with_body("{}")
            .create();

        client(&server).add_comment(&repo(), 3, "done").unwrap();
        mock.assert();
    }

    #[test]
    fn create_and_fetch_gist() {
        let mut server = mockito::Server::new();
        let create = server
            .mock("POST", "/gists")
            .match_body(Matcher::PartialJson(json!({
                "description": "[bug-report] X",
                "public": false,
                "files": {"issue-payload.json": {"content": "{}"}}
            })))
            .with_status(201)
            .with_body(
                json!({
                    "id": "abc123",
                    "html_url": "https://gist.github.com/me/abc123",
                    "files": {"issue-payload.json": {"content": "{}"}}
                })
                .to_string(),
            )
            .create();
        let fetch = server
            .mock("GET", "/gists/abc123")
            .with_status(200)
            .with_body(
                json!({
                    "id": "abc123",
                    "description": null,
                    "html_url": "https://gist.github.com/me/abc123",
                    "files": {"issue-payload.json": {"content": "{\"a\":1}", "truncated": false}}
                })
                .to_string(),
            )
            .create();

        let gh = client(&server);
        let mut files = BTreeMap::new();
        files.insert(
            "issue-payload.json".to_string(),
            GistFile {
                content: "{}".into(),
                truncated: false,
            },
        );
        let gist = gh
            .create_gist(&NewGist {
                description: "[bug-report] X".into(),
                public: false,
                files,
            })
            .unwrap();
        assert_eq!(gist.id, "abc123");

        let fetched = gh.get_gist("abc123").unwrap();
        assert_eq!(fetched.files["issue-payload.json"].content, "{\"a\":1}");
        create.assert();
        fetch.assert();
    }

    #[test]
    fn non_2xx_surfaces_status_and_body() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/repos/o/r/issues/9")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create();

        let err = client(&server).get_issue(&repo(), 9).unwrap_err();
        match err {
            IssuePackError::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Not Found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn undecodable_response_is_decode_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/repos/o/r/issues/9")
            .with_status(200)
            .with_body("<html>")
            .create();

        let err = client(&server).get_issue(&repo(), 9).unwrap_err();
        assert!(matches!(err, IssuePackError::Decode { what: "issue", .. }));
    }
}
