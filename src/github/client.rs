use crate::domain::PullRequestRef;
use crate::error::{ReleaseError, Result};
use crate::github::{
    PublishedRelease, PullRequestDetails, PullRequestSource, ReleaseDraft, ReleaseTarget,
    RepositorySlug,
};
use git2::Oid;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

/// Issue-shaped pull request as returned by the search API
#[derive(Debug, Deserialize)]
struct IssueItem {
    number: u64,
    title: String,
    html_url: String,
    user: Option<User>,
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<IssueItem>,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    title: String,
    html_url: String,
    user: Option<User>,
    #[serde(default)]
    labels: Vec<Label>,
    merged_at: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateReleaseRequest<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    id: u64,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn to_pull_request_ref(
    number: u64,
    title: String,
    url: String,
    user: Option<User>,
    labels: Vec<Label>,
) -> PullRequestRef {
    PullRequestRef {
        number,
        title,
        author: user.map(|u| u.login).unwrap_or_else(|| "ghost".to_string()),
        url,
        labels: labels.into_iter().map(|l| l.name).collect(),
    }
}

/// GitHub REST API client for pull request lookups and release creation
pub struct GitHubClient {
    http: Client,
    api_url: String,
    repository: RepositorySlug,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client for one repository
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        api_url: impl Into<String>,
        repository: RepositorySlug,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;

        Ok(GitHubClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repository,
            token,
        })
    }

    pub fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}{}", self.api_url, self.repository, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ReleaseError::github(status.as_u16(), message));
        }
        Ok(response.json()?)
    }
}

impl PullRequestSource for GitHubClient {
    fn merged_pull_requests_for_commit(&self, commit: Oid) -> Result<Vec<PullRequestRef>> {
        let query = format!("{} repo:{} is:pr is:merged", commit, self.repository);
        debug!(%query, "searching merged pull requests");

        let request = self
            .http
            .get(format!("{}/search/issues", self.api_url))
            .query(&[("q", query.as_str())]);
        let response = self.authorize(request).send()?;
        let search: SearchResponse = Self::decode(response)?;

        Ok(search
            .items
            .into_iter()
            .map(|item| {
                to_pull_request_ref(item.number, item.title, item.html_url, item.user, item.labels)
            })
            .collect())
    }

    fn pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        let request = self.http.get(self.repo_url(&format!("/pulls/{}", number)));
        let response = self.authorize(request).send()?;
        let pull: PullResponse = Self::decode(response)?;

        Ok(PullRequestDetails {
            merged: pull.merged_at.is_some(),
            pull_request: to_pull_request_ref(
                pull.number,
                pull.title,
                pull.html_url,
                pull.user,
                pull.labels,
            ),
        })
    }
}

impl ReleaseTarget for GitHubClient {
    fn create_release(&self, release: &ReleaseDraft) -> Result<PublishedRelease> {
        let payload = CreateReleaseRequest {
            tag_name: &release.tag_name,
            name: &release.title,
            body: &release.body,
            draft: release.draft,
        };

        let request = self.http.post(self.repo_url("/releases")).json(&payload);
        let response = self.authorize(request).send()?;
        let created: ReleaseResponse = Self::decode(response)?;

        Ok(PublishedRelease {
            id: created.id,
            url: created.html_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(
            "https://ghe.example.com/api/v3/",
            RepositorySlug::parse("octo/widgets").unwrap(),
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_repo_url_strips_trailing_slash() {
        assert_eq!(
            client().repo_url("/releases"),
            "https://ghe.example.com/api/v3/repos/octo/widgets/releases"
        );
    }

    #[test]
    fn test_search_item_deserializes() {
        let json = r#"{
            "total_count": 1,
            "items": [{
                "number": 42,
                "title": "Add widgets",
                "html_url": "https://github.com/octo/widgets/pull/42",
                "user": {"login": "hubot"},
                "labels": [{"name": "release: minor"}, {"name": "docs"}]
            }]
        }"#;
        let search: SearchResponse = serde_json::from_str(json).unwrap();
        let item = search.items.into_iter().next().unwrap();
        let pr = to_pull_request_ref(item.number, item.title, item.html_url, item.user, item.labels);
        assert_eq!(pr.number, 42);
        assert_eq!(pr.author, "hubot");
        assert_eq!(pr.labels, vec!["release: minor", "docs"]);
    }

    #[test]
    fn test_pull_without_user_is_ghost() {
        let json = r#"{
            "number": 7,
            "title": "Fix",
            "html_url": "https://github.com/octo/widgets/pull/7",
            "user": null,
            "merged_at": null
        }"#;
        let pull: PullResponse = serde_json::from_str(json).unwrap();
        assert!(pull.merged_at.is_none());
        let pr = to_pull_request_ref(pull.number, pull.title, pull.html_url, pull.user, pull.labels);
        assert_eq!(pr.author, "ghost");
        assert!(pr.labels.is_empty());
    }

    #[test]
    fn test_release_request_shape() {
        let payload = CreateReleaseRequest {
            tag_name: "1.3.0",
            name: "Release 1.3.0",
            body: "## What's Changed",
            draft: false,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["tag_name"], "1.3.0");
        assert_eq!(value["name"], "Release 1.3.0");
        assert_eq!(value["draft"], false);
    }
}
