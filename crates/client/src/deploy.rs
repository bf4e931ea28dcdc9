//! GitHub deploy client
//!
//! Commits the generated config artifact to a repository branch so the
//! hosting pipeline redeploys the site. Five REST calls: get ref, get base
//! commit, create tree, create commit, update ref. Deploy failures are never
//! retried automatically.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use fanboard_core::{DashboardError, Result};

use crate::transport::{HttpResponse, Transport};

const GITHUB_API: &str = "https://api.github.com";

/// GitHub connection settings, persisted separately from the dashboard
/// config so the token never lands in an exported artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
    /// Path of the config artifact within the repository.
    pub path: String,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            token: String::new(),
            path: "public/config.js".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeployStep {
    Ref,
    Commit,
    Tree,
}

pub struct DeployClient<T: Transport> {
    transport: T,
    base_url: String,
}

impl<T: Transport> DeployClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_base_url(transport, GITHUB_API)
    }

    pub fn with_base_url(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Commit `content` to `settings.path` on the configured branch and
    /// return the new commit SHA.
    pub async fn push_config(
        &self,
        settings: &DeploySettings,
        content: &str,
        message: &str,
    ) -> Result<String> {
        let repo = format!(
            "{}/repos/{}/{}",
            self.base_url, settings.owner, settings.repo
        );
        let token = settings.token.as_str();

        let ref_url = format!("{}/git/ref/heads/{}", repo, settings.branch);
        let head = self.call("GET", &ref_url, token, None, DeployStep::Ref).await?;
        let head_sha = json_str(&head, &["object", "sha"])?;
        tracing::debug!("deploy base commit {}", head_sha);

        let commit_url = format!("{}/git/commits/{}", repo, head_sha);
        let base_commit = self
            .call("GET", &commit_url, token, None, DeployStep::Commit)
            .await?;
        let base_tree = json_str(&base_commit, &["tree", "sha"])?;

        let tree_body = json!({
            "base_tree": base_tree,
            "tree": [{
                "path": settings.path,
                "mode": "100644",
                "type": "blob",
                "content": content,
            }],
        });
        let tree = self
            .call(
                "POST",
                &format!("{}/git/trees", repo),
                token,
                Some(tree_body),
                DeployStep::Tree,
            )
            .await?;
        let tree_sha = json_str(&tree, &["sha"])?;

        let commit_body = json!({
            "message": message,
            "tree": tree_sha,
            "parents": [head_sha],
        });
        let commit = self
            .call(
                "POST",
                &format!("{}/git/commits", repo),
                token,
                Some(commit_body),
                DeployStep::Commit,
            )
            .await?;
        let commit_sha = json_str(&commit, &["sha"])?;

        let update_body = json!({ "sha": commit_sha, "force": false });
        self.call(
            "PATCH",
            &format!("{}/git/refs/heads/{}", repo, settings.branch),
            token,
            Some(update_body),
            DeployStep::Ref,
        )
        .await?;

        tracing::info!("deployed config as commit {}", commit_sha);
        Ok(commit_sha)
    }

    async fn call(
        &self,
        method: &str,
        url: &str,
        token: &str,
        body: Option<Value>,
        step: DeployStep,
    ) -> Result<Value> {
        let response = self.transport.request(method, url, Some(token), body).await?;
        check_status(&response, step)?;
        serde_json::from_str(&response.body)
            .map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))
    }
}

/// Map GitHub status codes onto the deploy error taxonomy. A 403 on tree
/// creation means the token authenticated but lacks write scope.
fn check_status(response: &HttpResponse, step: DeployStep) -> Result<()> {
    match response.status {
        status if (200..300).contains(&status) => Ok(()),
        401 => Err(DashboardError::DeployAuth),
        403 if step == DeployStep::Tree => Err(DashboardError::DeployPermission),
        404 => Err(DashboardError::DeployNotFound(
            "repository or branch does not exist".to_string(),
        )),
        status => Err(DashboardError::FetchFailed(format!(
            "GitHub API returned HTTP {}",
            status
        ))),
    }
}

fn json_str(value: &Value, path: &[&str]) -> Result<String> {
    let mut current = value;
    for key in path {
        current = &current[*key];
    }
    current
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            DashboardError::InvalidDataStructure(format!(
                "GitHub response missing {}",
                path.join(".")
            ))
        })
}
