use chrono::{DateTime, Utc};
use serde::Deserialize;
use smolder_core::{ChangeRequest, SmolderError};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub client for repository metadata and pull request history.
///
/// Constructed once per run and passed explicitly to the code that needs
/// it; nothing in the workspace reaches for ambient credentials.
///
/// # Examples
///
/// ```
/// use smolder_github::parse_repo_reference;
///
/// let (owner, repo) = parse_repo_reference("rust-lang/rust").unwrap();
/// assert_eq!(owner, "rust-lang");
/// assert_eq!(repo, "rust");
/// ```
pub struct GithubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl GithubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// `api_base` overrides the public API endpoint, for GitHub Enterprise.
    ///
    /// # Errors
    ///
    /// Returns [`SmolderError::Config`] if no token is available or the API
    /// base is not a valid URI, or [`SmolderError::Github`] if the client
    /// cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use smolder_github::GithubClient;
    ///
    /// let client = GithubClient::new(Some("ghp_xxxx"), None).unwrap();
    /// ```
    pub fn new(token: Option<&str>, api_base: Option<&str>) -> Result<Self, SmolderError> {
        let token = match token {
            Some(t) => t.to_string(),
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                SmolderError::Config(
                    "GITHUB_TOKEN not set. Pass --github-token or set GITHUB_TOKEN env var".into(),
                )
            })?,
        };

        let api_base = api_base
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let mut builder = octocrab::Octocrab::builder().personal_token(token.clone());
        if api_base != DEFAULT_API_BASE {
            builder = builder.base_uri(api_base.as_str()).map_err(|e| {
                SmolderError::Config(format!("invalid API base '{api_base}': {e}"))
            })?;
        }
        let octocrab = builder
            .build()
            .map_err(|e| SmolderError::Github(format!("failed to create GitHub client: {e}")))?;

        let http = reqwest::Client::new();

        Ok(Self {
            octocrab,
            http,
            token,
            api_base,
        })
    }

    /// Fetch the repository's creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SmolderError::Github`] on network or API errors, or
    /// [`SmolderError::Input`] if the `created_at` field is missing or
    /// malformed.
    pub async fn repository_created_at(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<DateTime<Utc>, SmolderError> {
        let url = format!("{}/repos/{owner}/{repo}", self.api_base);
        let (info, _) = self.get_json::<RepositoryInfo>(&url).await?;
        let raw = info.created_at.ok_or_else(|| {
            SmolderError::Input(format!(
                "repository {owner}/{repo} has no created_at timestamp"
            ))
        })?;
        parse_timestamp(&raw)
    }

    /// List every pull request opened against `base`, across all states,
    /// paginated to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`SmolderError::Github`] on network or API errors, or
    /// [`SmolderError::Input`] if a pull request lacks a creation timestamp.
    pub async fn list_change_requests(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
    ) -> Result<Vec<ChangeRequest>, SmolderError> {
        let page = self
            .octocrab
            .pulls(owner, repo)
            .list()
            .state(octocrab::params::State::All)
            .base(base)
            .per_page(100)
            .send()
            .await
            .map_err(|e| {
                SmolderError::Github(format!(
                    "failed to list pull requests for {owner}/{repo}: {e}"
                ))
            })?;

        let pulls = self.octocrab.all_pages(page).await.map_err(|e| {
            SmolderError::Github(format!(
                "failed to page through pull requests for {owner}/{repo}: {e}"
            ))
        })?;

        pulls
            .into_iter()
            .map(|pull| {
                let created_at = pull.created_at.ok_or_else(|| {
                    SmolderError::Input(format!(
                        "pull request #{} has no created_at timestamp",
                        pull.number
                    ))
                })?;
                Ok(ChangeRequest {
                    number: pull.number,
                    title: pull.title.unwrap_or_default(),
                    created_at,
                })
            })
            .collect()
    }

    /// List the file paths touched by one pull request, following `Link`
    /// pagination to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`SmolderError::Github`] on network or API errors.
    pub async fn touched_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<String>, SmolderError> {
        let mut url = format!(
            "{}/repos/{owner}/{repo}/pulls/{number}/files?per_page=100",
            self.api_base
        );
        let mut files = Vec::new();
        loop {
            let (page, next) = self.get_json::<Vec<PullRequestFile>>(&url).await?;
            files.extend(page.into_iter().map(|f| f.filename));
            match next {
                Some(next_url) => url = next_url,
                None => break,
            }
        }
        Ok(files)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<(T, Option<String>), SmolderError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "smolder")
            .send()
            .await
            .map_err(|e| SmolderError::Github(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmolderError::Github(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        let next = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let value = response.json::<T>().await.map_err(|e| {
            SmolderError::Github(format!("failed to decode response from {url}: {e}"))
        })?;

        Ok((value, next))
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
}

/// Parse a repository reference (`owner/repo`) into its components.
///
/// # Errors
///
/// Returns [`SmolderError::Config`] if the format is invalid.
///
/// # Examples
///
/// ```
/// use smolder_github::parse_repo_reference;
///
/// let (owner, repo) = parse_repo_reference("octocat/hello-world").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_repo_reference(repo_ref: &str) -> Result<(String, String), SmolderError> {
    let Some((owner, repo)) = repo_ref.split_once('/') else {
        return Err(SmolderError::Config(format!(
            "invalid repository reference '{repo_ref}', expected owner/repo"
        )));
    };
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(SmolderError::Config(format!(
            "invalid repository reference '{repo_ref}', expected owner/repo"
        )));
    }
    Ok((owner.to_string(), repo.to_string()))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SmolderError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| SmolderError::Input(format!("malformed timestamp '{raw}': {e}")))
}

/// Extract the `rel="next"` target from a `Link` response header.
fn next_page_url(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|param| param.trim() == "rel=\"next\"");
        if !is_next {
            return None;
        }
        let url = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Some(url.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_repo_reference() {
        let (owner, repo) = parse_repo_reference("rust-lang/rust").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "rust");
    }

    #[test]
    fn parse_repo_reference_missing_slash() {
        assert!(parse_repo_reference("just-a-name").is_err());
    }

    #[test]
    fn parse_repo_reference_empty_components() {
        assert!(parse_repo_reference("/repo").is_err());
        assert!(parse_repo_reference("owner/").is_err());
    }

    #[test]
    fn parse_repo_reference_extra_slash() {
        assert!(parse_repo_reference("owner/repo/extra").is_err());
    }

    #[test]
    fn parse_rfc3339_timestamp() {
        let t = parse_timestamp("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn parse_timestamp_with_offset_normalizes_to_utc() {
        let t = parse_timestamp("2024-03-01T13:00:00+01:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn malformed_timestamp_is_an_input_error() {
        let result = parse_timestamp("yesterday");
        assert!(matches!(result, Err(SmolderError::Input(_))));
    }

    #[test]
    fn link_header_with_next_yields_url() {
        let header = "<https://api.github.com/repositories/1/pulls?page=2>; rel=\"next\", \
                      <https://api.github.com/repositories/1/pulls?page=9>; rel=\"last\"";
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://api.github.com/repositories/1/pulls?page=2")
        );
    }

    #[test]
    fn link_header_on_last_page_yields_none() {
        let header = "<https://api.github.com/repositories/1/pulls?page=1>; rel=\"first\", \
                      <https://api.github.com/repositories/1/pulls?page=8>; rel=\"prev\"";
        assert_eq!(next_page_url(header), None);
    }

    #[test]
    fn empty_link_header_yields_none() {
        assert_eq!(next_page_url(""), None);
    }
}
