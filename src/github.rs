use std::process::Stdio;

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    command::CommandLine,
    error::{Error, Result},
    fetch::{Forge, merge_repositories},
    graphql::{self, Affiliation, Connection, GraphQLResponse, ItemNode, PAGE_SIZE},
    types::{IssueLike, ItemKind, Repository},
};

pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// First non-empty token among the well-known environment variables.
pub fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

/// Where the bearer token comes from.
#[derive(Debug, Clone)]
pub struct TokenSource {
    /// Used as-is when present, skipping the secret command.
    pub env_token: Option<String>,
    /// Prints the token on stdout, e.g. `pass show tokens/github/repo`.
    pub secret_command: CommandLine,
}

impl TokenSource {
    pub fn new(env_token: Option<String>, secret_command: CommandLine) -> Self {
        Self {
            env_token,
            secret_command,
        }
    }

    pub async fn resolve(&self) -> Result<String> {
        if let Some(token) = &self.env_token {
            return Ok(token.clone());
        }

        debug!(command = %self.secret_command, "reading token from secret store");
        let output = self
            .secret_command
            .to_command()
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| Error::Auth(format!("failed to run '{}': {}", self.secret_command, e)))?;

        if !output.status.success() {
            return Err(Error::Auth(format!(
                "'{}' exited with {}",
                self.secret_command, output.status
            )));
        }

        let token = String::from_utf8(output.stdout)
            .map_err(|_| Error::Auth("secret store printed invalid UTF-8".to_string()))?
            .trim()
            .to_string();

        if token.is_empty() {
            return Err(Error::Auth(format!(
                "'{}' printed an empty token",
                self.secret_command
            )));
        }

        Ok(token)
    }
}

/// GitHub GraphQL forge.
///
/// The token is resolved and the client built on the first query; later
/// queries in the same run reuse both.
pub struct GitHub {
    token_source: TokenSource,
    api_url: Option<String>,
    max_pages: usize,
    client: OnceCell<Octocrab>,
}

impl GitHub {
    pub fn new(token_source: TokenSource) -> Self {
        Self {
            token_source,
            api_url: None,
            max_pages: 1,
            client: OnceCell::new(),
        }
    }

    /// Alternative API root, e.g. a GitHub Enterprise host.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url;
        self
    }

    /// Upper bound on pages requested per connection.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    async fn client(&self) -> Result<&Octocrab> {
        self.client
            .get_or_try_init(|| async {
                let token = self.token_source.resolve().await?;
                let mut builder = Octocrab::builder().personal_token(token);
                if let Some(api_url) = &self.api_url {
                    builder = builder
                        .base_uri(api_url.as_str())
                        .map_err(|e| Error::Upstream(format!("invalid API URL '{api_url}': {e}")))?;
                }
                builder
                    .build()
                    .map_err(|e| Error::Upstream(format!("failed to create GitHub client: {e}")))
            })
            .await
    }

    /// Runs `query` and follows its `connection` cursor for up to
    /// `max_pages` pages.
    async fn paginate<D, N>(
        &self,
        query: &str,
        variables: Value,
        extract: fn(D) -> Result<Connection<N>>,
    ) -> Result<Vec<N>>
    where
        D: DeserializeOwned,
    {
        let client = self.client().await?;
        let mut payload = json!({ "query": query, "variables": variables });
        payload["variables"]["first"] = json!(PAGE_SIZE);
        payload["variables"]["after"] = Value::Null;

        let mut nodes = Vec::new();
        for page in 1..=self.max_pages {
            let response: GraphQLResponse<D> = client.graphql(&payload).await?;
            let connection = extract(response.into_data()?)?;
            nodes.extend(connection.nodes);

            let page_info = connection.page_info;
            match page_info.end_cursor.filter(|_| page_info.has_next_page) {
                Some(cursor) if page < self.max_pages => {
                    payload["variables"]["after"] = Value::String(cursor);
                }
                Some(_) => {
                    debug!(pages = page, "more results available beyond page limit");
                    break;
                }
                None => break,
            }
        }

        Ok(nodes)
    }

    async fn repositories(&self, affiliation: Affiliation) -> Result<Vec<Repository>> {
        let nodes = self
            .paginate(
                &graphql::viewer_repositories_query(affiliation),
                json!({}),
                |data: graphql::ViewerData<graphql::RepositoryNode>| Ok(data.viewer.connection),
            )
            .await?;
        Ok(nodes.into_iter().map(Repository::from).collect())
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn viewer_repositories(&self) -> Result<Vec<Repository>> {
        let (owned, contributed) = futures::try_join!(
            self.repositories(Affiliation::Owned),
            self.repositories(Affiliation::Contributed)
        )?;
        Ok(merge_repositories(owned, contributed))
    }

    async fn repository_items(
        &self,
        repo: &Repository,
        kind: ItemKind,
    ) -> Result<Vec<IssueLike>> {
        let nodes = match repo.owner_and_name() {
            Some((owner, name)) => {
                self.paginate(
                    &graphql::repository_items_query(kind),
                    json!({ "owner": owner, "name": name }),
                    |data: graphql::RepositoryData<ItemNode>| {
                        data.repository
                            .map(|r| r.connection)
                            .ok_or_else(|| Error::upstream("repository not found"))
                    },
                )
                .await?
            }
            None => {
                self.paginate(
                    &graphql::viewer_repository_items_query(kind),
                    json!({ "name": repo.name }),
                    |data: graphql::ViewerRepositoryData<ItemNode>| {
                        data.viewer
                            .repository
                            .map(|r| r.connection)
                            .ok_or_else(|| Error::upstream("repository not found"))
                    },
                )
                .await?
            }
        };

        nodes.into_iter().map(ItemNode::into_item).collect()
    }

    async fn viewer_items(&self, kind: ItemKind) -> Result<Vec<IssueLike>> {
        let nodes = self
            .paginate(
                &graphql::viewer_items_query(kind),
                json!({}),
                |data: graphql::ViewerData<ItemNode>| Ok(data.viewer.connection),
            )
            .await?;

        nodes
            .into_iter()
            .map(ItemNode::into_aggregated_item)
            .collect()
    }

    async fn search_items(&self, kind: ItemKind, query: &str) -> Result<Vec<IssueLike>> {
        let nodes = self
            .paginate(
                &graphql::search_query(),
                json!({ "query": query }),
                |data: graphql::SearchData<ItemNode>| Ok(data.connection),
            )
            .await?;

        graphql::search_results(nodes, kind)
    }
}
