//! GraphQL payloads and the response records they deserialize into.
//!
//! Every query aliases the connection it pages through as `connection`, so a
//! single `Connection<N>` record serves all of them.

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    types::{IssueLike, ItemKind, Repository},
};

pub const PAGE_SIZE: u32 = 100;

const PAGE_INFO: &str = "pageInfo { hasNextPage endCursor }";
const ITEM_FIELDS: &str = "number title url repository { nameWithOwner }";

/// Which of the viewer's repository connections to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affiliation {
    Owned,
    Contributed,
}

impl Affiliation {
    pub fn connection_field(&self) -> &'static str {
        match self {
            Affiliation::Owned => "repositories",
            Affiliation::Contributed => "repositoriesContributedTo",
        }
    }
}

pub fn viewer_repositories_query(affiliation: Affiliation) -> String {
    format!(
        r#"
        query($first: Int!, $after: String) {{
            viewer {{
                connection: {field}(first: $first, after: $after, orderBy: {{field: UPDATED_AT, direction: DESC}}) {{
                    nodes {{ nameWithOwner url }}
                    {PAGE_INFO}
                }}
            }}
        }}
        "#,
        field = affiliation.connection_field(),
    )
}

/// Open items of `owner/name`, addressed through the top-level `repository`
/// field.
pub fn repository_items_query(kind: ItemKind) -> String {
    format!(
        r#"
        query($owner: String!, $name: String!, $first: Int!, $after: String) {{
            repository(owner: $owner, name: $name) {{
                connection: {field}(states: OPEN, first: $first, after: $after, orderBy: {{field: UPDATED_AT, direction: DESC}}) {{
                    nodes {{ {ITEM_FIELDS} }}
                    {PAGE_INFO}
                }}
            }}
        }}
        "#,
        field = kind.connection_field(),
    )
}

/// Open items of a repository given by bare name, owned by the viewer.
pub fn viewer_repository_items_query(kind: ItemKind) -> String {
    format!(
        r#"
        query($name: String!, $first: Int!, $after: String) {{
            viewer {{
                repository(name: $name) {{
                    connection: {field}(states: OPEN, first: $first, after: $after, orderBy: {{field: UPDATED_AT, direction: DESC}}) {{
                        nodes {{ {ITEM_FIELDS} }}
                        {PAGE_INFO}
                    }}
                }}
            }}
        }}
        "#,
        field = kind.connection_field(),
    )
}

pub fn viewer_items_query(kind: ItemKind) -> String {
    format!(
        r#"
        query($first: Int!, $after: String) {{
            viewer {{
                connection: {field}(states: OPEN, first: $first, after: $after, orderBy: {{field: UPDATED_AT, direction: DESC}}) {{
                    nodes {{ {ITEM_FIELDS} }}
                    {PAGE_INFO}
                }}
            }}
        }}
        "#,
        field = kind.connection_field(),
    )
}

pub fn search_query() -> String {
    format!(
        r#"
        query($query: String!, $first: Int!, $after: String) {{
            connection: search(query: $query, type: ISSUE, first: $first, after: $after) {{
                nodes {{
                    __typename
                    ... on Issue {{ {ITEM_FIELDS} }}
                    ... on PullRequest {{ {ITEM_FIELDS} }}
                }}
                {PAGE_INFO}
            }}
        }}
        "#
    )
}

/// Top-level GraphQL envelope. GitHub answers `200 OK` with an `errors`
/// array for query-level failures, so both halves are checked.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<D> GraphQLResponse<D> {
    pub fn into_data(self) -> Result<D> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::Upstream(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| Error::upstream("response carried no data"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    pub nodes: Vec<N>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct HasConnection<N> {
    pub connection: Connection<N>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerData<N> {
    pub viewer: HasConnection<N>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryData<N> {
    pub repository: Option<HasConnection<N>>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerRepositoryData<N> {
    pub viewer: RepositoryData<N>,
}

pub type SearchData<N> = HasConnection<N>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name_with_owner: String,
    pub url: String,
}

impl From<RepositoryNode> for Repository {
    fn from(node: RepositoryNode) -> Self {
        Repository::new(node.name_with_owner, node.url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    pub name_with_owner: String,
}

/// An issue or pull request node. Fields are optional because search
/// results also contain node types this query selects nothing from; they
/// are validated in the conversions below.
#[derive(Debug, Deserialize)]
pub struct ItemNode {
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub repository: Option<RepositoryRef>,
}

impl ItemNode {
    pub fn is_kind(&self, kind: ItemKind) -> bool {
        self.typename.as_deref() == Some(kind.typename())
    }

    /// Item without repository context, for per-repository listings.
    pub fn into_item(self) -> Result<IssueLike> {
        let (number, title, url) = self.required_fields()?;
        Ok(IssueLike {
            number,
            repo: None,
            title,
            url,
        })
    }

    /// Item labelled with its repository, for listings across repositories.
    pub fn into_aggregated_item(self) -> Result<IssueLike> {
        let repo = self
            .repository
            .as_ref()
            .map(|r| r.name_with_owner.clone())
            .ok_or_else(|| Error::upstream("item is missing its repository"))?;
        let mut item = self.into_item()?;
        item.repo = Some(repo);
        Ok(item)
    }

    fn required_fields(self) -> Result<(u64, String, String)> {
        match (self.number, self.title, self.url) {
            (Some(number), Some(title), Some(url)) => Ok((number, title, url)),
            (number, _, _) => Err(Error::Upstream(format!(
                "item {} is missing number, title or url",
                number.map_or_else(|| "<unknown>".to_string(), |n| format!("#{n}"))
            ))),
        }
    }
}

/// Keeps the search nodes of `kind`; the search union can also hold other
/// node types.
pub fn search_results(nodes: Vec<ItemNode>, kind: ItemKind) -> Result<Vec<IssueLike>> {
    let total = nodes.len();
    let items = nodes
        .into_iter()
        .filter(|node| node.is_kind(kind))
        .map(ItemNode::into_aggregated_item)
        .collect::<Result<Vec<_>>>()?;

    if items.len() != total {
        debug!(
            skipped = total - items.len(),
            kind = kind.typename(),
            "search returned nodes of another type"
        );
    }
    Ok(items)
}
