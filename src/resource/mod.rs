//! Resource dispatch layer
//!
//! Maps a (kind, action) pair to its handler. The dispatch is an explicit
//! match: a pair without a handler is an [`SyncError::UnsupportedOperation`],
//! never a silent no-op.
//!
//! - [`filter`] - per-kind field projections for both sync directions
//! - [`pull`] - read remote instances into local JSON files
//! - [`push`] - create/update/validate remote instances from local files

pub mod filter;
mod pull;
mod push;

use crate::api::ApiClient;
use crate::config::Direction;
use crate::error::SyncError;
use crate::store::FileStore;
use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;

/// The eight supported configuration-object categories.
///
/// The value names double as the local directory names, so files land where
/// the CLI arguments say they will.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Dashboards,
    Monitors,
    Users,
    #[value(name = "synthetics_api_tests")]
    SyntheticsApiTests,
    #[value(name = "synthetics_browser_tests")]
    SyntheticsBrowserTests,
    Awsaccounts,
    Logpipelines,
    Notebooks,
}

impl ResourceKind {
    /// Local directory holding this kind's files.
    pub fn dir(self) -> &'static str {
        match self {
            ResourceKind::Dashboards => "dashboards",
            ResourceKind::Monitors => "monitors",
            ResourceKind::Users => "users",
            ResourceKind::SyntheticsApiTests => "synthetics_api_tests",
            ResourceKind::SyntheticsBrowserTests => "synthetics_browser_tests",
            ResourceKind::Awsaccounts => "awsaccounts",
            ResourceKind::Logpipelines => "logpipelines",
            ResourceKind::Notebooks => "notebooks",
        }
    }
}

/// The four CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pull,
    Push,
    Edit,
    Validate,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Pull => "pull",
            Action::Push => "push",
            Action::Edit => "edit",
            Action::Validate => "validate",
        }
    }

    /// push writes into the destination account; everything else reads the
    /// source account.
    pub fn direction(self) -> Direction {
        match self {
            Action::Push => Direction::Write,
            _ => Direction::Read,
        }
    }
}

/// The two synthetic test flavors share the list endpoint but differ in the
/// detail endpoint and local directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticFlavor {
    Api,
    Browser,
}

impl SyntheticFlavor {
    /// Value of the `type` field on the list response.
    pub fn test_type(self) -> &'static str {
        match self {
            SyntheticFlavor::Api => "api",
            SyntheticFlavor::Browser => "browser",
        }
    }

    pub fn dir(self) -> &'static str {
        match self {
            SyntheticFlavor::Api => "synthetics_api_tests",
            SyntheticFlavor::Browser => "synthetics_browser_tests",
        }
    }

    pub fn detail_path(self, public_id: &str) -> String {
        match self {
            SyntheticFlavor::Api => format!("synthetics/tests/{public_id}"),
            SyntheticFlavor::Browser => format!("synthetics/tests/browser/{public_id}"),
        }
    }
}

/// Everything a handler needs, passed explicitly - no global argument state.
pub struct RunContext {
    pub client: ApiClient,
    pub store: FileStore,
    pub dry_run: bool,
    pub tags: Vec<String>,
}

/// Run one (kind, action) pair to completion.
pub async fn run(kind: ResourceKind, action: Action, ctx: &RunContext) -> Result<()> {
    match action {
        Action::Pull => match kind {
            ResourceKind::Dashboards => pull::dashboards(ctx).await,
            ResourceKind::Monitors => pull::monitors(ctx).await,
            ResourceKind::Users => pull::users(ctx).await,
            ResourceKind::SyntheticsApiTests => {
                pull::synthetics(ctx, SyntheticFlavor::Api).await
            }
            ResourceKind::SyntheticsBrowserTests => {
                pull::synthetics(ctx, SyntheticFlavor::Browser).await
            }
            ResourceKind::Awsaccounts => pull::awsaccounts(ctx).await,
            ResourceKind::Logpipelines => pull::logpipelines(ctx).await,
            ResourceKind::Notebooks => pull::notebooks(ctx).await,
        },
        Action::Push => match kind {
            ResourceKind::Dashboards => push::dashboards(ctx).await,
            ResourceKind::Monitors => push::monitors(ctx).await,
            ResourceKind::Users => push::users(ctx).await,
            ResourceKind::SyntheticsApiTests => {
                push::synthetics(ctx, SyntheticFlavor::Api).await
            }
            ResourceKind::SyntheticsBrowserTests => {
                push::synthetics(ctx, SyntheticFlavor::Browser).await
            }
            ResourceKind::Awsaccounts => push::awsaccounts(ctx).await,
            ResourceKind::Logpipelines => push::logpipelines(ctx).await,
            ResourceKind::Notebooks => push::notebooks(ctx).await,
        },
        Action::Edit => match kind {
            ResourceKind::Monitors => push::edit_monitors(ctx).await,
            _ => Err(unsupported(action, kind)),
        },
        Action::Validate => match kind {
            ResourceKind::Monitors => push::validate_monitors(ctx).await,
            _ => Err(unsupported(action, kind)),
        },
    }
}

fn unsupported(action: Action, kind: ResourceKind) -> anyhow::Error {
    SyncError::UnsupportedOperation {
        action: action.name().to_string(),
        kind: kind.dir().to_string(),
    }
    .into()
}

/// Identifier fields arrive as strings (dashboards, users, synthetics) or
/// numbers (monitors, notebooks); file names need a string either way.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Best-effort display text for a field, for narrative output.
pub(crate) fn text<'a>(doc: &'a Value, key: &str) -> &'a str {
    doc.get(key).and_then(Value::as_str).unwrap_or("")
}
