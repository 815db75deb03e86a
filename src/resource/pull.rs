//! Pull handlers
//!
//! Read remote instances from the source account, apply the pull projection,
//! and write one JSON file per instance. Each instance is an independent
//! operation: files already written stay on disk if a later call fails.

use super::filter;
use super::{id_string, text, RunContext, SyntheticFlavor};
use crate::error::SyncError;
use anyhow::Result;
use serde_json::Value;

fn array_field(response: &Value, key: &str) -> Vec<Value> {
    response
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// List dashboards, then fetch each one in full (the list response only
/// carries summaries).
pub async fn dashboards(ctx: &RunContext) -> Result<()> {
    let mut count = 0;

    let response = ctx.client.get("dashboard").await?;
    for dashboard in array_field(&response, "dashboards") {
        let Some(id) = dashboard.get("id").and_then(Value::as_str) else {
            continue;
        };
        let detail = ctx.client.get(&format!("dashboard/{id}")).await?;
        count += 1;
        let title = text(&dashboard, "title");
        if ctx.dry_run {
            println!("Pulling dashboard: {title} with id: {id} (dry-run, not writing)");
        } else {
            let path = ctx.store.write("dashboards", id, &detail)?;
            println!(
                "Pulling dashboard: {title} with id: {id}, writing to file: {}",
                path.display()
            );
        }
    }
    println!("Retrieved '{count}' dashboards.");
    Ok(())
}

/// The monitor list call is complete, so no detail fetches. Monitors backing
/// synthetic tests are excluded; everything else goes through the allow-list
/// projection.
pub async fn monitors(ctx: &RunContext) -> Result<()> {
    let mut count = 0;

    let response = ctx.client.get("monitor").await?;
    let monitors = response.as_array().cloned().unwrap_or_default();
    for monitor in &monitors {
        if monitor.get("type").and_then(Value::as_str) == Some(filter::SYNTHETICS_ALERT_TYPE) {
            println!(
                "Skipping {} as this is a monitor belonging to a synthetic test. \
                 Synthetic monitors will be automatically re-created when you push synthetic tests.",
                text(monitor, "name")
            );
            continue;
        }
        let Some(id) = monitor.get("id").and_then(id_string) else {
            continue;
        };
        let projected = filter::project(monitor, filter::MONITOR_PULL_FIELDS);
        count += 1;
        let name = text(monitor, "name");
        if ctx.dry_run {
            println!("Pulling monitor: {name} with id: {id} (dry-run, not writing)");
        } else {
            let path = ctx.store.write("monitors", &id, &projected)?;
            println!(
                "Pulling monitor: {name} with id: {id}, writing to file: {}",
                path.display()
            );
        }
    }
    println!("Retrieved '{count}' monitors.");
    Ok(())
}

/// List users and fetch each active one. Disabled users are not pulled.
pub async fn users(ctx: &RunContext) -> Result<()> {
    let mut count = 0;

    let response = ctx.client.get("user").await?;
    for user in array_field(&response, "users") {
        if user.get("disabled").and_then(Value::as_bool).unwrap_or(false) {
            continue;
        }
        let Some(handle) = user.get("handle").and_then(Value::as_str) else {
            continue;
        };
        let detail = ctx.client.get(&format!("user/{handle}")).await?;
        // The detail response nests the record under "user".
        let doc = detail.get("user").cloned().unwrap_or(detail);
        count += 1;
        let role = text(&user, "access_role");
        if ctx.dry_run {
            println!("Pulling user: {handle} with role: {role} (dry-run, not writing)");
        } else {
            let path = ctx.store.write("users", handle, &doc)?;
            println!(
                "Pulling user: {handle} with role: {role}, writing to file: {}",
                path.display()
            );
        }
    }
    println!("Retrieved '{count}' users.");
    Ok(())
}

/// Both synthetic flavors share the list endpoint; a test is pulled only when
/// its type matches the requested flavor and its tags intersect the supplied
/// tag set. Without `--tag` nothing matches.
pub async fn synthetics(ctx: &RunContext, flavor: SyntheticFlavor) -> Result<()> {
    let mut count = 0;

    let response = ctx.client.get("synthetics/tests").await?;
    for test in array_field(&response, "tests") {
        if test.get("type").and_then(Value::as_str) != Some(flavor.test_type()) {
            continue;
        }
        if !filter::tags_intersect(test.get("tags"), &ctx.tags) {
            continue;
        }
        let Some(public_id) = test.get("public_id").and_then(Value::as_str) else {
            continue;
        };
        let detail = ctx.client.get(&flavor.detail_path(public_id)).await?;
        count += 1;
        let name = text(&test, "name");
        if ctx.dry_run {
            println!("Pulling: {name} (dry-run, not writing)");
        } else {
            let path = ctx.store.write(flavor.dir(), public_id, &detail)?;
            println!("Pulling: {name} and writing to file: {}", path.display());
        }
    }
    println!("Retrieved '{count}' synthetic tests.");
    Ok(())
}

pub async fn awsaccounts(ctx: &RunContext) -> Result<()> {
    let mut count = 0;

    let response = ctx.client.get("integration/aws").await?;
    for account in array_field(&response, "accounts") {
        let Some(account_id) = account.get("account_id").and_then(Value::as_str) else {
            continue;
        };
        count += 1;
        if ctx.dry_run {
            println!("Pulling AWS account: {account_id} (dry-run, not writing)");
        } else {
            let path = ctx.store.write("awsaccounts", account_id, &account)?;
            println!(
                "Pulling AWS account: {account_id}, writing to file: {}",
                path.display()
            );
        }
    }
    println!("Retrieved '{count}' AWS accounts.");
    Ok(())
}

pub async fn logpipelines(ctx: &RunContext) -> Result<()> {
    let mut count = 0;

    let response = ctx.client.get("logs/config/pipelines").await?;
    let pipelines = response.as_array().cloned().unwrap_or_default();
    for pipeline in &pipelines {
        let Some(id) = pipeline.get("id").and_then(id_string) else {
            continue;
        };
        count += 1;
        let name = text(pipeline, "name");
        if ctx.dry_run {
            println!("Pulling log pipeline: {name} with id: {id} (dry-run, not writing)");
        } else {
            let path = ctx.store.write("logpipelines", &id, pipeline)?;
            println!(
                "Pulling log pipeline: {name} with id: {id}, writing to file: {}",
                path.display()
            );
        }
    }
    println!("Retrieved '{count}' log pipelines.");
    Ok(())
}

pub async fn notebooks(ctx: &RunContext) -> Result<()> {
    let mut count = 0;

    // The notebooks API sits behind an org feature flag; turn the permission
    // error into an actionable message instead of a bare status code.
    let response = match ctx.client.get("notebook").await {
        Ok(response) => response,
        Err(err) => {
            let feature_gated = matches!(
                err.downcast_ref::<SyncError>(),
                Some(SyncError::RemoteApi { detail, .. })
                    if detail.contains("You do not have permission")
            );
            if feature_gated {
                anyhow::bail!(
                    "Notebooks API (notebooks_api) feature flag is not enabled on this Datadog organisation."
                );
            }
            return Err(err);
        }
    };

    for notebook in array_field(&response, "notebooks") {
        let Some(id) = notebook.get("id").and_then(id_string) else {
            continue;
        };
        count += 1;
        let name = text(&notebook, "name");
        if ctx.dry_run {
            println!("Pulling notebook: {name} with id: {id} (dry-run, not writing)");
        } else {
            let path = ctx.store.write("notebooks", &id, &notebook)?;
            println!(
                "Pulling notebook: {name} with id: {id}, writing to file: {}",
                path.display()
            );
        }
    }
    println!("Retrieved '{count}' notebooks.");
    Ok(())
}
