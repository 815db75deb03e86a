//! Push, edit and validate handlers
//!
//! Read local files, apply the submit projection, and call the API once per
//! instance. A remote rejection is printed and counted and the loop moves on;
//! a transport failure aborts the rest of the kind's run. Nothing already
//! pushed is rolled back.

use super::filter::{
    DashboardCreate, MonitorCreate, MonitorValidate, UserCreate, LOG_PIPELINE_STRIP_FIELDS,
    SYNTHETIC_STRIP_FIELDS,
};
use super::{filter, id_string, text, RunContext, SyntheticFlavor};
use crate::api::http::is_api_rejection;
use crate::api::response_errors;
use anyhow::Result;
use serde_json::json;

/// Route one failed call: API rejections are reported inline and counted,
/// anything else propagates.
fn note_rejection(err: anyhow::Error, what: &str, err_count: &mut usize) -> Result<()> {
    if is_api_rejection(&err) {
        println!("Error {what}: {err}");
        *err_count += 1;
        Ok(())
    } else {
        Err(err)
    }
}

pub async fn dashboards(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("dashboards")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let title = text(doc, "title");
        println!("Pushing {title}");
        if ctx.dry_run {
            continue;
        }

        let create: DashboardCreate = match serde_json::from_value(doc.clone()) {
            Ok(create) => create,
            Err(err) => {
                println!("Error pushing dashboard {title}: {err}");
                err_count += 1;
                continue;
            }
        };
        let payload = serde_json::to_value(&create)?;

        match ctx.client.post("dashboard", Some(&payload)).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing dashboard {title}: {}", errors.join(", "));
                    err_count += 1;
                } else {
                    count += 1;
                }
            }
            Err(err) => {
                note_rejection(err, &format!("pushing dashboard {title}"), &mut err_count)?
            }
        }
    }

    println!("Pushed '{count}' dashboards.");
    if err_count > 0 {
        println!("Error pushing '{err_count}' dashboards, please check!");
    }
    Ok(())
}

pub async fn monitors(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("monitors")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let id = doc.get("id").and_then(id_string).unwrap_or_default();
        println!("Pushing monitor: {} {}", id, text(doc, "name"));
        if ctx.dry_run {
            continue;
        }

        let create: MonitorCreate = match serde_json::from_value(doc.clone()) {
            Ok(create) => create,
            Err(err) => {
                println!("Error pushing monitor {id}: {err}");
                err_count += 1;
                continue;
            }
        };
        let payload = serde_json::to_value(&create)?;

        match ctx.client.post("monitor", Some(&payload)).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing monitor {id}: {}", errors.join(", "));
                    err_count += 1;
                    continue;
                }
                // New monitors start muted so the destination account does
                // not alert before anyone has reviewed them. A rejected mute
                // is counted like any other per-instance failure.
                if let Some(new_id) = response.get("id").and_then(id_string) {
                    if let Err(err) = ctx
                        .client
                        .post(&format!("monitor/{new_id}/mute"), None)
                        .await
                    {
                        note_rejection(err, &format!("muting monitor {new_id}"), &mut err_count)?;
                        continue;
                    }
                }
                count += 1;
            }
            Err(err) => note_rejection(err, &format!("pushing monitor {id}"), &mut err_count)?,
        }
    }

    if count > 0 {
        println!(
            "Pushed '{count}' monitors in muted status, navigate to Monitors -> Manage downtime to unmute."
        );
    }
    if err_count > 0 {
        println!("Error pushing '{err_count}' monitors, please check!");
    }
    Ok(())
}

/// Update existing monitors in place, matched by the id in each local file.
pub async fn edit_monitors(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("monitors")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let Some(id) = doc.get("id").and_then(id_string) else {
            println!("Error editing monitor: local file has no id");
            err_count += 1;
            continue;
        };
        println!("Editing monitor: {} {}", id, text(doc, "name"));
        if ctx.dry_run {
            continue;
        }

        match ctx.client.put(&format!("monitor/{id}"), doc).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error editing monitor {id}: {}", errors.join(", "));
                    err_count += 1;
                } else {
                    count += 1;
                }
            }
            Err(err) => note_rejection(err, &format!("editing monitor {id}"), &mut err_count)?,
        }
    }

    if count > 0 {
        println!("Edited '{count}' monitors.");
    }
    if err_count > 0 {
        println!("Error editing '{err_count}' monitors, please check!");
    }
    Ok(())
}

/// Submit each monitor definition for a server-side check; nothing persists.
pub async fn validate_monitors(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("monitors")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let id = doc.get("id").and_then(id_string).unwrap_or_default();
        println!("Validating monitor: {} {}", id, text(doc, "name"));
        if ctx.dry_run {
            continue;
        }

        let validate: MonitorValidate = match serde_json::from_value(doc.clone()) {
            Ok(validate) => validate,
            Err(err) => {
                println!("Error validating monitor {id}: {err}");
                err_count += 1;
                continue;
            }
        };
        let payload = serde_json::to_value(&validate)?;

        match ctx.client.post("monitor/validate", Some(&payload)).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error validating monitor {id}: {}", errors.join(", "));
                    err_count += 1;
                } else {
                    count += 1;
                }
            }
            Err(err) => note_rejection(err, &format!("validating monitor {id}"), &mut err_count)?,
        }
    }

    if count > 0 {
        println!("Validated '{count}' monitors.");
    }
    if err_count > 0 {
        println!("Error validating '{err_count}' monitors, please check!");
    }
    Ok(())
}

pub async fn users(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("users")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let handle = text(doc, "handle").to_string();
        println!("Pushing: {handle}");
        if ctx.dry_run {
            continue;
        }

        let create: UserCreate = match serde_json::from_value(doc.clone()) {
            Ok(create) => create,
            Err(err) => {
                println!("Error pushing user {handle}: {err}");
                err_count += 1;
                continue;
            }
        };
        let payload = serde_json::to_value(&create)?;

        match ctx.client.post("user", Some(&payload)).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing user {handle}: {}", errors.join(", "));
                    err_count += 1;
                } else {
                    count += 1;
                }
            }
            Err(err) => note_rejection(err, &format!("pushing user {handle}"), &mut err_count)?,
        }
    }

    println!("Pushed '{count}' users.");
    if err_count > 0 {
        println!("Error pushing '{err_count}' users, please check!");
    }
    Ok(())
}

/// Both flavors post to the same create endpoint; only the local directory
/// differs. `public_id` and `monitor_id` are remote-assigned and never sent.
pub async fn synthetics(ctx: &RunContext, flavor: SyntheticFlavor) -> Result<()> {
    let docs = ctx.store.read_all(flavor.dir())?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let name = text(doc, "name").to_string();
        println!("Pushing {name}");
        if ctx.dry_run {
            continue;
        }

        let payload = filter::strip(doc, SYNTHETIC_STRIP_FIELDS);

        match ctx.client.post("synthetics/tests", Some(&payload)).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing synthetic test {name}: {}", errors.join(", "));
                    err_count += 1;
                } else {
                    count += 1;
                }
            }
            Err(err) => {
                note_rejection(err, &format!("pushing synthetic test {name}"), &mut err_count)?
            }
        }
    }

    println!("Pushed '{count}' synthetic tests.");
    if err_count > 0 {
        println!("Error pushing '{err_count}' synthetic tests, please check!");
    }
    Ok(())
}

/// The create response carries the AWS external-id material the operator
/// needs for onboarding, so it is captured under `awsaccounts.out/`.
pub async fn awsaccounts(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("awsaccounts")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let account_id = text(doc, "account_id").to_string();
        println!("Pushing {account_id}");
        if ctx.dry_run {
            continue;
        }

        match ctx.client.post("integration/aws", Some(doc)).await {
            Ok(mut response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing AWS account {account_id}: {}", errors.join(", "));
                    err_count += 1;
                    continue;
                }
                if let Some(obj) = response.as_object_mut() {
                    obj.insert("account_id".to_string(), json!(account_id));
                }
                println!("{}", serde_json::to_string(&response)?);
                ctx.store.write("awsaccounts.out", &account_id, &response)?;
                count += 1;
            }
            Err(err) => note_rejection(
                err,
                &format!("pushing AWS account {account_id}"),
                &mut err_count,
            )?,
        }
    }

    println!("Pushed '{count}' AWS accounts.");
    if count > 0 {
        println!(
            "You can now use the json files in the awsaccounts.out folder to automate the AWS External ID onboarding using AWS APIs."
        );
    }
    if err_count > 0 {
        println!("Error pushing '{err_count}' AWS accounts, please check!");
    }
    Ok(())
}

/// Pipelines are created without their remote-assigned fields; the original
/// id is re-attached to the response capture so the operator can map old
/// pipelines to new ones.
pub async fn logpipelines(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("logpipelines")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let Some(id) = doc.get("id").and_then(id_string) else {
            println!("Error pushing log pipeline: local file has no id");
            err_count += 1;
            continue;
        };
        println!("Pushing {id}");
        if ctx.dry_run {
            continue;
        }

        let payload = filter::strip(doc, LOG_PIPELINE_STRIP_FIELDS);

        match ctx
            .client
            .post("logs/config/pipelines", Some(&payload))
            .await
        {
            Ok(mut response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing log pipeline {id}: {}", errors.join(", "));
                    err_count += 1;
                    continue;
                }
                if let Some(obj) = response.as_object_mut() {
                    obj.insert("id".to_string(), json!(id));
                }
                ctx.store.write("logpipelines.out", &id, &response)?;
                count += 1;
            }
            Err(err) => note_rejection(err, &format!("pushing log pipeline {id}"), &mut err_count)?,
        }
    }

    println!("Pushed '{count}' log pipelines.");
    if err_count > 0 {
        println!("Error pushing '{err_count}' log pipelines, please check!");
    }
    Ok(())
}

pub async fn notebooks(ctx: &RunContext) -> Result<()> {
    let docs = ctx.store.read_all("notebooks")?;
    let mut count = 0;
    let mut err_count = 0;

    for doc in &docs {
        let name = text(doc, "name").to_string();
        println!("Pushing: {name}");
        if ctx.dry_run {
            continue;
        }

        match ctx.client.post("notebook", Some(doc)).await {
            Ok(response) => {
                if let Some(errors) = response_errors(&response) {
                    println!("Error pushing notebook {name}: {}", errors.join(", "));
                    err_count += 1;
                } else {
                    count += 1;
                }
            }
            Err(err) => note_rejection(err, &format!("pushing notebook {name}"), &mut err_count)?,
        }
    }

    println!("Pushed '{count}' notebooks.");
    if err_count > 0 {
        println!("Error pushing '{err_count}' notebooks, please check!");
    }
    Ok(())
}
