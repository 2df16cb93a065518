//! Service version commands

use anyhow::Result;
use serde_json::json;

use super::Context;
use crate::api::Version;
use crate::cli::{ServiceVersionAction, ServiceVersionCommand, VersionArgs};
use crate::service::service_details;

pub async fn run(cmd: ServiceVersionCommand, ctx: &Context) -> Result<()> {
    match cmd.action {
        ServiceVersionAction::List => list(ctx).await,
        ServiceVersionAction::Clone { version } => clone(ctx, &version).await,
        ServiceVersionAction::Update { target, comment } => update(ctx, &target, &comment).await,
        ServiceVersionAction::Activate { target } => activate(ctx, &target).await,
        ServiceVersionAction::Deactivate { version } => deactivate(ctx, &version).await,
        ServiceVersionAction::Lock { version } => lock(ctx, &version).await,
    }
}

fn summary(v: &Version) -> serde_json::Value {
    json!({
        "number": v.number,
        "active": v.active,
        "locked": v.locked,
        "deployed": v.deployed,
        "comment": v.comment,
        "last_edited": v.updated_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
    })
}

async fn list(ctx: &Context) -> Result<()> {
    let service_id = ctx.service_id().await?;
    tracing::info!(%service_id, "listing service versions");

    let mut versions = ctx
        .api
        .list_versions(&service_id)
        .await
        .map_err(|e| ctx.api_failure(e, "error listing service versions", &service_id, None))?;
    versions.sort_by_key(|v| v.number);

    ctx.out.result(json!({
        "success": true,
        "service_id": service_id,
        "count": versions.len(),
        "versions": versions.iter().map(summary).collect::<Vec<_>>()
    }));

    Ok(())
}

async fn clone(ctx: &Context, version: &str) -> Result<()> {
    let details = service_details(ctx.read_opts(version)).await?;
    let from = details.version.number;

    let cloned = ctx
        .api
        .clone_version(&details.service_id, from)
        .await
        .map_err(|e| ctx.api_failure(e, "error cloning service version", &details.service_id, Some(from)))?;

    ctx.success(
        &format!(
            "Cloned service {} version {} to version {}",
            details.service_id, from, cloned.number
        ),
        json!({ "service_id": details.service_id, "from": from, "version": cloned.number }),
    );
    Ok(())
}

async fn update(ctx: &Context, target: &VersionArgs, comment: &str) -> Result<()> {
    let details = service_details(ctx.write_opts(target)).await?;
    let number = details.version.number;

    let updated = ctx
        .api
        .update_version(&details.service_id, number, comment)
        .await
        .map_err(|e| ctx.api_failure(e, "error updating service version", &details.service_id, Some(number)))?;

    ctx.success(
        &format!("Updated service {} version {}", details.service_id, updated.number),
        json!({ "service_id": details.service_id, "version": summary(&updated) }),
    );
    Ok(())
}

async fn activate(ctx: &Context, target: &VersionArgs) -> Result<()> {
    // Locked versions may be re-activated, so only --autoclone changes the target.
    let details = service_details(ctx.opts(&target.version, target.autoclone, true)).await?;
    let number = details.version.number;

    let activated = ctx
        .api
        .activate_version(&details.service_id, number)
        .await
        .map_err(|e| ctx.api_failure(e, "error activating service version", &details.service_id, Some(number)))?;

    ctx.success(
        &format!("Activated service {} version {}", details.service_id, activated.number),
        json!({ "service_id": details.service_id, "version": activated.number }),
    );
    Ok(())
}

async fn deactivate(ctx: &Context, version: &str) -> Result<()> {
    let details = service_details(ctx.read_opts(version)).await?;
    let number = details.version.number;

    let deactivated = ctx
        .api
        .deactivate_version(&details.service_id, number)
        .await
        .map_err(|e| ctx.api_failure(e, "error deactivating service version", &details.service_id, Some(number)))?;

    ctx.success(
        &format!("Deactivated service {} version {}", details.service_id, deactivated.number),
        json!({ "service_id": details.service_id, "version": deactivated.number }),
    );
    Ok(())
}

async fn lock(ctx: &Context, version: &str) -> Result<()> {
    let details = service_details(ctx.read_opts(version)).await?;
    let number = details.version.number;

    let locked = ctx
        .api
        .lock_version(&details.service_id, number)
        .await
        .map_err(|e| ctx.api_failure(e, "error locking service version", &details.service_id, Some(number)))?;

    ctx.success(
        &format!("Locked service {} version {}", details.service_id, locked.number),
        json!({ "service_id": details.service_id, "version": locked.number }),
    );
    Ok(())
}
