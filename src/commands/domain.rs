//! Domain management commands

use anyhow::Result;
use serde_json::json;

use super::Context;
use crate::cli::{DomainAction, DomainCommand, VersionArgs};
use crate::service::service_details;

pub async fn run(cmd: DomainCommand, ctx: &Context) -> Result<()> {
    match cmd.action {
        DomainAction::List { version } => list(ctx, &version).await,
        DomainAction::Create {
            target,
            name,
            comment,
        } => create(ctx, &target, &name, &comment).await,
        DomainAction::Delete { target, name } => delete(ctx, &target, &name).await,
    }
}

async fn list(ctx: &Context, version: &str) -> Result<()> {
    let details = service_details(ctx.read_opts(version)).await?;
    let number = details.version.number;

    let domains = ctx
        .api
        .list_domains(&details.service_id, number)
        .await
        .map_err(|e| ctx.api_failure(e, "error listing domains", &details.service_id, Some(number)))?;

    ctx.out.result(json!({
        "success": true,
        "service_id": details.service_id,
        "version": number,
        "count": domains.len(),
        "domains": domains.iter().map(|d| json!({
            "name": d.name,
            "comment": d.comment
        })).collect::<Vec<_>>()
    }));

    Ok(())
}

async fn create(ctx: &Context, target: &VersionArgs, name: &str, comment: &str) -> Result<()> {
    let details = service_details(ctx.write_opts(target)).await?;
    let number = details.version.number;

    tracing::info!(service_id = %details.service_id, version = number, domain = name, "creating domain");
    let domain = ctx
        .api
        .create_domain(&details.service_id, number, name, comment)
        .await
        .map_err(|e| ctx.api_failure(e, "error creating domain", &details.service_id, Some(number)))?;

    ctx.success(
        &format!(
            "Created domain {} (service {} version {})",
            domain.name, details.service_id, number
        ),
        json!({ "service_id": details.service_id, "version": number, "name": domain.name }),
    );
    Ok(())
}

async fn delete(ctx: &Context, target: &VersionArgs, name: &str) -> Result<()> {
    let details = service_details(ctx.write_opts(target)).await?;
    let number = details.version.number;

    tracing::info!(service_id = %details.service_id, version = number, domain = name, "deleting domain");
    ctx.api
        .delete_domain(&details.service_id, number, name)
        .await
        .map_err(|e| ctx.api_failure(e, "error deleting domain", &details.service_id, Some(number)))?;

    ctx.success(
        &format!(
            "Deleted domain {} (service {} version {})",
            name, details.service_id, number
        ),
        json!({ "service_id": details.service_id, "version": number, "name": name }),
    );
    Ok(())
}
