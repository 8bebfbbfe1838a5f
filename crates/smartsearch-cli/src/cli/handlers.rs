use super::render;
use anyhow::{bail, Context, Result};
use smartsearch::api::SmartSearchApi;
use smartsearch::identity::FilterId;
use smartsearch::model::{
    Filter, FilterConfig, FilterKind, Operation, TargetRef, TargetSpecification,
};
use smartsearch::session::TargetEditingSession;
use smartsearch::store::fs::FileTargetStore;
use std::path::Path;

pub struct AppContext {
    pub api: SmartSearchApi<FileTargetStore>,
    pub pretty: bool,
}

pub async fn show(ctx: &AppContext, target: TargetRef) -> Result<String> {
    let session = ctx.api.open_session(target).await?;
    let out = render::filters(&target, session.filters())?;
    session.close();
    Ok(out)
}

pub async fn add(
    ctx: &AppContext,
    target: TargetRef,
    kind: FilterKind,
    op: Option<Operation>,
    config: Option<&str>,
) -> Result<String> {
    let mut session = ctx.api.open_session(target).await?;
    session.select_kind(kind)?;
    submit_form(&mut session, op, config)?;
    let saved = ctx.api.save_session(&mut session).await?;
    Ok(render::success(format!(
        "Added {kind} filter at position {} for {target}",
        saved.len()
    )))
}

pub async fn edit(
    ctx: &AppContext,
    target: TargetRef,
    position: usize,
    op: Option<Operation>,
    config: Option<&str>,
) -> Result<String> {
    if op.is_none() && config.is_none() {
        bail!("Nothing to change: pass --op and/or --config");
    }
    let mut session = ctx.api.open_session(target).await?;
    let id = resolve_position(&session, position)?;
    session.select_existing(id)?;
    let kind = submit_form(&mut session, op, config)?;
    ctx.api.save_session(&mut session).await?;
    Ok(render::success(format!(
        "Updated {kind} filter at position {position} for {target}"
    )))
}

pub async fn delete(ctx: &AppContext, target: TargetRef, position: usize) -> Result<String> {
    let mut session = ctx.api.open_session(target).await?;
    let id = resolve_position(&session, position)?;
    let removed = session.delete_filter(id)?;
    ctx.api.save_session(&mut session).await?;
    Ok(render::success(format!(
        "Removed {} filter at position {position} for {target}",
        removed.kind()
    )))
}

pub async fn compile(ctx: &AppContext, file: &Path) -> Result<String> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let spec = TargetSpecification::from_json(&json)
        .with_context(|| format!("Invalid specification in {}", file.display()))?;
    for filter in &spec {
        filter.validate()?;
    }
    let mut out = if ctx.pretty {
        spec.to_json_pretty()?
    } else {
        spec.to_json()?
    };
    out.push('\n');
    Ok(out)
}

pub fn kinds(ctx: &AppContext) -> String {
    render::kinds(ctx.api.kinds())
}

/// Applies the command-line overrides to the session's form and submits it.
fn submit_form(
    session: &mut TargetEditingSession,
    op: Option<Operation>,
    config: Option<&str>,
) -> Result<FilterKind> {
    let Some(mut filter): Option<Filter> = session.form_filter() else {
        bail!("No filter selected");
    };
    let kind = filter.kind();
    if let Some(op) = op {
        filter.op = op;
    }
    if let Some(raw) = config {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("--config is not valid JSON")?;
        filter.config = FilterConfig::from_value(kind, value)?;
    }
    session.submit_editing(filter)?;
    Ok(kind)
}

fn resolve_position(session: &TargetEditingSession, position: usize) -> Result<FilterId> {
    match position
        .checked_sub(1)
        .and_then(|index| session.filters().get(index))
    {
        Some(entry) => Ok(entry.id()),
        None => bail!("No filter at position {position}"),
    }
}
