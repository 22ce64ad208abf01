//! Intake commands

use std::sync::Arc;

use chrono::Local;
use colored::Colorize;
use lead_intake::{
    validate as validate_draft, BusinessField, CurrentUserProvider, EnvUserProvider, FormAction, FormStateStore,
    HttpLeadGateway, IntakeSession, LeadDraft, LeadId, SubmissionClient, normalize_prefix,
};
use serde::Serialize;

use super::{Context, DraftArgs};
use crate::output::OutputFormat;

#[derive(Debug, Serialize)]
struct GeneratedId {
    lead_id: String,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    lead_id: String,
    valid: bool,
    code: Option<&'static str>,
    message: Option<String>,
}

pub fn new_id(ctx: &Context, prefix: Option<&str>, format: OutputFormat) -> Result<(), String> {
    let prefix = resolve_prefix(ctx, prefix)?;
    let lead_id = LeadId::generate(&prefix, &Local::now());
    match format {
        OutputFormat::Table => println!("{}", lead_id),
        _ => format.print(&GeneratedId { lead_id: lead_id.to_string() }),
    }
    Ok(())
}

pub fn validate(ctx: &Context, args: DraftArgs, format: OutputFormat) -> Result<(), String> {
    let draft = build_draft(ctx, args)?;
    let error = validate_draft(&draft);

    let report = ValidationReport {
        lead_id: draft.lead_id().to_string(),
        valid: error.is_none(),
        code: error.map(|e| e.code()),
        message: error.map(|e| e.to_string()),
    };
    match (format, error) {
        (OutputFormat::Table, None) => println!("{} {}", "valid".green().bold(), report.lead_id),
        (OutputFormat::Table, Some(_)) => {}
        _ => format.print(&report),
    }

    match error {
        Some(e) => Err(e.to_string()),
        None => Ok(()),
    }
}

pub async fn submit(ctx: &Context, args: DraftArgs, dry_run: bool, format: OutputFormat) -> Result<(), String> {
    let gateway = Arc::new(HttpLeadGateway::from_global());
    let client = SubmissionClient::detached(gateway);

    if dry_run {
        let draft = build_draft(ctx, args)?;
        let payload = client.build_payload(&draft).map_err(|e| e.user_message())?;
        format.print(&payload);
        return Ok(());
    }

    let session = IntakeSession::mount(&ctx.intake, &EnvUserProvider, client);
    for action in args.into_actions()? {
        session.dispatch(action).map_err(|e| e.to_string())?;
    }

    let token = ctx.token.as_deref().unwrap_or_default();
    let created = session.submit(token).await.map_err(|e| e.user_message())?;

    match format {
        OutputFormat::Table => {
            println!("{} {}", "Created lead".green().bold(), created.lead_id);
            if let Some(record_id) = &created.record_id {
                println!("Record: {}", record_id);
            }
        }
        _ => format.print(&created),
    }
    Ok(())
}

/// `--prefix` when given, rejected unless it normalizes cleanly
fn resolve_prefix(ctx: &Context, prefix: Option<&str>) -> Result<String, String> {
    match prefix {
        Some(raw) => normalize_prefix(raw).ok_or_else(|| format!("--prefix must be letters and '-', got {:?}", raw)),
        None => Ok(ctx.intake.lead_prefix.clone()),
    }
}

/// Mount a fresh draft and apply the arguments to it
fn build_draft(ctx: &Context, args: DraftArgs) -> Result<LeadDraft, String> {
    let mut store = FormStateStore::new(&ctx.intake.lead_prefix, &Local::now());
    if let Some(user) = EnvUserProvider.current_user() {
        store.set_business(BusinessField::AssignedTo, user.id);
    }
    for action in args.into_actions()? {
        apply(&mut store, action)?;
    }
    Ok(store.draft().clone())
}

fn apply(store: &mut FormStateStore, action: FormAction) -> Result<(), String> {
    tracing::debug!("Applying {:?}", action);
    store.dispatch(action).map_err(|e| e.to_string())
}
