//! Bulk generation over server-sent events.
//!
//! The run is spawned onto its own task and reports through a channel, so it
//! keeps going (and still writes its export) if the page disconnects.

use std::path::PathBuf;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use bcc_export::{generation_filename, generation_sheet, write_xlsx, ExportError};
use bcc_generator::{
    run_generation, CouponOutcome, GenerationPolicy, GenerationReport, GenerationRequest,
};
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(super) enum StreamMessage {
    Result { data: CouponOutcome },
    Complete { stats: CompletionStats },
    Error { message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CompletionStats {
    created: u32,
    failed: u32,
    total: usize,
    filename: Option<String>,
    download_url: Option<String>,
}

pub(super) async fn generate_coupons(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    request
        .validate(state.config.max_batch)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_and_export(state, request, tx));

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|message| (message, rx))
    })
    .map(|message: StreamMessage| Event::default().json_data(&message));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

async fn run_and_export(
    state: AppState,
    request: GenerationRequest,
    tx: mpsc::UnboundedSender<StreamMessage>,
) {
    let policy = GenerationPolicy::with_create_delay_ms(state.config.create_delay_ms);
    let mut rng = StdRng::from_os_rng();

    let report = run_generation(
        state.client.as_ref(),
        &request,
        &policy,
        &mut rng,
        |outcome| send(&tx, StreamMessage::Result { data: outcome.clone() }),
    )
    .await;

    let filename = match export_report(state.config.export_dir.clone(), &report).await {
        Ok(filename) => Some(filename),
        Err(message) => {
            send(&tx, StreamMessage::Error { message });
            None
        }
    };

    send(
        &tx,
        StreamMessage::Complete {
            stats: CompletionStats {
                created: report.created,
                failed: report.failed,
                total: report.total(),
                download_url: filename.as_ref().map(|f| format!("/{f}")),
                filename,
            },
        },
    );
}

fn send(tx: &mpsc::UnboundedSender<StreamMessage>, message: StreamMessage) {
    if tx.send(message).is_err() {
        tracing::debug!("generation stream closed by client; run continues");
    }
}

/// Writes the run's outcomes to a fresh workbook in `export_dir` and returns
/// its filename.
async fn export_report(export_dir: PathBuf, report: &GenerationReport) -> Result<String, String> {
    let sheet = generation_sheet(&report.outcomes);
    let filename = generation_filename(Utc::now());

    let written = tokio::task::spawn_blocking(move || -> Result<String, ExportError> {
        std::fs::create_dir_all(&export_dir)?;
        write_xlsx(&sheet, &export_dir.join(&filename))?;
        Ok(filename)
    })
    .await;

    match written {
        Ok(Ok(filename)) => {
            tracing::info!(filename = %filename, rows = report.total(), "generation export written");
            Ok(filename)
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "failed to write generation export");
            Err(format!("failed to write export: {e}"))
        }
        Err(e) => {
            tracing::error!(error = %e, "generation export task failed");
            Err("failed to write export".to_string())
        }
    }
}
