use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Uri},
    response::{IntoResponse, Response},
    Extension,
};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// How long a served export lingers before it is removed.
const REMOVE_AFTER: Duration = Duration::from_secs(1);

/// A bare `.xlsx` filename with no path components.
pub(super) fn is_export_name(name: &str) -> bool {
    name.len() > ".xlsx".len()
        && name.ends_with(".xlsx")
        && !name.contains(['/', '\\', '%'])
        && !name.contains("..")
}

/// Sends a generated workbook from the export dir as an attachment, then
/// deletes it shortly afterwards. Reached only when no static file matched.
pub(super) async fn download_export(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    uri: Uri,
) -> Response {
    let name = uri.path().trim_start_matches('/');
    let not_found = || ApiError::new(req_id.0.clone(), "not_found", "file not found").into_response();

    if !is_export_name(name) {
        return not_found();
    }

    let path = state.config.export_dir.join(name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to read export");
            }
            return not_found();
        }
    };

    tracing::info!(filename = name, bytes = bytes.len(), "serving generated export");
    schedule_removal(path);

    let mut response = Body::from(bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    response
}

fn schedule_removal(path: PathBuf) {
    tokio::spawn(async move {
        tokio::time::sleep(REMOVE_AFTER).await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "removed downloaded export"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove export"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::is_export_name;

    #[test]
    fn accepts_plain_workbook_names() {
        assert!(is_export_name("generated-coupons-2026-01-15-1768521599123.xlsx"));
    }

    #[test]
    fn rejects_paths_and_other_extensions() {
        for name in [
            "",
            ".xlsx",
            "../secret.xlsx",
            "nested/file.xlsx",
            "..%2Fsecret.xlsx",
            "win\\file.xlsx",
            "notes.txt",
        ] {
            assert!(!is_export_name(name), "{name} should be rejected");
        }
    }
}
