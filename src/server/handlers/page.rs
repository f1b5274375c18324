//! Page handlers: render, analyze form and file upload.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;

use super::super::template_structs::IndexTemplate;
use super::super::AppState;
use crate::analysis::{AnalysisSession, Notification, NotificationReceiver, Notifier, UploadedFile};

/// Analyze form body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
}

fn new_session(text: String) -> (AnalysisSession, NotificationReceiver) {
    let (notifier, rx) = Notifier::channel();
    (AnalysisSession::new(notifier).with_text(text), rx)
}

fn render(
    state: &AppState,
    session: &AnalysisSession,
    notifications: Vec<Notification>,
) -> Html<String> {
    let template = IndexTemplate::from_session(session, notifications, state.max_upload_bytes);
    match template.render() {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            Html(format!("Template error: {}", e))
        }
    }
}

/// Empty page.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let (session, _rx) = new_session(String::new());
    render(&state, &session, Vec::new())
}

/// Run the analysis on the submitted text and re-render.
pub async fn analyze_form(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> impl IntoResponse {
    let (mut session, mut rx) = new_session(form.text);
    // Failures are reported through the notification channel
    let _ = session.analyze(&state.analyzer).await;
    render(&state, &session, rx.drain())
}

/// Load an uploaded text file into the input and re-render.
///
/// On rejection the submitted text is kept and an error toast is shown.
pub async fn upload_form(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut text = String::new();
    let mut file: Option<UploadedFile> = None;
    let mut read_error = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                read_error = Some(e.to_string());
                break;
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => match field.text().await {
                Ok(value) => text = value,
                Err(e) => {
                    read_error = Some(e.to_string());
                    break;
                }
            },
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        // Browsers send an empty part when no file was chosen
                        if file_name.as_deref().is_some_and(|n| !n.is_empty()) || !bytes.is_empty()
                        {
                            file = Some(UploadedFile {
                                file_name,
                                content_type,
                                bytes: bytes.to_vec(),
                            });
                        }
                    }
                    Err(e) => {
                        read_error = Some(e.to_string());
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    let (mut session, mut rx) = new_session(text);

    if let Some(err) = read_error {
        tracing::warn!("Failed to read upload: {}", err);
        let mut notes = rx.drain();
        notes.push(Notification::error(
            "Upload Failed",
            "The file could not be read. It may be too large.",
        ));
        return render(&state, &session, notes);
    }

    match file {
        Some(file) => {
            tracing::info!(
                file = file.file_name.as_deref().unwrap_or("<unnamed>"),
                bytes = file.bytes.len(),
                "File uploaded"
            );
            // Rejections are reported through the notification channel
            let _ = session.load_file(&file);
        }
        None => tracing::debug!("Upload without a file"),
    }

    render(&state, &session, rx.drain())
}
