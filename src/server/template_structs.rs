//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.

use askama::Template;

use crate::analysis::{AnalysisSession, Notification, NotificationLevel, ResultTab, UiState};
use crate::flows::explanation::inline_html;

/// Helper struct for result tab buttons.
pub struct TabView {
    pub id: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Helper struct for one bias category.
pub struct SectionView {
    pub title: String,
    pub paragraphs_html: Vec<String>,
}

/// Helper struct for a notification toast.
pub struct ToastView {
    pub level: &'static str,
    pub title: String,
    pub description: String,
}

impl From<Notification> for ToastView {
    fn from(n: Notification) -> Self {
        Self {
            level: match n.level {
                NotificationLevel::Info => "info",
                NotificationLevel::Error => "error",
            },
            title: n.title,
            description: n.description,
        }
    }
}

/// The single application page: input pane and tabbed results.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub state: &'static str,
    pub active_tab: &'static str,
    pub tabs: Vec<TabView>,
    pub toasts: Vec<ToastView>,
    pub has_result: bool,
    pub failed: bool,
    pub summary_html: Vec<String>,
    pub insights_html: Vec<String>,
    pub bias_detected: bool,
    pub bias_preamble_html: Vec<String>,
    pub bias_sections: Vec<SectionView>,
    pub bias_conclusion_html: Vec<String>,
    pub generated_at: String,
    pub max_upload_bytes: usize,
}

/// Split model prose into escaped HTML paragraphs.
fn paragraphs(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(inline_html)
        .collect()
}

impl<'a> IndexTemplate<'a> {
    pub fn from_session(
        session: &'a AnalysisSession,
        notifications: Vec<Notification>,
        max_upload_bytes: usize,
    ) -> Self {
        let active = session.active_tab();
        let tabs = ResultTab::ALL
            .into_iter()
            .map(|tab| TabView {
                id: tab.id(),
                label: tab.label(),
                active: tab == active,
            })
            .collect();

        let state = session.ui_state();
        let mut page = Self {
            title: "GenuinAI",
            text: session.text(),
            state: state.as_str(),
            active_tab: active.id(),
            tabs,
            toasts: notifications.into_iter().map(ToastView::from).collect(),
            has_result: false,
            failed: state == UiState::Error,
            summary_html: Vec::new(),
            insights_html: Vec::new(),
            bias_detected: false,
            bias_preamble_html: Vec::new(),
            bias_sections: Vec::new(),
            bias_conclusion_html: Vec::new(),
            generated_at: String::new(),
            max_upload_bytes,
        };

        if let Some(result) = session.result() {
            page.has_result = true;
            page.summary_html = paragraphs(&result.summary.summary);
            page.insights_html = paragraphs(&result.insights.analysis);
            page.bias_detected = result.bias_detected();
            page.bias_preamble_html = result.explanation.preamble_html();
            page.bias_sections = result
                .explanation
                .sections
                .iter()
                .map(|s| SectionView {
                    title: s.title.clone(),
                    paragraphs_html: s.paragraphs_html(),
                })
                .collect();
            page.bias_conclusion_html = result.explanation.conclusion_html();
            page.generated_at = result.generated_at.format("%Y-%m-%d %H:%M UTC").to_string();
        }

        page
    }
}
