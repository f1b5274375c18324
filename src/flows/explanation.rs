//! Structure of a bias explanation.
//!
//! The bias prompt asks for `**Title**` lines, each followed by its
//! explanation, then free-form concluding paragraphs. Paragraphs keep their
//! document order: lines before the first title are a preamble, lines under
//! a title belong to that section, and only the lines after the last
//! section's first paragraph count as the conclusion.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::utils::html_escape;

/// One detected bias category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BiasSection {
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl BiasSection {
    /// Paragraphs as escaped HTML with `**bold**` spans converted.
    pub fn paragraphs_html(&self) -> Vec<String> {
        self.paragraphs.iter().map(|p| inline_html(p)).collect()
    }
}

/// A bias explanation split into an optional preamble, titled sections and
/// closing paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BiasExplanation {
    pub preamble: Vec<String>,
    pub sections: Vec<BiasSection>,
    pub conclusion: Vec<String>,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[-*•]\s+|\d+[.)]\s+)?\*\*([^*]+)\*\*(.*)$").expect("valid heading regex")
    })
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"))
}

/// Split a line into (title, same-line body) if it opens a section.
fn split_heading(line: &str) -> Option<(String, String)> {
    let caps = heading_re().captures(line)?;
    let raw_title = caps[1].trim();
    let rest = caps[2].trim();

    let (title, body) = if let Some(title) = raw_title.strip_suffix(':') {
        (title.trim(), rest)
    } else if rest.is_empty() {
        (raw_title, rest)
    } else {
        // "**Title**: body" or "**Title** - body"; "**Overall**, ..." is prose
        let body = rest
            .strip_prefix(':')
            .or_else(|| rest.strip_prefix('-'))
            .or_else(|| rest.strip_prefix('–'))
            .or_else(|| rest.strip_prefix('—'))?;
        (raw_title, body.trim())
    };

    if title.is_empty() {
        return None;
    }
    Some((title.to_string(), body.to_string()))
}

impl BiasExplanation {
    /// Parse an explanation returned by the bias flow.
    pub fn parse(text: &str) -> Self {
        let mut explanation = Self::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some((title, body)) = split_heading(line) {
                let paragraphs = if body.is_empty() { Vec::new() } else { vec![body] };
                explanation.sections.push(BiasSection { title, paragraphs });
                continue;
            }
            match explanation.sections.last_mut() {
                Some(section) => section.paragraphs.push(line.to_string()),
                None => explanation.preamble.push(line.to_string()),
            }
        }

        // The last section keeps one paragraph; what follows closes the text
        if let Some(last) = explanation.sections.last_mut() {
            if last.paragraphs.len() > 1 {
                explanation.conclusion = last.paragraphs.split_off(1);
            }
        }

        explanation
    }

    /// Whether the explanation names at least one bias category.
    pub fn has_sections(&self) -> bool {
        !self.sections.is_empty()
    }

    /// Preamble paragraphs as escaped HTML.
    pub fn preamble_html(&self) -> Vec<String> {
        self.preamble.iter().map(|p| inline_html(p)).collect()
    }

    /// Concluding paragraphs as escaped HTML.
    pub fn conclusion_html(&self) -> Vec<String> {
        self.conclusion.iter().map(|p| inline_html(p)).collect()
    }
}

/// Escape `text` and turn `**bold**` spans into `<strong>`.
pub fn inline_html(text: &str) -> String {
    bold_re()
        .replace_all(&html_escape(text), "<strong>$1</strong>")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_section_no_conclusion() {
        let parsed = BiasExplanation::parse("**Gender Bias**\nExplanation...");
        assert_eq!(
            parsed.sections,
            vec![BiasSection {
                title: "Gender Bias".to_string(),
                paragraphs: vec!["Explanation...".to_string()],
            }]
        );
        assert!(parsed.conclusion.is_empty());
        assert!(parsed.has_sections());
    }

    #[test]
    fn test_sections_then_conclusion() {
        let text = "**Gender Bias**\nAssumes engineers are men.\n\n\
                    **Age Bias**\nDismisses older workers.\n\n\
                    Overall the author writes from a narrow vantage point.";
        let parsed = BiasExplanation::parse(text);
        assert_eq!(parsed.sections.len(), 2);
        assert_eq!(parsed.sections[1].title, "Age Bias");
        assert_eq!(parsed.sections[1].paragraphs, vec!["Dismisses older workers."]);
        assert_eq!(
            parsed.conclusion,
            vec!["Overall the author writes from a narrow vantage point."]
        );
    }

    #[test]
    fn test_inline_titles() {
        let text = "1. **Confirmation Bias**: Only cites agreeing sources.\n\
                    - **Framing Bias:** Loaded words.\n\
                    **Political Bias** - Partisan labels.";
        let parsed = BiasExplanation::parse(text);
        let titles: Vec<_> = parsed.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Confirmation Bias", "Framing Bias", "Political Bias"]);
        assert_eq!(parsed.sections[0].paragraphs, vec!["Only cites agreeing sources."]);
        assert_eq!(parsed.sections[1].paragraphs, vec!["Loaded words."]);
        assert_eq!(parsed.sections[2].paragraphs, vec!["Partisan labels."]);
        assert!(parsed.conclusion.is_empty());
    }

    #[test]
    fn test_bold_prose_is_not_a_heading() {
        let parsed = BiasExplanation::parse("**Overall**, the text is balanced.");
        assert!(!parsed.has_sections());
        assert_eq!(parsed.preamble, vec!["**Overall**, the text is balanced."]);
        assert!(parsed.conclusion.is_empty());
    }

    #[test]
    fn test_neutral_text() {
        let parsed = BiasExplanation::parse(
            "The text reports facts with sources.\nNo loaded language is used.",
        );
        assert!(!parsed.has_sections());
        assert_eq!(parsed.preamble.len(), 2);
    }

    #[test]
    fn test_preamble_then_section() {
        let parsed =
            BiasExplanation::parse("Some bias is present.\n**Racial Bias**\nStereotypes.");
        assert_eq!(parsed.preamble, vec!["Some bias is present."]);
        assert_eq!(parsed.sections[0].paragraphs, vec!["Stereotypes."]);
        assert!(parsed.conclusion.is_empty());
    }

    #[test]
    fn test_multi_paragraph_section_keeps_order() {
        let parsed = BiasExplanation::parse(
            "**Gender Bias**\nFirst para.\nSecond para about gender.\n\
             **Age Bias**\nAge para.\nConclusion.",
        );
        assert_eq!(
            parsed.sections[0].paragraphs,
            vec!["First para.", "Second para about gender."]
        );
        assert_eq!(parsed.sections[1].paragraphs, vec!["Age para."]);
        assert_eq!(parsed.conclusion, vec!["Conclusion."]);
        assert!(parsed.preamble.is_empty());
    }

    #[test]
    fn test_inline_body_then_conclusion() {
        let parsed = BiasExplanation::parse("**Framing Bias**: Loaded words.\nOverall mild.");
        assert_eq!(parsed.sections[0].paragraphs, vec!["Loaded words."]);
        assert_eq!(parsed.conclusion, vec!["Overall mild."]);
    }

    #[test]
    fn test_inline_html_escapes() {
        assert_eq!(
            inline_html("<b>x</b> and **real bold**"),
            "&lt;b&gt;x&lt;/b&gt; and <strong>real bold</strong>"
        );
    }

    #[test]
    fn test_conclusion_html() {
        let parsed = BiasExplanation::parse("**A**\nbody\nA **key** point.");
        assert_eq!(parsed.conclusion_html(), vec!["A <strong>key</strong> point."]);
    }
}
