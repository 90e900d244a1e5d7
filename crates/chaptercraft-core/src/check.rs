//! Consistency check report.

use serde::Serialize;

use crate::dialogue::DialogueDetector;
use crate::models::{Paragraph, Status};
use crate::status::status_of;

/// Paragraph numbers listed before the report truncates.
const LIST_LIMIT: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub total: usize,
    pub untranslated: usize,
    pub skipped: usize,
    /// 1-based numbers of untranslated paragraphs containing dialogue.
    pub untranslated_dialogue: Vec<usize>,
}

pub fn check(paragraphs: &[Paragraph], dialogue: &dyn DialogueDetector) -> CheckReport {
    let mut report = CheckReport {
        total: paragraphs.len(),
        untranslated: 0,
        skipped: 0,
        untranslated_dialogue: Vec::new(),
    };
    for (i, p) in paragraphs.iter().enumerate() {
        match status_of(p) {
            Status::Untranslated => {
                report.untranslated += 1;
                if dialogue.has_dialogue(&p.original) {
                    report.untranslated_dialogue.push(i + 1);
                }
            }
            Status::Skipped => report.skipped += 1,
            Status::Done => {}
        }
    }
    report
}

impl CheckReport {
    /// Titled sections for display.
    pub fn sections(&self) -> Vec<(String, String)> {
        let mut sections = vec![(
            "Overview".to_string(),
            format!(
                "Total: {}\nUntranslated: {}\nSkipped: {}",
                self.total, self.untranslated, self.skipped
            ),
        )];
        if !self.untranslated_dialogue.is_empty() {
            let listed: Vec<String> = self
                .untranslated_dialogue
                .iter()
                .take(LIST_LIMIT)
                .map(|n| n.to_string())
                .collect();
            let more = if self.untranslated_dialogue.len() > LIST_LIMIT {
                "…"
            } else {
                ""
            };
            sections.push((
                "Untranslated dialogue".to_string(),
                format!("Paragraphs: {}{}", listed.join(", "), more),
            ));
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::QuoteDialogueDetector;

    #[test]
    fn test_check_counts() {
        let mut ps = vec![
            Paragraph::new("“Hi,” she said."),
            Paragraph::new("Plain."),
            Paragraph::new("— Go!"),
            Paragraph::new("“Done.”"),
        ];
        ps[1].skipped = true;
        ps[3].translation = "Fertig.".into();
        let report = check(&ps, &QuoteDialogueDetector);
        assert_eq!(report.total, 4);
        assert_eq!(report.untranslated, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.untranslated_dialogue, [1, 3]);

        let sections = report.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].1, "Paragraphs: 1, 3");
    }

    #[test]
    fn test_check_truncates_list() {
        let ps: Vec<Paragraph> = (0..85).map(|_| Paragraph::new("«x»")).collect();
        let report = check(&ps, &QuoteDialogueDetector);
        let body = &report.sections()[1].1;
        assert!(body.ends_with("80…"));
    }

    #[test]
    fn test_check_no_dialogue_section() {
        let report = check(&[Paragraph::new("a")], &QuoteDialogueDetector);
        assert_eq!(report.sections().len(), 1);
    }
}
