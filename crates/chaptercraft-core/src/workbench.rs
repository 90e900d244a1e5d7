//! The workbench: the single owner of project state.
//!
//! Presentation code never touches fields directly; it reads through the
//! accessors and mutates through the methods here, which keep the focus
//! invariant (`focused_index < paragraphs.len()` whenever there are
//! paragraphs) and route every paragraph write through the
//! [`ParagraphStore`](crate::store::ParagraphStore) coupling rules.
//!
//! Destructive operations (`clear_all`, `restore_snapshot`,
//! `clear_glossary`, `clear_paragraph`) take a [`Confirmation`].

use tracing::info;

use crate::check::{check, CheckReport};
use crate::dialogue::{DialogueDetector, QuoteDialogueDetector};
use crate::error::{Confirmation, CoreError, Result};
use crate::export::{self, GlossaryPack, ProjectPack};
use crate::glossary::{self, GlossaryMatch, GlossaryMatcher, SubstringMatcher};
use crate::models::{
    FilterMode, Paragraph, Preferences, Project, SplitMode, ViewState, DEFAULT_PAGE_SIZE,
};
use crate::navigate::{next_match, next_unfinished, Direction, NavOutcome, UnfinishedOutcome};
use crate::schema::{PersistedRecord, CURRENT_SCHEMA_VERSION};
use crate::snapshot::{self, SnapshotHistory, SnapshotPayload, MAX_BACKUPS};
use crate::status::{matching_indexes, progress, Progress};
use crate::store::ParagraphEdit;

/// Sizing knobs supplied by the host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbenchSettings {
    pub max_backups: usize,
    pub page_size: usize,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            max_backups: MAX_BACKUPS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct Workbench {
    project: Project,
    preferences: Preferences,
    view: ViewState,
    snapshots: SnapshotHistory,
    page_size: usize,
    dialogue: Box<dyn DialogueDetector + Send + Sync>,
    matcher: Box<dyn GlossaryMatcher + Send + Sync>,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(WorkbenchSettings::default())
    }
}

impl Workbench {
    pub fn new(settings: WorkbenchSettings) -> Self {
        let page_size = settings.page_size.max(1);
        Self {
            project: Project::default(),
            preferences: Preferences::default(),
            view: ViewState {
                visible_count: page_size,
                ..ViewState::default()
            },
            snapshots: SnapshotHistory::new(settings.max_backups),
            page_size,
            dialogue: Box::new(QuoteDialogueDetector),
            matcher: Box::new(SubstringMatcher::default()),
        }
    }

    pub fn from_record(record: PersistedRecord, settings: WorkbenchSettings) -> Self {
        let mut wb = Self::new(settings);
        wb.project = record.project;
        wb.project.focused_index = record.focused_index;
        wb.project.clamp_focus();
        wb.preferences = record.preferences;
        wb.view = record.view_state;
        wb.snapshots = SnapshotHistory::from_entries(record.snapshots, settings.max_backups);
        wb
    }

    pub fn to_record(&self) -> PersistedRecord {
        PersistedRecord {
            schema_version: CURRENT_SCHEMA_VERSION,
            project: self.project.clone(),
            snapshots: self.snapshots.entries().to_vec(),
            preferences: self.preferences.clone(),
            focused_index: self.project.focused_index,
            view_state: self.view.clone(),
        }
    }

    pub fn with_dialogue_detector(mut self, detector: Box<dyn DialogueDetector + Send + Sync>) -> Self {
        self.dialogue = detector;
        self
    }

    pub fn with_glossary_matcher(mut self, matcher: Box<dyn GlossaryMatcher + Send + Sync>) -> Self {
        self.matcher = matcher;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.project.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Result<&Paragraph> {
        self.project.paragraphs.paragraph(index)
    }

    pub fn focused_index(&self) -> usize {
        self.project.focused_index
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn snapshots(&self) -> &SnapshotHistory {
        &self.snapshots
    }

    pub fn has_dialogue(&self, text: &str) -> bool {
        self.dialogue.has_dialogue(text)
    }

    // ── Metadata & preferences ──────────────────────────────────────────

    pub fn set_project_name(&mut self, name: &str) {
        self.project.project_name = name.trim().to_string();
    }

    pub fn set_chapter_name(&mut self, name: &str) {
        self.project.chapter_name = name.trim().to_string();
    }

    pub fn set_file_name(&mut self, name: &str) {
        self.project.file_name = name.to_string();
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    // ── Paragraph store ─────────────────────────────────────────────────

    /// Split chapter text into a fresh paragraph sequence and capture a
    /// snapshot of the result.
    pub fn split_chapter(
        &mut self,
        project_name: &str,
        chapter_name: &str,
        text: &str,
        mode: SplitMode,
        now_ms: i64,
    ) -> Result<usize> {
        let project_name = project_name.trim();
        let chapter_name = chapter_name.trim();
        let text = text.trim();
        if project_name.is_empty() {
            return Err(CoreError::InvalidInput("project name is required".to_string()));
        }
        if chapter_name.is_empty() {
            return Err(CoreError::InvalidInput("chapter name is required".to_string()));
        }
        if text.is_empty() {
            return Err(CoreError::InvalidInput("chapter text is empty".to_string()));
        }

        self.project.project_name = project_name.to_string();
        self.project.chapter_name = chapter_name.to_string();
        self.project.raw_text = text.to_string();
        self.project.split_mode = mode;
        let count = self.project.paragraphs.split(text, mode);
        self.project.focused_index = 0;
        self.reset_paging();
        self.view.focus_mode = false;

        self.capture(now_ms);
        Ok(count)
    }

    pub fn set(&mut self, index: usize, edit: ParagraphEdit) -> Result<()> {
        self.project.paragraphs.set(index, edit)
    }

    pub fn translate(&mut self, index: usize, text: &str) -> Result<()> {
        self.set(index, ParagraphEdit::Translation(text.to_string()))
    }

    /// Mark done, then auto-advance to the next match when enabled.
    /// Returns the new focus if it moved.
    pub fn mark_done(&mut self, index: usize) -> Result<Option<usize>> {
        self.project.paragraphs.mark_done(index)?;
        Ok(self.auto_advance(index))
    }

    /// Mark skipped, then auto-advance to the next match when enabled.
    pub fn mark_skipped(&mut self, index: usize) -> Result<Option<usize>> {
        self.project.paragraphs.mark_skipped(index)?;
        Ok(self.auto_advance(index))
    }

    fn auto_advance(&mut self, from: usize) -> Option<usize> {
        if !self.preferences.auto_advance {
            return None;
        }
        match self.next_match_from(from, Direction::Next) {
            NavOutcome::Found(next) => {
                self.project.focused_index = next;
                Some(next)
            }
            NavOutcome::NoMatch => None,
        }
    }

    pub fn clear_paragraph(&mut self, index: usize, confirm: Confirmation) -> Result<()> {
        confirm.require("clearing a paragraph")?;
        self.project.paragraphs.clear(index)
    }

    pub fn segment(&mut self, index: usize) -> Result<usize> {
        self.project.paragraphs.segment(index)
    }

    pub fn set_segment(&mut self, index: usize, segment: usize, text: &str) -> Result<()> {
        self.project
            .paragraphs
            .set_segment(index, segment, text.to_string())
    }

    pub fn merge_segments(&mut self, index: usize) -> Result<String> {
        self.project.paragraphs.merge_segments(index)
    }

    // ── Status, filter & paging ─────────────────────────────────────────

    pub fn progress(&self) -> Progress {
        progress(self.paragraphs(), self.preferences.count_skipped_as_done)
    }

    pub fn matching_indexes(&self) -> Vec<usize> {
        matching_indexes(
            self.paragraphs(),
            &self.view.search_query,
            self.view.filter_mode,
            self.dialogue.as_ref(),
        )
    }

    pub fn set_search(&mut self, query: &str) {
        self.view.search_query = query.to_string();
        self.reset_paging();
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.view.filter_mode = mode;
        self.reset_paging();
    }

    pub fn set_focus_mode(&mut self, on: bool) {
        self.view.focus_mode = on;
    }

    fn reset_paging(&mut self) {
        self.view.visible_count = self.page_size;
    }

    /// Grow the list view by one page.
    pub fn load_more(&mut self) {
        self.view.visible_count = self.view.visible_count.saturating_add(self.page_size);
    }

    /// The matches currently shown in the list view.
    pub fn visible_page(&self) -> Vec<usize> {
        let mut matches = self.matching_indexes();
        matches.truncate(self.view.visible_count);
        matches
    }

    /// How many matches `load_more` would reveal next.
    pub fn remaining_matches(&self) -> usize {
        let total = self.matching_indexes().len();
        total.saturating_sub(self.view.visible_count).min(self.page_size)
    }

    /// The paragraph focus mode displays: the focused index if it
    /// matches, else the first match.
    pub fn focused_match(&self) -> Option<usize> {
        let matches = self.matching_indexes();
        if matches.contains(&self.project.focused_index) {
            Some(self.project.focused_index)
        } else {
            matches.first().copied()
        }
    }

    pub fn check_report(&self) -> CheckReport {
        check(self.paragraphs(), self.dialogue.as_ref())
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn focus(&mut self, index: usize) -> Result<()> {
        self.project.paragraphs.paragraph(index)?;
        self.project.focused_index = index;
        Ok(())
    }

    fn next_match_from(&self, from: usize, direction: Direction) -> NavOutcome {
        next_match(
            from,
            direction,
            self.paragraphs(),
            &self.view.search_query,
            self.view.filter_mode,
            self.dialogue.as_ref(),
        )
    }

    /// Move focus to the neighbouring match. Focus is untouched on
    /// `NoMatch`.
    pub fn navigate(&mut self, direction: Direction) -> NavOutcome {
        let outcome = self.next_match_from(self.project.focused_index, direction);
        if let NavOutcome::Found(index) = outcome {
            self.project.focused_index = index;
        }
        outcome
    }

    /// Move focus to the next untranslated paragraph, wrapping around.
    pub fn goto_next_unfinished(&mut self) -> UnfinishedOutcome {
        let outcome = next_unfinished(self.project.focused_index, self.paragraphs());
        if let UnfinishedOutcome::Found(index) = outcome {
            self.project.focused_index = index;
        }
        outcome
    }

    /// Move focus by one paragraph, ignoring search and filter.
    pub fn step(&mut self, direction: Direction) -> NavOutcome {
        let len = self.paragraphs().len();
        let current = self.project.focused_index;
        let target = match direction {
            Direction::Next if current + 1 < len => current + 1,
            Direction::Prev if current > 0 && len > 0 => current - 1,
            _ => return NavOutcome::NoMatch,
        };
        self.project.focused_index = target;
        NavOutcome::Found(target)
    }

    // ── Glossary ────────────────────────────────────────────────────────

    pub fn add_glossary_entry(&mut self, term: &str, translation: &str) -> Result<()> {
        glossary::add_entry(&mut self.project.glossary, term, translation)
    }

    pub fn remove_glossary_entry(&mut self, term: &str) -> bool {
        self.project.glossary.remove(term).is_some()
    }

    pub fn glossary_entries(&self, query: &str) -> Vec<(&str, &str)> {
        glossary::entries(&self.project.glossary, query)
    }

    /// Glossary suggestions for one paragraph's original text.
    pub fn glossary_suggestions(&self, index: usize) -> Result<Vec<GlossaryMatch>> {
        let p = self.paragraph(index)?;
        Ok(self.matcher.matches(&p.original, &self.project.glossary))
    }

    /// Merge a glossary pack. Nothing changes if the pack is invalid.
    pub fn import_glossary(&mut self, text: &str) -> Result<usize> {
        let imported = export::parse_glossary_pack(text)?;
        let count = glossary::merge(&mut self.project.glossary, imported);
        info!(count, "glossary imported");
        Ok(count)
    }

    pub fn glossary_pack(&self, now_ms: i64) -> GlossaryPack {
        export::glossary_pack(&self.project.glossary, now_ms)
    }

    pub fn clear_glossary(&mut self, confirm: Confirmation) -> Result<()> {
        confirm.require("clearing the glossary")?;
        self.project.glossary.clear();
        Ok(())
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    fn payload(&self) -> SnapshotPayload {
        SnapshotPayload {
            project: self.project.clone(),
            preferences: self.preferences.clone(),
        }
    }

    fn apply_payload(&mut self, payload: SnapshotPayload) {
        self.project = payload.project;
        self.project.clamp_focus();
        self.preferences = payload.preferences;
        self.reset_paging();
        self.view.focus_mode = false;
    }

    /// Capture a snapshot now. Returns its timestamp.
    pub fn capture(&mut self, now_ms: i64) -> i64 {
        self.snapshots
            .capture(&self.project, &self.preferences, now_ms)
            .timestamp
    }

    /// Capture only if auto-backup is on and there is something to save.
    pub fn auto_capture(&mut self, now_ms: i64) -> Option<i64> {
        if snapshot::should_auto_capture(&self.preferences, &self.project) {
            Some(self.capture(now_ms))
        } else {
            None
        }
    }

    pub fn snapshot_payload(&self, timestamp: i64) -> Result<&SnapshotPayload> {
        Ok(&self.snapshots.get(timestamp)?.payload)
    }

    /// Replace the live project and preferences with a captured snapshot.
    pub fn restore_snapshot(&mut self, timestamp: i64, confirm: Confirmation) -> Result<()> {
        let payload = snapshot::restore(self.snapshots.get(timestamp)?, confirm)?;
        self.apply_payload(payload);
        Ok(())
    }

    pub fn delete_snapshot(&mut self, timestamp: i64) -> Result<usize> {
        self.snapshots.delete(timestamp)
    }

    // ── Import / export ─────────────────────────────────────────────────

    pub fn translation_text(&self) -> String {
        export::translation_only(self.paragraphs())
    }

    pub fn review_text(&self) -> String {
        export::review_format(self.paragraphs())
    }

    pub fn export_filename(&self) -> Result<String> {
        export::export_filename(&self.project.project_name, &self.project.chapter_name)
            .ok_or_else(missing_names)
    }

    pub fn review_filename(&self) -> Result<String> {
        export::review_filename(&self.project.project_name, &self.project.chapter_name)
            .ok_or_else(missing_names)
    }

    pub fn project_pack(&self, now_ms: i64) -> ProjectPack {
        export::project_pack(self.payload(), now_ms)
    }

    /// Replace state from a project pack, then capture a snapshot of it.
    /// An invalid pack leaves everything untouched.
    pub fn import_project(&mut self, text: &str, now_ms: i64) -> Result<()> {
        let payload = export::parse_project_pack(text)?;
        self.apply_payload(payload);
        info!(paragraphs = self.paragraphs().len(), "project imported");
        self.capture(now_ms);
        Ok(())
    }

    /// Reset everything except the theme. Snapshots are dropped too.
    pub fn clear_all(&mut self, confirm: Confirmation) -> Result<()> {
        confirm.require("clearing everything")?;
        let theme = self.preferences.theme;
        self.project = Project::default();
        self.preferences = Preferences {
            theme,
            ..Preferences::default()
        };
        self.view = ViewState {
            visible_count: self.page_size,
            ..ViewState::default()
        };
        self.snapshots.clear();
        info!("workbench cleared");
        Ok(())
    }
}

fn missing_names() -> CoreError {
    CoreError::InvalidInput("project and chapter names are required for export".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Status, Theme};
    use crate::status::status_of;

    const TEXT: &str = "First.\n\n“Second,” he said.\n\nThird.\n\nFourth.";

    fn bench() -> Workbench {
        let mut wb = Workbench::default();
        wb.split_chapter("Novel", "One", TEXT, SplitMode::BlankLines, 1_000)
            .unwrap();
        wb
    }

    #[test]
    fn test_split_chapter_validates_and_snapshots() {
        let mut wb = Workbench::default();
        assert!(wb.split_chapter("", "c", "x", SplitMode::Lines, 0).is_err());
        assert!(wb.split_chapter("p", " ", "x", SplitMode::Lines, 0).is_err());
        assert!(wb.split_chapter("p", "c", "  \n", SplitMode::Lines, 0).is_err());
        assert!(wb.snapshots().is_empty());

        let wb = bench();
        assert_eq!(wb.paragraphs().len(), 4);
        assert_eq!(wb.focused_index(), 0);
        assert_eq!(wb.snapshots().len(), 1);
        assert_eq!(wb.project().raw_text, TEXT);
    }

    #[test]
    fn test_mark_done_auto_advances_under_filter() {
        let mut wb = bench();
        wb.set_filter(FilterMode::Untranslated);
        assert_eq!(wb.mark_done(0).unwrap(), Some(1));
        assert_eq!(wb.mark_skipped(1).unwrap(), Some(2));
        assert_eq!(wb.focused_index(), 2);

        let mut prefs = wb.preferences().clone();
        prefs.auto_advance = false;
        wb.set_preferences(prefs);
        assert_eq!(wb.mark_done(2).unwrap(), None);
        assert_eq!(wb.focused_index(), 2);
    }

    #[test]
    fn test_auto_advance_stops_at_end() {
        let mut wb = bench();
        wb.set_filter(FilterMode::All);
        wb.focus(3).unwrap();
        assert_eq!(wb.mark_done(3).unwrap(), None);
        assert_eq!(wb.focused_index(), 3);
    }

    #[test]
    fn test_navigate_keeps_focus_on_no_match() {
        let mut wb = bench();
        wb.set_filter(FilterMode::Dialogue);
        assert_eq!(wb.navigate(Direction::Next), NavOutcome::Found(1));
        assert_eq!(wb.navigate(Direction::Next), NavOutcome::NoMatch);
        assert_eq!(wb.focused_index(), 1);
    }

    #[test]
    fn test_search_resets_paging() {
        let mut wb = Workbench::new(WorkbenchSettings {
            page_size: 2,
            ..WorkbenchSettings::default()
        });
        wb.split_chapter("p", "c", TEXT, SplitMode::BlankLines, 0)
            .unwrap();
        wb.set_filter(FilterMode::All);
        assert_eq!(wb.visible_page(), [0, 1]);
        assert_eq!(wb.remaining_matches(), 2);
        wb.load_more();
        assert_eq!(wb.visible_page(), [0, 1, 2, 3]);
        assert_eq!(wb.remaining_matches(), 0);
        wb.set_search("third");
        assert_eq!(wb.view().visible_count, 2);
        assert_eq!(wb.visible_page(), [2]);
    }

    #[test]
    fn test_focused_match() {
        let mut wb = bench();
        wb.set_filter(FilterMode::Dialogue);
        assert_eq!(wb.focused_match(), Some(1));
        wb.set_search("nothing like this");
        assert_eq!(wb.focused_match(), None);
    }

    #[test]
    fn test_step_is_linear_and_clamped() {
        let mut wb = bench();
        assert_eq!(wb.step(Direction::Prev), NavOutcome::NoMatch);
        assert_eq!(wb.step(Direction::Next), NavOutcome::Found(1));
        wb.focus(3).unwrap();
        assert_eq!(wb.step(Direction::Next), NavOutcome::NoMatch);
        assert!(wb.focus(4).is_err());
    }

    #[test]
    fn test_next_unfinished() {
        let mut wb = bench();
        wb.mark_done(0).unwrap();
        wb.mark_skipped(2).unwrap();
        wb.focus(3).unwrap();
        assert_eq!(wb.goto_next_unfinished(), UnfinishedOutcome::Found(1));
        wb.translate(1, "x").unwrap();
        wb.translate(3, "y").unwrap();
        assert_eq!(wb.goto_next_unfinished(), UnfinishedOutcome::AllCompleted);
    }

    #[test]
    fn test_capture_restore_round_trip() {
        let mut wb = bench();
        wb.translate(2, "Dritter.").unwrap();
        wb.add_glossary_entry("First", "Erster").unwrap();
        wb.focus(2).unwrap();
        let ts = wb.capture(5_000);

        wb.clear_paragraph(2, Confirmation::Granted).unwrap();
        wb.clear_glossary(Confirmation::Granted).unwrap();
        wb.focus(0).unwrap();

        assert!(wb.restore_snapshot(ts, Confirmation::Denied).is_err());
        assert_eq!(wb.paragraphs()[2].translation, "");

        wb.restore_snapshot(ts, Confirmation::Granted).unwrap();
        assert_eq!(wb.paragraphs()[2].translation, "Dritter.");
        assert_eq!(wb.project().glossary.len(), 1);
        assert_eq!(wb.focused_index(), 2);
    }

    #[test]
    fn test_destructive_ops_need_confirmation() {
        let mut wb = bench();
        wb.translate(0, "x").unwrap();
        assert!(wb.clear_paragraph(0, Confirmation::Denied).is_err());
        assert!(wb.clear_glossary(Confirmation::Denied).is_err());
        assert!(wb.clear_all(Confirmation::Denied).is_err());
        assert_eq!(status_of(&wb.paragraphs()[0]), Status::Done);
    }

    #[test]
    fn test_clear_all_keeps_theme() {
        let mut wb = bench();
        let mut prefs = wb.preferences().clone();
        prefs.theme = Theme::Light;
        prefs.auto_advance = false;
        wb.set_preferences(prefs);
        wb.clear_all(Confirmation::Granted).unwrap();
        assert!(wb.paragraphs().is_empty());
        assert!(wb.snapshots().is_empty());
        assert_eq!(wb.preferences().theme, Theme::Light);
        assert!(wb.preferences().auto_advance);
    }

    #[test]
    fn test_auto_capture_gate() {
        let mut wb = Workbench::default();
        assert_eq!(wb.auto_capture(1), None);
        let mut wb = bench();
        assert_eq!(wb.auto_capture(2_000), Some(2_000));
    }

    #[test]
    fn test_project_pack_import() {
        let mut source = bench();
        source.translate(0, "Erster.").unwrap();
        let text = serde_json::to_string(&source.project_pack(0)).unwrap();

        let mut target = Workbench::default();
        assert!(target.import_project("{\"nope\": 1}", 1).is_err());
        assert!(target.paragraphs().is_empty());
        assert!(target.snapshots().is_empty());

        target.import_project(&text, 10).unwrap();
        assert_eq!(target.paragraphs(), source.paragraphs());
        assert_eq!(target.snapshots().len(), 1);
    }

    #[test]
    fn test_glossary_import_and_suggestions() {
        let mut wb = bench();
        wb.add_glossary_entry("Second", "Zweiter").unwrap();
        let n = wb
            .import_glossary(r#"{"glossary": {"Second": "Zweite", "Third": "Dritte"}}"#)
            .unwrap();
        assert_eq!(n, 2);
        assert!(wb.import_glossary("[]").is_err());
        let found = wb.glossary_suggestions(1).unwrap();
        assert_eq!(found[0].translation, "Zweite");
        assert!(wb.glossary_suggestions(9).is_err());
        assert!(wb.remove_glossary_entry("Third"));
        assert!(!wb.remove_glossary_entry("Third"));
    }

    #[test]
    fn test_export_filenames_need_names() {
        let wb = bench();
        assert_eq!(wb.export_filename().unwrap(), "Novel - One.txt");
        assert!(Workbench::default().export_filename().is_err());
    }

    #[test]
    fn test_record_round_trip() {
        let mut wb = bench();
        wb.translate(1, "Zweiter").unwrap();
        wb.focus(2).unwrap();
        wb.set_search("th");
        let record = wb.to_record();
        let restored = Workbench::from_record(record.clone(), WorkbenchSettings::default());
        assert_eq!(restored.to_record(), record);
    }

    #[test]
    fn test_load_more_saturates() {
        let mut record = bench().to_record();
        record.view_state.visible_count = usize::MAX - 1;
        let mut wb = Workbench::from_record(record, WorkbenchSettings::default());
        wb.load_more();
        assert_eq!(wb.view().visible_count, usize::MAX);
        assert_eq!(wb.visible_page().len(), 4);
        assert_eq!(wb.remaining_matches(), 0);
    }

    #[test]
    fn test_rename_feeds_export_names() {
        let mut wb = Workbench::default();
        assert!(wb.export_filename().is_err());
        wb.set_project_name("  Saga ");
        wb.set_chapter_name("Two");
        assert_eq!(wb.project().project_name, "Saga");
        assert_eq!(wb.export_filename().unwrap(), "Saga - Two.txt");
        assert_eq!(wb.review_filename().unwrap(), "Saga - Two-review.txt");
    }

    struct FirstEntry;

    impl GlossaryMatcher for FirstEntry {
        fn matches(&self, _text: &str, glossary: &crate::models::Glossary) -> Vec<GlossaryMatch> {
            glossary
                .iter()
                .take(1)
                .map(|(term, translation)| GlossaryMatch {
                    term: term.clone(),
                    translation: translation.clone(),
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_glossary_matcher() {
        let mut wb = bench().with_glossary_matcher(Box::new(FirstEntry));
        wb.add_glossary_entry("Absent", "Fehlt").unwrap();
        wb.add_glossary_entry("Zzz", "Schlaf").unwrap();
        let found = wb.glossary_suggestions(0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].term, "Absent");
    }

    #[test]
    fn test_custom_dialogue_detector() {
        let mut wb = bench().with_dialogue_detector(Box::new(|t: &str| t.starts_with("Th")));
        wb.set_filter(FilterMode::Dialogue);
        assert_eq!(wb.matching_indexes(), [2]);
    }
}
