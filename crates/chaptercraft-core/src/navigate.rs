//! Navigation controller.
//!
//! Two distinct semantics are exposed:
//!
//! - [`next_match`] steps through the ordered match set of the active
//!   search and filter. It never wraps: stepping past either end yields
//!   [`NavOutcome::NoMatch`].
//! - [`next_unfinished`] scans forward from the current paragraph and wraps
//!   to the start, looking for any untranslated paragraph regardless of
//!   the active filter.

use crate::dialogue::DialogueDetector;
use crate::models::{FilterMode, Paragraph, Status};
use crate::status::{matching_indexes, status_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Prev => -1,
        }
    }
}

/// Result of a filtered step. `NoMatch` is a signal, not an error: the
/// caller reports it and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Found(usize),
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfinishedOutcome {
    Found(usize),
    AllCompleted,
}

/// Find the neighbour of `current` in the match set, in `direction`.
///
/// If `current` is not itself a match, the first match (forward) or the
/// last match (backward) is returned.
pub fn next_match(
    current: usize,
    direction: Direction,
    paragraphs: &[Paragraph],
    query: &str,
    mode: FilterMode,
    dialogue: &dyn DialogueDetector,
) -> NavOutcome {
    let matches = matching_indexes(paragraphs, query, mode, dialogue);
    if matches.is_empty() {
        return NavOutcome::NoMatch;
    }

    let target = match matches.binary_search(&current) {
        Ok(pos) => pos as isize + direction.step(),
        Err(_) => match direction {
            Direction::Next => 0,
            Direction::Prev => matches.len() as isize - 1,
        },
    };

    if target < 0 {
        return NavOutcome::NoMatch;
    }
    match matches.get(target as usize) {
        Some(index) => NavOutcome::Found(*index),
        None => NavOutcome::NoMatch,
    }
}

/// First untranslated paragraph after `current`, wrapping around to
/// `current` itself.
pub fn next_unfinished(current: usize, paragraphs: &[Paragraph]) -> UnfinishedOutcome {
    let len = paragraphs.len();
    if len == 0 {
        return UnfinishedOutcome::AllCompleted;
    }
    let current = current.min(len - 1);

    (current + 1..len)
        .chain(0..=current)
        .find(|i| status_of(&paragraphs[*i]) == Status::Untranslated)
        .map_or(UnfinishedOutcome::AllCompleted, UnfinishedOutcome::Found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::QuoteDialogueDetector;
    use crate::status::tests::sample;

    fn statuses() -> Vec<Paragraph> {
        sample(&[
            Status::Done,
            Status::Untranslated,
            Status::Skipped,
            Status::Untranslated,
        ])
    }

    fn nav(current: usize, direction: Direction, mode: FilterMode) -> NavOutcome {
        next_match(current, direction, &statuses(), "", mode, &QuoteDialogueDetector)
    }

    #[test]
    fn test_next_match_forward() {
        assert_eq!(nav(0, Direction::Next, FilterMode::Untranslated), NavOutcome::Found(1));
        assert_eq!(nav(1, Direction::Next, FilterMode::Untranslated), NavOutcome::Found(3));
        assert_eq!(nav(3, Direction::Next, FilterMode::Untranslated), NavOutcome::NoMatch);
    }

    #[test]
    fn test_next_match_backward() {
        assert_eq!(nav(3, Direction::Prev, FilterMode::Untranslated), NavOutcome::Found(1));
        assert_eq!(nav(1, Direction::Prev, FilterMode::Untranslated), NavOutcome::NoMatch);
        // Not a match: start from the last element.
        assert_eq!(nav(2, Direction::Prev, FilterMode::Untranslated), NavOutcome::Found(3));
    }

    #[test]
    fn test_next_match_all_and_empty() {
        assert_eq!(nav(2, Direction::Next, FilterMode::All), NavOutcome::Found(3));
        assert_eq!(nav(0, Direction::Next, FilterMode::Dialogue), NavOutcome::NoMatch);
        assert_eq!(
            next_match(0, Direction::Next, &[], "", FilterMode::All, &QuoteDialogueDetector),
            NavOutcome::NoMatch
        );
    }

    #[test]
    fn test_next_unfinished_wraps() {
        let ps = statuses();
        assert_eq!(next_unfinished(3, &ps), UnfinishedOutcome::Found(1));
        assert_eq!(next_unfinished(1, &ps), UnfinishedOutcome::Found(3));
        assert_eq!(next_unfinished(0, &ps), UnfinishedOutcome::Found(1));
    }

    #[test]
    fn test_next_unfinished_includes_current_last() {
        let ps = sample(&[Status::Done, Status::Untranslated, Status::Done]);
        assert_eq!(next_unfinished(1, &ps), UnfinishedOutcome::Found(1));
    }

    #[test]
    fn test_next_unfinished_all_completed() {
        let ps = sample(&[Status::Done, Status::Skipped]);
        assert_eq!(next_unfinished(0, &ps), UnfinishedOutcome::AllCompleted);
        assert_eq!(next_unfinished(0, &[]), UnfinishedOutcome::AllCompleted);
    }
}
