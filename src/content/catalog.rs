//! Lesson ordering and visibility rules for the course catalog.

use std::collections::HashSet;

use uuid::Uuid;

use super::error::{ValidationError, Violation};

pub trait CatalogEntry {
    fn position(&self) -> i32;
    fn section(&self) -> Option<&str>;
    fn is_published(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup<T> {
    /// Free-text chapter label; `None` groups the unlabelled lessons.
    pub section: Option<String>,
    pub lessons: Vec<T>,
}

/// Sorts lessons by stored position (stable, so creation order breaks ties)
/// and groups them by section label in first-seen order. Unpublished lessons
/// are dropped unless the caller asks for the admin view.
pub fn ordered_sections<T: CatalogEntry>(
    mut lessons: Vec<T>,
    include_unpublished: bool,
) -> Vec<SectionGroup<T>> {
    lessons.retain(|lesson| include_unpublished || lesson.is_published());
    lessons.sort_by_key(CatalogEntry::position);

    let mut groups: Vec<SectionGroup<T>> = Vec::new();
    for lesson in lessons {
        let label = lesson.section().map(str::to_owned);
        match groups.iter_mut().find(|group| group.section == label) {
            Some(group) => group.lessons.push(lesson),
            None => groups.push(SectionGroup {
                section: label,
                lessons: vec![lesson],
            }),
        }
    }
    groups
}

/// A reorder payload must be an exact permutation of the course's current
/// lesson ids: nothing dropped, nothing added, nothing duplicated. On
/// failure the stored order is left untouched by the caller.
pub fn validate_reorder(current: &[Uuid], proposed: &[Uuid]) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    let known: HashSet<Uuid> = current.iter().copied().collect();

    let mut seen = HashSet::new();
    for id in proposed {
        if !seen.insert(*id) {
            violations.push(Violation::field("order", format!("duplicate lesson id {id}")));
        }
        if !known.contains(id) {
            violations.push(Violation::field(
                "order",
                format!("unknown lesson id {id}"),
            ));
        }
    }

    for id in current {
        if !seen.contains(id) {
            violations.push(Violation::field(
                "order",
                format!("missing lesson id {id}"),
            ));
        }
    }

    ValidationError::check(violations)
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Entry {
        position: i32,
        section: Option<&'static str>,
        published: bool,
        title: &'static str,
    }

    impl CatalogEntry for Entry {
        fn position(&self) -> i32 {
            self.position
        }

        fn section(&self) -> Option<&str> {
            self.section
        }

        fn is_published(&self) -> bool {
            self.published
        }
    }

    fn entry(position: i32, section: Option<&'static str>, title: &'static str) -> Entry {
        Entry {
            position,
            section,
            published: true,
            title,
        }
    }

    #[test]
    fn sections_keep_first_seen_order() {
        let lessons = vec![
            entry(2, Some("Basics"), "b"),
            entry(0, Some("Intro"), "a"),
            entry(3, Some("Intro"), "c"),
            entry(1, None, "x"),
        ];

        let groups = ordered_sections(lessons, false);
        let labels: Vec<_> = groups.iter().map(|g| g.section.as_deref()).collect();
        // first-seen order after sorting by position: Intro (pos 0), None (1), Basics (2)
        assert_eq!(labels, vec![Some("Intro"), None, Some("Basics")]);
        assert_eq!(
            groups[0].lessons.iter().map(|l| l.title).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn sort_is_stable_on_position_ties() {
        let lessons = vec![
            entry(0, None, "created-first"),
            entry(0, None, "created-second"),
        ];
        let groups = ordered_sections(lessons, false);
        assert_eq!(
            groups[0].lessons.iter().map(|l| l.title).collect::<Vec<_>>(),
            vec!["created-first", "created-second"]
        );
    }

    #[test]
    fn unpublished_hidden_unless_admin_view() {
        let lessons = vec![
            entry(0, None, "visible"),
            Entry {
                position: 1,
                section: None,
                published: false,
                title: "draft",
            },
        ];
        let public = ordered_sections(lessons, false);
        assert_eq!(public[0].lessons.len(), 1);

        let lessons = vec![
            entry(0, None, "visible"),
            Entry {
                position: 1,
                section: None,
                published: false,
                title: "draft",
            },
        ];
        let admin = ordered_sections(lessons, true);
        assert_eq!(admin[0].lessons.len(), 2);
    }

    #[test]
    fn reorder_accepts_a_permutation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert!(validate_reorder(&[a, b, c], &[c, a, b]).is_ok());
    }

    #[test]
    fn reorder_rejects_drops_adds_and_duplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        // dropped id
        assert!(validate_reorder(&[a, b], &[a]).is_err());
        // added id
        assert!(validate_reorder(&[a, b], &[a, b, stranger]).is_err());
        // duplicate id
        let err = validate_reorder(&[a, b], &[a, a]).unwrap_err();
        assert!(err.violations().iter().any(|v| v.message.contains("duplicate")));
        assert!(err.violations().iter().any(|v| v.message.contains("missing")));
    }
}
