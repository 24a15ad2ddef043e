//! Property tests: extraction is total and deterministic.

use proptest::prelude::*;

use para_core::NoteMetadata;
use para_features::extract;

proptest! {
    #[test]
    fn prop_extract_is_deterministic(text in "\\PC{0,400}") {
        let meta = NoteMetadata::default();
        let a = extract(&text, &meta);
        let b = extract(&text, &meta);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_counts_are_bounded_by_text(text in "[a-z #\\-\\[\\]x\\n]{0,300}") {
        let f = extract(&text, &NoteMetadata::default());
        prop_assert!(f.word_count <= text.len());
        prop_assert_eq!(f.tag_count, f.tags.len());
        prop_assert!(f.category_hint_tags.is_subset(&f.tags));
        prop_assert!(f.open_task_count + f.done_task_count <= text.lines().count());
    }

    #[test]
    fn prop_metadata_tags_always_present(tag in "[a-z]{1,12}") {
        let meta = NoteMetadata { tags: vec![tag.clone()], ..Default::default() };
        let f = extract("", &meta);
        prop_assert!(f.tags.contains(&tag));
    }
}
