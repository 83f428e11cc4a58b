//! Tag-based expertise classification.

use snipkit_shared::Expertise;

/// Derives an expertise level from a snippet's tags.
pub trait Classifier: Send + Sync {
    /// The expertise level the tags describe.
    fn classify(&self, tags: &[String]) -> Expertise;

    /// The tags with every expertise-encoding tag removed.
    fn strip_expertise(&self, tags: &[String]) -> Vec<String>;
}

/// Classifies by tags literally named after a level (`beginner`,
/// `intermediate`, `advanced`, any case).
///
/// When several level tags are present the last one wins. Without any,
/// snippets are [`Expertise::Intermediate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TagClassifier;

impl Classifier for TagClassifier {
    fn classify(&self, tags: &[String]) -> Expertise {
        tags.iter()
            .filter_map(|t| Expertise::from_tag(t))
            .last()
            .unwrap_or_default()
    }

    fn strip_expertise(&self, tags: &[String]) -> Vec<String> {
        tags.iter()
            .filter(|t| Expertise::from_tag(t).is_none())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classifies_by_level_tag() {
        assert_eq!(TagClassifier.classify(&tags(&["array", "beginner"])), Expertise::Beginner);
        assert_eq!(TagClassifier.classify(&tags(&["Advanced", "math"])), Expertise::Advanced);
    }

    #[test]
    fn defaults_to_intermediate() {
        assert_eq!(TagClassifier.classify(&tags(&["array"])), Expertise::Intermediate);
        assert_eq!(TagClassifier.classify(&[]), Expertise::Intermediate);
    }

    #[test]
    fn last_level_tag_wins() {
        assert_eq!(
            TagClassifier.classify(&tags(&["beginner", "array", "advanced"])),
            Expertise::Advanced
        );
    }

    #[test]
    fn strips_level_tags_only() {
        let stripped = TagClassifier.strip_expertise(&tags(&["array", "BEGINNER", "function"]));
        assert_eq!(stripped, tags(&["array", "function"]));
    }
}
