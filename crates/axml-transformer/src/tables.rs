//! Fixed name-mapping tables.

/// Tag renames. Tags not listed pass through unchanged.
pub const TAG_MAP: &[(&str, &str)] = &[("view", "div"), ("text", "span"), ("block", "template")];

/// Event renames. Events not listed are lower-cased.
pub const EVENT_MAP: &[(&str, &str)] = &[
    ("Tap", "click"),
    ("LongTap", "longpress"),
    ("LongPress", "longpress"),
];

/// Tag given to an element whose only child is text.
pub const TEXT_TAG: &str = "text";

/// The element that imports an sjs module into the page.
pub const MODULE_IMPORT_TAG: &str = "import-sjs";

/// Prefix shared by all control-flow attributes.
pub const DIRECTIVE_PREFIX: &str = "a:";

/// Map a source tag to its target tag.
pub fn map_tag(tag: &str) -> &str {
    TAG_MAP
        .iter()
        .find(|(from, _)| *from == tag)
        .map(|(_, to)| *to)
        .unwrap_or(tag)
}

/// Map a capitalized source event name to its target event name.
pub fn map_event(event: &str) -> String {
    EVENT_MAP
        .iter()
        .find(|(from, _)| *from == event)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| event.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_map_tag() {
        assert_eq!(map_tag("view"), "div");
        assert_eq!(map_tag("text"), "span");
        assert_eq!(map_tag("scroll-view"), "scroll-view");
    }

    #[test]
    fn test_map_event() {
        assert_eq!(map_event("Tap"), "click");
        assert_eq!(map_event("LongPress"), "longpress");
        assert_eq!(map_event("TouchStart"), "touchstart");
    }
}
