//! Attribute classification.

use crate::tables::DIRECTIVE_PREFIX;
use smol_str::SmolStr;

/// How an event attribute was prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPrefix {
    /// `onTap`: bubbling handler.
    On,
    /// `catchTap`: handler that stops propagation.
    Catch,
}

/// The closed set of directive kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `a:if`
    If,
    /// `a:elif`
    ElseIf,
    /// `a:else`
    Else,
    /// `a:for`
    For,
    /// `a:for-item`
    ForItem,
    /// `a:for-index`
    ForIndex,
    /// `a:key`
    Key,
    /// Any other `a:` attribute, by its suffix.
    Other(SmolStr),
}

impl Directive {
    /// Parse the part of a directive name after the `a:` prefix.
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "if" => Directive::If,
            "elif" => Directive::ElseIf,
            "else" => Directive::Else,
            "for" => Directive::For,
            "for-item" => Directive::ForItem,
            "for-index" => Directive::ForIndex,
            "key" => Directive::Key,
            other => Directive::Other(SmolStr::new(other)),
        }
    }
}

/// The role an attribute plays, decided from its name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeClass<'a> {
    /// An event binding; `event` is the capitalized event name.
    Event {
        /// `on` or `catch`.
        prefix: EventPrefix,
        /// Capitalized event name, e.g. `Tap`.
        event: &'a str,
    },
    /// A control-flow directive.
    Directive(Directive),
    /// Anything else.
    Static,
}

/// Classify an attribute by name.
///
/// Event names are the longest run of ASCII letters after the prefix, and
/// must start with an uppercase letter.
pub fn classify(name: &str) -> AttributeClass<'_> {
    for (prefix, kind) in [("on", EventPrefix::On), ("catch", EventPrefix::Catch)] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
                let len = rest
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(rest.len());
                return AttributeClass::Event {
                    prefix: kind,
                    event: &rest[..len],
                };
            }
        }
    }

    if let Some(suffix) = name.strip_prefix(DIRECTIVE_PREFIX) {
        return AttributeClass::Directive(Directive::from_suffix(suffix));
    }

    AttributeClass::Static
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_events() {
        assert_eq!(
            classify("onTap"),
            AttributeClass::Event {
                prefix: EventPrefix::On,
                event: "Tap"
            }
        );
        assert_eq!(
            classify("catchLongPress"),
            AttributeClass::Event {
                prefix: EventPrefix::Catch,
                event: "LongPress"
            }
        );
    }

    #[test]
    fn test_lowercase_after_prefix_is_static() {
        assert_eq!(classify("online"), AttributeClass::Static);
        assert_eq!(classify("on"), AttributeClass::Static);
    }

    #[test]
    fn test_directives() {
        assert_eq!(classify("a:for"), AttributeClass::Directive(Directive::For));
        assert_eq!(classify("a:elif"), AttributeClass::Directive(Directive::ElseIf));
        assert_eq!(
            classify("a:show"),
            AttributeClass::Directive(Directive::Other(SmolStr::new("show")))
        );
    }

    #[test]
    fn test_static() {
        assert_eq!(classify("class"), AttributeClass::Static);
        assert_eq!(classify("data-id"), AttributeClass::Static);
    }
}
