//! Fixed text emitted alongside generated files.

/// The `setData` helper placed first in every `methods` block.
///
/// Assigns each key directly onto the instance, matching the flattened
/// `this.x` access the method bodies are rewritten to.
pub const SET_DATA_HELPER: &str = r#"setData(data, callback) {
  for (const key in data) {
    this[key] = data[key];
  }
  if (typeof callback === 'function') {
    this.$nextTick(callback);
  }
},"#;

/// Ambient declarations for globals the converted code still references.
pub const DECLARE_DTS: &str = r#"/**
 * Global declarations
 * Type declarations for globals available in mini-program code
 */

// Global `my` API object
declare const my: any;

// Page constructor
declare function Page(options: any): any;

// Component constructor
declare function Component(options: any): any;
"#;

/// File name of the declaration stub written at the output root.
pub const DECLARE_DTS_FILE: &str = "declare.d.ts";

/// Contents of a style file created when no source stylesheet exists.
pub const STYLE_PLACEHOLDER: &str = "/* styles */\n";

/// Class of the single root element wrapping every template.
pub const ROOT_CLASS: &str = "app-container";

/// Check if a string can be used as an unquoted object key.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Render an object key, quoting it when needed.
pub fn object_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("count"));
        assert!(is_identifier("$el"));
        assert!(is_identifier("_private1"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("user-name"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("count"), "count");
        assert_eq!(object_key("user-name"), "'user-name'");
        assert_eq!(object_key("it's"), "'it\\'s'");
    }
}
