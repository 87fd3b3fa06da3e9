//! AXML markup parser.
//!
//! This crate turns Alipay mini-program markup into a tree of element,
//! text and comment nodes. Mustache expressions in attribute values and
//! text are parsed with swc as they are read; a bad expression is kept as
//! an [`ExpressionError`] on its node and never fails the file.

pub mod ast;
pub mod error;
pub mod expression;
pub mod lexer;
pub mod mustache;
pub mod parser;

pub use ast::*;
pub use error::{ExpressionError, ExpressionResult};
pub use parser::parse_markup;

/// Parse AXML source into a markup tree.
pub fn parse(source: &str) -> MarkupRoot {
    parse_markup(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let source = r#"<import-sjs from="./fmt.sjs" name="fmt" />
<view class="page">
  <view a:for="{{ items }}" a:key="id" onTap="select">{{ item.name }}</view>
</view>
"#;
        let root = parse(source);
        assert_eq!(root.children.len(), 2);

        let page = root.children[1].as_element().unwrap();
        let row = page.children[0].as_element().unwrap();
        assert!(row.has_single_text_child());
        assert_eq!(row.attr_value("a:for"), Some("{{ items }}"));
    }
}
