//! Naming styles applied to every element and attribute name.

use alloc::string::String;

use heck::{ToKebabCase, ToLowerCamelCase, ToUpperCamelCase};

/// Maps schema names to document names.
///
/// The style is applied both when writing and when matching nodes on
/// read, so a document written with a style must be read with it.
///
/// # Examples
///
/// ```
/// use vc_bind::style::{CamelCaseStyle, HyphenStyle, Style};
///
/// assert_eq!(CamelCaseStyle.element("order_line"), "OrderLine");
/// assert_eq!(CamelCaseStyle.attribute("order_line"), "orderLine");
/// assert_eq!(HyphenStyle.element("orderLine"), "order-line");
/// ```
pub trait Style: Send + Sync {
    fn element(&self, name: &str) -> String;

    fn attribute(&self, name: &str) -> String;
}

/// Leaves names as declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStyle;

impl Style for IdentityStyle {
    #[inline]
    fn element(&self, name: &str) -> String {
        String::from(name)
    }

    #[inline]
    fn attribute(&self, name: &str) -> String {
        String::from(name)
    }
}

/// `UpperCamel` elements and `lowerCamel` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseStyle;

impl Style for CamelCaseStyle {
    fn element(&self, name: &str) -> String {
        name.to_upper_camel_case()
    }

    fn attribute(&self, name: &str) -> String {
        name.to_lower_camel_case()
    }
}

/// `kebab-case` for both elements and attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyphenStyle;

impl Style for HyphenStyle {
    fn element(&self, name: &str) -> String {
        name.to_kebab_case()
    }

    fn attribute(&self, name: &str) -> String {
        name.to_kebab_case()
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentityStyle, Style};

    #[test]
    fn identity_keeps_names() {
        assert_eq!(IdentityStyle.element("someName"), "someName");
        assert_eq!(IdentityStyle.attribute("some_name"), "some_name");
    }
}
