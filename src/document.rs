//! HTML lookup helpers built on the `scraper` crate.
//!
//! Extractors never reach into `scraper` directly; they go through the small
//! set of lookups below so that every structural miss surfaces the same way,
//! as `None`.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Parse a full HTML document.
pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// First element in `doc` matching the CSS selector `css`.
///
/// An unparseable selector is logged and treated as a miss.
pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = match Selector::parse(css) {
        Ok(s) => s,
        Err(e) => {
            warn!(css, error = %e, "Invalid CSS selector");
            return None;
        }
    };
    doc.select(&selector).next()
}

/// First descendant of `element` with tag `tag` carrying class `class`.
///
/// `element` itself is not considered.
pub fn find<'a>(element: ElementRef<'a>, tag: &str, class: &str) -> Option<ElementRef<'a>> {
    descendants(element).find(|el| {
        let value = el.value();
        value.name() == tag && value.classes().any(|c| c == class)
    })
}

/// First descendant of `element` whose attribute `attr` matches `pattern`.
pub fn find_by_attr_regex<'a>(
    element: ElementRef<'a>,
    attr: &str,
    pattern: &Regex,
) -> Option<ElementRef<'a>> {
    descendants(element).find(|el| el.value().attr(attr).is_some_and(|v| pattern.is_match(v)))
}

/// All text beneath `element`, concatenated and trimmed.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Value of attribute `name` on `element`.
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

fn descendants<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}
