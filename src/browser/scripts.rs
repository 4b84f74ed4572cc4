//! In-page expressions behind each [`crate::page::PageHandle`] operation.
//!
//! Every expression evaluates to a JSON string so that `null`/`undefined`
//! results survive the CDP round trip. Placeholders are substituted with
//! JSON-encoded arguments by [`bind`].

use crate::Result;

pub(crate) const TITLE: &str = "JSON.stringify(document.title || '')";

pub(crate) const CONTENT: &str = r#"JSON.stringify(
  (document.doctype ? new XMLSerializer().serializeToString(document.doctype) : '') +
  (document.documentElement ? document.documentElement.outerHTML : '')
)"#;

pub(crate) const QUERY_ALL: &str = r#"JSON.stringify(
  Array.from(document.querySelectorAll(__SELECTOR__)).map(el => ({
    tag: el.tagName.toLowerCase(),
    text: el.innerText ?? el.textContent ?? '',
    attributes: Object.fromEntries(Array.from(el.attributes).map(a => [a.name, a.value])),
    outerHtml: el.outerHTML
  }))
)"#;

pub(crate) const COUNT: &str = "JSON.stringify(document.querySelectorAll(__SELECTOR__).length)";

pub(crate) const NAVIGATION_TIMING: &str = r#"JSON.stringify({
  navigationStart: performance.timing.navigationStart,
  loadEventEnd: performance.timing.loadEventEnd
})"#;

pub(crate) const RESOURCE_TIMINGS: &str = r#"JSON.stringify(
  performance.getEntriesByType('resource').map(r => ({
    name: r.name,
    startTime: r.startTime,
    requestStart: r.requestStart
  }))
)"#;

pub(crate) const COMPUTED_STYLE: &str = r#"JSON.stringify((() => {
  const el = document.querySelector(__SELECTOR__);
  if (!el) return null;
  const value = window.getComputedStyle(el)[__PROPERTY__];
  return typeof value === 'string' ? value : null;
})())"#;

pub(crate) const STYLESHEET_HREFS: &str =
    "JSON.stringify(Array.from(document.styleSheets).map(s => s.href).filter(Boolean))";

// Reading cssRules of a cross-origin sheet throws; the error surfaces to the caller.
pub(crate) const STYLESHEET_HAS_MEDIA: &str = r#"JSON.stringify((() => {
  const sheet = Array.from(document.styleSheets).find(s => s.href === __HREF__);
  if (!sheet) throw new Error('stylesheet not found');
  return Array.from(sheet.cssRules).some(rule => rule.cssText.includes('@media'));
})())"#;

/// Substitute `__NAME__` placeholders with JSON-encoded string arguments.
pub(crate) fn bind(script: &str, args: &[(&str, &str)]) -> Result<String> {
    let mut bound = script.to_string();
    for (name, value) in args {
        let encoded = serde_json::to_string(value)?;
        bound = bound.replace(&format!("__{name}__"), &encoded);
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_quotes_selector_arguments() {
        let script = bind(COUNT, &[("SELECTOR", r#"a[href*="x"]"#)]).expect("bind");
        assert_eq!(
            script,
            r#"JSON.stringify(document.querySelectorAll("a[href*=\"x\"]").length)"#
        );
    }

    #[test]
    fn bind_replaces_every_placeholder() {
        let script = bind(
            COMPUTED_STYLE,
            &[("SELECTOR", "body"), ("PROPERTY", "media")],
        )
        .expect("bind");
        assert!(script.contains(r#"document.querySelector("body")"#));
        assert!(script.contains(r#"getComputedStyle(el)["media"]"#));
        assert!(!script.contains("__"));
    }
}
