//! Anti-forgery token lookup.
//!
//! The token normally lives in a cookie set by the server.  When the cookie is
//! missing we fall back to the `csrfmiddlewaretoken` hidden input that the
//! server embeds in its HTML forms.

use scraper::{Html, Selector};

/// Name of the hidden form field carrying the token.
pub const FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Header attached to every state-changing request.
pub const HEADER: &str = "X-CSRFToken";

/// Find `name` in a `Cookie` header value (`"a=1; b=2"`), URL-decoded.
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, raw)| match urlencoding::decode(raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw.to_string(),
        })
        .filter(|v| !v.is_empty())
}

/// Value of the first `[name=csrfmiddlewaretoken]` element in `html`.
pub fn form_field_token(html: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[name={}]", FORM_FIELD)).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("value"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
