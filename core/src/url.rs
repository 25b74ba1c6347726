//! URL joining and path templating.
//!
//! Path parameters are inserted verbatim. Nothing here percent-encodes, so an
//! id containing `/` or `?` changes the shape of the URL; callers that need
//! such ids must encode them first.

/// Join URL segments with exactly one `/` between them.
///
/// Leading and trailing slashes are stripped from every segment and empty
/// segments are skipped, so `["https://host/", "", "/v2/info/"]` becomes
/// `"https://host/v2/info"`.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for segment in segments {
        let trimmed = segment.as_ref().trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(trimmed);
    }
    out
}

/// Substitute `{name}` placeholders in `template` with the matching values.
///
/// The template is scanned once from left to right and inserted values are
/// never rescanned, so a value containing `{...}` lands in the path as-is.
/// Placeholders without a value are left as-is.
pub fn expand(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            break;
        };
        let name = &tail[1..close];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}
