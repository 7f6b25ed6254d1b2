//! Helpers for upstream symbol identifiers.
//!
//! Identifiers look like
//! ``scip-go gomod github.com/acme/widget v1 `github.com/acme/widget/pkg`/Foo().``
//! and are otherwise treated as opaque strings: the only structure read from
//! them is the text around the final backtick and the package field used to
//! auto-detect the repository.

/// Returns true for identifiers scoped to a single document (`local <n>`).
pub fn is_local_symbol(id: &str) -> bool {
    id.starts_with("local ")
}

/// Human-readable name: the text after the last backtick with a leading `/`
/// and one trailing `#`, `.` and `()` stripped, in that order.
pub fn extract_name(id: &str) -> &str {
    let Some(tick) = id.rfind('`') else {
        return id;
    };
    let mut name = &id[tick + 1..];
    name = name.strip_prefix('/').unwrap_or(name);
    name = name.strip_suffix('#').unwrap_or(name);
    name = name.strip_suffix('.').unwrap_or(name);
    name = name.strip_suffix("()").unwrap_or(name);
    name
}

/// Container portion of an identifier, up to and including the last backtick.
pub fn extract_key(id: &str) -> &str {
    match id.rfind('`') {
        Some(tick) => &id[..=tick],
        None => id,
    }
}

/// Whether a user-supplied short name designates `id`.
///
/// Accepts the exact name, the name with a call suffix, or a dotted
/// qualification ending in the name.
pub fn matches_name(id: &str, query: &str) -> bool {
    let name = extract_name(id);
    if name == query {
        return true;
    }
    if name
        .strip_suffix("()")
        .is_some_and(|stripped| stripped == query)
    {
        return true;
    }
    name.len() > query.len()
        && name.ends_with(query)
        && name.as_bytes()[name.len() - query.len() - 1] == b'.'
}

/// Package field of a non-local identifier (`<scheme> <manager> <package> ...`).
pub fn package_of(id: &str) -> Option<&str> {
    if id.is_empty() || is_local_symbol(id) {
        return None;
    }
    let mut parts = id.splitn(4, ' ');
    let _scheme = parts.next()?;
    let _manager = parts.next()?;
    parts.next().filter(|p| !p.is_empty())
}
