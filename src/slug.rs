use crate::error::AppError;

/// Normalizes text into a URL slug: lowercase ASCII alphanumerics separated by single
/// hyphens. Anything else (spaces, punctuation, non-ASCII) acts as a separator.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Picks the explicit slug if one was supplied, otherwise derives it from `fallback`.
/// Either way the result is normalized and must not be empty.
pub fn resolve_slug(explicit: Option<&str>, fallback: &str) -> Result<String, AppError> {
    let source = match explicit {
        Some(s) if !s.trim().is_empty() => s,
        _ => fallback,
    };
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(AppError::Validation(format!(
            "cannot derive a slug from '{source}'"
        )));
    }
    Ok(slug)
}

/// Normalizes a slug supplied in a partial update, if any.
pub fn normalize_update_slug(slug: &mut Option<String>) -> Result<(), AppError> {
    if let Some(raw) = slug.take() {
        let normalized = slugify(&raw);
        if normalized.is_empty() {
            return Err(AppError::Validation(format!("invalid slug '{raw}'")));
        }
        *slug = Some(normalized);
    }
    Ok(())
}
