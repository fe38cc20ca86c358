//! Slug derivation and uniqueness probing.

use uuid::Uuid;

use crate::error::RepoError;
use crate::ports::PostRepository;

/// Upper bound on sequential `-1`, `-2`, ... probes before falling back to a
/// random suffix.
pub const MAX_SLUG_PROBES: u32 = 64;

/// Derive a URL-safe slug from a post title.
///
/// Lowercases and trims the title, strips everything outside ASCII
/// alphanumerics, underscores, whitespace, and hyphens, then collapses each
/// run of whitespace/underscores/hyphens into a single hyphen. The result
/// never starts or ends with a hyphen. A title with no usable characters
/// yields an empty slug.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
        }
        // Anything else is stripped without acting as a separator.
    }

    slug
}

/// Find a slug that is unused across all posts, starting from `base` and
/// probing `base-1`, `base-2`, ... in order.
///
/// `exclude` removes one post from the collision check so that updating a
/// post does not collide with its own current slug. The probe count is
/// bounded; past [`MAX_SLUG_PROBES`] a random suffix is appended instead of
/// probing forever.
pub async fn unique_slug(
    posts: &dyn PostRepository,
    base: &str,
    exclude: Option<Uuid>,
) -> Result<String, RepoError> {
    let mut candidate = base.to_string();

    for counter in 1..=MAX_SLUG_PROBES {
        if !posts.slug_exists(&candidate, exclude).await? {
            return Ok(candidate);
        }
        candidate = format!("{base}-{counter}");
    }

    // Pathological collision count; give up on sequential probing.
    let suffix = Uuid::new_v4().simple().to_string();
    Ok(format!("{base}-{}", &suffix[..8]))
}
