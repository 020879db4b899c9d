//! Per-entity gradient colors for the bars.
//!
//! [`ColorResolver`] is the async lookup the frame builder depends on.
//! [`PaletteColorResolver`] derives a stable pair from the entity id and
//! [`CachedColorResolver`] memoizes any other resolver.

mod cached;
mod palette;

pub use cached::CachedColorResolver;
pub use palette::PaletteColorResolver;

use async_trait::async_trait;
use tracing::warn;

use crate::error::ResolverError;

/// `[primary, secondary]` CSS colors of a bar gradient.
pub type ColorPair = [String; 2];

/// Gradient used when a lookup fails.
pub const FALLBACK_COLORS: [&str; 2] = ["#8b949e", "#c9d1d9"];

pub fn fallback_colors() -> ColorPair {
    FALLBACK_COLORS.map(str::to_string)
}

/// Resolves the two gradient colors for an entity.
#[async_trait]
pub trait ColorResolver: Send + Sync {
    async fn get_colors(&self, entity_id: &str) -> Result<ColorPair, ResolverError>;
}

/// Looks up `entity_id`, substituting [`FALLBACK_COLORS`] on failure.
pub async fn resolve_or_fallback<R: ColorResolver + ?Sized>(
    resolver: &R,
    entity_id: &str,
) -> ColorPair {
    match resolver.get_colors(entity_id).await {
        Ok(colors) => colors,
        Err(e) => {
            warn!(entity_id, error = %e, "Color lookup failed, using fallback gradient");
            fallback_colors()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl ColorResolver for Failing {
        async fn get_colors(&self, entity_id: &str) -> Result<ColorPair, ResolverError> {
            Err(ResolverError::new(entity_id, "avatar unavailable"))
        }
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let colors = resolve_or_fallback(&Failing, "alice").await;
        assert_eq!(colors, fallback_colors());
    }
}
