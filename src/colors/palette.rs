use async_trait::async_trait;

use super::{ColorPair, ColorResolver};
use crate::error::ResolverError;

const PALETTE: &[&str] = &[
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc", "#2f4554", "#61a0a8", "#d48265",
];

/// Picks two distinct palette colors from a hash of the entity id, so the same
/// entity keeps its colors across frames and runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaletteColorResolver;

impl PaletteColorResolver {
    pub fn colors_for(entity_id: &str) -> ColorPair {
        let hash = fnv1a(entity_id.as_bytes());
        let len = PALETTE.len() as u64;
        let first = (hash % len) as usize;
        let mut second = ((hash / len) % len) as usize;
        if second == first {
            second = (first + 1) % PALETTE.len();
        }
        [PALETTE[first].to_string(), PALETTE[second].to_string()]
    }
}

#[async_trait]
impl ColorResolver for PaletteColorResolver {
    async fn get_colors(&self, entity_id: &str) -> Result<ColorPair, ResolverError> {
        if entity_id.is_empty() {
            return Err(ResolverError::new(entity_id, "empty entity id"));
        }
        Ok(Self::colors_for(entity_id))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
