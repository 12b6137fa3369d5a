//! Hash classification index.
//!
//! Lookups run once per texture upload, so the index trades build effort for
//! query locality: 256 buckets keyed on the hash's top byte, each holding
//! packed `category << 24 | hash low bits` words. A bucket scan compares
//! only the low 24 bits; the top byte already matched by bucket choice.

use tracing::debug;

use super::TextureCategory;
use super::hashes::HASHES_PER_CATEGORY;

const BUCKETS: usize = 256;
const LOW_MASK: u32 = 0x00FF_FFFF;

pub struct ClassificationIndex {
    buckets: Vec<Vec<u32>>,
}

impl ClassificationIndex {
    /// Build the index from the curated hash lists.
    pub fn build() -> Self {
        let mut counts = [0usize; BUCKETS];
        for (_, hashes) in HASHES_PER_CATEGORY {
            for hash in *hashes {
                counts[(hash >> 24) as usize] += 1;
            }
        }

        let mut buckets: Vec<Vec<u32>> =
            counts.iter().map(|&count| vec![0u32; count]).collect();

        // Fill each bucket back to front, reusing the counts as cursors.
        for (category, hashes) in HASHES_PER_CATEGORY {
            for hash in *hashes {
                let bucket = (hash >> 24) as usize;
                counts[bucket] -= 1;
                buckets[bucket][counts[bucket]] =
                    ((*category as u32) << 24) | (hash & LOW_MASK);
            }
        }

        let total: usize = buckets.iter().map(Vec::len).sum();
        debug!("Texture classification index built with {} entries", total);

        Self { buckets }
    }

    /// Category for a texture hash, [`TextureCategory::Unknown`] when the
    /// hash is in no list.
    pub fn query(&self, hash: u32) -> TextureCategory {
        let low = hash & LOW_MASK;
        self.buckets[(hash >> 24) as usize]
            .iter()
            .find(|&&entry| entry & LOW_MASK == low)
            .and_then(|&entry| TextureCategory::from_u8((entry >> 24) as u8))
            .unwrap_or(TextureCategory::Unknown)
    }
}

impl Default for ClassificationIndex {
    fn default() -> Self {
        Self::build()
    }
}
