use rand::Rng;

use crate::module::Asset;

/// Uniform random choice over the assets of one namespace.
#[derive(Debug, Clone, Default)]
pub struct AssetPicker {
    assets: Vec<Asset>,
}

impl AssetPicker {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// Pick one asset using `rng`. `None` when the picker is empty.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&Asset> {
        if self.assets.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.assets.len());
        self.assets.get(index)
    }

    pub fn random(&self) -> Option<&Asset> {
        self.pick(&mut rand::rng())
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
