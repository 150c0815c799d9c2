//! The uniform lookup capability every source layer exposes.

use super::key::CanonicalKey;
use super::value::{Layer, RawValue};

/// A read-only view over one configuration source.
///
/// Implementations read externally owned state at call time and have no
/// side effects.
pub trait SourceLayer {
    /// Which layer this source represents.
    fn layer(&self) -> Layer;

    /// Keys this source can enumerate on its own.
    fn keys(&self) -> Vec<CanonicalKey>;

    /// Raw value for `key`, if the source knows it at all.
    ///
    /// A returned value is only *present* when `explicitly_set` is true; a
    /// flag that was not passed still reports its declared default here.
    fn lookup(&self, key: &CanonicalKey) -> Option<RawValue>;

    /// Value for `key` only if it was explicitly supplied.
    fn lookup_present(&self, key: &CanonicalKey) -> Option<RawValue> {
        self.lookup(key).filter(|raw| raw.explicitly_set)
    }
}
