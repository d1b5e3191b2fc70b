//! Dirty-flag cache shared by Transform and Camera.

/// A derived value that is recomputed on the next read after `invalidate`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cached<T> {
    value: T,
    dirty: bool,
}

impl<T: Copy> Cached<T> {
    /// Starts clean, holding a value that is already coherent with its inputs.
    #[inline]
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the cached value, running `update` first if it is stale.
    #[inline]
    pub fn get_or_update(&mut self, update: impl FnOnce() -> T) -> T {
        if self.dirty {
            self.value = update();
            self.dirty = false;
        }
        self.value
    }
}
