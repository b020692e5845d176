//! String interner for qualified names.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access.
//! Interned strings are leaked to obtain `'static` lifetime; an interner is
//! expected to live for the process lifetime alongside the registries that
//! key on its [`Name`]s.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Interner storage: content map plus index-ordered string table.
struct Inner {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Inner {
    fn with_empty() -> Self {
        let mut inner = Inner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        // Pre-intern the empty string at index 0
        let empty: &'static str = "";
        inner.map.insert(empty, 0);
        inner.strings.push(empty);
        inner
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Interner exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Thread-safe string interner.
///
/// Provides O(1) lookup and identity comparison for interned strings.
/// Uses an `RwLock` for concurrent read access with writes only on first
/// sight of a string.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        StringInterner {
            inner: RwLock::new(Inner::with_empty()),
        }
    }

    /// Try to intern a string, returning its [`Name`] or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: check if already interned
        {
            let guard = self.inner.read();
            if let Some(&index) = guard.map.get(s) {
                return Ok(Name::new(index));
            }
        }

        // Slow path: need to insert
        let mut guard = self.inner.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s) {
            return Ok(Name::new(index));
        }

        // Leak the string to get 'static lifetime
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());

        let index = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);

        Ok(Name::new(index))
    }

    /// Intern a string, returning its [`Name`].
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity. Use [`StringInterner::try_intern`]
    /// for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the [`Name`] of an already-interned string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let guard = self.inner.read();
        guard.map.get(s).map(|&index| Name::new(index))
    }

    /// Look up the string for a [`Name`].
    pub fn lookup(&self, name: Name) -> &str {
        let guard = self.inner.read();
        guard.strings[name.index()]
    }

    /// Look up the string for a [`Name`], returning a `'static` reference.
    ///
    /// Safe because interned strings are leaked and never deallocated.
    pub fn lookup_static(&self, name: Name) -> &'static str {
        let guard = self.inner.read();
        guard.strings[name.index()]
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Check if the interner is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handle for thread-safe interning across components.
///
/// The engine, its loading contexts, and every contract descriptor keyed on
/// its `Name`s must share one interner; this newtype is the handle they
/// clone. Descriptors built against a different interner are not comparable.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
