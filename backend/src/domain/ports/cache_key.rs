//! Cache namespace and key types shared by order cache adapters.
//!
//! Keys follow `{namespace}:{shape}:{order_id}` so the full and lite
//! representations of one order never collide, and every key owned by a
//! deployment can be swept with the `{namespace}:*` pattern.
use thiserror::Error;

use crate::domain::{OrderId, OrderShape};

/// Characters Redis `MATCH` treats as glob syntax.
const GLOB_METACHARACTERS: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Prefix delimiting every cache entry owned by one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheNamespace(String);

impl CacheNamespace {
    /// Construct a namespace after validating that it is non-empty and free
    /// of whitespace and glob metacharacters.
    ///
    /// The namespace is embedded verbatim in the sweep pattern, so any glob
    /// syntax in it would widen the sweep beyond the namespace.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheNamespaceValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheNamespaceValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(CacheNamespaceValidationError::ContainsWhitespace);
        }
        if let Some(found) = raw.chars().find(|c| GLOB_METACHARACTERS.contains(c)) {
            return Err(CacheNamespaceValidationError::ContainsGlobMetacharacter(found));
        }
        Ok(Self(raw))
    }

    /// Default namespace derived from the application name: `orders:{app}`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::CacheNamespace;
    ///
    /// let namespace = CacheNamespace::for_app("gin").expect("valid app name");
    /// assert_eq!(namespace.as_str(), "orders:gin");
    /// ```
    pub fn for_app(app_name: &str) -> Result<Self, CacheNamespaceValidationError> {
        if app_name.trim().is_empty() {
            return Err(CacheNamespaceValidationError::Empty);
        }
        Self::new(format!("orders:{app_name}"))
    }

    /// Borrow the namespace as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Glob pattern matching every key in the namespace.
    pub fn scan_pattern(&self) -> String {
        format!("{}:*", self.0)
    }

    /// Whether `key` lies under this namespace, compared literally.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::CacheNamespace;
    ///
    /// let namespace = CacheNamespace::new("orders:app").expect("valid namespace");
    /// assert!(namespace.owns("orders:app:full:1"));
    /// assert!(!namespace.owns("orders:appX:full:1"));
    /// assert!(!namespace.owns("orders:app"));
    /// ```
    pub fn owns(&self, key: &str) -> bool {
        key.strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with(':'))
    }

    /// Compose the cache key for one order representation.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::CacheNamespace;
    /// use backend::domain::{OrderId, OrderShape};
    ///
    /// let namespace = CacheNamespace::new("orders:app").expect("valid namespace");
    /// let id = OrderId::new(42).expect("positive id");
    /// assert_eq!(namespace.key_for(OrderShape::Lite, id).as_str(), "orders:app:lite:42");
    /// ```
    pub fn key_for(&self, shape: OrderShape, order_id: OrderId) -> OrderCacheKey {
        OrderCacheKey(format!("{}:{}:{}", self.0, shape.as_str(), order_id))
    }
}

impl std::fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully composed key for one cached order payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderCacheKey(String);

impl OrderCacheKey {
    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for OrderCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for OrderCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheNamespace`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheNamespaceValidationError {
    /// Namespace is empty after trimming whitespace.
    #[error("cache namespace must not be empty")]
    Empty,
    /// Namespace contains whitespace.
    #[error("cache namespace must not contain whitespace")]
    ContainsWhitespace,
    /// Namespace contains a character with glob meaning in a key pattern.
    #[error("cache namespace must not contain glob metacharacter {0:?}")]
    ContainsGlobMetacharacter(char),
}
