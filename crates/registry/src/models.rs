use apifetch_types::{ApiProfile, RegistryError};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::builtin::builtin_profiles;

static BUILTIN_REGISTRY: Lazy<ApiRegistry> = Lazy::new(|| ApiRegistry::from_profiles(builtin_profiles()));

/// Immutable table of API profiles keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
    profiles: IndexMap<String, ApiProfile>,
}

impl ApiRegistry {
    /// The process-wide registry of built-in profiles.
    ///
    /// Built on first access and never mutated afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use apifetch_registry::ApiRegistry;
    ///
    /// let registry = ApiRegistry::builtin();
    /// let profile = registry.lookup("jsonplaceholder").expect("built-in profile");
    /// assert_eq!(profile.title, "JSONPlaceholder Users API");
    /// ```
    pub fn builtin() -> &'static ApiRegistry {
        &BUILTIN_REGISTRY
    }

    /// Build a registry from an explicit profile list. Later duplicates replace earlier ones.
    pub fn from_profiles(profiles: impl IntoIterator<Item = ApiProfile>) -> Self {
        let profiles = profiles.into_iter().map(|profile| (profile.name.clone(), profile)).collect();
        Self { profiles }
    }

    /// Resolve a profile by name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownProfile`] when `name` is not registered. Matching is exact.
    pub fn lookup(&self, name: &str) -> Result<&ApiProfile, RegistryError> {
        self.profiles
            .get(name)
            .ok_or_else(|| RegistryError::unknown_profile(name, self.names().into_iter().map(String::from).collect()))
    }

    /// Profile names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ApiProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
