use apifetch_api::ApiClient;
use apifetch_registry::{ApiRegistry, FetchConfig};
use apifetch_types::{ApiProfile, FetchError, FetchResult, Record, RegistryError};
use apifetch_util::block_on_future;
use tracing::{debug, info};

use crate::fetch::fetch_profile;
use crate::presenter::{DisplayOptions, DisplayOutcome, Presenter};

/// What the fetcher currently holds.
///
/// `fetch` moves the state from whatever it was to `Ready` or `Failed`; the
/// in-flight phase lives entirely inside that blocking call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Ready(Vec<Record>),
    Failed(FetchError),
}

/// Fetches one profile's records and keeps the latest outcome for display.
///
/// A fetcher is bound to a single profile. Each [`Fetcher::fetch`] call issues
/// one request and replaces the stored outcome; [`Fetcher::display`] and
/// [`Fetcher::count`] read the stored outcome without touching the network.
#[derive(Debug, Clone)]
pub struct Fetcher {
    profile: ApiProfile,
    config: FetchConfig,
    state: FetchState,
}

impl Fetcher {
    pub fn new(profile: ApiProfile, config: FetchConfig) -> Self {
        Self {
            profile,
            config,
            state: FetchState::Idle,
        }
    }

    /// Resolve `name` in the built-in registry and create a fetcher for it.
    ///
    /// # Errors
    /// [`RegistryError::UnknownProfile`], before any network activity.
    pub fn for_profile(name: &str, config: FetchConfig) -> Result<Self, RegistryError> {
        let profile = ApiRegistry::builtin().lookup(name)?;
        Ok(Self::new(profile.clone(), config))
    }

    pub fn profile(&self) -> &ApiProfile {
        &self.profile
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Fetch the profile's records, blocking until the response arrives or the
    /// timeout expires.
    ///
    /// The outcome replaces whatever the fetcher held before. Returns the
    /// number of records fetched, or the classified failure.
    pub fn fetch(&mut self) -> Result<usize, FetchError> {
        info!(profile = %self.profile.title, url = %self.profile.base_url, "fetching data");
        let result = self.run_fetch();
        let summary = result.as_ref().map(Vec::len).map_err(|error| error.clone());
        self.state = match result {
            Ok(records) => FetchState::Ready(records),
            Err(error) => FetchState::Failed(error),
        };
        if let Ok(count) = summary {
            debug!(profile = %self.profile.name, count, "fetch succeeded");
        }
        summary
    }

    fn run_fetch(&self) -> FetchResult {
        let url = self.profile.base_url.clone();
        let client = ApiClient::new(self.config.timeout, self.config.user_agent.clone())
            .map_err(|error| FetchError::connection_failure(&url, error.to_string()))?;
        let profile = self.profile.clone();

        block_on_future(async move { fetch_profile(&client, &profile).await })
            .map_err(|error| FetchError::connection_failure(&url, error.to_string()))?
    }

    /// Records from the last successful fetch.
    pub fn records(&self) -> Option<&[Record]> {
        match &self.state {
            FetchState::Ready(records) => Some(records),
            FetchState::Idle | FetchState::Failed(_) => None,
        }
    }

    /// The classified error from the last fetch, if it failed.
    pub fn last_error(&self) -> Option<&FetchError> {
        match &self.state {
            FetchState::Failed(error) => Some(error),
            FetchState::Idle | FetchState::Ready(_) => None,
        }
    }

    /// Number of records from the last successful fetch, before any filter.
    /// Zero before the first fetch and after a failed one.
    pub fn count(&self) -> usize {
        self.records().map_or(0, <[Record]>::len)
    }

    /// Filter, limit and render the stored records.
    ///
    /// Returns [`DisplayOutcome::NoData`] unless the last fetch succeeded.
    pub fn display(&self, options: &DisplayOptions) -> DisplayOutcome {
        match self.records() {
            Some(records) => DisplayOutcome::Listing(Presenter::new(&self.profile).render(records, options)),
            None => DisplayOutcome::NoData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apifetch_registry::JSONPLACEHOLDER;

    #[test]
    fn starts_idle_with_no_data() {
        let fetcher = Fetcher::for_profile(JSONPLACEHOLDER, FetchConfig::default()).expect("known profile");
        assert_eq!(fetcher.state(), &FetchState::Idle);
        assert_eq!(fetcher.count(), 0);
        assert_eq!(fetcher.display(&DisplayOptions::default()), DisplayOutcome::NoData);
        assert!(fetcher.last_error().is_none());
    }

    #[test]
    fn unknown_profile_fails_before_fetching() {
        let error = Fetcher::for_profile("nope", FetchConfig::default()).expect_err("unknown profile");
        assert!(matches!(error, RegistryError::UnknownProfile { ref name, .. } if name == "nope"));
    }

    #[test]
    fn invalid_base_url_is_a_connection_failure() {
        let profile = apifetch_registry::builtin::jsonplaceholder().with_base_url("not a url");
        let mut fetcher = Fetcher::new(profile, FetchConfig::default());
        let error = fetcher.fetch().expect_err("invalid url");
        assert!(matches!(error, FetchError::ConnectionFailure { .. }), "{error}");
        assert_eq!(fetcher.last_error(), Some(&error));
        assert_eq!(fetcher.count(), 0);
    }
}
