use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::lookup::GeographicLookup;

/// Failure to load any of the four lookup documents. A single failure fails
/// the whole load.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid lookup base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch {resource}: {source}")]
    Fetch {
        resource: LookupResource,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {resource} returned HTTP {status}")]
    Status {
        resource: LookupResource,
        status: u16,
    },

    #[error("Failed to read {resource}: {source}")]
    Io {
        resource: LookupResource,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {resource}: {source}")]
    Decode {
        resource: LookupResource,
        #[source]
        source: serde_json::Error,
    },
}

/// The four static documents a lookup is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResource {
    AllProvinces,
    ProvinceDistricts,
    DistrictMunicipalities,
    MunicipalityWards,
}

impl LookupResource {
    pub fn file_name(self) -> &'static str {
        match self {
            LookupResource::AllProvinces => "allProvinces.json",
            LookupResource::ProvinceDistricts => "provinceDistrictsMap.json",
            LookupResource::DistrictMunicipalities => "districtMunicipalitiesMap.json",
            LookupResource::MunicipalityWards => "municipalitiesWardsMap.json",
        }
    }
}

impl std::fmt::Display for LookupResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Somewhere the lookup documents can be loaded from
#[async_trait]
pub trait LookupSource: Send + Sync {
    /// Load all four documents; all or nothing
    async fn load(&self) -> Result<GeographicLookup, LookupError>;

    /// Where the documents come from, for logs
    fn describe(&self) -> String;
}

fn decode<T: DeserializeOwned>(resource: LookupResource, bytes: &[u8]) -> Result<T, LookupError> {
    serde_json::from_slice(bytes).map_err(|source| LookupError::Decode { resource, source })
}

/// Fetches the documents over HTTP from `<base>/<file name>`
#[derive(Debug, Clone)]
pub struct HttpLookupSource {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpLookupSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        // Url::join replaces the last path segment unless the base ends in '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = url::Url::parse(&normalized)
            .map_err(|_| LookupError::InvalidBaseUrl(base_url.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LookupError::Client)?;
        Ok(Self { client, base })
    }

    pub fn resource_url(&self, resource: LookupResource) -> Result<url::Url, LookupError> {
        self.base
            .join(resource.file_name())
            .map_err(|_| LookupError::InvalidBaseUrl(self.base.to_string()))
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: LookupResource) -> Result<T, LookupError> {
        let url = self.resource_url(resource)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LookupError::Fetch { resource, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| LookupError::Fetch { resource, source })?;
        decode(resource, &body)
    }
}

#[async_trait]
impl LookupSource for HttpLookupSource {
    async fn load(&self) -> Result<GeographicLookup, LookupError> {
        let (all_provinces, province_districts, district_municipalities, municipality_wards) = futures::try_join!(
            self.fetch(LookupResource::AllProvinces),
            self.fetch(LookupResource::ProvinceDistricts),
            self.fetch(LookupResource::DistrictMunicipalities),
            self.fetch(LookupResource::MunicipalityWards)
        )?;

        Ok(GeographicLookup {
            all_provinces,
            province_districts,
            district_municipalities,
            municipality_wards,
        })
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Reads the documents from a local directory
#[derive(Debug, Clone)]
pub struct DirLookupSource {
    dir: PathBuf,
}

impl DirLookupSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read<T: DeserializeOwned>(&self, resource: LookupResource) -> Result<T, LookupError> {
        let path = self.dir.join(resource.file_name());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| LookupError::Io { resource, source })?;
        decode(resource, &bytes)
    }
}

#[async_trait]
impl LookupSource for DirLookupSource {
    async fn load(&self) -> Result<GeographicLookup, LookupError> {
        let (all_provinces, province_districts, district_municipalities, municipality_wards) = futures::try_join!(
            self.read(LookupResource::AllProvinces),
            self.read(LookupResource::ProvinceDistricts),
            self.read(LookupResource::DistrictMunicipalities),
            self.read(LookupResource::MunicipalityWards)
        )?;

        Ok(GeographicLookup {
            all_provinces,
            province_districts,
            district_municipalities,
            municipality_wards,
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Progress of a lookup load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
struct Loaded {
    lookup: Arc<GeographicLookup>,
    state: LoadState,
}

/// Load-once, never-invalidated lookup cache.
///
/// A failed load is terminal: the cache holds an empty lookup for the rest of
/// its lifetime, which leaves every selector level disabled.
#[derive(Debug, Default)]
pub struct SharedLookup {
    cell: OnceCell<Loaded>,
}

static GLOBAL: Lazy<SharedLookup> = Lazy::new(SharedLookup::new);

impl SharedLookup {
    pub fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// Process-wide instance
    pub fn global() -> &'static SharedLookup {
        &GLOBAL
    }

    /// Return the cached lookup, loading it from `source` on first use.
    /// Concurrent callers wait for the single in-flight load.
    pub async fn get_or_load(&self, source: &dyn LookupSource) -> Arc<GeographicLookup> {
        let loaded = self
            .cell
            .get_or_init(|| async {
                match source.load().await {
                    Ok(lookup) => {
                        info!(
                            "Loaded address lookup from {} ({} provinces)",
                            source.describe(),
                            lookup.all_provinces.len()
                        );
                        Loaded {
                            lookup: Arc::new(lookup),
                            state: LoadState::Ready,
                        }
                    }
                    Err(e) => {
                        error!("Address lookup unavailable from {}: {}", source.describe(), e);
                        Loaded {
                            lookup: Arc::new(GeographicLookup::empty()),
                            state: LoadState::Failed,
                        }
                    }
                }
            })
            .await;
        loaded.lookup.clone()
    }

    pub fn state(&self) -> LoadState {
        self.cell.get().map(|loaded| loaded.state).unwrap_or(LoadState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixtures(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LookupSource for CountingSource {
        async fn load(&self) -> Result<GeographicLookup, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LookupError::Status {
                    resource: LookupResource::AllProvinces,
                    status: 500,
                });
            }
            Ok(crate::testing::sample_lookup())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[tokio::test]
    async fn dir_source_loads_all_four_documents() {
        let lookup = DirLookupSource::new(fixtures("lookup")).load().await.unwrap();
        assert_eq!(lookup, crate::testing::sample_lookup());
    }

    #[tokio::test]
    async fn malformed_document_fails_whole_load() {
        let err = DirLookupSource::new(fixtures("malformed")).load().await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::Decode {
                resource: LookupResource::ProvinceDistricts,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_directory_fails_with_io_error() {
        let err = DirLookupSource::new(fixtures("does-not-exist")).load().await.unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
    }

    #[test]
    fn http_source_joins_file_names_onto_base() {
        let source = HttpLookupSource::new("http://localhost:3000/data", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.resource_url(LookupResource::MunicipalityWards).unwrap().as_str(),
            "http://localhost:3000/data/municipalitiesWardsMap.json"
        );
        assert!(matches!(
            HttpLookupSource::new("not a url", Duration::from_secs(1)),
            Err(LookupError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn shared_lookup_loads_once() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let shared = SharedLookup::new();
        assert_eq!(shared.state(), LoadState::Loading);

        let first = shared.get_or_load(&source).await;
        let second = shared.get_or_load(&source).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(shared.state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn failed_load_is_terminal_and_empty() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let shared = SharedLookup::new();
        let lookup = shared.get_or_load(&source).await;
        assert!(lookup.is_empty());
        assert_eq!(shared.state(), LoadState::Failed);

        shared.get_or_load(&source).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
