//! Asynchronous CRS resolution.
//!
//! Inline definitions derive immediately. Authority codes look in the
//! definition store first, then ask the host fetcher for
//! `{lib_path}defs/{AUTH}{number}.js`, then for the lookup service page.
//! A missing algorithm is fetched as `{lib_path}projCode/{name}.js`,
//! followed by whatever it depends on.

pub mod fetch;
pub mod handle;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::catalog::defs::WGS84_DEFINITION;
use crate::catalog::DefinitionStore;
use crate::crs::{derive, Crs, CrsParams};
use crate::error::ProjError;
use crate::parse::{self, DefinitionSource, SrsCode};
use crate::proj::{ProjectionEntry, Registry};

pub use fetch::{extract_definition, NoFetcher, ResourceFetcher};
pub use handle::{Continuation, CrsHandle, HandleState};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Prefix for `defs/` and `projCode/` locations
    pub lib_path: String,
    pub defs_lookup_service: String,
    /// Substitute WGS84 when no definition can be fetched; otherwise the
    /// code fails with [`ProjError::Resource`]
    pub fallback_to_wgs84: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lib_path: String::new(),
            defs_lookup_service: "http://spatialreference.org/ref".to_string(),
            fallback_to_wgs84: true,
        }
    }
}

impl ResolverConfig {
    pub fn from_json(text: &str) -> Result<Self, ProjError> {
        serde_json::from_str(text).map_err(|e| ProjError::Config(format!("resolver config: {e}")))
    }
}

pub struct Resolver {
    config: ResolverConfig,
    fetcher: Arc<dyn ResourceFetcher>,
    registry: Arc<RwLock<Registry>>,
    defs: RwLock<DefinitionStore>,
    handles: Mutex<HashMap<String, Arc<CrsHandle>>>,
}

impl Resolver {
    /// Built-in definitions, the process-wide registry and no remote
    /// resources.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            fetcher: Arc::new(NoFetcher),
            registry: Registry::global(),
            defs: RwLock::new(DefinitionStore::builtin()),
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_registry(mut self, registry: Arc<RwLock<Registry>>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<RwLock<Registry>> {
        Arc::clone(&self.registry)
    }

    /// Add or replace the definition behind `code`.
    pub fn define(&self, code: &str, definition: &str) {
        let key = SrsCode::parse(code)
            .map(|c| c.code)
            .unwrap_or_else(|_| code.to_string());
        log::debug!("definition for '{key}' set");
        self.defs.write().insert(&key, definition);
    }

    /// Register an algorithm in this resolver's registry.
    pub fn register(&self, name: &str, entry: ProjectionEntry) -> Option<ProjectionEntry> {
        self.registry.write().register(name, entry)
    }

    /// Resolve without fetching: the definition and every algorithm it needs
    /// must already be local.
    pub fn load(&self, input: &str) -> Result<Arc<Crs>, ProjError> {
        let params = match parse::classify(input)? {
            DefinitionSource::Code(code) => {
                let text = self.defs.read().get(&code.code).ok_or_else(|| {
                    ProjError::Resource(format!("{code} needs fetching; use Resolver::resolve"))
                })?;
                derive::derive(parse::parse_definition_text(&text)?, Some(&code))?
            }
            source => derive_inline(source)?,
        };
        let registry = self.registry.read();
        Ok(Arc::new(Crs::new(params, &registry)?))
    }

    /// The handle for `input`, without starting its initialization. Codes
    /// share one handle per resolver; an inline definition shares its handle
    /// only until that handle settles.
    pub fn handle(&self, input: &str) -> Result<Arc<CrsHandle>, ProjError> {
        self.lookup(input).map(|(handle, _)| handle)
    }

    /// Drive `input` to readiness. A handle already claimed elsewhere is
    /// awaited rather than initialized again.
    pub async fn resolve(&self, input: &str) -> Result<Arc<CrsHandle>, ProjError> {
        let (handle, source) = self.lookup(input)?;
        if !handle.claim() {
            handle.ready().await?;
            return Ok(handle);
        }

        let keep = matches!(source, DefinitionSource::Code(_));
        let outcome = self.initialize(source).await;
        if outcome.is_err() || !keep {
            // a later request starts from scratch
            self.forget(&handle);
        }
        handle.settle(outcome.clone());
        outcome.map(|_| handle)
    }

    /// [`resolve`](Self::resolve) and unwrap the ready CRS.
    pub async fn crs(&self, input: &str) -> Result<Arc<Crs>, ProjError> {
        let handle = self.resolve(input).await?;
        handle
            .get()
            .ok_or_else(|| ProjError::NotReady(handle.code().to_string()))
    }

    fn lookup(&self, input: &str) -> Result<(Arc<CrsHandle>, DefinitionSource), ProjError> {
        let source = parse::classify(input)?;
        let key = match &source {
            DefinitionSource::Code(code) => code.code.clone(),
            DefinitionSource::Wkt(text) | DefinitionSource::ProjString(text) => text.clone(),
        };
        let handle = Arc::clone(
            self.handles
                .lock()
                .entry(key)
                .or_insert_with_key(|key| CrsHandle::pending(key)),
        );
        Ok((handle, source))
    }

    fn forget(&self, handle: &Arc<CrsHandle>) {
        let mut handles = self.handles.lock();
        if handles.get(handle.code()).is_some_and(|h| Arc::ptr_eq(h, handle)) {
            handles.remove(handle.code());
        }
    }

    async fn initialize(&self, source: DefinitionSource) -> Result<Arc<Crs>, ProjError> {
        let params = match source {
            DefinitionSource::Code(code) => {
                let text = self.definition_for(&code).await?;
                derive::derive(parse::parse_definition_text(&text)?, Some(&code))?
            }
            source => derive_inline(source)?,
        };
        self.ensure_algorithm(&params.proj_name).await?;
        let crs = {
            let registry = self.registry.read();
            Crs::new(params, &registry)?
        };
        Ok(Arc::new(crs))
    }

    async fn definition_for(&self, code: &SrsCode) -> Result<String, ProjError> {
        let local = self.defs.read().get(&code.code);
        if let Some(text) = local {
            return Ok(text);
        }

        let local_url = code.local_definition_url(&self.config.lib_path);
        log::debug!("fetching definition for {code} from {local_url}");
        let payload = match self.fetcher.fetch(&local_url).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                let service_url = code.service_definition_url(&self.config.defs_lookup_service);
                log::debug!("{err}; trying {service_url}");
                match self.fetcher.fetch(&service_url).await {
                    Ok(payload) => Some(payload),
                    Err(err) => {
                        log::warn!("failed to load projection definition for {code}: {err}");
                        None
                    }
                }
            }
        };

        let text = match payload {
            Some(payload) => extract_definition(&payload),
            None if self.config.fallback_to_wgs84 => {
                log::warn!("using WGS84 in place of {code}");
                WGS84_DEFINITION.to_string()
            }
            None => {
                return Err(ProjError::Resource(format!(
                    "no definition could be loaded for {code}"
                )))
            }
        };
        self.defs.write().insert(&code.code, &text);
        Ok(text)
    }

    /// Fetch and register `name` and its dependencies until the chain is
    /// complete.
    async fn ensure_algorithm(&self, name: &str) -> Result<(), ProjError> {
        let mut fetched: Vec<String> = Vec::new();
        loop {
            let missing = self.registry.read().missing_dependency(name);
            let Some(missing) = missing else {
                return Ok(());
            };
            if fetched.contains(&missing) {
                return Err(ProjError::Resource(format!(
                    "projection '{missing}' is still unavailable after fetching it"
                )));
            }

            let url = format!("{}projCode/{missing}.js", self.config.lib_path);
            log::debug!("fetching projection '{missing}' from {url}");
            let entry = self
                .fetcher
                .fetch_projection(&missing, &url)
                .await
                .map_err(|err| {
                    ProjError::Resource(format!("failed to find projection file for '{missing}': {err}"))
                })?;
            self.registry.write().register(&missing, entry);
            fetched.push(missing);
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

fn derive_inline(source: DefinitionSource) -> Result<CrsParams, ProjError> {
    match source {
        DefinitionSource::Wkt(text) => derive::derive(parse::wkt::parse(&text)?, None),
        DefinitionSource::ProjString(text) => derive::derive(parse::proj_string::parse(&text)?, None),
        DefinitionSource::Code(code) => Err(ProjError::Parse(format!(
            "'{code}' is an identifier, not a definition"
        ))),
    }
}
