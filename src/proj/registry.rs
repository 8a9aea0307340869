//! Name-keyed projection algorithms.
//!
//! A CRS looks its algorithm up once, at initialization; the boxed
//! [`Projection`] it gets back is owned by that CRS from then on.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::{self as p, Projection};

pub type InitFn = dyn Fn(&CrsParams) -> Result<Box<dyn Projection>, ProjError> + Send + Sync;

/// A registered algorithm: its constructor and, optionally, the algorithm
/// it builds on (which must be registered before it can be initialized).
#[derive(Clone)]
pub struct ProjectionEntry {
    init: Arc<InitFn>,
    depends_on: Option<String>,
}

impl ProjectionEntry {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn(&CrsParams) -> Result<Box<dyn Projection>, ProjError> + Send + Sync + 'static,
    {
        Self {
            init: Arc::new(init),
            depends_on: None,
        }
    }

    pub fn depends_on(mut self, name: &str) -> Self {
        self.depends_on = Some(name.to_string());
        self
    }

    pub fn dependency(&self) -> Option<&str> {
        self.depends_on.as_deref()
    }

    pub fn init(&self, params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
        (self.init)(params)
    }
}

impl fmt::Debug for ProjectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionEntry")
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<Arc<RwLock<Registry>>> =
    LazyLock::new(|| Arc::new(RwLock::new(Registry::builtin())));

#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<String, ProjectionEntry>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every algorithm shipped with the crate.
    pub fn builtin() -> Self {
        let mut r = Self::empty();
        r.insert("longlat", ProjectionEntry::new(p::longlat::init));
        r.insert("identity", ProjectionEntry::new(p::longlat::init));
        r.insert("merc", ProjectionEntry::new(p::mercator::init));
        r.insert("tmerc", ProjectionEntry::new(p::transverse_mercator::init));
        r.insert("utm", ProjectionEntry::new(p::utm::init).depends_on("tmerc"));
        r.insert("lcc", ProjectionEntry::new(p::lambert_conformal::init));
        r.insert("laea", ProjectionEntry::new(p::lambert_azimuthal::init));
        r.insert("stere", ProjectionEntry::new(p::stereographic::init));
        r.insert("gauss", ProjectionEntry::new(p::gauss::init));
        r.insert(
            "sterea",
            ProjectionEntry::new(p::stereographic::init_oblique).depends_on("gauss"),
        );
        r.insert("sinu", ProjectionEntry::new(p::sinusoidal::init));
        r.insert("aea", ProjectionEntry::new(p::albers_equal_area::init));
        r.insert("eqc", ProjectionEntry::new(p::equirectangular::init));
        r.insert("equi", ProjectionEntry::new(p::equirectangular::init_equi));
        r.insert("cea", ProjectionEntry::new(p::cylindrical_equal_area::init));
        r.insert("mill", ProjectionEntry::new(p::miller::init));
        r.insert("moll", ProjectionEntry::new(p::mollweide::init));
        r.insert("ortho", ProjectionEntry::new(p::orthographic::init));
        r.insert("gnom", ProjectionEntry::new(p::gnomonic::init));
        r.insert("aeqd", ProjectionEntry::new(p::azimuthal_equidistant::init));
        r.insert("cass", ProjectionEntry::new(p::cassini::init));
        r.insert("poly", ProjectionEntry::new(p::polyconic::init));
        r.insert("eqdc", ProjectionEntry::new(p::equidistant_conic::init));
        r.insert("omerc", ProjectionEntry::new(p::oblique_mercator::init));
        r.insert("somerc", ProjectionEntry::new(p::swiss_oblique_mercator::init));
        r.insert("gstmerc", ProjectionEntry::new(p::gauss_schreiber::init));
        r.insert("krovak", ProjectionEntry::new(p::krovak::init));
        r.insert("nzmg", ProjectionEntry::new(p::new_zealand_map_grid::init));
        r.insert("vandg", ProjectionEntry::new(p::van_der_grinten::init));
        r
    }

    /// Process-wide registry, seeded with [`Registry::builtin`].
    pub fn global() -> Arc<RwLock<Registry>> {
        Arc::clone(&GLOBAL)
    }

    fn insert(&mut self, name: &str, entry: ProjectionEntry) {
        self.entries.insert(name.to_string(), entry);
    }

    /// Register `entry` under `name`. Last write wins; the replaced entry is
    /// returned.
    pub fn register(&mut self, name: &str, entry: ProjectionEntry) -> Option<ProjectionEntry> {
        let previous = self.entries.insert(name.to_string(), entry);
        if previous.is_some() {
            log::warn!("projection '{name}' re-registered, replacing the previous algorithm");
        } else {
            log::debug!("projection '{name}' registered");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&ProjectionEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The first algorithm in `name`'s dependency chain (itself included)
    /// that is not registered.
    pub fn missing_dependency(&self, name: &str) -> Option<String> {
        let mut current = name.to_string();
        let mut seen = Vec::new();
        loop {
            let entry = match self.entries.get(&current) {
                Some(entry) => entry,
                None => return Some(current),
            };
            seen.push(current.clone());
            match entry.dependency() {
                Some(dep) if !seen.iter().any(|s| s == dep) => current = dep.to_string(),
                _ => return None,
            }
        }
    }

    /// Initialize `name` for `params` once its whole dependency chain is
    /// registered.
    pub fn init(&self, name: &str, params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
        if let Some(missing) = self.missing_dependency(name) {
            return Err(ProjError::Resource(if missing == name {
                format!("projection '{name}' is not registered")
            } else {
                format!("projection '{name}' depends on unregistered '{missing}'")
            }));
        }
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ProjError::Resource(format!("projection '{name}' is not registered")))?;
        entry.init(params)
    }
}
