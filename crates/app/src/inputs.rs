//! Where the city comes from: repository list, optional branding, and
//! optional parameter overrides, all JSON on disk.

use std::path::{Path, PathBuf};

use bevy::log::{info, warn};

use citygen::repository::{load_branding, load_repositories, Repository};
use citygen::{assemble, Branding, CityError, CityLayout, CityParams};

pub const REPOS_ENV: &str = "REPOCITY_REPOS";
pub const BRANDING_ENV: &str = "REPOCITY_BRANDING";
pub const PARAMS_ENV: &str = "REPOCITY_PARAMS";
pub const SCREENSHOT_ENV: &str = "REPOCITY_SCREENSHOT";

/// Shown when no repository list is given.
const DEMO_REPOS: &str = include_str!("../demo_repos.json");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputPaths {
    pub repos: Option<PathBuf>,
    pub branding: Option<PathBuf>,
    pub params: Option<PathBuf>,
}

impl InputPaths {
    /// First CLI argument wins over `REPOCITY_REPOS`.
    pub fn resolve(first_arg: Option<String>, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |v: String| (!v.trim().is_empty()).then(|| PathBuf::from(v));
        Self {
            repos: first_arg.or_else(|| env(REPOS_ENV)).and_then(non_empty),
            branding: env(BRANDING_ENV).and_then(non_empty),
            params: env(PARAMS_ENV).and_then(non_empty),
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(std::env::args().nth(1), |key| std::env::var(key).ok())
    }
}

pub fn demo_repositories() -> Vec<Repository> {
    match citygen::repository::parse_repositories(DEMO_REPOS) {
        Ok(repos) => repos,
        Err(e) => {
            warn!("Built-in demo list is unreadable: {}", e);
            Vec::new()
        }
    }
}

/// Read the repository list. A missing or unreadable file gives an empty
/// city rather than aborting.
pub fn read_repositories(path: Option<&Path>) -> Vec<Repository> {
    let Some(path) = path else {
        info!("No repository list given; showing the demo city");
        return demo_repositories();
    };
    match load_repositories(path) {
        Ok(repos) => {
            info!("Loaded {} repositories from {}", repos.len(), path.display());
            repos
        }
        Err(e) => {
            warn!("Cannot read repositories from {}: {}", path.display(), describe(&e));
            Vec::new()
        }
    }
}

pub fn read_branding(path: Option<&Path>) -> Option<Branding> {
    let path = path?;
    match load_branding(path) {
        Ok(branding) => Some(branding),
        Err(e) => {
            warn!("Ignoring branding from {}: {}", path.display(), describe(&e));
            None
        }
    }
}

pub fn read_params(path: Option<&Path>) -> CityParams {
    let Some(path) = path else {
        return CityParams::default();
    };
    match CityParams::load(path) {
        Ok(params) => params,
        Err(e) => {
            warn!("Using default parameters, {} rejected: {}", path.display(), describe(&e));
            CityParams::default()
        }
    }
}

pub fn build_city(paths: &InputPaths) -> (CityLayout, CityParams) {
    let repos = read_repositories(paths.repos.as_deref());
    let branding = read_branding(paths.branding.as_deref());
    let params = read_params(paths.params.as_deref());
    (assemble(&repos, branding.as_ref()), params)
}

/// Surface an input error without stopping the app.
pub fn describe(err: &CityError) -> String {
    match err {
        CityError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => "file not found".into(),
        other => other.to_string(),
    }
}
