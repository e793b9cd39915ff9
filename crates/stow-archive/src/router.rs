//! Destination routing policies.
//!
//! A [`Router`] maps entry metadata to a destination path or a skip. Routers
//! never touch the filesystem, so a policy can be tested without a disk.
//! Alternate policies are separate types that wrap another router.

use std::path::{Component, Path, PathBuf};

use crate::entry::EntryMeta;

/// Where an entry goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Extract(PathBuf),
    Skip,
}

impl Route {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Extract(path) => Some(path.as_path()),
            Self::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// Caller-supplied routing policy.
///
/// Called once per entry, in archive order, from a single thread.
pub trait Router {
    fn route(&mut self, entry: &EntryMeta) -> Route;
}

impl<R: Router + ?Sized> Router for &mut R {
    fn route(&mut self, entry: &EntryMeta) -> Route {
        (**self).route(entry)
    }
}

impl<R: Router + ?Sized> Router for Box<R> {
    fn route(&mut self, entry: &EntryMeta) -> Route {
        (**self).route(entry)
    }
}

/// Extract everything under a root, preserving the recorded layout.
///
/// Absolute names are re-rooted: `/abs/x.txt` lands at `<root>/abs/x.txt`.
#[derive(Clone, Debug)]
pub struct FolderRouter {
    root: PathBuf,
}

impl FolderRouter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Router for FolderRouter {
    fn route(&mut self, entry: &EntryMeta) -> Route {
        Route::Extract(self.root.join(relative(&entry.name)))
    }
}

/// `name` without root or drive-prefix components.
fn relative(name: &Path) -> PathBuf {
    name.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Router built from a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnRouter<F> {
    f: F,
}

/// Wrap a closure as a [`Router`].
pub fn from_fn<F>(f: F) -> FnRouter<F>
where
    F: FnMut(&EntryMeta) -> Route,
{
    FnRouter { f }
}

impl<F> Router for FnRouter<F>
where
    F: FnMut(&EntryMeta) -> Route,
{
    fn route(&mut self, entry: &EntryMeta) -> Route {
        (self.f)(entry)
    }
}

/// Skips entries rejected by a predicate, routes the rest through `inner`.
#[derive(Clone)]
pub struct FilterRouter<R, F> {
    inner: R,
    predicate: F,
}

impl<R, F> FilterRouter<R, F>
where
    R: Router,
    F: FnMut(&EntryMeta) -> bool,
{
    pub fn new(inner: R, predicate: F) -> Self {
        Self { inner, predicate }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R, F> Router for FilterRouter<R, F>
where
    R: Router,
    F: FnMut(&EntryMeta) -> bool,
{
    fn route(&mut self, entry: &EntryMeta) -> Route {
        if (self.predicate)(entry) {
            self.inner.route(entry)
        } else {
            Route::Skip
        }
    }
}

/// Drops leading path components before routing through `inner`.
///
/// `pkg-1.0/bin/tool` with a count of 1 is routed as `bin/tool`. Entries
/// with nothing left after stripping, such as the `pkg-1.0/` directory
/// itself, are skipped.
#[derive(Clone, Debug)]
pub struct StripComponents<R> {
    inner: R,
    count: usize,
}

impl<R: Router> StripComponents<R> {
    pub fn new(inner: R, count: usize) -> Self {
        Self { inner, count }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Router> Router for StripComponents<R> {
    fn route(&mut self, entry: &EntryMeta) -> Route {
        let Some(stripped) = strip_components(&entry.name, self.count) else {
            return Route::Skip;
        };
        let entry = EntryMeta {
            name: stripped,
            ..entry.clone()
        };
        self.inner.route(&entry)
    }
}

fn strip_components(path: &Path, count: usize) -> Option<PathBuf> {
    let rest: PathBuf = path
        .components()
        .filter(|c| {
            !matches!(
                c,
                Component::CurDir | Component::RootDir | Component::Prefix(_)
            )
        })
        .skip(count)
        .collect();
    (!rest.as_os_str().is_empty()).then_some(rest)
}

/// Composition helpers for any [`Router`].
pub trait RouterExt: Router + Sized {
    fn filter<F>(self, predicate: F) -> FilterRouter<Self, F>
    where
        F: FnMut(&EntryMeta) -> bool,
    {
        FilterRouter::new(self, predicate)
    }

    fn strip_components(self, count: usize) -> StripComponents<Self> {
        StripComponents::new(self, count)
    }
}

impl<R: Router> RouterExt for R {}
