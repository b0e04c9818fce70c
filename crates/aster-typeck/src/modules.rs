//! Module cache and cross-module resolution.
//!
//! Imported modules are compiled (canonicalize, lex, translate, parse,
//! lower) through a cache keyed by resolved file path. Each entry stores a
//! fingerprint and the shared Core IR; a stale fingerprint forces a
//! recompile. A reverse-dependency map supports transitive invalidation,
//! and a visiting stack turns import cycles into errors instead of
//! recursion.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use aster_common::CompileError;
use aster_core::{CoreDeclKind, CoreModule};
use aster_lexicon::Lexicon;
use rustc_hash::{FxHashMap, FxHashSet};

/// Pluggable source of module files. The standard implementation reads the
/// filesystem; tests use an in-memory map.
pub trait FileSource: Send + Sync {
    fn read(&self, path: &Path) -> Option<String>;
    fn exists(&self, path: &Path) -> bool;
    /// An opaque version marker; a change invalidates cached entries.
    fn fingerprint(&self, path: &Path) -> Option<String>;
}

/// Reads modules from the filesystem; the fingerprint is the file's
/// modification time.
#[derive(Debug, Default)]
pub struct FsSource;

impl FileSource for FsSource {
    fn read(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn fingerprint(&self, path: &Path) -> Option<String> {
        let meta = std::fs::metadata(path).ok()?;
        let modified = meta.modified().ok()?;
        let stamp = modified
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Some(format!("{}.{}", stamp.as_secs(), stamp.subsec_nanos()))
    }
}

/// An in-memory file source for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<FxHashMap<PathBuf, (String, u64)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file, bumping its fingerprint.
    pub fn put(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let mut files = self.files.write().expect("memory source lock poisoned");
        let path = path.into();
        let version = files.get(&path).map(|(_, v)| v + 1).unwrap_or(0);
        files.insert(path, (contents.into(), version));
    }
}

impl FileSource for MemorySource {
    fn read(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .expect("memory source lock poisoned")
            .get(path)
            .map(|(text, _)| text.clone())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .expect("memory source lock poisoned")
            .contains_key(path)
    }

    fn fingerprint(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .expect("memory source lock poisoned")
            .get(path)
            .map(|(_, v)| v.to_string())
    }
}

/// Why a module failed to load.
#[derive(Debug, Clone)]
pub enum ModuleLoadError {
    /// No candidate file found on the search paths.
    NotFound { name: String },
    /// Import resolution revisited a module already being resolved.
    Cycle { chain: Vec<String> },
    /// The module's own compilation failed.
    Compile {
        name: String,
        error: Box<CompileError>,
    },
}

struct CacheEntry {
    fingerprint: Option<String>,
    core: Arc<CoreModule>,
}

/// Thread-safe cache of lowered modules keyed by canonical path.
///
/// Loads use a double-checked acquire/compare discipline: the compile runs
/// outside the write lock, and an entry that appeared meanwhile (same
/// fingerprint) wins over the local result.
#[derive(Default)]
pub struct ModuleCache {
    entries: RwLock<FxHashMap<PathBuf, CacheEntry>>,
    /// dependency path -> set of paths that imported it.
    reverse_deps: RwLock<FxHashMap<PathBuf, FxHashSet<PathBuf>>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a dotted module name against the search paths.
    pub fn resolve_path(
        name: &str,
        search_paths: &[PathBuf],
        source: &dyn FileSource,
    ) -> Option<PathBuf> {
        let relative: PathBuf = format!("{}.aster", name.replace('.', "/")).into();
        search_paths
            .iter()
            .map(|base| base.join(&relative))
            .find(|candidate| source.exists(candidate))
    }

    /// Load a module by dotted name, resolving and compiling its imports
    /// transitively. `visiting` carries the active resolution chain for
    /// cycle detection.
    pub fn load(
        &self,
        name: &str,
        search_paths: &[PathBuf],
        source: &dyn FileSource,
        lexicon: &Lexicon,
        visiting: &mut Vec<String>,
    ) -> Result<Arc<CoreModule>, ModuleLoadError> {
        if visiting.iter().any(|n| n == name) {
            let mut chain = visiting.clone();
            chain.push(name.to_string());
            return Err(ModuleLoadError::Cycle { chain });
        }
        let path = Self::resolve_path(name, search_paths, source).ok_or_else(|| {
            ModuleLoadError::NotFound {
                name: name.to_string(),
            }
        })?;

        let fingerprint = source.fingerprint(&path);
        {
            let entries = self.entries.read().expect("module cache lock poisoned");
            if let Some(entry) = entries.get(&path) {
                if entry.fingerprint == fingerprint {
                    return Ok(Arc::clone(&entry.core));
                }
            }
        }

        let text = source.read(&path).ok_or_else(|| ModuleLoadError::NotFound {
            name: name.to_string(),
        })?;
        let core = compile_module(&text, &path, lexicon).map_err(|error| {
            ModuleLoadError::Compile {
                name: name.to_string(),
                error: Box::new(error),
            }
        })?;
        let core = Arc::new(core);

        // Resolve this module's own imports before caching so cycles
        // surface on every lookup and the reverse-dependency map stays
        // complete.
        visiting.push(name.to_string());
        let result = self.load_imports(&core, &path, search_paths, source, lexicon, visiting);
        visiting.pop();
        result?;

        {
            let mut entries = self.entries.write().expect("module cache lock poisoned");
            match entries.get(&path) {
                // Someone else compiled the same version while we worked;
                // keep theirs.
                Some(existing) if existing.fingerprint == fingerprint => {
                    return Ok(Arc::clone(&existing.core));
                }
                _ => {
                    entries.insert(
                        path.clone(),
                        CacheEntry {
                            fingerprint,
                            core: Arc::clone(&core),
                        },
                    );
                }
            }
        }

        Ok(core)
    }

    fn load_imports(
        &self,
        core: &CoreModule,
        importer: &Path,
        search_paths: &[PathBuf],
        source: &dyn FileSource,
        lexicon: &Lexicon,
        visiting: &mut Vec<String>,
    ) -> Result<(), ModuleLoadError> {
        for decl in &core.decls {
            if let CoreDeclKind::Import { name, .. } = &decl.kind {
                self.load(name, search_paths, source, lexicon, visiting)?;
                if let Some(dep_path) = Self::resolve_path(name, search_paths, source) {
                    self.reverse_deps
                        .write()
                        .expect("module cache lock poisoned")
                        .entry(dep_path)
                        .or_default()
                        .insert(importer.to_path_buf());
                }
            }
        }
        Ok(())
    }

    /// Whether a path currently has a cached entry.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries
            .read()
            .expect("module cache lock poisoned")
            .contains_key(path)
    }

    /// Drop a path and, transitively, every cached module that imported
    /// it.
    pub fn invalidate(&self, path: &Path) {
        let mut dropped: FxHashSet<PathBuf> = FxHashSet::default();
        let mut queue = vec![path.to_path_buf()];
        let reverse = self.reverse_deps.read().expect("module cache lock poisoned");
        while let Some(current) = queue.pop() {
            if !dropped.insert(current.clone()) {
                continue;
            }
            if let Some(importers) = reverse.get(&current) {
                queue.extend(importers.iter().cloned());
            }
        }
        drop(reverse);
        let mut entries = self.entries.write().expect("module cache lock poisoned");
        for path in &dropped {
            entries.remove(path);
        }
    }
}

/// Compile one module source to Core IR: canonicalize, lex, translate
/// keywords, parse, lower.
pub fn compile_module(
    source: &str,
    path: &Path,
    lexicon: &Lexicon,
) -> Result<CoreModule, CompileError> {
    let canonical = aster_lexer::canonicalize(source, lexicon, None);
    let tokens = aster_lexer::tokenize(&canonical, lexicon)?;
    let tokens = aster_lexer::translate_keywords(tokens, lexicon);
    let module = aster_parser::parse(&tokens)?;
    aster_lower::lower(&module, path.to_str())
}
