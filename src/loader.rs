//! Module source resolution (spec §6 "Module loader").
//!
//! `import name` first tries `stdlib/<name>.pith`, then `<name>.pith`,
//! exactly as spec describes; which filesystem (or none at all, for
//! tests) backs that lookup is left to the `SourceLoader` implementation,
//! mirroring the way the teacher abstracts its sandboxed filesystem
//! behind a trait (`examples/arthur-zhang-just-bash/src/fs/mod.rs`'s
//! `FileSystem` trait) rather than calling `std::fs` directly from the
//! interpreter core.

use std::collections::HashMap;
use std::path::PathBuf;

pub trait SourceLoader {
    /// Resolves `name` to source text, or `None` if nothing named `name`
    /// is found under any of the loader's search locations.
    fn load(&self, name: &str) -> Option<String>;
}

/// Reads `.pith` files from a configured base directory, checking
/// `stdlib/<name>.pith` before `<name>.pith` — the default loader used by
/// the CLI.
pub struct FsLoader {
    base_dir: PathBuf,
}

impl FsLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, name: &str) -> Option<String> {
        let stdlib_path = self.base_dir.join("stdlib").join(format!("{}.pith", name));
        if let Ok(src) = std::fs::read_to_string(&stdlib_path) {
            return Some(src);
        }
        let direct_path = self.base_dir.join(format!("{}.pith", name));
        std::fs::read_to_string(&direct_path).ok()
    }
}

/// In-memory loader for tests: maps a bare module name to its source
/// text, bypassing the filesystem entirely.
#[derive(Default)]
pub struct MapLoader {
    modules: HashMap<String, String>,
}

impl MapLoader {
    pub fn with_module(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.modules.insert(name.into(), source.into());
        self
    }
}

impl SourceLoader for MapLoader {
    fn load(&self, name: &str) -> Option<String> {
        self.modules.get(name).cloned()
    }
}
