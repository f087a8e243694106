use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing::debug;
use zip::ZipArchive;

use crate::assets::raster::Raster;
use crate::foundation::error::{BlockRenderError, BlockRenderResult};

const DEFAULT_NAMESPACE: &str = "minecraft";
const MODS_TOML_PATH: &str = "META-INF/mods.toml";

/// Read-only access to a bundle of model JSON and texture files.
///
/// Every method is a single synchronous attempt: a path that is missing,
/// unreadable, or malformed yields an empty answer, never an error. Paths are
/// bundle-relative with `/` separators (`assets/minecraft/models/block/stone.json`).
pub trait AssetSource: Send + Sync {
    /// True when `path` names an existing file in the bundle.
    fn exists(&self, path: &str) -> bool;

    /// Parse the JSON document at `path`. `None` when missing or malformed.
    fn read_json(&self, path: &str) -> Option<serde_json::Value>;

    /// Decode the image at `path`. `None` when missing or undecodable.
    fn read_raster(&self, path: &str) -> Option<Raster>;

    /// File paths under `dir`, relative to `dir`.
    fn list_files(&self, dir: &str) -> Vec<String>;

    /// Namespace of the bundle (`minecraft`, or the mod id for mod bundles).
    fn namespace(&self) -> &str;
}

/// Validate and normalize a bundle-relative path.
pub fn normalize_rel_path(source: &str) -> BlockRenderResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BlockRenderError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(BlockRenderError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BlockRenderError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BlockRenderError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Pull the `modId` value out of a mods.toml body. Only that one line is
/// consulted; the rest of the file is ignored.
fn parse_mod_id(toml_text: &str) -> Option<String> {
    for line in toml_text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("modId") else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

fn parse_json_bytes(path: &str, bytes: &[u8]) -> Option<serde_json::Value> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("malformed json in '{path}': {err}");
            None
        }
    }
}

fn decode_raster_bytes(path: &str, bytes: &[u8]) -> Option<Raster> {
    match Raster::decode(bytes) {
        Ok(raster) => Some(raster),
        Err(err) => {
            debug!("undecodable image '{path}': {err}");
            None
        }
    }
}

/// Asset source backed by a plain directory laid out like an unpacked bundle.
pub struct DirAssetSource {
    root: PathBuf,
    namespace: String,
}

impl DirAssetSource {
    /// Open `root` as a bundle. The namespace comes from `META-INF/mods.toml`
    /// when present, `minecraft` otherwise.
    pub fn open(root: impl Into<PathBuf>) -> BlockRenderResult<Self> {
        let root = root.into();
        let meta = std::fs::metadata(&root)
            .with_context(|| format!("open asset dir '{}'", root.display()))?;
        if !meta.is_dir() {
            return Err(BlockRenderError::asset(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }

        let namespace = std::fs::read_to_string(root.join(MODS_TOML_PATH))
            .ok()
            .and_then(|text| parse_mod_id(&text))
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        Ok(Self { root, namespace })
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let norm = normalize_rel_path(path).ok()?;
        Some(self.root.join(norm))
    }
}

impl AssetSource for DirAssetSource {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn read_json(&self, path: &str) -> Option<serde_json::Value> {
        let bytes = std::fs::read(self.resolve(path)?).ok()?;
        parse_json_bytes(path, &bytes)
    }

    fn read_raster(&self, path: &str) -> Option<Raster> {
        let bytes = std::fs::read(self.resolve(path)?).ok()?;
        decode_raster_bytes(path, &bytes)
    }

    fn list_files(&self, dir: &str) -> Vec<String> {
        let Some(base) = self.resolve(dir) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        collect_files(&base, "", &mut out);
        out.sort();
        out
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

fn collect_files(dir: &Path, prefix: &str, out: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let rel = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, &rel, out);
        } else {
            out.push(rel);
        }
    }
}

/// Asset source backed by a jar/zip archive.
///
/// The archive handle lives behind a mutex so one source can serve parallel
/// batch export; each read locks, seeks, and inflates independently.
pub struct JarAssetSource {
    path: PathBuf,
    namespace: String,
    archive: Mutex<ZipArchive<File>>,
}

impl JarAssetSource {
    /// Open a `.jar` or `.zip` bundle. The namespace comes from
    /// `META-INF/mods.toml` when present, `minecraft` otherwise.
    pub fn open(path: impl Into<PathBuf>) -> BlockRenderResult<Self> {
        let path = path.into();
        let file =
            File::open(&path).with_context(|| format!("open asset jar '{}'", path.display()))?;
        let mut archive = ZipArchive::new(file)
            .with_context(|| format!("read zip structure of '{}'", path.display()))?;

        let namespace = read_entry(&mut archive, MODS_TOML_PATH)
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| parse_mod_id(&text))
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(Self {
            path,
            namespace,
            archive: Mutex::new(archive),
        })
    }

    /// Path the archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bytes(&self, path: &str) -> Option<Vec<u8>> {
        let norm = normalize_rel_path(path).ok()?;
        let mut archive = self.archive.lock().ok()?;
        read_entry(&mut archive, &norm)
    }
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Option<Vec<u8>> {
    let mut entry = archive.by_name(name).ok()?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}

impl AssetSource for JarAssetSource {
    fn exists(&self, path: &str) -> bool {
        let Ok(norm) = normalize_rel_path(path) else {
            return false;
        };
        let Ok(archive) = self.archive.lock() else {
            return false;
        };
        archive.index_for_name(&norm).is_some()
    }

    fn read_json(&self, path: &str) -> Option<serde_json::Value> {
        let bytes = self.read_bytes(path)?;
        parse_json_bytes(path, &bytes)
    }

    fn read_raster(&self, path: &str) -> Option<Raster> {
        let bytes = self.read_bytes(path)?;
        decode_raster_bytes(path, &bytes)
    }

    fn list_files(&self, dir: &str) -> Vec<String> {
        let Ok(norm) = normalize_rel_path(dir) else {
            return Vec::new();
        };
        let Ok(archive) = self.archive.lock() else {
            return Vec::new();
        };
        let prefix = format!("{norm}/");
        let mut out: Vec<String> = archive
            .file_names()
            .filter_map(|name| name.strip_prefix(&prefix))
            .filter(|rel| !rel.is_empty() && !rel.ends_with('/'))
            .map(str::to_string)
            .collect();
        out.sort();
        out
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
