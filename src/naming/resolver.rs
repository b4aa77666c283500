use crate::error::{AssetDumpError, Result};
use crate::naming::sanitize_name;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Width of the zero-padded id used for unnamed objects and name prefixes.
pub const ID_WIDTH: usize = 6;

/// Highest disambiguation suffix tried before giving up on a base name.
pub const DEFAULT_MAX_PROBES: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Disambiguation suffix appended to the base name, if one was needed.
    pub suffix: Option<u32>,
}

impl ResolvedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Maps (directory, id, raw name, extension) to a file path that has not been
/// handed out before in the current session.
///
/// The set of written paths only grows until [`NamingResolver::reset`] is
/// called, which lets the resolver remember the next free suffix per base
/// name instead of re-probing from `_1` every time.
#[derive(Debug)]
pub struct NamingResolver {
    written: HashSet<PathBuf>,
    next_suffix: HashMap<PathBuf, u32>,
    use_prefix: bool,
    case_insensitive: bool,
    max_probes: u32,
}

impl NamingResolver {
    pub fn new() -> Self {
        Self {
            written: HashSet::new(),
            next_suffix: HashMap::new(),
            use_prefix: false,
            case_insensitive: false,
            max_probes: DEFAULT_MAX_PROBES,
        }
    }

    pub fn with_prefix(mut self, use_prefix: bool) -> Self {
        self.use_prefix = use_prefix;
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn with_max_probes(mut self, max_probes: u32) -> Self {
        self.max_probes = max_probes.max(1);
        self
    }

    pub fn use_prefix(&self) -> bool {
        self.use_prefix
    }

    pub fn set_use_prefix(&mut self, use_prefix: bool) {
        self.use_prefix = use_prefix;
    }

    pub fn max_probes(&self) -> u32 {
        self.max_probes
    }

    /// Forgets every path handed out so far.
    pub fn reset(&mut self) {
        self.written.clear();
        self.next_suffix.clear();
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn is_written(&self, path: &Path) -> bool {
        self.written.contains(&self.key(path))
    }

    /// Builds the file name stem before any disambiguation suffix.
    pub fn base_name(&self, id: u64, raw_name: Option<&str>) -> String {
        let mut name = raw_name.map(sanitize_name).unwrap_or_default();
        // `.` and `..` would name the directory itself or its parent
        if !name.is_empty() && name.chars().all(|c| c == '.') {
            name.insert(0, '_');
        }

        if name.is_empty() {
            format!("{:0width$}", id, width = ID_WIDTH)
        } else if self.use_prefix {
            format!("{:0width$}_{}", id, name, width = ID_WIDTH)
        } else {
            name
        }
    }

    /// Reserves a fresh path in `dir` and records it as written.
    ///
    /// `ext` must already carry the handler default when the caller had none.
    /// It goes through the same sanitizer as the name.
    pub fn resolve(
        &mut self,
        dir: &Path,
        id: u64,
        raw_name: Option<&str>,
        ext: &str,
    ) -> Result<ResolvedFile> {
        let base = self.base_name(id, raw_name);
        let ext = sanitize_name(ext);
        let ext = ext.as_str();

        let first = dir.join(join_file_name(&base, None, ext));
        if self.claim(&first) {
            return Ok(self.resolved(first, None));
        }

        // Every suffix below the cached one is already taken
        let probe_key = self.key(&first);
        let start = self.next_suffix.get(&probe_key).copied().unwrap_or(1);

        for n in start..=self.max_probes {
            let candidate = dir.join(join_file_name(&base, Some(n), ext));
            if self.claim(&candidate) {
                self.next_suffix.insert(probe_key, n.saturating_add(1));
                return Ok(self.resolved(candidate, Some(n)));
            }
        }

        Err(AssetDumpError::NamingExhausted {
            base,
            ext: ext.to_string(),
            probes: self.max_probes,
        })
    }

    fn claim(&mut self, path: &Path) -> bool {
        let key = self.key(path);
        self.written.insert(key)
    }

    fn key(&self, path: &Path) -> PathBuf {
        if self.case_insensitive {
            PathBuf::from(path.to_string_lossy().to_lowercase())
        } else {
            path.to_path_buf()
        }
    }

    fn resolved(&self, path: PathBuf, suffix: Option<u32>) -> ResolvedFile {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        ResolvedFile {
            path,
            file_name,
            suffix,
        }
    }
}

impl Default for NamingResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn join_file_name(base: &str, suffix: Option<u32>, ext: &str) -> String {
    let stem = match suffix {
        Some(n) => format!("{}_{}", base, n),
        None => base.to_string(),
    };

    if ext.is_empty() {
        stem
    } else {
        format!("{}.{}", stem, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_name(
        resolver: &mut NamingResolver,
        category: &str,
        id: u64,
        name: &str,
        ext: &str,
    ) -> PathBuf {
        let root = Path::new("/out");
        resolver
            .resolve(&root.join(category), id, Some(name), ext)
            .unwrap()
            .path
    }

    #[test]
    fn test_unnamed_object_uses_padded_id() {
        let mut resolver = NamingResolver::new();
        let path = resolve_name(&mut resolver, "Texture2D", 5, "", "png");
        assert_eq!(path, PathBuf::from("/out/Texture2D/000005.png"));

        let missing = resolver
            .resolve(Path::new("/out/Texture2D"), 42, None, "png")
            .unwrap();
        assert_eq!(missing.file_name, "000042.png");
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let mut resolver = NamingResolver::new();
        let first = resolve_name(&mut resolver, "Texture2D", 5, "icon", "png");
        let second = resolve_name(&mut resolver, "Texture2D", 5, "icon", "png");
        let third = resolve_name(&mut resolver, "Texture2D", 9, "icon", "png");

        assert_eq!(first, PathBuf::from("/out/Texture2D/icon.png"));
        assert_eq!(second, PathBuf::from("/out/Texture2D/icon_1.png"));
        assert_eq!(third, PathBuf::from("/out/Texture2D/icon_2.png"));
    }

    #[test]
    fn test_name_is_sanitized() {
        let mut resolver = NamingResolver::new();
        let path = resolve_name(&mut resolver, "Mesh", 7, "wall/piece#1", "obj");
        assert_eq!(path, PathBuf::from("/out/Mesh/wall_piece_1.obj"));
    }

    #[test]
    fn test_prefix_policy() {
        let mut resolver = NamingResolver::new().with_prefix(true);
        let named = resolve_name(&mut resolver, "Font", 12, "Arial", "ttf");
        let unnamed = resolve_name(&mut resolver, "Font", 13, "", "ttf");

        assert_eq!(named, PathBuf::from("/out/Font/000012_Arial.ttf"));
        // The prefix never doubles up on id-only names
        assert_eq!(unnamed, PathBuf::from("/out/Font/000013.ttf"));
    }

    #[test]
    fn test_large_ids_are_not_truncated() {
        let resolver = NamingResolver::new();
        assert_eq!(resolver.base_name(1_234_567, None), "1234567");
    }

    #[test]
    fn test_suffix_applies_before_extension() {
        let mut resolver = NamingResolver::new();
        resolve_name(&mut resolver, "TextAsset", 1, "notes.old", "txt");
        let second = resolve_name(&mut resolver, "TextAsset", 2, "notes.old", "txt");
        assert_eq!(second, PathBuf::from("/out/TextAsset/notes.old_1.txt"));
    }

    #[test]
    fn test_literal_suffix_name_is_skipped_by_probe() {
        let mut resolver = NamingResolver::new();
        resolve_name(&mut resolver, "Shader", 1, "lit_1", "shader");
        resolve_name(&mut resolver, "Shader", 2, "lit", "shader");
        let third = resolve_name(&mut resolver, "Shader", 3, "lit", "shader");
        assert_eq!(third, PathBuf::from("/out/Shader/lit_2.shader"));
    }

    #[test]
    fn test_same_name_in_other_category_does_not_collide() {
        let mut resolver = NamingResolver::new();
        let a = resolve_name(&mut resolver, "AudioClip", 1, "theme", "ogg");
        let b = resolve_name(&mut resolver, "TextAsset", 1, "theme", "ogg");
        assert_eq!(a, PathBuf::from("/out/AudioClip/theme.ogg"));
        assert_eq!(b, PathBuf::from("/out/TextAsset/theme.ogg"));
    }

    #[test]
    fn test_all_paths_unique_within_session() {
        let mut resolver = NamingResolver::new();
        let names = ["", "a", "a", "a_1", "a/1", "a#1", "", "b", "B"];
        let mut seen = HashSet::new();

        for (i, name) in names.iter().cycle().take(300).enumerate() {
            let path = resolve_name(&mut resolver, "Mixed", (i % 4) as u64, name, "bin");
            assert!(seen.insert(path.clone()), "duplicate path {}", path.display());
        }

        assert_eq!(resolver.len(), 300);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut resolver = NamingResolver::new();
        resolve_name(&mut resolver, "Texture2D", 5, "icon", "png");
        resolve_name(&mut resolver, "Texture2D", 5, "icon", "png");

        resolver.reset();
        assert!(resolver.is_empty());

        let again = resolve_name(&mut resolver, "Texture2D", 5, "icon", "png");
        assert_eq!(again, PathBuf::from("/out/Texture2D/icon.png"));
        let next = resolve_name(&mut resolver, "Texture2D", 5, "icon", "png");
        assert_eq!(next, PathBuf::from("/out/Texture2D/icon_1.png"));
    }

    #[test]
    fn test_case_insensitive_collisions() {
        let mut resolver = NamingResolver::new().with_case_insensitive(true);
        let upper = resolve_name(&mut resolver, "Sprite", 1, "Icon", "png");
        let lower = resolve_name(&mut resolver, "Sprite", 2, "icon", "png");

        assert_eq!(upper, PathBuf::from("/out/Sprite/Icon.png"));
        assert_eq!(lower, PathBuf::from("/out/Sprite/icon_1.png"));
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let mut resolver = NamingResolver::new();
        resolve_name(&mut resolver, "Sprite", 1, "Icon", "png");
        let lower = resolve_name(&mut resolver, "Sprite", 2, "icon", "png");
        assert_eq!(lower, PathBuf::from("/out/Sprite/icon.png"));
    }

    #[test]
    fn test_probe_limit_fails_loudly() {
        let mut resolver = NamingResolver::new().with_max_probes(2);
        for _ in 0..3 {
            resolve_name(&mut resolver, "Font", 1, "dup", "ttf");
        }

        let err = resolver
            .resolve(Path::new("/out/Font"), 1, Some("dup"), "ttf")
            .unwrap_err();
        assert!(matches!(err, AssetDumpError::NamingExhausted { probes: 2, .. }));
        assert_eq!(resolver.len(), 3);
    }

    #[test]
    fn test_empty_extension_has_no_dot() {
        let mut resolver = NamingResolver::new();
        let resolved = resolver
            .resolve(Path::new("/out/Raw"), 3, Some("blob"), "")
            .unwrap();
        assert_eq!(resolved.file_name, "blob");
    }

    #[test]
    fn test_dot_names_stay_inside_directory() {
        let mut resolver = NamingResolver::new();
        let dir = Path::new("/out/Raw");

        let parent = resolver.resolve(dir, 1, Some(".."), "").unwrap();
        let current = resolver.resolve(dir, 2, Some("."), "").unwrap();
        let with_ext = resolver.resolve(dir, 3, Some(".."), "bin").unwrap();

        assert_eq!(parent.path, PathBuf::from("/out/Raw/_.."));
        assert_eq!(current.path, PathBuf::from("/out/Raw/_."));
        assert_eq!(with_ext.path, PathBuf::from("/out/Raw/_...bin"));
        for resolved in [&parent, &current, &with_ext] {
            assert_eq!(resolved.path.parent(), Some(dir));
        }
    }

    #[test]
    fn test_extension_is_sanitized() {
        let mut resolver = NamingResolver::new();
        let dir = Path::new("/out/Raw");

        let resolved = resolver
            .resolve(dir, 1, Some("a"), "/../../../escaped")
            .unwrap();
        assert_eq!(resolved.file_name, "a._.._.._.._escaped");
        assert_eq!(resolved.path.parent(), Some(dir));
    }

    #[test]
    fn test_many_identical_names_stay_sequential() {
        let mut resolver = NamingResolver::new();
        let mut last = None;
        for _ in 0..1000 {
            last = Some(
                resolver
                    .resolve(Path::new("/out/TextAsset"), 0, Some("same"), "txt")
                    .unwrap(),
            );
        }
        let last = last.unwrap();
        assert_eq!(last.suffix, Some(999));
        assert_eq!(last.file_name, "same_999.txt");
    }
}
