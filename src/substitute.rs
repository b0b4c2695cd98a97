use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};
use crate::naming::title_case;

pub const PROJECT_NAME_TOKEN: &str = "{{PROJECT_NAME}}";
pub const MODULE_NAME_TOKEN: &str = "{{MODULE_NAME}}";
pub const APP_NAME_TOKEN: &str = "{{APP_NAME}}";
pub const PACKAGE_NAME_TOKEN: &str = "{{PACKAGE_NAME}}";

const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "pdf", "zip", "tar", "gz", "exe", "bin", "so", "dll",
];

/// Placeholder token → replacement value
///
/// All tokens are replaced in a single leftmost-longest pass over raw bytes,
/// so file encoding does not matter. Construction rejects any value that
/// contains a token, which keeps the result independent of token order
#[derive(Debug, Clone)]
pub struct SubstitutionMap {
    vars: BTreeMap<String, String>,
    matcher: AhoCorasick,
    // replacement for pattern i of `matcher`
    values: Vec<String>,
}

impl PartialEq for SubstitutionMap {
    fn eq(&self, other: &Self) -> bool {
        self.vars == other.vars
    }
}

impl Eq for SubstitutionMap {}

impl SubstitutionMap {
    pub fn new<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if vars.keys().any(|k| k.is_empty()) {
            return Err(ScaffoldError::InvalidConfig {
                message: "placeholder tokens must not be empty".to_string(),
            });
        }
        for (key, value) in &vars {
            if let Some(token) = vars.keys().find(|token| value.contains(token.as_str())) {
                return Err(ScaffoldError::InvalidConfig {
                    message: format!(
                        "value '{value}' for {key} contains the placeholder {token}"
                    ),
                });
            }
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(vars.keys())
            .map_err(|e| ScaffoldError::InvalidConfig {
                message: format!("cannot build placeholder matcher: {e}"),
            })?;
        let values = vars.values().cloned().collect();

        Ok(Self {
            vars,
            matcher,
            values,
        })
    }

    /// The standard tokens recognized by project templates
    pub fn for_project(name: &str) -> Result<Self> {
        Self::new([
            (PROJECT_NAME_TOKEN, name.to_string()),
            (MODULE_NAME_TOKEN, name.to_string()),
            (APP_NAME_TOKEN, title_case(name)),
            (PACKAGE_NAME_TOKEN, name.to_lowercase()),
        ])
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.vars.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace every token in `content`, or `None` if no token occurs
    pub fn apply(&self, content: &[u8]) -> Option<Vec<u8>> {
        if !self.matcher.is_match(content) {
            return None;
        }
        Some(self.matcher.replace_all_bytes(content, &self.values))
    }
}

/// Extension denylist for files that must never be read or rewritten
///
/// Only the final extension is considered, case-insensitively. Binaries
/// without an extension are not detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFilter {
    extensions: BTreeSet<String>,
}

impl Default for BinaryFilter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl BinaryFilter {
    pub fn empty() -> Self {
        Self {
            extensions: BTreeSet::new(),
        }
    }

    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extensions
            .insert(ext.trim_start_matches('.').to_ascii_lowercase());
        self
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

/// Summary of one substitution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub binary_skipped: usize,
}

/// Replace placeholders in every non-binary file under `root`
///
/// Files are visited in file-name order and classified by extension only;
/// contents are never decoded. A file is only rewritten when at least one
/// token was found, and rewriting truncates in place so permission bits are
/// kept. The first read or write error aborts the walk
pub fn substitute(root: &Path, vars: &SubstitutionMap, filter: &BinaryFilter) -> Result<SubstitutionReport> {
    let mut report = SubstitutionReport::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ScaffoldError::fs(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if filter.is_binary(path) {
            debug!(path = %path.display(), "skipping binary file");
            report.binary_skipped += 1;
            continue;
        }

        report.files_scanned += 1;
        let content = fs::read(path).map_err(|e| ScaffoldError::fs(path, e))?;
        if let Some(rewritten) = vars.apply(&content) {
            fs::write(path, rewritten).map_err(|e| ScaffoldError::fs(path, e))?;
            debug!(path = %path.display(), "substituted placeholders");
            report.files_rewritten += 1;
        }
    }

    info!(
        scanned = report.files_scanned,
        rewritten = report.files_rewritten,
        "template variables processed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_for_project_tokens() {
        let vars = SubstitutionMap::for_project("My-Shop").unwrap();
        assert_eq!(vars.len(), 4);
        assert_eq!(vars.get(PROJECT_NAME_TOKEN), Some("My-Shop"));
        assert_eq!(vars.get(MODULE_NAME_TOKEN), Some("My-Shop"));
        assert_eq!(vars.get(APP_NAME_TOKEN), Some("My-Shop"));
        assert_eq!(vars.get(PACKAGE_NAME_TOKEN), Some("my-shop"));

        let vars = SubstitutionMap::for_project("blog").unwrap();
        assert_eq!(vars.get(APP_NAME_TOKEN), Some("Blog"));
    }

    #[test]
    fn test_value_containing_token_rejected() {
        let result = SubstitutionMap::new([("{{A}}", "x{{B}}"), ("{{B}}", "y")]);
        assert!(matches!(result, Err(ScaffoldError::InvalidConfig { .. })));

        let result = SubstitutionMap::new([("{{A}}", "{{A}}")]);
        assert!(result.is_err());

        let result = SubstitutionMap::new([("", "x")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply() {
        let vars = SubstitutionMap::new([("{{A}}", "alpha"), ("{{B}}", "beta")]).unwrap();
        assert_eq!(
            vars.apply(b"{{A}}-{{B}}-{{A}}").as_deref(),
            Some(&b"alpha-beta-alpha"[..])
        );
        assert_eq!(vars.apply(b"nothing here"), None);
        assert_eq!(vars.apply(b"{{A}"), None);
    }

    #[test]
    fn test_apply_overlapping_tokens_prefers_longest() {
        let vars = SubstitutionMap::new([("{{A}}", "short"), ("{{A}}!", "long")]).unwrap();
        assert_eq!(
            vars.apply(b"{{A}}! {{A}}").as_deref(),
            Some(&b"long short"[..])
        );
    }

    #[test]
    fn test_binary_filter() {
        let filter = BinaryFilter::default();
        assert!(filter.is_binary(Path::new("logo.png")));
        assert!(filter.is_binary(Path::new("assets/LOGO.PNG")));
        assert!(filter.is_binary(Path::new("dist.tar.gz")));
        assert!(!filter.is_binary(Path::new("main.go")));
        assert!(!filter.is_binary(Path::new("Makefile")));
        assert!(!filter.is_binary(Path::new("font.woff")));

        let filter = filter.with_extension(".WOFF");
        assert!(filter.is_binary(Path::new("font.woff")));

        assert!(!BinaryFilter::empty().is_binary(Path::new("logo.png")));
    }

    #[test]
    fn test_substitute_walks_nested_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("cmd/server")).unwrap();
        fs::write(root.join("go.mod"), "module {{MODULE_NAME}}\n").unwrap();
        fs::write(
            root.join("cmd/server/main.go"),
            "package main // {{APP_NAME}} {{PACKAGE_NAME}}\n",
        )
        .unwrap();
        fs::write(root.join("README.md"), "plain\n").unwrap();

        let vars = SubstitutionMap::for_project("Shop").unwrap();
        let report = substitute(root, &vars, &BinaryFilter::default()).unwrap();

        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.files_rewritten, 2);
        assert_eq!(fs::read_to_string(root.join("go.mod")).unwrap(), "module Shop\n");
        assert_eq!(
            fs::read_to_string(root.join("cmd/server/main.go")).unwrap(),
            "package main // Shop shop\n"
        );
    }

    #[test]
    fn test_binary_file_with_token_untouched() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("banner.png");
        let bytes = b"\x89PNG{{PROJECT_NAME}}".to_vec();
        fs::write(&image, &bytes).unwrap();

        let vars = SubstitutionMap::for_project("shop").unwrap();
        let report = substitute(temp.path(), &vars, &BinaryFilter::default()).unwrap();

        assert_eq!(report.binary_skipped, 1);
        assert_eq!(report.files_scanned, 0);
        assert_eq!(fs::read(&image).unwrap(), bytes);
    }

    #[test]
    fn test_non_utf8_text_file_substituted() {
        let temp = TempDir::new().unwrap();
        let readme = temp.path().join("README.md");
        fs::write(&readme, b"caf\xe9 {{PROJECT_NAME}}\n").unwrap();

        let vars = SubstitutionMap::for_project("shop").unwrap();
        let report = substitute(temp.path(), &vars, &BinaryFilter::default()).unwrap();

        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.files_rewritten, 1);
        assert_eq!(fs::read(&readme).unwrap(), b"caf\xe9 shop\n");
    }

    #[test]
    fn test_unchanged_file_not_rewritten() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data.txt");
        fs::write(&data, [0xff, 0xfe, b'{', b'{']).unwrap();

        let vars = SubstitutionMap::for_project("shop").unwrap();
        let report = substitute(temp.path(), &vars, &BinaryFilter::default()).unwrap();

        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.files_rewritten, 0);
        assert_eq!(fs::read(&data).unwrap(), vec![0xff, 0xfe, b'{', b'{']);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\necho {{PROJECT_NAME}}\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let vars = SubstitutionMap::for_project("shop").unwrap();
        substitute(temp.path(), &vars, &BinaryFilter::default()).unwrap();

        assert_eq!(fs::read_to_string(&script).unwrap(), "#!/bin/sh\necho shop\n");
        let mode = fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_missing_root_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let vars = SubstitutionMap::for_project("shop").unwrap();
        let result = substitute(&temp.path().join("absent"), &vars, &BinaryFilter::default());
        assert!(matches!(result, Err(ScaffoldError::Filesystem { .. })));
    }
}
