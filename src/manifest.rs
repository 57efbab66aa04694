use std::fmt;
use std::path::Path;

/// Packaging manifests that make a directory installable, in lookup order.
pub const MANIFEST_CANDIDATES: &[(&str, Manifest)] = &[
    ("setup.py", Manifest::SetupPy),
    ("pyproject.toml", Manifest::PyProject),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manifest {
    /// Legacy imperative build script.
    SetupPy,
    /// Declarative project manifest.
    PyProject,
}

impl Manifest {
    pub fn file_name(self) -> &'static str {
        match self {
            Manifest::SetupPy => "setup.py",
            Manifest::PyProject => "pyproject.toml",
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// First manifest present in `dir`. Only existence is checked.
pub fn detect(dir: &Path) -> Option<Manifest> {
    MANIFEST_CANDIDATES
        .iter()
        .find(|(file, _)| dir.join(file).exists())
        .map(|(_, manifest)| *manifest)
}

/// Human-readable list of accepted manifests, e.g. `setup.py or pyproject.toml`.
pub fn expected_names() -> String {
    MANIFEST_CANDIDATES
        .iter()
        .map(|(file, _)| *file)
        .collect::<Vec<_>>()
        .join(" or ")
}
