//! Provenance-tagged source layers.
//!
//! Hosts that load flags, environment, files and defaults separately can push
//! each map into a [`SourceComposer`], which orders them for
//! [`merge_sources`](crate::merge_sources) regardless of push order.

use std::cmp::Reverse;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::merge::SourceMap;

/// Origin of a source layer. Later variants take precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[non_exhaustive]
pub enum Provenance {
    /// Defaults supplied by the host.
    Defaults,
    /// Values loaded from a configuration file.
    File,
    /// Values collected from environment variables.
    Environment,
    /// Values supplied on the command line.
    Cli,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Defaults => "defaults",
            Self::File => "file",
            Self::Environment => "environment",
            Self::Cli => "command line",
        })
    }
}

/// Layer that supplied a field's raw value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceOrigin {
    /// Origin of the layer.
    pub provenance: Provenance,
    /// File the layer was read from, if any.
    pub path: Option<Utf8PathBuf>,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} `{path}`", self.provenance),
            None => write!(f, "{}", self.provenance),
        }
    }
}

/// One configuration layer and where it came from.
#[derive(Clone, Debug)]
pub struct SourceLayer {
    provenance: Provenance,
    values: SourceMap,
    path: Option<Utf8PathBuf>,
}

impl SourceLayer {
    /// Construct a layer originating from host defaults.
    #[must_use]
    pub const fn defaults(values: SourceMap) -> Self {
        Self {
            provenance: Provenance::Defaults,
            values,
            path: None,
        }
    }

    /// Construct a layer originating from a configuration file.
    #[must_use]
    pub const fn file(values: SourceMap, path: Option<Utf8PathBuf>) -> Self {
        Self {
            provenance: Provenance::File,
            values,
            path,
        }
    }

    /// Construct a layer originating from environment variables.
    #[must_use]
    pub const fn environment(values: SourceMap) -> Self {
        Self {
            provenance: Provenance::Environment,
            values,
            path: None,
        }
    }

    /// Construct a layer originating from CLI arguments.
    #[must_use]
    pub const fn cli(values: SourceMap) -> Self {
        Self {
            provenance: Provenance::Cli,
            values,
            path: None,
        }
    }

    /// Returns the provenance of the layer.
    #[must_use]
    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the associated path if this layer was sourced from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Provenance and path, as reported in diagnostics.
    #[must_use]
    pub fn origin(&self) -> SourceOrigin {
        SourceOrigin {
            provenance: self.provenance,
            path: self.path.clone(),
        }
    }

    /// Borrow the layer's values.
    #[must_use]
    pub const fn values(&self) -> &SourceMap {
        &self.values
    }

    /// Consume the layer and return its values.
    #[must_use]
    pub fn into_values(self) -> SourceMap {
        self.values
    }
}

/// Builder that accumulates [`SourceLayer`]s.
///
/// # Examples
///
/// ```
/// use reflect_conf::{SourceComposer, SourceMap, merge_sources};
///
/// let mut composer = SourceComposer::new();
/// composer.push_cli(SourceMap::from([("port".to_owned(), "9000".to_owned())]));
/// composer.push_defaults(SourceMap::from([("port".to_owned(), "80".to_owned())]));
///
/// let merged = merge_sources(composer.into_sources()).expect("non-empty");
/// assert_eq!(merged.get("port").map(String::as_str), Some("9000"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SourceComposer {
    layers: Vec<SourceLayer>,
}

impl SourceComposer {
    /// Create an empty composer.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Push a defaults layer.
    pub fn push_defaults(&mut self, values: SourceMap) {
        self.push_layer(SourceLayer::defaults(values));
    }

    /// Push a configuration file layer.
    pub fn push_file(&mut self, values: SourceMap, path: Option<Utf8PathBuf>) {
        self.push_layer(SourceLayer::file(values, path));
    }

    /// Push an environment layer.
    pub fn push_environment(&mut self, values: SourceMap) {
        self.push_layer(SourceLayer::environment(values));
    }

    /// Push a CLI layer.
    pub fn push_cli(&mut self, values: SourceMap) {
        self.push_layer(SourceLayer::cli(values));
    }

    /// Push an arbitrary layer.
    pub fn push_layer(&mut self, layer: SourceLayer) {
        self.layers.push(layer);
    }

    /// Layers in push order.
    #[must_use]
    pub fn layers(&self) -> &[SourceLayer] {
        &self.layers
    }

    /// Consume the composer and return the layers highest priority first.
    ///
    /// Cli beats Environment beats File beats Defaults. Among layers of the
    /// same provenance the one pushed last wins.
    #[must_use]
    pub fn into_layers(self) -> Vec<SourceLayer> {
        let mut indexed: Vec<(usize, SourceLayer)> = self.layers.into_iter().enumerate().collect();
        indexed.sort_by_key(|(idx, layer)| Reverse((layer.provenance, *idx)));
        indexed.into_iter().map(|(_, layer)| layer).collect()
    }

    /// Consume the composer and return the maps highest priority first.
    ///
    /// Ordering follows [`into_layers`](Self::into_layers).
    #[must_use]
    pub fn into_sources(self) -> Vec<SourceMap> {
        self.into_layers()
            .into_iter()
            .map(SourceLayer::into_values)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for layer ordering.

    use super::*;
    use rstest::rstest;

    fn single(key: &str, value: &str) -> SourceMap {
        SourceMap::from([(key.to_owned(), value.to_owned())])
    }

    #[rstest]
    fn orders_by_provenance_then_recency() {
        let mut composer = SourceComposer::new();
        composer.push_defaults(single("k", "defaults"));
        composer.push_cli(single("k", "cli"));
        composer.push_file(single("k", "file-a"), Some(Utf8PathBuf::from("a.conf")));
        composer.push_environment(single("k", "env"));
        composer.push_file(single("k", "file-b"), None);

        let order: Vec<String> = composer
            .into_sources()
            .into_iter()
            .filter_map(|mut map| map.remove("k"))
            .collect();
        assert_eq!(order, vec!["cli", "env", "file-b", "file-a", "defaults"]);
    }

    #[rstest]
    fn file_layer_keeps_its_path() {
        let mut composer = SourceComposer::new();
        composer.push_file(SourceMap::new(), Some(Utf8PathBuf::from("/etc/app.conf")));
        let layer = composer.layers().first().expect("one layer");
        assert_eq!(layer.provenance(), Provenance::File);
        assert_eq!(layer.path().map(Utf8Path::as_str), Some("/etc/app.conf"));
        assert!(layer.values().is_empty());
    }

    #[rstest]
    #[case::file(
        SourceLayer::file(SourceMap::new(), Some(Utf8PathBuf::from("/etc/app.conf"))),
        "file `/etc/app.conf`"
    )]
    #[case::unnamed_file(SourceLayer::file(SourceMap::new(), None), "file")]
    #[case::cli(SourceLayer::cli(SourceMap::new()), "command line")]
    fn origin_names_provenance_and_path(#[case] layer: SourceLayer, #[case] expected: &str) {
        assert_eq!(layer.origin().to_string(), expected);
    }
}
