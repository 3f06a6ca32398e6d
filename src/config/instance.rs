//! Instance configuration types.
//!
//! An instance file (`serverless.yml`) declares one component instance:
//!
//! ```yaml
//! name: api
//! component: scf
//! org: acme        # optional, looked up when absent
//! app: shop        # optional, defaults to name
//! stage: dev       # optional
//! inputs:
//!   src: ./code    # or { src: ./code, dist: ./build, exclude: [...] }
//!   region: ${env:TENCENT_REGION}
//! ```
//!
//! [`RawInstanceFile`] is the file as written; [`InstanceConfig`] is the
//! fully resolved descriptor handed to the platform.

use crate::config::paths::resolve_against;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An instance file exactly as parsed, before any resolution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawInstanceFile {
    pub name: Option<String>,
    pub component: Option<String>,
    pub org: Option<String>,
    pub app: Option<String>,
    pub stage: Option<String>,
    pub inputs: Option<serde_yaml::Value>,
}

/// A fully resolved instance.
///
/// `org` and `app` are always populated; every `src` path in `inputs` is
/// absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub name: String,
    pub component: String,
    pub org: String,
    pub app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Inputs>,
}

impl InstanceConfig {
    /// Identifier used in logs and output headers: `org/app/stage/name`.
    pub fn qualified_name(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.org,
            self.app,
            self.stage.as_deref().unwrap_or("-"),
            self.name
        )
    }
}

/// Component inputs.
///
/// `src` is recognized and modelled as a [`SourceSpec`]; everything else is
/// passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceSpec>,
    #[serde(flatten)]
    pub values: BTreeMap<String, serde_yaml::Value>,
}

impl Inputs {
    /// Rewrite `src` paths to absolute paths under `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(src) = self.src.take() {
            self.src = Some(src.resolve_against(base));
        }
    }
}

/// The `inputs.src` field: either a path or an object with `src`/`dist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    /// `src: ./code`
    Path(PathBuf),
    /// `src: { src: ./code, dist: ./build, ... }`
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dist: Option<PathBuf>,
        /// Other keys (`exclude`, `hook`, ...), kept verbatim.
        #[serde(flatten)]
        extra: BTreeMap<String, serde_yaml::Value>,
    },
}

impl SourceSpec {
    /// Resolve every path in this spec against `base`.
    pub fn resolve_against(self, base: &Path) -> Self {
        match self {
            Self::Path(path) => Self::Path(resolve_against(base, &path)),
            Self::Structured { src, dist, extra } => Self::Structured {
                src: src.map(|p| resolve_against(base, &p)),
                dist: dist.map(|p| resolve_against(base, &p)),
                extra,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(yaml: &str) -> Inputs {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn raw_file_parses_all_fields() {
        let raw: RawInstanceFile = serde_yaml::from_str(
            "name: api\ncomponent: scf\norg: acme\napp: shop\nstage: dev\ninputs:\n  region: gz\n",
        )
        .unwrap();
        assert_eq!(raw.name.as_deref(), Some("api"));
        assert_eq!(raw.component.as_deref(), Some("scf"));
        assert_eq!(raw.org.as_deref(), Some("acme"));
        assert_eq!(raw.app.as_deref(), Some("shop"));
        assert_eq!(raw.stage.as_deref(), Some("dev"));
        assert_eq!(raw.inputs.unwrap()["region"], "gz");
    }

    #[test]
    fn raw_file_tolerates_missing_fields() {
        let raw: RawInstanceFile = serde_yaml::from_str("name: api\n").unwrap();
        assert_eq!(raw.name.as_deref(), Some("api"));
        assert!(raw.component.is_none());
        assert!(raw.inputs.is_none());
    }

    #[test]
    fn src_string_is_path_variant() {
        let parsed = inputs("src: ./code\nregion: gz\n");
        assert_eq!(parsed.src, Some(SourceSpec::Path(PathBuf::from("./code"))));
        assert_eq!(parsed.values["region"], "gz");
        assert!(!parsed.values.contains_key("src"));
    }

    #[test]
    fn src_object_is_structured_variant() {
        let parsed = inputs("src:\n  src: ./in\n  dist: ./out\n  exclude: [.env]\n");
        match parsed.src {
            Some(SourceSpec::Structured { src, dist, extra }) => {
                assert_eq!(src, Some(PathBuf::from("./in")));
                assert_eq!(dist, Some(PathBuf::from("./out")));
                assert_eq!(extra["exclude"][0], ".env");
            }
            other => panic!("expected structured src, got {:?}", other),
        }
    }

    #[test]
    fn resolve_paths_rewrites_plain_src() {
        let mut parsed = inputs("src: ./code\n");
        parsed.resolve_paths(Path::new("/a/b"));
        assert_eq!(
            parsed.src,
            Some(SourceSpec::Path(PathBuf::from("/a/b/code")))
        );
    }

    #[test]
    fn resolve_paths_rewrites_structured_fields_independently() {
        let mut parsed = inputs("src:\n  src: ./in\n  hook: npm run build\n");
        parsed.resolve_paths(Path::new("/a/b"));
        match parsed.src {
            Some(SourceSpec::Structured { src, dist, extra }) => {
                assert_eq!(src, Some(PathBuf::from("/a/b/in")));
                assert_eq!(dist, None);
                assert_eq!(extra["hook"], "npm run build");
            }
            other => panic!("expected structured src, got {:?}", other),
        }
    }

    #[test]
    fn serializes_src_in_original_shape() {
        let mut parsed = inputs("src:\n  src: ./in\n  dist: ./out\nmemory: 128\n");
        parsed.resolve_paths(Path::new("/srv"));
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["src"]["src"], "/srv/in");
        assert_eq!(json["src"]["dist"], "/srv/out");
        assert_eq!(json["memory"], 128);
    }

    #[test]
    fn qualified_name_marks_missing_stage() {
        let config = InstanceConfig {
            name: "api".into(),
            component: "scf".into(),
            org: "acme".into(),
            app: "shop".into(),
            stage: None,
            inputs: None,
        };
        assert_eq!(config.qualified_name(), "acme/shop/-/api");
    }
}
