//! Declarative stack definition and its YAML schema.
//!
//! A stack names a provider (gateway and default network) and a set of
//! functions keyed by name. Functions are held in a [`BTreeMap`] so every
//! consumer iterates them in lexicographic order.

use std::collections::BTreeMap;

use fnstack_common::error::{FnstackError, Result};
use fnstack_common::types::is_path_segment;
use serde::{Deserialize, Serialize};

/// Provider-level settings shared by every function in a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider name, informational only.
    #[serde(default)]
    pub name: String,
    /// Gateway URL for deploy and delete.
    #[serde(default, alias = "gatewayURL", alias = "gateway_url")]
    pub gateway: Option<String>,
    /// Network applied to functions that do not set their own.
    #[serde(default)]
    pub network: Option<String>,
}

/// One function entry of a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Embedded name. Accepted for compatibility and never used: the stack
    /// key always names the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Build source path.
    #[serde(default)]
    pub handler: Option<String>,
    /// Language template id.
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
    /// Command override for the function runtime.
    #[serde(default)]
    pub fprocess: Option<String>,
    /// Environment passed to the deployed function.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Skip the build step for this function.
    #[serde(default, alias = "skipBuild")]
    pub skip_build: bool,
    /// Network override for this function.
    #[serde(default)]
    pub network: Option<String>,
}

/// A complete stack file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDefinition {
    /// Provider defaults.
    #[serde(default)]
    pub provider: Provider,
    /// Functions keyed by name.
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDefinition>,
}

impl StackDefinition {
    /// Parses a YAML stack document and validates it.
    ///
    /// `location` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Parse`] if the document is not valid YAML,
    /// does not match the schema, or fails validation.
    pub fn from_yaml(content: &str, location: &str) -> Result<Self> {
        let stack: Self = serde_yaml::from_str(content).map_err(|e| FnstackError::Parse {
            location: location.to_string(),
            message: e.to_string(),
        })?;
        stack.validate(location)?;
        tracing::debug!(
            location,
            functions = stack.functions.len(),
            "parsed stack definition"
        );
        Ok(stack)
    }

    /// Checks invariants YAML deserialization cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Parse`] for empty function names, names or
    /// languages that are not a single path segment, or empty environment
    /// keys.
    pub fn validate(&self, location: &str) -> Result<()> {
        let invalid = |message: String| FnstackError::Parse {
            location: location.to_string(),
            message,
        };
        for (name, function) in &self.functions {
            if name.trim().is_empty() {
                return Err(invalid("function name must not be empty".into()));
            }
            if !is_path_segment(name) {
                return Err(invalid(format!(
                    "function name \"{name}\" must be a single path segment"
                )));
            }
            if let Some(lang) = function
                .lang
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !is_path_segment(l))
            {
                return Err(invalid(format!(
                    "function \"{name}\" has invalid language \"{lang}\""
                )));
            }
            if function.environment.keys().any(|k| k.trim().is_empty()) {
                return Err(invalid(format!(
                    "function \"{name}\" has an empty environment key"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
provider:
  name: faas
  gateway: http://gateway:8080
  network: backend
functions:
  url-ping:
    name: foo
    lang: python
    handler: ./sample/url-ping
    image: alexellis/faas-url-ping
  nodeinfo:
    lang: node
    handler: ./sample/nodeinfo
    image: functions/nodeinfo
    fprocess: node main.js
    skip_build: true
    network: frontend
    environment:
      write_debug: 'true'
";

    #[test]
    fn parses_provider_and_functions() {
        let stack = StackDefinition::from_yaml(SAMPLE, "stack.yml").expect("parse");
        assert_eq!(stack.provider.name, "faas");
        assert_eq!(stack.provider.gateway.as_deref(), Some("http://gateway:8080"));
        assert_eq!(stack.provider.network.as_deref(), Some("backend"));
        assert_eq!(stack.functions.len(), 2);

        let nodeinfo = &stack.functions["nodeinfo"];
        assert!(nodeinfo.skip_build);
        assert_eq!(nodeinfo.fprocess.as_deref(), Some("node main.js"));
        assert_eq!(nodeinfo.network.as_deref(), Some("frontend"));
        assert_eq!(
            nodeinfo.environment.get("write_debug").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn functions_iterate_in_lexicographic_order() {
        let stack = StackDefinition::from_yaml(SAMPLE, "stack.yml").expect("parse");
        let names: Vec<&str> = stack.functions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["nodeinfo", "url-ping"]);
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let yaml = r"
provider:
  gatewayURL: http://remote:8080
functions:
  fn1:
    language: go
    image: example/fn1
    skipBuild: true
";
        let stack = StackDefinition::from_yaml(yaml, "aliases.yml").expect("parse");
        assert_eq!(stack.provider.gateway.as_deref(), Some("http://remote:8080"));
        let f = &stack.functions["fn1"];
        assert_eq!(f.lang.as_deref(), Some("go"));
        assert!(f.skip_build);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let stack = StackDefinition::from_yaml("{}", "empty.yml").expect("parse");
        assert!(stack.functions.is_empty());
        assert!(stack.provider.gateway.is_none());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = StackDefinition::from_yaml("functions: [unclosed", "bad.yml")
            .expect_err("should fail");
        assert!(matches!(err, FnstackError::Parse { ref location, .. } if location == "bad.yml"));
    }

    #[test]
    fn empty_environment_key_is_rejected() {
        let yaml = r"
functions:
  fn1:
    image: example/fn1
    environment:
      '': value
";
        let err = StackDefinition::from_yaml(yaml, "env.yml").expect_err("should fail");
        assert!(err.to_string().contains("empty environment key"));
    }

    #[test]
    fn traversal_function_names_are_rejected() {
        for key in ["'..'", "'.'", "../escape", "nested/fn", "'a\\b'"] {
            let yaml = format!("functions:\n  {key}:\n    image: example/fn\n");
            let err = StackDefinition::from_yaml(&yaml, "evil.yml").expect_err(key);
            assert!(
                err.to_string().contains("single path segment"),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn traversal_language_is_rejected() {
        let yaml = r"
functions:
  fn1:
    image: example/fn1
    lang: ../../etc
";
        let err = StackDefinition::from_yaml(yaml, "lang.yml").expect_err("should fail");
        assert!(err.to_string().contains("invalid language"));
    }
}
