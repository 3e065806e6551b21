//! Configuration option definitions

use serde::{Deserialize, Serialize};

/// A named group of configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigGroup {
    /// Group name
    pub name: String,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Options in this group, in display order
    #[serde(default)]
    pub items: Vec<ConfigItem>,
}

/// A single configuration option
///
/// `default` and `value` may themselves contain template expressions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    /// Option name, as referenced by `ConfigOption "name"`
    pub name: String,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Option type (text, password, bool, ...)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Fallback when neither the operator nor `value` supplies one
    #[serde(default)]
    pub default: Option<String>,

    /// Preset value, takes precedence over `default`
    #[serde(default)]
    pub value: Option<String>,
}

impl ConfigGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an item (builder style)
    pub fn with_item(mut self, item: ConfigItem) -> Self {
        self.items.push(item);
        self
    }
}

impl ConfigItem {
    /// Create an item with no default or value
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_groups_yaml() {
        let yaml = r#"
- name: app
  title: Application
  items:
    - name: app_name
      type: text
      default: demo
    - name: replicas
      value: "3"
"#;
        let groups: Vec<ConfigGroup> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].kind.as_deref(), Some("text"));
        assert_eq!(groups[0].items[0].default.as_deref(), Some("demo"));
        assert_eq!(groups[0].items[1].value.as_deref(), Some("3"));
    }
}
