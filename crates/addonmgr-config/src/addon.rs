use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::flex::FlexString;

/// The addon a lifecycle operation acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonRef {
  pub name: String,
  pub namespace: String,
  #[serde(default)]
  pub uid: String,
  /// Fingerprint of the addon spec. Embedded in every workflow name.
  pub checksum: String,
  /// Package version, stamped on workloads as `app.kubernetes.io/version`.
  #[serde(default)]
  pub pkg_version: String,
  #[serde(default)]
  pub params: AddonParams,
}

impl AddonRef {
  /// `namespace/name` key used in logs and events.
  pub fn key(&self) -> String {
    format!("{}/{}", self.namespace, self.name)
  }
}

/// Parameters copied into the workflow's global arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonParams {
  /// Namespace the addon's workloads are deployed into.
  #[serde(default)]
  pub namespace: String,
  #[serde(default)]
  pub context: ClusterContext,
  #[serde(default)]
  pub data: HashMap<String, FlexString>,
}

/// Cluster-level context shared by all addons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterContext {
  #[serde(default)]
  pub cluster_name: String,
  #[serde(default)]
  pub cluster_region: String,
  #[serde(default)]
  pub additional_configs: HashMap<String, FlexString>,
}

impl ClusterContext {
  /// String fields in declaration order, keyed by their serialized name.
  ///
  /// New string fields must be added here to reach the workflow arguments.
  pub fn string_fields(&self) -> [(&'static str, &str); 2] {
    [
      ("clusterName", self.cluster_name.as_str()),
      ("clusterRegion", self.cluster_region.as_str()),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_string_fields_use_serialized_names() {
    let context = ClusterContext {
      cluster_name: "c1".to_string(),
      cluster_region: "us-west-2".to_string(),
      additional_configs: HashMap::new(),
    };

    let serialized = serde_json::to_value(&context).unwrap();
    for (name, value) in context.string_fields() {
      assert_eq!(serialized[name], value);
    }
  }

  #[test]
  fn test_deserialize_addon_from_yaml() {
    let yaml = r#"
name: event-router
namespace: addon-event-router-ns
uid: 1b2c
checksum: 6b9f1d
pkgVersion: v0.2
params:
  namespace: addon-event-router-ns
  context:
    clusterName: c1
    clusterRegion: us-west-2
    additionalConfigs:
      replicas: 3
  data:
    debug: true
"#;

    let addon: AddonRef = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(addon.key(), "addon-event-router-ns/event-router");
    assert_eq!(addon.pkg_version, "v0.2");
    assert_eq!(addon.params.context.cluster_region, "us-west-2");
    assert_eq!(
      addon.params.context.additional_configs["replicas"].as_str(),
      "3"
    );
    assert_eq!(addon.params.data["debug"].as_str(), "true");
  }

  #[test]
  fn test_params_default_when_absent() {
    let addon: AddonRef =
      serde_json::from_str(r#"{"name":"a","namespace":"ns","checksum":"abc"}"#).unwrap();
    assert_eq!(addon.params, AddonParams::default());
    assert!(addon.uid.is_empty());
  }
}
