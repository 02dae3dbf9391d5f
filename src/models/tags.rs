//! Resource tags.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag key EKS puts on managed node group instances.
pub const EKS_CLUSTER_TAG: &str = "eks:cluster-name";
/// Prefix of the Kubernetes cluster ownership tag key.
pub const K8S_CLUSTER_TAG_PREFIX: &str = "kubernetes.io/cluster/";
/// Tag key the autoscaling service puts on group members.
pub const ASG_NAME_TAG: &str = "aws:autoscaling:groupName";

/// Ordered key/value tags with unique keys.
///
/// Deserializes from either a plain JSON object or the AWS
/// `[{"Key": .., "Value": ..}]` list form; always serializes as an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Tags {
        Tags::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert a tag, replacing any earlier value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// First key starting with `prefix`, with the prefix removed.
    pub fn key_suffix(&self, prefix: &str) -> Option<&str> {
        self.0.keys().find_map(|k| k.strip_prefix(prefix))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

#[derive(Deserialize)]
struct AwsTag {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value", default)]
    value: String,
}

struct TagsVisitor;

impl<'de> Visitor<'de> for TagsVisitor {
    type Value = Tags;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a tag map or a list of {Key, Value} objects")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Tags, M::Error> {
        let mut tags = Tags::new();
        while let Some((k, v)) = map.next_entry::<String, String>()? {
            tags.insert(k, v);
        }
        Ok(tags)
    }

    fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Tags, S::Error> {
        let mut tags = Tags::new();
        while let Some(tag) = seq.next_element::<AwsTag>()? {
            tags.insert(tag.key, tag.value);
        }
        Ok(tags)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Tags, E> {
        Ok(Tags::new())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Tags, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TagsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_none_when_absent() {
        let tags: Tags = [("Name", "web-1")].into_iter().collect();
        assert_eq!(tags.get("Name"), Some("web-1"));
        assert_eq!(tags.get("name"), None);
        assert_eq!(tags.get(EKS_CLUSTER_TAG), None);
    }

    #[test]
    fn test_key_suffix() {
        let tags: Tags = [("kubernetes.io/cluster/prod-eks", "owned"), ("Name", "node")]
            .into_iter()
            .collect();
        assert_eq!(tags.key_suffix(K8S_CLUSTER_TAG_PREFIX), Some("prod-eks"));
        assert_eq!(tags.key_suffix("missing/"), None);
    }

    #[test]
    fn test_deserialize_aws_list_form() {
        let json = r#"[{"Key": "Name", "Value": "a"}, {"Key": "Name", "Value": "b"}, {"Key": "env"}]"#;
        let tags: Tags = serde_json::from_str(json).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("Name"), Some("b"));
        assert_eq!(tags.get("env"), Some(""));
    }

    #[test]
    fn test_deserialize_map_form_and_null() {
        let tags: Tags = serde_json::from_str(r#"{"team": "net"}"#).unwrap();
        assert_eq!(tags.get("team"), Some("net"));
        let tags: Tags = serde_json::from_str("null").unwrap();
        assert!(tags.is_empty());
        assert_eq!(serde_json::to_string(&tags).unwrap(), "{}");
    }
}
