//! Link type and related structures.
//!
//! Links connect two persons by name. Parent links are directed
//! parent → child; spouse links are undirected and emitted once per
//! pair with the lexicographically smaller name as source.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of relation a link encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Parent,
    Spouse,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Spouse => "spouse",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relation between two persons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphLink {
    #[serde(deserialize_with = "endpoint")]
    pub source: String,
    #[serde(deserialize_with = "endpoint")]
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: LinkKind,
}

impl GraphLink {
    /// Directed parent → child link.
    pub fn parent(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            source: parent.into(),
            target: child.into(),
            kind: LinkKind::Parent,
        }
    }

    /// Spouse link. Endpoints are stored in lexicographic order.
    pub fn spouse(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self {
            source,
            target,
            kind: LinkKind::Spouse,
        }
    }

    /// Deduplication key: `"p->c"` for parent links, `"a<->b"` for spouses.
    pub fn key(&self) -> String {
        match self.kind {
            LinkKind::Parent => format!("{}->{}", self.source, self.target),
            LinkKind::Spouse => format!("{}<->{}", self.source, self.target),
        }
    }

    #[inline]
    pub fn is_parent(&self) -> bool {
        self.kind == LinkKind::Parent
    }
}

/// A link endpoint as sent by the API: a bare name, or an object that
/// the force layout already resolved, carrying `id` and/or `name`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Endpoint {
    Name(String),
    Node {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

fn endpoint<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Endpoint::deserialize(deserializer)? {
        Endpoint::Name(name) => name,
        Endpoint::Node { id, name } => id
            .filter(|id| !id.is_empty())
            .or(name)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spouse_orders_endpoints() {
        let link = GraphLink::spouse("Zoe", "Adam");
        assert_eq!(link.source, "Adam");
        assert_eq!(link.target, "Zoe");
        assert_eq!(link.key(), "Adam<->Zoe");
    }

    #[test]
    fn test_parent_key() {
        let link = GraphLink::parent("P", "C");
        assert!(link.is_parent());
        assert_eq!(link.key(), "P->C");
    }

    #[test]
    fn test_decode_endpoint_shapes() {
        let json = r#"[
            {"source":"A","target":"B","type":"parent"},
            {"source":{"id":"A","x":1.0},"target":{"name":"C"},"type":"spouse"}
        ]"#;
        let links: Vec<GraphLink> = serde_json::from_str(json).unwrap();

        assert_eq!(links[0], GraphLink::parent("A", "B"));
        assert_eq!(links[1].source, "A");
        assert_eq!(links[1].target, "C");
        assert_eq!(links[1].kind, LinkKind::Spouse);
    }

    #[test]
    fn test_serialize_type_field() {
        let json = serde_json::to_value(GraphLink::spouse("A", "B")).unwrap();
        assert_eq!(json["type"], "spouse");
        assert_eq!(json["source"], "A");
    }
}
