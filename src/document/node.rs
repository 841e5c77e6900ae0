//! Raw document tree nodes as returned by the document API.

use serde::{Deserialize, Serialize};

/// The node kinds the walker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Page,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Text,
    Other,
}

impl NodeKind {
    /// Map the API's `type` string to a kind.
    ///
    /// `CANVAS` is the API's historical name for a page.
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            "DOCUMENT" => NodeKind::Document,
            "PAGE" | "CANVAS" => NodeKind::Page,
            "FRAME" => NodeKind::Frame,
            "GROUP" => NodeKind::Group,
            "SECTION" => NodeKind::Section,
            "COMPONENT" => NodeKind::Component,
            "COMPONENT_SET" => NodeKind::ComponentSet,
            "TEXT" => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    /// Nodes that only hold other nodes.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::Page
                | NodeKind::Frame
                | NodeKind::Group
                | NodeKind::Section
        )
    }
}

/// A node of the design document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Text content, present on TEXT nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            characters: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DocumentNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_characters(mut self, characters: impl Into<String>) -> Self {
        self.characters = Some(characters.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    /// The label a TEXT node contributes: its characters, else its layer name.
    pub fn text_label(&self) -> &str {
        self.characters
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Depth-first search for the first descendant (or self) matching `pred`.
    pub fn find(&self, pred: &impl Fn(&DocumentNode) -> bool) -> Option<&DocumentNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }
}

/// Response body of the file endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentFile {
    #[serde(default)]
    pub name: String,
    pub document: DocumentNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nested_nodes() {
        let json = r#"{
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [
                {"id": "1:1", "name": "Icons", "type": "CANVAS", "children": [
                    {"id": "2:1", "name": "Arrows", "type": "TEXT", "characters": "Arrows"}
                ]}
            ]
        }"#;

        let node: DocumentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind(), NodeKind::Document);
        assert_eq!(node.children[0].kind(), NodeKind::Page);
        assert_eq!(node.children[0].children[0].text_label(), "Arrows");
    }

    #[test]
    fn test_unknown_type_maps_to_other() {
        assert_eq!(NodeKind::from_type("VECTOR"), NodeKind::Other);
        assert_eq!(NodeKind::from_type("INSTANCE"), NodeKind::Other);
    }

    #[test]
    fn test_text_label_falls_back_to_name() {
        let node = DocumentNode::new("1", "Layer name", "TEXT").with_characters("  ");
        assert_eq!(node.text_label(), "Layer name");
    }

    #[test]
    fn test_find_depth_first() {
        let tree = DocumentNode::new("0", "root", "DOCUMENT").with_children(vec![
            DocumentNode::new("1", "page", "CANVAS").with_children(vec![DocumentNode::new(
                "2", "Logos", "FRAME",
            )]),
            DocumentNode::new("3", "Logos", "FRAME"),
        ]);

        let found = tree.find(&|n: &DocumentNode| n.name == "Logos").unwrap();
        assert_eq!(found.id, "2");
    }
}
