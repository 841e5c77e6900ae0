//! Locates icon sections in the document and collects icon sets.
//!
//! Inside a section, TEXT nodes act as category labels for the nodes that
//! follow them. Assignment is done in two passes over each child list: first
//! the label positions are recorded, then every non-text node takes the
//! nearest label before it.

use tracing::{debug, warn};

use crate::config::Section;
use crate::error::{Result, SwatchError};
use crate::svg::icon_prefix;
use crate::validation::Diagnostics;

use super::node::{DocumentNode, NodeKind};
use super::slug::slugify;
use super::variant::Variant;

/// Category given to sets that appear before any label.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Label whose members are never exported.
pub const PRIVATE_CATEGORY: &str = "private";

/// Whether the set came from a component set or a lone component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    ComponentSet,
    Component,
}

/// A named group of interchangeable variants representing one icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSet {
    /// Slugified name used for the output file.
    pub name: String,
    /// Name as it appears in the document.
    pub raw_name: String,
    /// Icon type taken from the section (e.g. "icon", "logo").
    pub icon_type: String,
    pub category: Option<String>,
    pub kind: SetKind,
    pub variants: Vec<Variant>,
}

impl IconSet {
    /// Category used in paths and the index.
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// The export target for one of this set's variants.
    pub fn target(&self, variant: &Variant) -> IconTarget {
        IconTarget {
            icon_type: self.icon_type.clone(),
            category: self.category_or_default().to_string(),
            name: self.name.clone(),
            node_id: variant.node_id.clone(),
        }
    }
}

/// A selected variant, ready to be exported and indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTarget {
    pub icon_type: String,
    pub category: String,
    pub name: String,
    /// Node of the selected variant.
    pub node_id: String,
}

impl IconTarget {
    /// Output path relative to the output root.
    pub fn file_path(&self) -> String {
        format!("{}/{}/{}.svg", self.icon_type, self.category, self.name)
    }

    /// Id prefix unique to this icon.
    pub fn prefix(&self) -> String {
        icon_prefix(&self.icon_type, &self.category, &self.name)
    }
}

/// Icon sets found in the document, in document order.
#[derive(Debug, Default)]
pub struct WalkResult {
    pub sets: Vec<IconSet>,
    pub diagnostics: Diagnostics,
}

/// Walks the configured page and sections of a document.
pub struct DocumentWalker<'a> {
    page: &'a str,
    sections: &'a [Section],
}

impl<'a> DocumentWalker<'a> {
    pub fn new(page: &'a str, sections: &'a [Section]) -> Self {
        Self { page, sections }
    }

    /// Collect icon sets from every configured section.
    ///
    /// A missing page is fatal; a missing section only produces a warning.
    pub fn walk(&self, document: &DocumentNode) -> Result<WalkResult> {
        let page = document
            .find(&|n: &DocumentNode| {
                n.kind() == NodeKind::Page && n.name.eq_ignore_ascii_case(self.page)
            })
            .ok_or_else(|| SwatchError::Build {
                message: format!("page '{}' not found in document", self.page),
                help: Some(
                    "Set `page` in swatch.yaml to the page holding the icon frames".to_string(),
                ),
            })?;

        let mut result = WalkResult::default();

        for section in self.sections {
            let Some(frame) = page.children.iter().find_map(|child| {
                child.find(&|n: &DocumentNode| {
                    n.kind().is_container() && n.name.eq_ignore_ascii_case(&section.frame)
                })
            }) else {
                warn!(frame = %section.frame, "section frame not found");
                result.diagnostics.warn(
                    "swatch::walk::missing-section",
                    &section.frame,
                    format!("no frame named '{}' on page '{}'", section.frame, page.name),
                );
                continue;
            };

            let before = result.sets.len();
            walk_children(&frame.children, None, &section.icon_type, &mut result);
            debug!(
                frame = %section.frame,
                sets = result.sets.len() - before,
                "walked section"
            );
        }

        Ok(result)
    }
}

fn walk_children(
    children: &[DocumentNode],
    inherited: Option<&str>,
    icon_type: &str,
    result: &mut WalkResult,
) {
    let labels: Vec<(usize, String)> = children
        .iter()
        .enumerate()
        .filter(|(_, n)| n.kind() == NodeKind::Text)
        .map(|(i, n)| (i, slugify(n.text_label())))
        .filter(|(_, label)| !label.is_empty())
        .collect();

    let mut current: Option<&str> = inherited;
    let mut labels_seen = 0;

    for (index, node) in children.iter().enumerate() {
        while labels_seen < labels.len() && labels[labels_seen].0 < index {
            current = Some(labels[labels_seen].1.as_str());
            labels_seen += 1;
        }

        let kind = node.kind();
        if kind == NodeKind::Text {
            continue;
        }
        if current == Some(PRIVATE_CATEGORY) {
            debug!(node = %node.name, "skipping private node");
            continue;
        }

        match kind {
            NodeKind::ComponentSet => {
                let variants = node
                    .children
                    .iter()
                    .filter(|c| c.kind() == NodeKind::Component)
                    .map(|c| Variant::from_node(c.id.clone(), c.name.clone()))
                    .collect();
                push_set(node, SetKind::ComponentSet, variants, current, icon_type, result);
            }
            NodeKind::Component => {
                let variants = vec![Variant::from_node(node.id.clone(), node.name.clone())];
                push_set(node, SetKind::Component, variants, current, icon_type, result);
            }
            k if k.is_container() => walk_children(&node.children, current, icon_type, result),
            _ => {}
        }
    }
}

fn push_set(
    node: &DocumentNode,
    kind: SetKind,
    variants: Vec<Variant>,
    category: Option<&str>,
    icon_type: &str,
    result: &mut WalkResult,
) {
    let name = slugify(&node.name);
    if name.is_empty() {
        result.diagnostics.warn(
            "swatch::walk::empty-name",
            &node.id,
            format!("'{}' has no usable characters for a file name", node.name),
        );
        return;
    }

    result.sets.push(IconSet {
        name,
        raw_name: node.name.clone(),
        icon_type: icon_type.to_string(),
        category: category.map(str::to_string),
        kind,
        variants,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(id: &str, label: &str) -> DocumentNode {
        DocumentNode::new(id, label, "TEXT").with_characters(label)
    }

    fn component(id: &str, name: &str) -> DocumentNode {
        DocumentNode::new(id, name, "COMPONENT")
    }

    fn component_set(id: &str, name: &str, variants: &[&str]) -> DocumentNode {
        DocumentNode::new(id, name, "COMPONENT_SET").with_children(
            variants
                .iter()
                .enumerate()
                .map(|(i, v)| component(&format!("{}:{}", id, i), v))
                .collect(),
        )
    }

    fn document(sections: Vec<DocumentNode>) -> DocumentNode {
        DocumentNode::new("0:0", "Document", "DOCUMENT").with_children(vec![
            DocumentNode::new("0:1", "Cover", "CANVAS"),
            DocumentNode::new("0:2", "Icons", "CANVAS").with_children(sections),
        ])
    }

    fn sections() -> Vec<Section> {
        vec![Section::new("Icons", "icon"), Section::new("Logos", "logo")]
    }

    fn names(result: &WalkResult) -> Vec<(String, String)> {
        result
            .sets
            .iter()
            .map(|s| (s.category_or_default().to_string(), s.name.clone()))
            .collect()
    }

    #[test]
    fn test_categories_come_from_preceding_labels() {
        let doc = document(vec![DocumentNode::new("1:0", "Icons", "FRAME").with_children(vec![
            component("1:1", "Loose"),
            text("1:2", "Arrows"),
            component("1:3", "ArrowUp"),
            component_set("1:4", "ArrowDown", &["Size=Small"]),
            text("1:5", "Private"),
            component("1:6", "Secret"),
            text("1:7", "Labels"),
            component("1:8", "GTP-LabelAdd"),
        ])]);

        let sections = sections();
        let result = DocumentWalker::new("icons", &sections).walk(&doc).unwrap();

        assert_eq!(
            names(&result),
            vec![
                ("uncategorized".to_string(), "loose".to_string()),
                ("arrows".to_string(), "arrow-up".to_string()),
                ("arrows".to_string(), "arrow-down".to_string()),
                ("labels".to_string(), "label-add".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_frames_inherit_category() {
        let doc = document(vec![DocumentNode::new("1:0", "Logos", "FRAME").with_children(vec![
            text("1:1", "Exchanges"),
            DocumentNode::new("1:2", "Row", "GROUP").with_children(vec![
                component("1:3", "Binance"),
                text("1:4", "Wallets"),
                component("1:5", "Ledger"),
            ]),
            component("1:6", "Kraken"),
        ])]);

        let sections = sections();
        let result = DocumentWalker::new("Icons", &sections).walk(&doc).unwrap();

        assert_eq!(
            names(&result),
            vec![
                ("exchanges".to_string(), "binance".to_string()),
                ("wallets".to_string(), "ledger".to_string()),
                ("exchanges".to_string(), "kraken".to_string()),
            ]
        );
        assert!(result.sets.iter().all(|s| s.icon_type == "logo"));
        // Icons frame is absent from this document
        assert_eq!(result.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_component_set_variants_are_parsed() {
        let doc = document(vec![DocumentNode::new("1:0", "Icons", "FRAME").with_children(vec![
            component_set("2:0", "Wallet", &["Color=Dark, Size=Large", "Color=Dark, Size=Small"]),
        ])]);

        let sections = sections();
        let result = DocumentWalker::new("Icons", &sections).walk(&doc).unwrap();
        let set = &result.sets[0];

        assert_eq!(set.kind, SetKind::ComponentSet);
        assert_eq!(set.variants.len(), 2);
        assert_eq!(set.variants[1].size.as_deref(), Some("Small"));
        assert_eq!(set.variants[1].color.as_deref(), Some("Dark"));
    }

    #[test]
    fn test_target_paths() {
        let set = IconSet {
            name: "label-add".to_string(),
            raw_name: "GTP-LabelAdd".to_string(),
            icon_type: "icon".to_string(),
            category: None,
            kind: SetKind::Component,
            variants: vec![Variant::from_node("9:9", "GTP-LabelAdd")],
        };
        let target = set.target(&set.variants[0]);

        assert_eq!(target.file_path(), "icon/uncategorized/label-add.svg");
        assert_eq!(target.prefix(), "icon-uncategorized-label-add");
        assert_eq!(target.node_id, "9:9");
    }

    #[test]
    fn test_missing_page_is_fatal() {
        let doc = document(vec![]);
        let sections = sections();
        let err = DocumentWalker::new("Logos page", &sections).walk(&doc).unwrap_err();
        assert!(err.to_string().contains("Logos page"));
    }

    #[test]
    fn test_unnamed_component_is_skipped_with_warning() {
        let doc = document(vec![DocumentNode::new("1:0", "Icons", "FRAME")
            .with_children(vec![component("1:1", "???")])]);

        let sections = vec![Section::new("Icons", "icon")];
        let result = DocumentWalker::new("Icons", &sections).walk(&doc).unwrap();

        assert!(result.sets.is_empty());
        assert_eq!(
            result.diagnostics.with_code("swatch::walk::empty-name").count(),
            1
        );
    }
}
