use std::collections::HashMap;

use log::debug;

use super::parse::{RawDomain, RawField, RawSubfield};
use crate::util::extract_id;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyNode {
    pub id: String,
    pub display_name: String,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<HierarchyNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::node_count)
            .sum::<usize>()
    }

    pub fn find(&self, id: &str) -> Option<&HierarchyNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Nodes from `self` down to the first node whose short id matches `id`, both ends included.
    pub fn path_to(&self, id: &str) -> Option<Vec<&HierarchyNode>> {
        if !self.id.is_empty() && extract_id(&self.id) == extract_id(id) {
            return Some(vec![self]);
        }
        self.children.iter().find_map(|child| {
            let mut path = child.path_to(id)?;
            path.insert(0, self);
            Some(path)
        })
    }
}

/// Joins fields under domains and subfields under fields by their parent
/// reference. Records whose parent is unknown are dropped.
pub fn build_hierarchy(
    domains: Vec<RawDomain>,
    fields: Vec<RawField>,
    subfields: Vec<RawSubfield>,
) -> HierarchyNode {
    let mut subfields_by_field: HashMap<String, Vec<HierarchyNode>> = HashMap::new();
    for subfield in subfields {
        let Some(field) = subfield.field else {
            debug!("subfield {} has no parent field, skipping", subfield.id);
            continue;
        };
        subfields_by_field
            .entry(field.id)
            .or_default()
            .push(HierarchyNode::new(subfield.id, subfield.display_name));
    }

    let mut fields_by_domain: HashMap<String, Vec<HierarchyNode>> = HashMap::new();
    for field in fields {
        let Some(domain) = field.domain else {
            debug!("field {} has no parent domain, skipping", field.id);
            continue;
        };
        let children = subfields_by_field.remove(&field.id).unwrap_or_default();
        fields_by_domain
            .entry(domain.id)
            .or_default()
            .push(HierarchyNode::new(field.id, field.display_name).with_children(children));
    }

    for orphan in subfields_by_field.keys() {
        debug!("subfields of unknown field {orphan} skipped");
    }

    let domains = domains
        .into_iter()
        .map(|domain| {
            let children = fields_by_domain.remove(&domain.id).unwrap_or_default();
            HierarchyNode::new(domain.id, domain.display_name).with_children(children)
        })
        .collect();

    for orphan in fields_by_domain.keys() {
        debug!("fields of unknown domain {orphan} skipped");
    }

    HierarchyNode::default().with_children(domains)
}

#[cfg(test)]
mod tests {
    use super::super::parse::ParentRef;
    use super::*;

    fn parent(id: &str) -> Option<ParentRef> {
        Some(ParentRef {
            id: id.to_owned(),
            display_name: String::new(),
        })
    }

    #[test]
    fn joins_three_levels_under_implicit_root() {
        let domains = vec![RawDomain {
            id: "D1".to_owned(),
            display_name: "Physical Sciences".to_owned(),
        }];
        let fields = vec![RawField {
            id: "F1".to_owned(),
            display_name: "Computer Science".to_owned(),
            domain: parent("D1"),
        }];
        let subfields = vec![
            RawSubfield {
                id: "S1".to_owned(),
                display_name: "Artificial Intelligence".to_owned(),
                field: parent("F1"),
            },
            RawSubfield {
                id: "S2".to_owned(),
                display_name: "Computer Networks".to_owned(),
                field: parent("F1"),
            },
        ];

        let root = build_hierarchy(domains, fields, subfields);

        assert!(root.id.is_empty());
        assert_eq!(root.children.len(), 1);
        let field = &root.children[0].children[0];
        assert_eq!(field.display_name, "Computer Science");
        assert_eq!(field.children.len(), 2);
        assert_eq!(root.node_count(), 5);
    }

    #[test]
    fn records_with_missing_parents_are_excluded() {
        let domains = vec![RawDomain {
            id: "D1".to_owned(),
            display_name: "Health Sciences".to_owned(),
        }];
        let fields = vec![
            RawField {
                id: "F1".to_owned(),
                display_name: "Medicine".to_owned(),
                domain: parent("D1"),
            },
            RawField {
                id: "F2".to_owned(),
                display_name: "Orphan".to_owned(),
                domain: parent("D404"),
            },
            RawField {
                id: "F3".to_owned(),
                display_name: "Unlinked".to_owned(),
                domain: None,
            },
        ];
        let subfields = vec![RawSubfield {
            id: "S1".to_owned(),
            display_name: "Lost".to_owned(),
            field: parent("F404"),
        }];

        let root = build_hierarchy(domains, fields, subfields);

        assert_eq!(root.node_count(), 3);
        assert!(root.find("F2").is_none());
        assert!(root.find("F3").is_none());
        assert!(root.find("S1").is_none());
        assert!(root.find("F1").is_some_and(HierarchyNode::is_leaf));
    }

    #[test]
    fn path_matches_short_and_full_ids() {
        let root = HierarchyNode::default().with_children(vec![
            HierarchyNode::new("https://openalex.org/domains/3", "Physical Sciences").with_children(
                vec![HierarchyNode::new("https://openalex.org/fields/17", "Computer Science")
                    .with_children(vec![HierarchyNode::new(
                        "https://openalex.org/subfields/1702",
                        "Artificial Intelligence",
                    )])],
            ),
        ]);

        let names = |id: &str| {
            root.path_to(id).map(|path| {
                path.iter()
                    .map(|node| node.display_name.as_str())
                    .collect::<Vec<_>>()
            })
        };
        let expected = Some(vec![
            "",
            "Physical Sciences",
            "Computer Science",
            "Artificial Intelligence",
        ]);
        assert_eq!(names("1702"), expected);
        assert_eq!(names("https://openalex.org/subfields/1702"), expected);
        assert_eq!(names("9999"), None);
    }
}
