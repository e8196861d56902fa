use std::collections::{HashMap, HashSet};

use crate::color::WorkType;

use super::parse::RawWork;

const UNTITLED_WORK: &str = "Untitled work";

#[derive(Clone, Debug, PartialEq)]
pub struct WorkNode {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub citation_count: u64,
    pub work_type: WorkType,
    pub type_tag: String,
    pub reference_count: usize,
}

impl WorkNode {
    fn from_raw(work: &RawWork) -> Self {
        let title = work
            .title
            .as_deref()
            .or(work.display_name.as_deref())
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED_WORK)
            .to_owned();
        let type_tag = work.work_type.clone().unwrap_or_else(|| "other".to_owned());

        Self {
            id: work.id.clone(),
            title,
            year: work.publication_year,
            citation_count: work.cited_by_count,
            work_type: WorkType::from_tag(&type_tag),
            type_tag,
            reference_count: work.referenced_works.len(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WorkGraph {
    pub nodes: Vec<WorkNode>,
    /// `(citing, cited)` pairs, both inside `nodes`.
    pub edges: Vec<(usize, usize)>,
    pub index_by_id: HashMap<String, usize>,
}

impl WorkGraph {
    pub fn from_works(works: &[RawWork]) -> Self {
        let mut nodes = Vec::with_capacity(works.len());
        let mut index_by_id = HashMap::with_capacity(works.len());
        let mut sources = Vec::with_capacity(works.len());

        for work in works {
            if index_by_id.contains_key(&work.id) {
                continue;
            }
            index_by_id.insert(work.id.clone(), nodes.len());
            nodes.push(WorkNode::from_raw(work));
            sources.push(work);
        }

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for (source, work) in sources.iter().enumerate() {
            for referenced_id in &work.referenced_works {
                let Some(&target) = index_by_id.get(referenced_id) else {
                    continue;
                };
                if target == source || !seen.insert((source, target)) {
                    continue;
                }
                edges.push((source, target));
            }
        }

        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
