use std::cell::RefCell;
use std::collections::HashMap;

use openalex_graphs::openalex::{
    FetchError, ListQuery, OpenAlexClient, PAGE_SIZE, RawTopic, Transport,
};

/// Serves `sizes[page - 1]` synthetic topics per page and fails on the listed pages.
struct PagedTransport {
    sizes: Vec<usize>,
    failing_page: Option<usize>,
    requested_pages: RefCell<Vec<usize>>,
}

impl PagedTransport {
    fn new(sizes: &[usize]) -> Self {
        Self {
            sizes: sizes.to_vec(),
            failing_page: None,
            requested_pages: RefCell::new(Vec::new()),
        }
    }
}

fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

impl Transport for PagedTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<String, FetchError> {
        let page = param(query, "page")
            .and_then(|page| page.parse::<usize>().ok())
            .unwrap_or(1);
        assert_eq!(param(query, "per_page"), Some("200"));
        self.requested_pages.borrow_mut().push(page);

        if self.failing_page == Some(page) {
            return Err(FetchError::Status {
                path: path.to_owned(),
                status: 503,
            });
        }

        let count = self.sizes.get(page - 1).copied().unwrap_or(0);
        let results = (0..count)
            .map(|index| {
                format!(
                    r#"{{"id": "https://openalex.org/T{page}{index:03}", "display_name": "Topic {page}-{index}", "works_count": {index}}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        Ok(format!(r#"{{"results": [{results}]}}"#))
    }
}

#[test]
fn fetch_all_concatenates_pages_until_a_short_one() {
    let client = OpenAlexClient::with_transport(PagedTransport::new(&[200, 200, 73]));

    let topics = client
        .fetch_all::<RawTopic>("topics", &ListQuery::new())
        .expect("all pages succeed");

    assert_eq!(topics.len(), 473);
    assert_eq!(*client.transport().requested_pages.borrow(), vec![1, 2, 3]);
    assert_eq!(topics[0].id, "https://openalex.org/T1000");
    assert_eq!(topics[PAGE_SIZE].id, "https://openalex.org/T2000");
    assert_eq!(topics[472].display_name, "Topic 3-72");
}

#[test]
fn exact_multiple_needs_one_empty_page() {
    let client = OpenAlexClient::with_transport(PagedTransport::new(&[200, 200]));

    let topics = client
        .fetch_all::<RawTopic>("topics", &ListQuery::new())
        .expect("all pages succeed");

    assert_eq!(topics.len(), 400);
    assert_eq!(*client.transport().requested_pages.borrow(), vec![1, 2, 3]);
}

#[test]
fn a_failing_page_aborts_the_whole_fetch() {
    let mut transport = PagedTransport::new(&[200, 200, 73]);
    transport.failing_page = Some(2);
    let client = OpenAlexClient::with_transport(transport);

    let error = client
        .fetch_all::<RawTopic>("topics", &ListQuery::new())
        .expect_err("second page fails");

    assert!(matches!(error, FetchError::Status { status: 503, .. }));
    assert_eq!(*client.transport().requested_pages.borrow(), vec![1, 2]);
}

struct FixtureTransport {
    bodies: HashMap<&'static str, &'static str>,
}

impl Transport for FixtureTransport {
    fn get(&self, path: &str, _query: &[(String, String)]) -> Result<String, FetchError> {
        self.bodies
            .get(path)
            .map(|body| (*body).to_owned())
            .ok_or_else(|| FetchError::Status {
                path: path.to_owned(),
                status: 404,
            })
    }
}

#[test]
fn hierarchy_joins_domains_fields_and_subfields() {
    let bodies = HashMap::from([
        (
            "domains",
            r#"{"results": [
                {"id": "https://openalex.org/domains/3", "display_name": "Physical Sciences"},
                {"id": "https://openalex.org/domains/4", "display_name": "Health Sciences"}
            ]}"#,
        ),
        (
            "fields",
            r#"{"results": [
                {"id": "https://openalex.org/fields/17", "display_name": "Computer Science",
                 "domain": {"id": "https://openalex.org/domains/3", "display_name": "Physical Sciences"}},
                {"id": "https://openalex.org/fields/99", "display_name": "Nowhere",
                 "domain": {"id": "https://openalex.org/domains/404"}}
            ]}"#,
        ),
        (
            "subfields",
            r#"{"results": [
                {"id": "https://openalex.org/subfields/1702", "display_name": "Artificial Intelligence",
                 "field": {"id": "https://openalex.org/fields/17"}},
                {"id": "https://openalex.org/subfields/1705", "display_name": "Computer Networks",
                 "field": {"id": "https://openalex.org/fields/17"}}
            ]}"#,
        ),
    ]);
    let client = OpenAlexClient::with_transport(FixtureTransport { bodies });

    let root = client.fetch_hierarchy().expect("hierarchy loads");

    assert_eq!(root.children.len(), 2);
    let physical = &root.children[0];
    assert_eq!(physical.display_name, "Physical Sciences");
    assert_eq!(physical.children.len(), 1);
    assert_eq!(physical.children[0].children.len(), 2);
    assert!(root.children[1].is_leaf());
    assert!(root.find("https://openalex.org/fields/99").is_none());
}

#[test]
fn hierarchy_fails_when_one_collection_fails() {
    let bodies = HashMap::from([("domains", r#"{"results": []}"#)]);
    let client = OpenAlexClient::with_transport(FixtureTransport { bodies });

    let error = client.fetch_hierarchy().expect_err("fields are missing");
    assert!(error.to_string().contains("fields"));
}
