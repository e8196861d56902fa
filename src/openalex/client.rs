use log::{debug, error};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::config::ClientConfig;
use super::hierarchy::{HierarchyNode, build_hierarchy};
use super::parse::{
    GroupCount, ListQuery, ListResponse, RawAuthor, RawDomain, RawField, RawSubfield, RawTopic,
    RawWork, Topic,
};

pub const PAGE_SIZE: usize = 200;

const WORKS_PER_PAGE: usize = 200;
const AUTHORS_PER_PAGE: usize = 50;
const INSTITUTIONS_PER_PAGE: usize = 100;
const INSTITUTION_GROUPING: &str = "authorships.institutions.lineage";
const CITATIONS_DESC: &str = "cited_by_count:desc";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("request to {path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait Transport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<String, FetchError>;
}

pub struct HttpTransport {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(concat!("openalex-graphs/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, config }
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<String, FetchError> {
        let url = self.config.endpoint_url(path);
        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        debug!("GET {url} {query:?}");
        match request.call() {
            Ok(response) => response.into_string().map_err(|error| FetchError::Transport {
                path: path.to_owned(),
                message: error.to_string(),
            }),
            Err(ureq::Error::Status(status, _)) => Err(FetchError::Status {
                path: path.to_owned(),
                status,
            }),
            Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
                path: path.to_owned(),
                message: transport.to_string(),
            }),
        }
    }
}

pub struct OpenAlexClient<T = HttpTransport> {
    transport: T,
    mailto: Option<String>,
}

impl OpenAlexClient<HttpTransport> {
    pub fn from_config(config: ClientConfig) -> Self {
        let mailto = config.mailto.clone();
        OpenAlexClient::with_transport(HttpTransport::new(config)).with_mailto(mailto)
    }
}

impl<T: Transport> OpenAlexClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            mailto: None,
        }
    }

    pub fn with_mailto(mut self, mailto: Option<String>) -> Self {
        self.mailto = mailto.filter(|address| !address.trim().is_empty());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<ListResponse<R>, FetchError> {
        let mut params = query.to_params();
        if let Some(mailto) = &self.mailto {
            params.push(("mailto".to_owned(), mailto.clone()));
        }

        let body = self.transport.get(path, &params)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            path: path.to_owned(),
            source,
        })
    }

    /// Walks `page=1..` with `per_page=200` until a short page arrives.
    /// The first failing page aborts the whole fetch.
    pub fn fetch_all<R: DeserializeOwned>(
        &self,
        path: &str,
        base_query: &ListQuery,
    ) -> Result<Vec<R>, FetchError> {
        let mut all_results = Vec::new();
        let mut page = 1usize;

        loop {
            let query = base_query.clone().page(page).per_page(PAGE_SIZE);
            let response = self.list::<R>(path, &query).inspect_err(|error| {
                error!("error fetching page {page} of {path}: {error}");
            })?;

            let page_len = response.results.len();
            all_results.extend(response.results);
            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!("fetched {} records from {path} in {page} pages", all_results.len());
        Ok(all_results)
    }

    pub fn fetch_hierarchy(&self) -> Result<HierarchyNode, FetchError> {
        let domains = self.fetch_all::<RawDomain>("domains", &ListQuery::new())?;
        let fields = self.fetch_all::<RawField>("fields", &ListQuery::new())?;
        let subfields = self.fetch_all::<RawSubfield>("subfields", &ListQuery::new())?;

        Ok(build_hierarchy(domains, fields, subfields))
    }

    pub fn fetch_topics(&self, subfield_id: &str) -> Result<Vec<Topic>, FetchError> {
        let query = ListQuery::new().filter("subfield.id", subfield_id);
        let mut topics = self
            .fetch_all::<RawTopic>("topics", &query)?
            .into_iter()
            .map(Topic::from)
            .collect::<Vec<_>>();
        topics.sort_by(|a, b| b.works_count.cmp(&a.works_count));
        Ok(topics)
    }

    pub fn fetch_works(&self, subfield_id: &str, topic_id: &str) -> Result<Vec<RawWork>, FetchError> {
        let query = ListQuery::new()
            .filter("primary_topic.subfield.id", subfield_id)
            .filter("primary_topic.id", topic_id)
            .sort(CITATIONS_DESC)
            .per_page(WORKS_PER_PAGE);
        Ok(self.list::<RawWork>("works", &query)?.results)
    }

    pub fn fetch_authors(&self, topic_id: &str) -> Result<Vec<RawAuthor>, FetchError> {
        let query = ListQuery::new()
            .filter("topics.id", topic_id)
            .sort(CITATIONS_DESC)
            .per_page(AUTHORS_PER_PAGE);
        Ok(self.list::<RawAuthor>("authors", &query)?.results)
    }

    pub fn fetch_institutions(
        &self,
        subfield_id: &str,
        topic_id: &str,
    ) -> Result<Vec<GroupCount>, FetchError> {
        let query = ListQuery::new()
            .filter("primary_topic.subfield.id", subfield_id)
            .filter("primary_topic.id", topic_id)
            .group_by(INSTITUTION_GROUPING)
            .per_page(INSTITUTIONS_PER_PAGE);
        Ok(self.list::<RawWork>("works", &query)?.group_by)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct RecordingTransport {
        body: String,
        calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Transport for RecordingTransport {
        fn get(&self, path: &str, query: &[(String, String)]) -> Result<String, FetchError> {
            self.calls
                .borrow_mut()
                .push((path.to_owned(), query.to_vec()));
            Ok(self.body.clone())
        }
    }

    fn recording(body: &str) -> OpenAlexClient<RecordingTransport> {
        OpenAlexClient::with_transport(RecordingTransport {
            body: body.to_owned(),
            calls: RefCell::new(Vec::new()),
        })
    }

    #[test]
    fn works_request_uses_topic_filter_and_citation_sort() {
        let client = recording(r#"{"results": []}"#);
        client.fetch_works("1702", "T10017").expect("fetch succeeds");

        let calls = client.transport().calls.borrow();
        assert_eq!(calls.len(), 1);
        let (path, params) = &calls[0];
        assert_eq!(path, "works");
        assert!(params.contains(&(
            "filter".to_owned(),
            "primary_topic.subfield.id:1702,primary_topic.id:T10017".to_owned()
        )));
        assert!(params.contains(&("sort".to_owned(), "cited_by_count:desc".to_owned())));
        assert!(params.contains(&("per_page".to_owned(), "200".to_owned())));
    }

    #[test]
    fn mailto_is_attached_when_configured() {
        let client = recording(r#"{"results": []}"#).with_mailto(Some("me@example.org".to_owned()));
        client.fetch_authors("T1").expect("fetch succeeds");

        let calls = client.transport().calls.borrow();
        assert!(
            calls[0]
                .1
                .contains(&("mailto".to_owned(), "me@example.org".to_owned()))
        );
    }

    #[test]
    fn blank_mailto_is_ignored() {
        let client = recording(r#"{"results": []}"#).with_mailto(Some("  ".to_owned()));
        client.fetch_authors("T1").expect("fetch succeeds");

        let calls = client.transport().calls.borrow();
        assert!(calls[0].1.iter().all(|(key, _)| key != "mailto"));
    }

    #[test]
    fn configured_blank_mailto_is_ignored() {
        let config = |mailto: &str| ClientConfig {
            mailto: Some(mailto.to_owned()),
            ..ClientConfig::default()
        };

        assert_eq!(OpenAlexClient::from_config(config("   ")).mailto, None);
        assert_eq!(OpenAlexClient::from_config(config("")).mailto, None);
        assert_eq!(
            OpenAlexClient::from_config(config("me@example.org")).mailto.as_deref(),
            Some("me@example.org")
        );
    }

    #[test]
    fn institutions_read_group_by_payload() {
        let client = recording(
            r#"{"group_by": [{"key": "I1", "key_display_name": "Uni", "count": 3}]}"#,
        );
        let groups = client.fetch_institutions("1702", "T1").expect("fetch succeeds");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 3);
        let calls = client.transport().calls.borrow();
        assert!(calls[0].1.contains(&(
            "group_by".to_owned(),
            "authorships.institutions.lineage".to_owned()
        )));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let client = recording("not json");
        let error = client.fetch_authors("T1").expect_err("decode must fail");
        assert!(matches!(error, FetchError::Decode { .. }));
    }

    #[test]
    fn topics_are_sorted_by_works_count() {
        let client = recording(
            r#"{"results": [
                {"id": "https://openalex.org/T1", "display_name": "Small", "works_count": 5},
                {"id": "https://openalex.org/T2", "display_name": "Large", "works_count": 500}
            ]}"#,
        );
        let topics = client.fetch_topics("1702").expect("fetch succeeds");

        assert_eq!(topics[0].label, "Large");
        assert_eq!(topics[0].id, "T2");
        assert_eq!(topics[1].label, "Small");
    }
}
