use serde::Deserialize;

use crate::util::extract_id;

#[derive(Clone, Debug, Deserialize)]
pub struct ParentRef {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawDomain {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawField {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub domain: Option<ParentRef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawSubfield {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub field: Option<ParentRef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawTopic {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub works_count: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawWork {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub cited_by_count: u64,
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,
    #[serde(default)]
    pub referenced_works: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawAuthor {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub works_count: u64,
    #[serde(default)]
    pub cited_by_count: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GroupCount {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub key_display_name: String,
    #[serde(default)]
    pub count: u64,
}

/// Either a `results` page or a `group_by` aggregation, depending on the query.
#[derive(Clone, Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default = "Vec::new")]
    pub group_by: Vec<GroupCount>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub label: String,
    pub works_count: u64,
}

impl From<RawTopic> for Topic {
    fn from(raw: RawTopic) -> Self {
        Self {
            id: extract_id(&raw.id).to_owned(),
            label: raw.display_name,
            works_count: raw.works_count,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    filters: Vec<(String, String)>,
    sort: Option<String>,
    group_by: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.filters.is_empty() {
            let filter = self
                .filters
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("filter".to_owned(), filter));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort".to_owned(), sort.clone()));
        }
        if let Some(group_by) = &self.group_by {
            params.push(("group_by".to_owned(), group_by.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_owned(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_owned(), per_page.to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_renders_filters_in_openalex_syntax() {
        let params = ListQuery::new()
            .filter("primary_topic.subfield.id", "1702")
            .filter("primary_topic.id", "T10017")
            .sort("cited_by_count:desc")
            .per_page(200)
            .to_params();

        assert_eq!(
            params,
            vec![
                (
                    "filter".to_owned(),
                    "primary_topic.subfield.id:1702,primary_topic.id:T10017".to_owned()
                ),
                ("sort".to_owned(), "cited_by_count:desc".to_owned()),
                ("per_page".to_owned(), "200".to_owned()),
            ]
        );
    }

    #[test]
    fn list_response_accepts_group_by_payloads() {
        let raw = r#"{
            "meta": {"count": 2},
            "group_by": [
                {"key": "https://openalex.org/I1", "key_display_name": "MIT", "count": 12},
                {"key": "https://openalex.org/I2", "key_display_name": "ETH", "count": 7}
            ]
        }"#;
        let response: ListResponse<RawWork> = serde_json::from_str(raw).expect("valid json");

        assert!(response.results.is_empty());
        assert_eq!(response.group_by.len(), 2);
        assert_eq!(response.group_by[0].key_display_name, "MIT");
    }

    #[test]
    fn work_tolerates_missing_optional_fields() {
        let raw = r#"{"id": "https://openalex.org/W1", "title": null, "type": "article"}"#;
        let work: RawWork = serde_json::from_str(raw).expect("valid json");

        assert_eq!(work.title, None);
        assert_eq!(work.work_type.as_deref(), Some("article"));
        assert!(work.referenced_works.is_empty());
        assert_eq!(work.cited_by_count, 0);
    }

    #[test]
    fn topic_ids_are_shortened() {
        let topic = Topic::from(RawTopic {
            id: "https://openalex.org/T10017".to_owned(),
            display_name: "Geological Modeling".to_owned(),
            works_count: 42,
        });
        assert_eq!(topic.id, "T10017");
    }
}
