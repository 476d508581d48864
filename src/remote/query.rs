//! Dataset identifiers and request options

use serde::{Deserialize, Serialize};

/// Identifies a single metric dataset in the dashboard API
///
/// The API is a tree:
/// theme → sub_theme → topic → geography_type → geography → metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricQuery {
    pub theme: String,
    pub sub_theme: String,
    pub topic: String,
    pub geography_type: String,
    pub geography: String,
    pub metric: String,
}

impl MetricQuery {
    /// Resource URL for this metric under `base_url` and `api_version`
    pub fn url(&self, base_url: &str, api_version: &str) -> String {
        format!(
            "{}/{}/themes/{}/sub_themes/{}/topics/{}/geography_types/{}/geographies/{}/metrics/{}",
            base_url.trim_end_matches('/'),
            api_version,
            self.theme,
            self.sub_theme,
            self.topic,
            self.geography_type,
            self.geography,
            self.metric,
        )
    }
}

/// Optional request parameters, sent with the first page request only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Server-side filters such as `year=2022`
    pub filters: Vec<(String, String)>,
    /// Requested rows per page; the server may cap it
    pub page_size: Option<u32>,
}

impl FetchOptions {
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        if let Some(size) = self.page_size {
            params.push(("page_size".to_string(), size.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covid_cases() -> MetricQuery {
        MetricQuery {
            theme: "infectious_disease".into(),
            sub_theme: "respiratory".into(),
            topic: "COVID-19".into(),
            geography_type: "Nation".into(),
            geography: "England".into(),
            metric: "COVID-19_cases_casesByDay".into(),
        }
    }

    #[test]
    fn test_url_follows_hierarchy() {
        let url = covid_cases().url("https://api.example.org/", "v2");
        assert_eq!(
            url,
            "https://api.example.org/v2/themes/infectious_disease/sub_themes/respiratory\
             /topics/COVID-19/geography_types/Nation/geographies/England\
             /metrics/COVID-19_cases_casesByDay"
        );
    }

    #[test]
    fn test_query_params_include_page_size_last() {
        let options = FetchOptions::default()
            .with_filter("year", "2022")
            .with_page_size(1000);
        assert_eq!(
            options.query_params(),
            vec![
                ("year".to_string(), "2022".to_string()),
                ("page_size".to_string(), "1000".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_options_send_nothing() {
        assert!(FetchOptions::default().query_params().is_empty());
    }
}
