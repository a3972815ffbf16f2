use std::path::PathBuf;

use serde::Serialize;

use super::model::{ServiceStyle, TestMessage};
use super::registry::ServiceRegistry;

/// One test case of one method of one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseEntry {
    pub service: ServiceSummary,
    pub method: String,
    pub test_case: TestCaseSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub description: Option<String>,
    pub uri_template: String,
    pub url_pattern: String,
    pub style: ServiceStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseSummary {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub content_path: PathBuf,
    pub template: Option<String>,
    pub request: TestMessage,
    pub response: TestMessage,
}

impl ServiceRegistry {
    /// Every test case of every service, flattened in registry order.
    pub fn all_test_cases(&self) -> Vec<TestCaseEntry> {
        let mut entries = Vec::new();
        for service in self.services().values() {
            let summary = ServiceSummary {
                name: service.name.clone(),
                description: service.description.clone(),
                uri_template: service.uri_template.clone(),
                url_pattern: service.uri_template.clone(),
                style: service.style,
            };
            for (method, descriptor) in &service.methods {
                for test_case in &descriptor.test_cases {
                    entries.push(TestCaseEntry {
                        service: summary.clone(),
                        method: method.clone(),
                        test_case: TestCaseSummary {
                            name: test_case.name.clone(),
                            description: test_case.description.clone(),
                            url: test_case.url.clone(),
                            content_path: service.content_path.clone(),
                            template: test_case.template.clone(),
                            request: test_case.request.clone(),
                            response: test_case.response.clone(),
                        },
                    });
                }
            }
        }
        entries
    }
}
