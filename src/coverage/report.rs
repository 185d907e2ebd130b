//! Serializable coverage snapshot for reporting

use super::component::Component;
use super::test_case::{TestCase, TestStatus};
use super::testable::{Testable, TestableVertex};
use crate::bean::BeanResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseSummary {
    pub name: String,
    pub status: Option<TestStatus>,
    pub duration_ms: Option<u64>,
    pub covered_lines: Vec<u32>,
}

/// Coverage of one testable, detached from the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub component_key: String,
    pub covered_lines: Vec<u32>,
    /// line → number of test cases covering it
    pub hits_by_line: BTreeMap<u32, usize>,
    pub test_cases: Vec<TestCaseSummary>,
}

impl CoverageReport {
    pub fn build(testable: &TestableVertex) -> BeanResult<Self> {
        let component_key = testable.component()?.key()?;

        let mut test_cases = Vec::new();
        for test_case in testable.covering_test_cases()? {
            test_cases.push(TestCaseSummary {
                name: test_case.name()?,
                status: test_case.status()?,
                duration_ms: test_case.duration_ms()?,
                covered_lines: test_case.covered_lines_of(testable)?.into_iter().collect(),
            });
        }
        test_cases.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(CoverageReport {
            component_key,
            covered_lines: testable.covered_lines()?.into_iter().collect(),
            hits_by_line: testable.test_cases_by_lines()?,
            test_cases,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
