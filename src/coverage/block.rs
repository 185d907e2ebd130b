//! Coverage edges: which lines of a testable one test case exercises

use super::test_case::TestCaseVertex;
use super::testable::TestableVertex;
use crate::bean::{Bean, BeanEdge, BeanError, BeanResult, Element};
use crate::graph::PropertyValue;
use std::collections::BTreeSet;

/// Edge view over a covers edge (test case → testable)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoverageBlock {
    base: BeanEdge,
}

impl Bean for CoverageBlock {
    type Base = BeanEdge;

    fn from_base(base: BeanEdge) -> Self {
        CoverageBlock { base }
    }

    fn base(&self) -> &BeanEdge {
        &self.base
    }
}

impl CoverageBlock {
    pub fn test_case(&self) -> BeanResult<TestCaseVertex> {
        self.base.source()
    }

    pub fn testable(&self) -> BeanResult<TestableVertex> {
        self.base.target()
    }

    pub fn lines(&self) -> BeanResult<BTreeSet<u32>> {
        let key = &self.bean_graph().schema().lines_key;
        parse_lines(self.element(), key, self.base.property(key)?.as_ref())
    }

    pub fn covers_line(&self, line: u32) -> BeanResult<bool> {
        Ok(self.lines()?.contains(&line))
    }
}

/// Decode the covered-lines property. Absent or null means no lines.
pub(crate) fn parse_lines(
    element: Element,
    key: &str,
    value: Option<&PropertyValue>,
) -> BeanResult<BTreeSet<u32>> {
    let value = match value {
        Some(value) if !value.is_null() => value,
        _ => return Ok(BTreeSet::new()),
    };
    let items = value.as_array().ok_or_else(|| {
        BeanError::malformed(element, key, format!("expected Array, found {}", value.type_name()))
    })?;

    items
        .iter()
        .map(|item| {
            item.as_integer()
                .and_then(|line| u32::try_from(line).ok())
                .ok_or_else(|| BeanError::malformed(element, key, format!("invalid line number {}", item)))
        })
        .collect()
}

pub(crate) fn lines_value(lines: &BTreeSet<u32>) -> PropertyValue {
    PropertyValue::Array(lines.iter().map(|&line| PropertyValue::from(line)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeId;

    fn edge() -> Element {
        Element::Edge(EdgeId::new(1))
    }

    #[test]
    fn test_parse_lines_sorts_and_deduplicates() {
        let value = PropertyValue::Array(vec![5i64.into(), 1i64.into(), 3i64.into(), 1i64.into()]);
        let lines = parse_lines(edge(), "lines", Some(&value)).unwrap();
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_parse_lines_absent_is_empty() {
        assert!(parse_lines(edge(), "lines", None).unwrap().is_empty());
        assert!(parse_lines(edge(), "lines", Some(&PropertyValue::Null)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_lines_rejects_garbage() {
        let negative = PropertyValue::Array(vec![(-1i64).into()]);
        let err = parse_lines(edge(), "lines", Some(&negative)).unwrap_err();
        assert!(err.is_integrity());

        let text = PropertyValue::Array(vec!["12".into()]);
        assert!(parse_lines(edge(), "lines", Some(&text)).is_err());

        let scalar = PropertyValue::Integer(12);
        assert!(parse_lines(edge(), "lines", Some(&scalar)).is_err());

        let too_large = PropertyValue::Array(vec![(u32::MAX as i64 + 1).into()]);
        let err = parse_lines(edge(), "lines", Some(&too_large)).unwrap_err();
        assert!(err.is_integrity());

        let largest = PropertyValue::Array(vec![(u32::MAX as i64).into()]);
        assert!(parse_lines(edge(), "lines", Some(&largest)).unwrap().contains(&u32::MAX));
    }

    #[test]
    fn test_lines_value_encodes_integers() {
        let lines: BTreeSet<u32> = [2, 7].into_iter().collect();
        assert_eq!(
            lines_value(&lines),
            PropertyValue::Array(vec![PropertyValue::Integer(2), PropertyValue::Integer(7)])
        );
    }
}
