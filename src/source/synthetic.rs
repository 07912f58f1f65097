//! Template-driven message generation.

use super::{MessageSource, SourceError};
use crate::template::TemplateSet;
use chrono::Local;

/// Generates messages from a template snapshot, stamping the header with
/// the current time on every call.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    templates: TemplateSet,
}

impl SyntheticSource {
    /// Create a source over an immutable template snapshot.
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }
}

impl MessageSource for SyntheticSource {
    fn next(&mut self) -> Result<String, SourceError> {
        Ok(self.templates.compose(Local::now().naive_local()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_renders_header_timestamp() {
        let mut source = SyntheticSource::new(TemplateSet::new(
            "MSH|{TIMESTAMP}",
            "PID|a",
            "PV1|b",
        ));
        let message = source.next().unwrap();
        let lines: Vec<_> = message.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("MSH|"));
        let stamp = &lines[0][4..];
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(lines[1], "PID|a");
        assert_eq!(lines[2], "PV1|b");
    }

    #[test]
    fn test_next_never_fails() {
        let mut source = SyntheticSource::new(TemplateSet::default());
        for _ in 0..50 {
            assert!(source.next().is_ok());
        }
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut source = SyntheticSource::new(TemplateSet::new("{TIMESTAMP}", "PID|", "PV1|"));
        let mut previous = String::new();
        for _ in 0..10 {
            let stamp = source.next().unwrap().lines().next().unwrap().to_string();
            assert!(stamp >= previous);
            previous = stamp;
        }
    }
}
