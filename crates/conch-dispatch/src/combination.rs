//! Report/format/display combination rules.

use conch_core::types::{Display, Format, ReportKind, ReportKinds};

const DISPLAY_NEEDS_XML: &str = "If a display is used, no other output format can be used";
const CONCH_TRACE_TEXT: &str =
    "Combination of MediaConch and MediaTrace is currently not possible with Text output";

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationResult {
    /// Format after forcing and escalation. On rejection, the format at the
    /// point the rule fired.
    pub format: Format,
    pub valid: bool,
    /// Human-readable reason, set only when `valid` is false.
    pub reason: Option<String>,
}

impl CombinationResult {
    fn valid(format: Format) -> Self {
        Self {
            format,
            valid: true,
            reason: None,
        }
    }

    fn invalid(format: Format, reason: &str) -> Self {
        Self {
            format,
            valid: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Resolve the output format of a report request.
///
/// Rules apply in order; later rules see the format earlier ones produced:
/// 1. Text with a display is forced to Xml.
/// 2. Any other non-Xml format with a display is rejected.
/// 3. Xml over several files becomes MaXml.
/// 4. Xml with several report kinds becomes MaXml.
/// 5. MediaConch together with MediaTrace cannot be rendered as Text.
pub fn resolve(
    kinds: ReportKinds,
    format: Format,
    file_count: usize,
    display: &Display,
) -> CombinationResult {
    let has_display = !display.is_empty();
    let mut format = format;

    if format == Format::Text && has_display {
        format = Format::Xml;
    }

    if format != Format::Xml && has_display {
        return CombinationResult::invalid(format, DISPLAY_NEEDS_XML);
    }

    if file_count > 1 && format == Format::Xml {
        format = Format::MaXml;
    }

    if kinds.count() > 1 && format == Format::Xml {
        format = Format::MaXml;
    }

    if kinds.contains(ReportKind::MediaConch)
        && kinds.contains(ReportKind::MediaTrace)
        && format == Format::Text
    {
        return CombinationResult::invalid(format, CONCH_TRACE_TEXT);
    }

    CombinationResult::valid(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conch() -> ReportKinds {
        ReportKinds::single(ReportKind::MediaConch)
    }

    fn conch_and_trace() -> ReportKinds {
        [ReportKind::MediaConch, ReportKind::MediaTrace].into_iter().collect()
    }

    #[test]
    fn several_files_escalate_xml() {
        let r = resolve(conch(), Format::Xml, 2, &Display::default());
        assert_eq!(r, CombinationResult::valid(Format::MaXml));
    }

    #[test]
    fn display_forces_text_to_xml() {
        let r = resolve(conch(), Format::Text, 1, &Display::named("JSTREE"));
        assert_eq!(r.format, Format::Xml);
        assert!(r.valid);
    }

    #[test]
    fn display_with_html_is_rejected() {
        let r = resolve(conch(), Format::Html, 1, &Display::named("JSTREE"));
        assert_eq!(r.format, Format::Html);
        assert!(!r.valid);
        assert!(r.reason.unwrap().contains("display"));
    }

    #[test]
    fn conch_with_trace_as_text_is_rejected() {
        let r = resolve(conch_and_trace(), Format::Text, 1, &Display::default());
        assert_eq!(r.format, Format::Text);
        assert!(!r.valid);
        assert!(r.reason.unwrap().contains("Text output"));
    }

    #[test]
    fn several_kinds_escalate_xml() {
        let r = resolve(conch_and_trace(), Format::Xml, 1, &Display::default());
        assert_eq!(r, CombinationResult::valid(Format::MaXml));
    }

    #[test]
    fn forced_xml_still_escalates() {
        // Text -> Xml (display) -> MaXml (two files); the Text rule no longer applies.
        let r = resolve(conch_and_trace(), Format::Text, 2, &Display::inline("<xsl/>"));
        assert_eq!(r, CombinationResult::valid(Format::MaXml));
    }

    #[test]
    fn other_formats_pass_through() {
        for format in [Format::Html, Format::JsTree, Format::MultiXml, Format::MaXml] {
            let r = resolve(conch_and_trace(), format, 3, &Display::default());
            assert_eq!(r, CombinationResult::valid(format));
        }
    }
}
