//! XML import of policy definitions.
//!
//! Accepted roots are `<policy>` (one policy) and `<policies>` holding
//! `<policy>` children. Each policy element is captured verbatim, so export
//! writes back exactly what was imported.

use std::path::Path;

use conch_core::errors::PolicyError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::Policy;

const POLICY: &[u8] = b"policy";
const POLICIES: &[u8] = b"policies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Single,
    Many,
}

/// One `<policy>` element being copied out of the document.
struct Capture {
    depth: usize,
    title: Option<String>,
    writer: Writer<Vec<u8>>,
}

/// Parse every policy of a definition. `label` names the source in error
/// messages and provides the fallback title.
pub fn parse_policies(xml: &str, label: &str) -> Result<Vec<Policy>, PolicyError> {
    let mut reader = Reader::from_str(xml);
    let mut root: Option<Root> = None;
    let mut depth = 0usize;
    let mut capture: Option<Capture> = None;
    let mut found: Vec<(Option<String>, String)> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            import_error(
                label,
                format!("XML error at position {}: {e}", reader.error_position()),
            )
        })?;

        match &event {
            Event::Eof => break,
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    root = Some(root_of(e, root, label)?);
                }
                if capture.is_none() && opens_policy(root, depth, e) {
                    capture = Some(Capture::new(depth, title_of(e, label)?));
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    root = Some(root_of(e, root, label)?);
                }
                if capture.is_none() && opens_policy(root, depth + 1, e) {
                    let mut single = Capture::new(depth + 1, title_of(e, label)?);
                    single.write(event.clone(), label)?;
                    found.push(single.finish(label)?);
                    continue;
                }
            }
            Event::Text(t) if depth == 0 && capture.is_none() => {
                let text = String::from_utf8_lossy(t.as_ref());
                if !text.trim().is_empty() {
                    return Err(import_error(label, "text outside the root element"));
                }
            }
            _ => {}
        }

        if let Some(c) = capture.as_mut() {
            c.write(event.clone(), label)?;
        }

        if matches!(event, Event::End(_)) {
            if capture.as_ref().is_some_and(|c| c.depth == depth) {
                if let Some(done) = capture.take() {
                    found.push(done.finish(label)?);
                }
            }
            depth = depth.saturating_sub(1);
        }
    }

    if depth != 0 {
        return Err(import_error(label, "unexpected end of document"));
    }
    let Some(root) = root else {
        return Err(import_error(label, "no <policy> element found"));
    };
    if found.is_empty() {
        return Err(import_error(label, "<policies> holds no <policy> element"));
    }

    let stem = label_stem(label);
    let many = root == Root::Many && found.len() > 1;
    Ok(found
        .into_iter()
        .enumerate()
        .map(|(i, (title, schema))| {
            let title = title.unwrap_or_else(|| {
                if many {
                    format!("{stem} ({})", i + 1)
                } else {
                    stem.clone()
                }
            });
            Policy::new(title, schema)
        })
        .collect())
}

impl Capture {
    fn new(depth: usize, title: Option<String>) -> Self {
        Self {
            depth,
            title,
            writer: Writer::new(Vec::new()),
        }
    }

    fn write(&mut self, event: Event<'_>, label: &str) -> Result<(), PolicyError> {
        self.writer
            .write_event(event)
            .map_err(|e| import_error(label, e.to_string()))
    }

    fn finish(self, label: &str) -> Result<(Option<String>, String), PolicyError> {
        let schema = String::from_utf8(self.writer.into_inner())
            .map_err(|e| import_error(label, e.to_string()))?;
        Ok((self.title, schema))
    }
}

fn root_of(e: &BytesStart<'_>, current: Option<Root>, label: &str) -> Result<Root, PolicyError> {
    if current.is_some() {
        return Err(import_error(label, "more than one root element"));
    }
    match e.local_name().as_ref() {
        POLICY => Ok(Root::Single),
        POLICIES => Ok(Root::Many),
        other => Err(import_error(
            label,
            format!(
                "unexpected root element <{}>, expected <policy> or <policies>",
                String::from_utf8_lossy(other)
            ),
        )),
    }
}

fn opens_policy(root: Option<Root>, depth: usize, e: &BytesStart<'_>) -> bool {
    match root {
        Some(Root::Single) => depth == 1,
        Some(Root::Many) => depth == 2 && e.local_name().as_ref() == POLICY,
        None => false,
    }
}

fn title_of(e: &BytesStart<'_>, label: &str) -> Result<Option<String>, PolicyError> {
    let attr = e
        .try_get_attribute("name")
        .map_err(|err| import_error(label, err.to_string()))?;
    match attr {
        Some(a) => {
            let value = a
                .unescape_value()
                .map_err(|err| import_error(label, err.to_string()))?;
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        None => Ok(None),
    }
}

fn label_stem(label: &str) -> String {
    Path::new(label)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| label.to_string())
}

fn import_error(label: &str, message: impl std::fmt::Display) -> PolicyError {
    PolicyError::Import {
        message: format!("{label}: {message}"),
    }
}
