use serde::Serialize;

/// Parsed structure of a generative explanation string: an ordered
/// list of headed sections, each holding subheadings, paragraphs, and
/// numbered items with optional sub-bullets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExplanationDocument {
    pub sections: Vec<Section>,
}

impl ExplanationDocument {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Subheading { text: String },
    Paragraph { text: String },
    Numbered { text: String, subitems: Vec<String> },
}

/// One line of input, tagged by the markup it carries.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Heading(&'a str),
    Subheading(&'a str),
    Numbered(&'a str),
    SubBullet(&'a str),
    Paragraph(&'a str),
}

/// Sub-bullets are recognized on the raw line, before trimming, since
/// their marker is the leading indentation itself.
fn classify(raw_line: &str) -> LineKind<'_> {
    if raw_line.starts_with("\t*") || raw_line.starts_with("  *") {
        let text = raw_line
            .trim_start()
            .trim_start_matches('*')
            .trim();
        return LineKind::SubBullet(text);
    }

    let line = raw_line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some(inner) = line
        .strip_prefix("**")
        .and_then(|rest| rest.strip_suffix("**"))
    {
        return LineKind::Heading(inner.trim());
    }

    if let Some(inner) = line
        .strip_prefix('*')
        .and_then(|rest| rest.strip_suffix('*'))
    {
        return LineKind::Subheading(inner.trim());
    }

    if let Some(text) = strip_list_marker(line) {
        return LineKind::Numbered(text);
    }

    LineKind::Paragraph(line)
}

/// Strip a leading `<digits>.` marker, returning the remaining text.
fn strip_list_marker(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim)
}

/// Convert a loosely formatted explanation into a document. The parser
/// is total: malformed or empty input yields an empty document, never
/// an error, because the text comes from a generative source and must
/// not crash rendering. Lines outside any section are dropped, and a
/// sub-bullet with no numbered item to attach to is dropped as well.
pub fn parse_explanation(text: &str) -> ExplanationDocument {
    let mut document = ExplanationDocument::default();
    let mut current: Option<Section> = None;

    for raw_line in text.lines() {
        match classify(raw_line) {
            LineKind::Blank => {}
            LineKind::Heading(heading) => {
                if let Some(section) = current.take() {
                    document.sections.push(section);
                }
                current = Some(Section {
                    heading: heading.to_string(),
                    items: Vec::new(),
                });
            }
            LineKind::Subheading(text) => {
                if let Some(section) = current.as_mut() {
                    section.items.push(Item::Subheading {
                        text: text.to_string(),
                    });
                }
            }
            LineKind::Numbered(text) => {
                if let Some(section) = current.as_mut() {
                    section.items.push(Item::Numbered {
                        text: text.to_string(),
                        subitems: Vec::new(),
                    });
                }
            }
            LineKind::SubBullet(text) => {
                if let Some(section) = current.as_mut() {
                    if let Some(Item::Numbered { subitems, .. }) = section.items.last_mut() {
                        subitems.push(text.to_string());
                    }
                }
            }
            LineKind::Paragraph(text) => {
                if let Some(section) = current.as_mut() {
                    section.items.push(Item::Paragraph {
                        text: text.to_string(),
                    });
                }
            }
        }
    }

    if let Some(section) = current.take() {
        document.sections.push(section);
    }

    document
}
