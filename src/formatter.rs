//! Header rendering and block joining.
//!
//! Header templates use a closed vocabulary:
//!
//! | placeholder   | value                                         |
//! |---------------|-----------------------------------------------|
//! | `${index}`    | 1-based position among included files         |
//! | `${relpath}`  | display path, `/`-separated                   |
//! | `${basename}` | final path component                          |
//!
//! Anything else, including unknown `${...}` placeholders, is copied verbatim.

use crate::file::ResolvedFile;

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedBlock {
    /// 1-based index among included files
    pub index: usize,

    /// Rendered header
    pub header_text: String,

    /// File content with trailing whitespace removed
    pub body_text: String,
}

impl CombinedBlock {
    fn write_to(&self, out: &mut String) {
        out.push_str(&self.header_text);
        out.push('\n');
        out.push_str(&self.body_text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Index,
    RelPath,
    BaseName,
}

/// A header template tokenized into literal and placeholder segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    segments: Vec<Segment>,
}

impl HeaderTemplate {
    /// Tokenizes a template. Never fails: unknown placeholders stay literal.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            literal.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let placeholder = after.find('}').and_then(|end| {
                let segment = match &after[..end] {
                    "index" => Segment::Index,
                    "relpath" => Segment::RelPath,
                    "basename" => Segment::BaseName,
                    _ => return None,
                };
                Some((segment, end))
            });

            match placeholder {
                Some((segment, end)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &after[end + 1..];
                }
                None => {
                    literal.push_str("${");
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Renders the header for one file.
    #[must_use]
    pub fn render(&self, index: usize, file: &ResolvedFile) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Index => out.push_str(&index.to_string()),
                Segment::RelPath => out.push_str(&file.relative_path),
                Segment::BaseName => out.push_str(file.basename()),
            }
        }
        out
    }
}

/// Renders included files into blocks and joins them.
pub(crate) struct Formatter {
    template: HeaderTemplate,
    separator: String,
}

impl Formatter {
    /// Creates a formatter from an unescaped header template and separator.
    pub(crate) fn new(header_format: &str, separator: impl Into<String>) -> Self {
        Self {
            template: HeaderTemplate::parse(header_format),
            separator: separator.into(),
        }
    }

    /// Builds one block per included file, numbering them from 1.
    ///
    /// Skipped files consume no index.
    pub(crate) fn blocks(&self, files: &[ResolvedFile]) -> Vec<CombinedBlock> {
        files
            .iter()
            .filter_map(|f| f.content().map(|content| (f, content)))
            .enumerate()
            .map(|(i, (file, content))| CombinedBlock {
                index: i + 1,
                header_text: self.template.render(i + 1, file),
                body_text: content.trim_end().to_string(),
            })
            .collect()
    }

    /// Joins blocks with the separator and trims trailing whitespace.
    pub(crate) fn join(&self, blocks: &[CombinedBlock]) -> String {
        let mut out = String::new();
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator);
            }
            block.write_to(&mut out);
        }

        out.truncate(out.trim_end().len());
        out
    }

    /// Renders and joins in one step.
    pub(crate) fn format(&self, files: &[ResolvedFile]) -> String {
        self.join(&self.blocks(files))
    }
}
