//! Post-processing of the final report before it is shown to the user.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| compile(r"^ {0,3}(#{1,6})[ \t]+(.+?)[ \t]*$"));
static REAL: Lazy<Regex> = Lazy::new(|| compile(r"\bR\$\s*(\d[\d.,]*\d|\d)"));
static US_DOLLAR: Lazy<Regex> = Lazy::new(|| compile(r"\bUS\$\s*(\d[\d.,]*\d|\d)"));
static BARE_DOLLAR: Lazy<Regex> = Lazy::new(|| compile(r"(^|[\s(\[])\$\s*(\d[\d.,]*\d|\d)"));
static SPACES: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]{2,}"));
static MISSING_SPACE: Lazy<Regex> = Lazy::new(|| compile(r"([a-z\d][.!?])(\p{Lu})"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex")
}

/// One block of the report under a markdown heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSection {
    /// Heading level (number of `#`); 0 for text before the first heading.
    pub level: usize,
    pub heading: Option<String>,
    pub paragraphs: Vec<String>,
}

impl ReportSection {
    fn is_empty(&self) -> bool {
        self.heading.is_none() && self.paragraphs.is_empty()
    }
}

/// Normalize currency amounts and spacing on prose lines.
///
/// Headings, fenced code and line breaks are left as they are.
pub fn format_currency_text(text: &str) -> String {
    let mut in_fence = false;
    text.split('\n')
        .map(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
                return line.to_string();
            }
            if in_fence || HEADING.is_match(line) {
                return line.to_string();
            }
            format_line(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(line: &str) -> String {
    let body = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - body.len()];

    let body = REAL.replace_all(body, "R$$ ${1}");
    let body = US_DOLLAR.replace_all(&body, "US$$ ${1}");
    let body = BARE_DOLLAR.replace_all(&body, "${1}US$$ ${2}");
    let body = SPACES.replace_all(&body, " ");
    let body = MISSING_SPACE.replace_all(&body, "${1} ${2}");

    format!("{indent}{}", body.trim_end_matches([' ', '\t']))
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Split a markdown report into sections on headings.
///
/// Paragraphs are separated by blank lines. Text before the first heading
/// lands in a section without a heading.
pub fn split_sections(text: &str) -> Vec<ReportSection> {
    let mut sections = Vec::new();
    let mut current = ReportSection::default();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
            paragraph.push(line.trim_end());
            continue;
        }
        if in_fence {
            paragraph.push(line);
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            flush(&mut paragraph, &mut current);
            let finished = std::mem::replace(
                &mut current,
                ReportSection {
                    level: caps[1].len(),
                    heading: Some(caps[2].to_string()),
                    paragraphs: Vec::new(),
                },
            );
            if !finished.is_empty() {
                sections.push(finished);
            }
        } else if line.trim().is_empty() {
            flush(&mut paragraph, &mut current);
        } else {
            paragraph.push(line.trim_end());
        }
    }

    flush(&mut paragraph, &mut current);
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

fn flush(paragraph: &mut Vec<&str>, section: &mut ReportSection) {
    if !paragraph.is_empty() {
        section.paragraphs.push(paragraph.join("\n"));
        paragraph.clear();
    }
}

/// Join sections back into markdown, one blank line between blocks.
pub fn render_sections(sections: &[ReportSection]) -> String {
    let mut blocks = Vec::new();
    for section in sections {
        if let Some(heading) = &section.heading {
            blocks.push(format!("{} {heading}", "#".repeat(section.level.max(1))));
        }
        blocks.extend(section.paragraphs.iter().cloned());
    }
    blocks.join("\n\n")
}
