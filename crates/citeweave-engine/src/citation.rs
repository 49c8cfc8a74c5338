use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// In-line citation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
    Chicago,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown citation style: {0} (expected apa, mla or chicago)")]
pub struct ParseStyleError(String);

impl FromStr for CitationStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apa" => Ok(Self::Apa),
            "mla" => Ok(Self::Mla),
            "chicago" => Ok(Self::Chicago),
            other => Err(ParseStyleError(other.to_string())),
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apa => write!(f, "APA"),
            Self::Mla => write!(f, "MLA"),
            Self::Chicago => write!(f, "Chicago"),
        }
    }
}

/// A scholarly source as returned by the search collaborator. Read-only here;
/// never mutated by the editing core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDoc {
    pub title: String,
    pub author: Option<String>,
    /// ISO-8601 publication date, when the provider knows it.
    pub published_date: Option<String>,
    pub url: String,
    /// One relevant sentence from the source, when available.
    pub highlight: Option<String>,
}

/// Render an in-line citation for `doc` in the given style.
///
/// Total: malformed metadata degrades to a generic ` (Source)[url]` citation
/// rather than surfacing an error. The leading space is part of the template
/// since citations are appended in-line after prose.
pub fn format_citation(doc: &SourceDoc, style: CitationStyle) -> String {
    match try_format(doc, style) {
        Some(citation) => citation,
        None => format!(" (Source)[{}]", doc.url),
    }
}

fn try_format(doc: &SourceDoc, style: CitationStyle) -> Option<String> {
    let author = doc
        .author
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Unknown");
    let surname = surname_of(author)?;
    let year = doc
        .published_date
        .as_deref()
        .and_then(year_of)
        .unwrap_or_else(|| "n.d.".to_string());
    let url = &doc.url;

    Some(match style {
        CitationStyle::Apa => format!(" ({surname}, {year})[{url}]"),
        CitationStyle::Mla => format!(" ({surname})[{url}]"),
        CitationStyle::Chicago => format!(" ({surname} {year})[{url}]"),
    })
}

/// Surname extraction: the part before the first comma when one is present
/// (search providers often return "Surname First, Affiliation"), then the last
/// whitespace-delimited token of that part.
fn surname_of(author: &str) -> Option<String> {
    author
        .split(',')
        .next()?
        .trim()
        .split_whitespace()
        .next_back()
        .map(str::to_string)
}

/// Leading year of an ISO-8601 date string.
fn year_of(date: &str) -> Option<String> {
    let year: String = date.chars().take_while(char::is_ascii_digit).collect();
    if year.len() == 4 { Some(year) } else { None }
}
