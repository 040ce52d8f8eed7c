//! Search requests and responses for the `xml.search` service
//!
//! A [`SearchRequest`] is an ordered list of field filters rendered as a
//! `<request>` document; the empty request matches every metadata record.
//! A [`SearchResponse`] is parsed from the `<response>` document GeoNetwork
//! returns and exposes the hit count plus the `id`/`uuid` of each record.

use super::error::{GnError, GnResult};
use roxmltree::{Document, Node};

/// Namespace of the `geonet:info` block attached to each search hit
pub const NS_GEONET: &str = "http://www.fao.org/geonetwork";

/// Filterable search fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Full text
    Any,
    Title,
    Abstract,
    ThemeKey,
    Uuid,
    Category,
    SiteId,
    /// Catalog schema, e.g. `iso19139`
    Schema,
}

impl SearchField {
    /// Element name used in the request document
    pub fn element_name(&self) -> &'static str {
        match self {
            SearchField::Any => "any",
            SearchField::Title => "title",
            SearchField::Abstract => "abstract",
            SearchField::ThemeKey => "themekey",
            SearchField::Uuid => "uuid",
            SearchField::Category => "category",
            SearchField::SiteId => "siteId",
            SearchField::Schema => "_schema",
        }
    }
}

/// Structured search request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    params: Vec<(SearchField, String)>,
}

impl SearchRequest {
    /// Empty request; matches all metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter. Filters are rendered in insertion order.
    pub fn with_param(mut self, field: SearchField, value: impl Into<String>) -> Self {
        self.params.push((field, value.into()));
        self
    }

    pub fn add_param(&mut self, field: SearchField, value: impl Into<String>) {
        self.params.push((field, value.into()));
    }

    pub fn params(&self) -> &[(SearchField, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render the request document
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<request>");
        for (field, value) in &self.params {
            let name = field.element_name();
            xml.push_str(&format!("<{}>{}</{}>", name, escape_xml(value), name));
        }
        xml.push_str("</request>");
        xml
    }
}

/// Escape text content for inclusion in an XML element
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One metadata record in a search response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub id: i64,
    pub uuid: String,
    pub schema: Option<String>,
}

impl SearchEntry {
    pub fn new(id: i64, uuid: impl Into<String>) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            schema: None,
        }
    }
}

/// Parsed search response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    count: usize,
    entries: Vec<SearchEntry>,
}

impl SearchResponse {
    pub fn new(count: usize, entries: Vec<SearchEntry>) -> Self {
        Self { count, entries }
    }

    /// Response whose count is the number of entries
    pub fn from_entries(entries: Vec<SearchEntry>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }

    /// Total number of hits reported by the catalog
    pub fn count(&self) -> usize {
        self.count
    }

    /// Hits contained in this page of results, in catalog order
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchEntry> {
        self.entries.iter()
    }

    /// Parse an `xml.search` response document
    pub fn parse(xml: &str) -> GnResult<Self> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        if root.tag_name().name() != "response" {
            return Err(GnError::parse(format!(
                "expected <response> root, found <{}>",
                root.tag_name().name()
            )));
        }

        let entries = root
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "metadata")
            .map(parse_entry)
            .collect::<GnResult<Vec<_>>>()?;

        let summary_count = root
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "summary")
            .and_then(|n| n.attribute("count"));

        let count = match summary_count.or_else(|| root.attribute("selected")) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| GnError::parse(format!("bad result count '{}': {}", raw, e)))?,
            None => entries.len(),
        };

        Ok(Self { count, entries })
    }
}

impl<'a> IntoIterator for &'a SearchResponse {
    type Item = &'a SearchEntry;
    type IntoIter = std::slice::Iter<'a, SearchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn parse_entry(metadata: Node<'_, '_>) -> GnResult<SearchEntry> {
    let info = metadata
        .children()
        .find(|n| n.is_element() && n.has_tag_name((NS_GEONET, "info")))
        .ok_or_else(|| GnError::parse("search hit without geonet:info"))?;

    let id_text = child_text(info, "id").ok_or_else(|| GnError::parse("geonet:info without id"))?;
    let id = id_text
        .parse::<i64>()
        .map_err(|e| GnError::parse(format!("bad metadata id '{}': {}", id_text, e)))?;

    let uuid = child_text(info, "uuid").unwrap_or_default();
    let schema = child_text(info, "schema");

    Ok(SearchEntry { id, uuid, schema })
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
}
