//! Fixed-path navigation of namespaced metadata documents
//!
//! This is not a query language: callers give the exact chain of
//! `(local name, namespace)` steps from a root element down to a field, and
//! get either the node or a `MissingField` error naming the first step that
//! was not there.

use super::error::{GnError, GnResult};
use roxmltree::Node;

/// ISO 19139 metadata namespace
pub const NS_GMD: &str = "http://www.isotc211.org/2005/gmd";
/// ISO 19139 common types namespace
pub const NS_GCO: &str = "http://www.isotc211.org/2005/gco";

/// Path from an `gmd:MD_Metadata` root to the citation title string
pub const TITLE_PATH: [(&str, &str); 6] = [
    ("identificationInfo", NS_GMD),
    ("MD_DataIdentification", NS_GMD),
    ("citation", NS_GMD),
    ("CI_Citation", NS_GMD),
    ("title", NS_GMD),
    ("CharacterString", NS_GCO),
];

/// First child element with the given local name and namespace
pub fn find_child<'a, 'input>(
    parent: Node<'a, 'input>,
    local_name: &str,
    namespace: &str,
) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.has_tag_name((namespace, local_name)))
}

/// Walk `steps` child by child starting at `root`
pub fn locate<'a, 'input>(
    root: Node<'a, 'input>,
    steps: &[(&str, &str)],
) -> GnResult<Node<'a, 'input>> {
    steps.iter().try_fold(root, |node, (local_name, namespace)| {
        find_child(node, local_name, namespace).ok_or_else(|| GnError::MissingField {
            step: (*local_name).to_string(),
            namespace: (*namespace).to_string(),
        })
    })
}

/// The `gco:CharacterString` holding the citation title of an ISO 19139 record
pub fn title_element<'a, 'input>(metadata: Node<'a, 'input>) -> GnResult<Node<'a, 'input>> {
    locate(metadata, &TITLE_PATH)
}

/// Citation title text, trimmed; empty if the element has no text
pub fn title_text(metadata: Node<'_, '_>) -> GnResult<String> {
    let title = title_element(metadata)?;
    Ok(title.text().map(|t| t.trim().to_string()).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const RECORD: &str = r#"<gmd:MD_Metadata xmlns:gmd="http://www.isotc211.org/2005/gmd"
        xmlns:gco="http://www.isotc211.org/2005/gco">
  <gmd:fileIdentifier><gco:CharacterString>abc</gco:CharacterString></gmd:fileIdentifier>
  <gmd:identificationInfo>
    <gmd:MD_DataIdentification>
      <gmd:citation>
        <gmd:CI_Citation>
          <gmd:title>
            <gco:CharacterString>TEST GeoBatch Action: GeoNetwork</gco:CharacterString>
          </gmd:title>
        </gmd:CI_Citation>
      </gmd:citation>
    </gmd:MD_DataIdentification>
  </gmd:identificationInfo>
</gmd:MD_Metadata>"#;

    #[test]
    fn test_title_text() {
        let doc = Document::parse(RECORD).unwrap();
        assert_eq!(
            title_text(doc.root_element()).unwrap(),
            "TEST GeoBatch Action: GeoNetwork"
        );
    }

    #[test]
    fn test_namespace_must_match() {
        let doc = Document::parse(RECORD).unwrap();
        let root = doc.root_element();
        assert!(find_child(root, "identificationInfo", NS_GMD).is_some());
        assert!(find_child(root, "identificationInfo", NS_GCO).is_none());
    }

    #[test]
    fn test_missing_step_is_reported() {
        let xml = r#"<gmd:MD_Metadata xmlns:gmd="http://www.isotc211.org/2005/gmd">
            <gmd:identificationInfo><gmd:MD_DataIdentification/></gmd:identificationInfo>
        </gmd:MD_Metadata>"#;
        let doc = Document::parse(xml).unwrap();
        match title_element(doc.root_element()) {
            Err(GnError::MissingField { step, namespace }) => {
                assert_eq!(step, "citation");
                assert_eq!(namespace, NS_GMD);
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_path_returns_root() {
        let doc = Document::parse(RECORD).unwrap();
        let root = doc.root_element();
        assert_eq!(locate(root, &[]).unwrap(), root);
    }
}
