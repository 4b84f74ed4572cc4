use serde::{Deserialize, Serialize};

use crate::page::ElementSnapshot;
use crate::Result;

/// Findings for one `<img>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub has_alt: bool,
    pub width: Option<String>,
    pub height: Option<String>,
    pub loading: Option<String>,
    pub missing_dimensions: bool,
}

/// Turns the page's image elements into per-image findings.
pub trait ImageInspector: Send + Sync {
    fn inspect(&self, images: &[ElementSnapshot]) -> Result<Vec<ImageRecord>>;
}

/// Inspects images from their markup alone, without fetching them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeImageInspector;

impl ImageInspector for AttributeImageInspector {
    fn inspect(&self, images: &[ElementSnapshot]) -> Result<Vec<ImageRecord>> {
        Ok(images
            .iter()
            .map(|img| {
                let owned = |name: &str| img.attr(name).map(str::to_string);
                let width = owned("width");
                let height = owned("height");
                ImageRecord {
                    src: owned("src"),
                    alt: owned("alt"),
                    has_alt: img.attr("alt").is_some(),
                    missing_dimensions: width.is_none() || height.is_none(),
                    width,
                    height,
                    loading: owned("loading"),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn img(attrs: &[(&str, &str)]) -> ElementSnapshot {
        ElementSnapshot {
            tag: "img".into(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..ElementSnapshot::default()
        }
    }

    #[test]
    fn records_alt_and_dimensions() {
        let records = AttributeImageInspector
            .inspect(&[
                img(&[("src", "/a.png"), ("alt", "Logo"), ("width", "10"), ("height", "10")]),
                img(&[("src", "/b.png"), ("loading", "lazy")]),
            ])
            .expect("inspect");

        assert_eq!(records.len(), 2);
        assert!(records[0].has_alt);
        assert!(!records[0].missing_dimensions);
        assert_eq!(records[1].alt, None);
        assert!(!records[1].has_alt);
        assert!(records[1].missing_dimensions);
        assert_eq!(records[1].loading.as_deref(), Some("lazy"));
    }

    #[test]
    fn empty_alt_counts_as_present() {
        let records = AttributeImageInspector
            .inspect(&[img(&[("src", "/spacer.gif"), ("alt", "")])])
            .expect("inspect");
        assert!(records[0].has_alt);
        assert_eq!(records[0].alt.as_deref(), Some(""));
    }
}
