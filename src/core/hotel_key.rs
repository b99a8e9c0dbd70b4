//! Hotel key resolution
//!
//! Templates are named `<HOTELKEY>_<anything>.xlsx`. The key is everything
//! before the first underscore.

use crate::error::{MapperError, MapperResult};
use crate::types::HotelKey;
use std::path::Path;

/// Extract the hotel key from a template file name (no directory part).
pub fn extract_hotel_key(file_name: &str) -> MapperResult<HotelKey> {
    match file_name.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => Ok(HotelKey::new(prefix)),
        _ => Err(MapperError::BadTemplateName {
            name: file_name.to_string(),
        }),
    }
}

/// File name component of a template path, as used for the download name.
pub fn template_file_name(path: &Path) -> MapperResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| MapperError::BadTemplateName {
            name: path.display().to_string(),
        })
}

/// How the hotel key of a run is chosen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HotelSelector {
    /// Prefix of the template file name
    #[default]
    TemplateName,
    /// Operator-supplied key; the template name is not inspected
    Explicit(String),
}

impl HotelSelector {
    pub fn from_override(hotel: Option<String>) -> Self {
        match hotel {
            Some(key) => HotelSelector::Explicit(key),
            None => HotelSelector::TemplateName,
        }
    }

    pub fn resolve(&self, template_name: &str) -> MapperResult<HotelKey> {
        match self {
            HotelSelector::TemplateName => extract_hotel_key(template_name),
            HotelSelector::Explicit(key) if key.is_empty() => Err(MapperError::BadTemplateName {
                name: template_name.to_string(),
            }),
            HotelSelector::Explicit(key) => Ok(HotelKey::new(key.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple() {
        assert_eq!(extract_hotel_key("ART_DAILY.xlsx").unwrap().as_str(), "ART");
    }

    #[test]
    fn test_extract_stops_at_first_underscore() {
        assert_eq!(
            extract_hotel_key("ART_1_MAJOR_DAILY.xlsx").unwrap().as_str(),
            "ART"
        );
    }

    #[test]
    fn test_extract_no_underscore_fails() {
        let err = extract_hotel_key("ARTDAILY.xlsx").unwrap_err();
        assert!(matches!(err, MapperError::BadTemplateName { .. }));
    }

    #[test]
    fn test_extract_empty_prefix_fails() {
        assert!(extract_hotel_key("_DAILY.xlsx").is_err());
        assert!(extract_hotel_key("").is_err());
    }

    #[test]
    fn test_extract_is_case_preserving() {
        assert_eq!(extract_hotel_key("art_daily.xlsx").unwrap().as_str(), "art");
    }

    #[test]
    fn test_template_file_name_strips_directories() {
        let name = template_file_name(Path::new("/tmp/uploads/ART_DAILY.xlsx")).unwrap();
        assert_eq!(name, "ART_DAILY.xlsx");
    }

    #[test]
    fn test_selector_explicit_ignores_name() {
        let selector = HotelSelector::from_override(Some("XYZ".into()));
        assert_eq!(selector.resolve("nounderscore.xlsx").unwrap().as_str(), "XYZ");
    }

    #[test]
    fn test_selector_default_uses_name() {
        let selector = HotelSelector::from_override(None);
        assert_eq!(selector.resolve("ART_DAILY.xlsx").unwrap().as_str(), "ART");
    }
}
