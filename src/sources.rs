use std::collections::HashMap;

use crate::types::Marketplace;

/// Static marketplace → Provider source id mapping, keyed by lowercase marketplace name.
#[derive(Debug, Clone, Default)]
pub struct SourceMapping {
    sources: HashMap<String, String>,
}

impl SourceMapping {
    pub fn new(sources: HashMap<String, String>) -> Self {
        let sources = sources
            .into_iter()
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v))
            .collect();
        Self { sources }
    }

    pub fn resolve(&self, marketplace: Marketplace) -> Option<u64> {
        self.sources
            .get(&marketplace.key())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|id| *id > 0)
    }

    pub fn is_configured(&self, marketplace: Marketplace) -> bool {
        self.resolve(marketplace).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> SourceMapping {
        SourceMapping::new(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn resolves_mapped_marketplace() {
        let m = mapping(&[("allegro", "1234"), ("amazon", " 55 ")]);
        assert_eq!(m.resolve(Marketplace::Allegro), Some(1234));
        assert_eq!(m.resolve(Marketplace::Amazon), Some(55));
        assert!(m.is_configured(Marketplace::Allegro));
    }

    #[test]
    fn unmapped_non_numeric_and_zero_are_absent() {
        let m = mapping(&[("amazon", "abc"), ("personal", "0")]);
        assert_eq!(m.resolve(Marketplace::Allegro), None);
        assert_eq!(m.resolve(Marketplace::Amazon), None);
        assert_eq!(m.resolve(Marketplace::Personal), None);
        assert!(!m.is_configured(Marketplace::Personal));
    }

    #[test]
    fn keys_are_matched_lowercase() {
        let m = mapping(&[("ALLEGRO", "9")]);
        assert_eq!(m.resolve(Marketplace::Allegro), Some(9));
    }
}
