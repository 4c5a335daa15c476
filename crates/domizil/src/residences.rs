//! The fixed catalogue of residences offered on the site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slug identifying a residence, e.g. `waldhaus-tannenhof`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidenceId(pub String);

impl ResidenceId {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residence {
    pub id: ResidenceId,
    pub name: &'static str,
}

const CATALOGUE: [(&str, &str); 4] = [
    ("waldhaus-tannenhof", "Waldhaus Tannenhof"),
    ("forsthaus-hirschgrund", "Forsthaus Hirschgrund"),
    ("domizil-fichtenberg", "Domizil Fichtenberg"),
    ("domizil-schwarzwaldblick", "Domizil Schwarzwaldblick"),
];

/// Residences in the order they are presented.
pub fn catalogue() -> Vec<Residence> {
    CATALOGUE
        .iter()
        .map(|(slug, name)| Residence {
            id: ResidenceId::new(*slug),
            name,
        })
        .collect()
}

pub fn find(id: &ResidenceId) -> Option<Residence> {
    catalogue().into_iter().find(|residence| &residence.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_lists_four_residences_in_order() {
        let ids: Vec<_> = catalogue().into_iter().map(|r| r.id.0).collect();
        assert_eq!(
            ids,
            vec![
                "waldhaus-tannenhof",
                "forsthaus-hirschgrund",
                "domizil-fichtenberg",
                "domizil-schwarzwaldblick",
            ]
        );
    }

    #[test]
    fn find_resolves_display_name() {
        let residence = find(&ResidenceId::new("forsthaus-hirschgrund")).expect("known slug");
        assert_eq!(residence.name, "Forsthaus Hirschgrund");
        assert!(find(&ResidenceId::new("schloss")).is_none());
    }
}
