//! Fixed set of category definitions that drive the filter controls.
//!
//! Declaration order is the display order; it is not alphabetical.

use crate::catalog::identity::{CategoryId, CategorySelector};
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One filterable category.
pub struct CategoryDefinition {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One entry in the filter control row: the "All" pseudo-category or a
/// registry definition.
pub struct FilterControl {
    pub selector: CategorySelector,
    pub label: String,
}

const SHIPPED: &[(&str, &str, &str)] = &[
    (
        "microorganisms",
        "Microorganisms",
        "Microscopic organisms including bacteria, archaea, fungi, algae, protozoa, and viruses",
    ),
    (
        "fungi",
        "Fungi",
        "Eukaryotic organisms that include microorganisms such as yeasts and molds, as well as macroscopic fungi",
    ),
    (
        "bacteria",
        "Bacteria",
        "Single-celled microorganisms that lack a nucleus and are found in nearly every habitat on Earth",
    ),
    (
        "protozoa",
        "Protozoa",
        "Single-celled eukaryotic microorganisms that can move on their own",
    ),
    (
        "algae",
        "Algae",
        "Simple aquatic organisms that can photosynthesize like plants",
    ),
];

const ALL_LABEL: &str = "All";

#[derive(Clone, Debug)]
/// Read-only, ordered category registry.
pub struct CategoryRegistry {
    definitions: Vec<CategoryDefinition>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::shipped()
    }
}

impl CategoryRegistry {
    /// The five categories the logbook ships with.
    pub fn shipped() -> Self {
        Self::new(
            SHIPPED
                .iter()
                .map(|(id, name, description)| CategoryDefinition {
                    id: CategoryId((*id).to_string()),
                    name: (*name).to_string(),
                    description: (*description).to_string(),
                })
                .collect(),
        )
    }

    pub fn new(definitions: Vec<CategoryDefinition>) -> Self {
        Self { definitions }
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &CategoryId) -> Option<&CategoryDefinition> {
        self.definitions.iter().find(|def| &def.id == id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.get(id).is_some()
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// True for the sentinel and for any registered id.
    pub fn accepts(&self, selector: &CategorySelector) -> bool {
        match selector {
            CategorySelector::All => true,
            CategorySelector::Category(id) => self.contains(id),
        }
    }

    /// "All" followed by every definition, in display order.
    pub fn controls(&self) -> Vec<FilterControl> {
        std::iter::once(FilterControl {
            selector: CategorySelector::All,
            label: ALL_LABEL.to_string(),
        })
        .chain(self.definitions.iter().map(|def| FilterControl {
            selector: CategorySelector::Category(def.id.clone()),
            label: def.name.clone(),
        }))
        .collect()
    }
}
