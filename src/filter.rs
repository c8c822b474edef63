//! Category and free-text filtering over the species catalog.
//!
//! Filtering is a stable linear scan: the output borrows from the input slice
//! and keeps its relative order. Every input is legal; an unknown category or
//! an unmatched query just yields an empty result.

use crate::catalog::{CategorySelector, SpeciesRecord};

/// Records that pass both the category clause and the query clause.
///
/// `None` and `""` both disable the query clause.
pub fn filter_species<'a>(
    catalog: &'a [SpeciesRecord],
    selector: &CategorySelector,
    query: Option<&str>,
) -> Vec<&'a SpeciesRecord> {
    let needle = query.unwrap_or_default().to_lowercase();
    catalog
        .iter()
        .filter(|record| matches_category(record, selector) && matches_lowered(record, &needle))
        .collect()
}

/// `selector == all` or the record's category equals the selected id.
pub fn matches_category(record: &SpeciesRecord, selector: &CategorySelector) -> bool {
    match selector {
        CategorySelector::All => true,
        CategorySelector::Category(id) => record.category.as_ref() == Some(id),
    }
}

/// Case-insensitive substring match on name, scientific name or description.
pub fn matches_query(record: &SpeciesRecord, query: &str) -> bool {
    matches_lowered(record, &query.to_lowercase())
}

fn matches_lowered(record: &SpeciesRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.name.to_lowercase().contains(needle)
        || record.scientific_name.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryId, SpeciesId};
    use proptest::prelude::*;

    fn record(id: &str, name: &str, category: Option<&str>) -> SpeciesRecord {
        SpeciesRecord {
            id: SpeciesId(id.to_string()),
            name: name.to_string(),
            slug: None,
            scientific_name: String::new(),
            description: String::new(),
            habitat: String::new(),
            category: category.map(|c| CategoryId(c.to_string())),
            image_url: None,
            created_at: None,
            updated_at: None,
            created_by: None,
        }
    }

    fn sample() -> Vec<SpeciesRecord> {
        vec![
            record("1", "Paramecium Caudatum", Some("protozoa")),
            record("2", "Amanita Muscaria", Some("fungi")),
        ]
    }

    fn ids(records: &[&SpeciesRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.0.clone()).collect()
    }

    #[test]
    fn concrete_scenario() {
        let catalog = sample();
        assert_eq!(
            ids(&filter_species(&catalog, &"all".into(), Some("amanita"))),
            vec!["2"]
        );
        assert_eq!(
            ids(&filter_species(&catalog, &"fungi".into(), Some(""))),
            vec!["2"]
        );
        assert!(filter_species(&catalog, &"bacteria".into(), Some("")).is_empty());
    }

    #[test]
    fn query_matches_scientific_name_and_description() {
        let mut by_science = record("3", "Fly agaric", Some("fungi"));
        by_science.scientific_name = "Amanita muscaria".into();
        let mut by_description = record("4", "Slipper", Some("protozoa"));
        by_description.description = "A ciliate shaped like a SLIPPER animalcule".into();
        let mut by_habitat_only = record("5", "Pond scum", Some("algae"));
        by_habitat_only.habitat = "amanita grove".into();

        let catalog = vec![by_science, by_description, by_habitat_only];
        assert_eq!(
            ids(&filter_species(&catalog, &CategorySelector::All, Some("AMANITA"))),
            vec!["3"]
        );
        assert_eq!(
            ids(&filter_species(&catalog, &CategorySelector::All, Some("animalcule"))),
            vec!["4"]
        );
    }

    #[test]
    fn unknown_category_is_empty_not_error() {
        let mut catalog = sample();
        catalog.push(record("3", "Uncategorised", None));
        assert!(filter_species(&catalog, &"archaea".into(), None).is_empty());
    }

    #[test]
    fn uncategorised_records_only_appear_under_all() {
        let catalog = vec![record("1", "Mystery", None), record("2", "Other", Some("odd"))];
        assert_eq!(ids(&filter_species(&catalog, &CategorySelector::All, None)).len(), 2);
        for category in ["microorganisms", "fungi", "bacteria", "protozoa", "algae"] {
            assert!(filter_species(&catalog, &category.into(), None).is_empty());
        }
    }

    #[test]
    fn matches_query_folds_case_beyond_ascii() {
        let mut record = record("1", "Ötzi's lichen", Some("fungi"));
        record.description = "Found near the ÉCRINS glacier".into();
        assert!(matches_query(&record, "ötzi"));
        assert!(matches_query(&record, "écrins"));
        assert!(matches_query(&record, ""));
        assert!(!matches_query(&record, "habitat"));
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        assert!(filter_species(&[], &CategorySelector::All, Some("x")).is_empty());
    }

    fn arb_record() -> impl Strategy<Value = SpeciesRecord> {
        (
            "[a-z0-9]{1,6}",
            "[A-Za-zÉéÖö ]{1,12}",
            "[A-Za-zÉéÖö ]{0,12}",
            "[A-Za-zÉéÖö ]{0,24}",
            proptest::option::of(prop_oneof![
                Just("fungi".to_string()),
                Just("bacteria".to_string()),
                Just("algae".to_string()),
                Just("archaea".to_string()),
            ]),
        )
            .prop_map(|(id, name, scientific_name, description, category)| {
                let mut r = record(&id, &name, category.as_deref());
                r.scientific_name = scientific_name;
                r.description = description;
                r
            })
    }

    fn arb_selector() -> impl Strategy<Value = CategorySelector> {
        prop_oneof![
            Just(CategorySelector::All),
            Just(CategorySelector::parse("fungi")),
            Just(CategorySelector::parse("bacteria")),
            Just(CategorySelector::parse("protozoa")),
        ]
    }

    proptest! {
        #[test]
        fn all_with_empty_query_is_identity(catalog in prop::collection::vec(arb_record(), 0..12)) {
            let result = filter_species(&catalog, &CategorySelector::All, Some(""));
            prop_assert_eq!(result.len(), catalog.len());
            for (got, want) in result.iter().zip(catalog.iter()) {
                prop_assert!(std::ptr::eq(*got, want));
            }
        }

        #[test]
        fn result_is_sound_complete_and_ordered(
            catalog in prop::collection::vec(arb_record(), 0..12),
            selector in arb_selector(),
            query in "[A-Za-zÉéÖö ]{0,3}",
        ) {
            let result = filter_species(&catalog, &selector, Some(query.as_str()));

            let needle = query.to_lowercase();
            let wanted = |r: &SpeciesRecord| {
                let in_category = selector.is_all()
                    || r.category.as_ref().map(|c| c.as_str()) == Some(selector.as_str());
                let text = [&r.name, &r.scientific_name, &r.description];
                in_category && text.iter().any(|field| field.to_lowercase().contains(&needle))
            };

            let mut rest = result.iter().peekable();
            for record in &catalog {
                let included = rest.peek().is_some_and(|got| std::ptr::eq(**got, record));
                prop_assert_eq!(included, wanted(record), "record {}", record.id);
                if included {
                    rest.next();
                }
            }
            prop_assert!(rest.next().is_none());
        }

        #[test]
        fn query_case_does_not_matter(
            catalog in prop::collection::vec(arb_record(), 0..12),
            query in "[a-zéö]{0,3}",
        ) {
            let lower = ids(&filter_species(&catalog, &CategorySelector::All, Some(query.as_str())));
            let upper = ids(&filter_species(
                &catalog,
                &CategorySelector::All,
                Some(query.to_uppercase().as_str()),
            ));
            prop_assert_eq!(lower, upper);
        }
    }
}
