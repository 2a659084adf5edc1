//! Entity type classification and normalization.

use std::collections::HashMap;

/// Normalized entity type across the biomedical models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityType {
    Gene,
    Protein,
    Disease,
    Chemical,
    Species,
    CellLine,
    CellType,
    Anatomy,
    Finding,
    Procedure,
    Person,
    Organization,
    Location,
    Other,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Gene => "GENE",
            EntityType::Protein => "PROTEIN",
            EntityType::Disease => "DISEASE",
            EntityType::Chemical => "CHEMICAL",
            EntityType::Species => "SPECIES",
            EntityType::CellLine => "CELL_LINE",
            EntityType::CellType => "CELL_TYPE",
            EntityType::Anatomy => "ANATOMY",
            EntityType::Finding => "FINDING",
            EntityType::Procedure => "PROCEDURE",
            EntityType::Person => "PERSON",
            EntityType::Organization => "ORGANIZATION",
            EntityType::Location => "LOCATION",
            EntityType::Other => "OTHER",
        }
    }
}

// Keys are upper-cased model labels
fn get_label_map() -> &'static HashMap<&'static str, EntityType> {
    use std::sync::OnceLock;
    static LABEL_MAP: OnceLock<HashMap<&'static str, EntityType>> = OnceLock::new();
    LABEL_MAP.get_or_init(|| {
        let mut m = HashMap::new();

        // BC5CDR / NCBI disease
        m.insert("CHEMICAL", EntityType::Chemical);
        m.insert("DISEASE", EntityType::Disease);
        m.insert("SPECIFICDISEASE", EntityType::Disease);
        m.insert("DISEASECLASS", EntityType::Disease);
        m.insert("COMPOSITEMENTION", EntityType::Disease);

        // BioNLP13CG
        m.insert("GENE_OR_GENE_PRODUCT", EntityType::Gene);
        m.insert("SIMPLE_CHEMICAL", EntityType::Chemical);
        m.insert("AMINO_ACID", EntityType::Chemical);
        m.insert("CANCER", EntityType::Disease);
        m.insert("PATHOLOGICAL_FORMATION", EntityType::Disease);
        m.insert("CELL", EntityType::CellType);
        m.insert("ORGAN", EntityType::Anatomy);
        m.insert("TISSUE", EntityType::Anatomy);
        m.insert("ORGANISM", EntityType::Species);
        m.insert("ORGANISM_SUBDIVISION", EntityType::Anatomy);
        m.insert("ANATOMICAL_SYSTEM", EntityType::Anatomy);
        m.insert("MULTI-TISSUE_STRUCTURE", EntityType::Anatomy);
        m.insert("CELLULAR_COMPONENT", EntityType::Anatomy);

        // JNLPBA
        m.insert("PROTEIN", EntityType::Protein);
        m.insert("DNA", EntityType::Gene);
        m.insert("RNA", EntityType::Gene);
        m.insert("CELL_LINE", EntityType::CellLine);
        m.insert("CELL_TYPE", EntityType::CellType);

        // LINNAEUS / S800
        m.insert("SPECIES", EntityType::Species);

        // i2b2 clinical notes
        m.insert("PROBLEM", EntityType::Disease);
        m.insert("TREATMENT", EntityType::Procedure);
        m.insert("TEST", EntityType::Procedure);

        // Radiology reports
        m.insert("ANATOMY", EntityType::Anatomy);
        m.insert("ANATOMY_MODIFIER", EntityType::Anatomy);
        m.insert("OBSERVATION", EntityType::Finding);
        m.insert("OBSERVATION_MODIFIER", EntityType::Finding);
        m.insert("UNCERTAINTY", EntityType::Other);

        // Standard NER labels (CoNLL / OntoNotes)
        m.insert("PER", EntityType::Person);
        m.insert("PERSON", EntityType::Person);
        m.insert("ORG", EntityType::Organization);
        m.insert("ORGANIZATION", EntityType::Organization);
        m.insert("LOC", EntityType::Location);
        m.insert("LOCATION", EntityType::Location);
        m.insert("GPE", EntityType::Location);
        m.insert("MISC", EntityType::Other);

        m
    })
}

/// Normalize a model-specific entity label to an [`EntityType`].
pub fn normalize_entity_label(label: &str) -> EntityType {
    // BIO / BIOES prefixes
    let clean_label = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .or_else(|| label.strip_prefix("E-"))
        .or_else(|| label.strip_prefix("S-"))
        .unwrap_or(label);

    get_label_map()
        .get(clean_label.to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(EntityType::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_biomedical_labels() {
        assert_eq!(normalize_entity_label("CHEMICAL"), EntityType::Chemical);
        assert_eq!(normalize_entity_label("Disease"), EntityType::Disease);
        assert_eq!(normalize_entity_label("GENE_OR_GENE_PRODUCT"), EntityType::Gene);
        assert_eq!(normalize_entity_label("cell_line"), EntityType::CellLine);
        assert_eq!(normalize_entity_label("SPECIES"), EntityType::Species);
    }

    #[test]
    fn test_normalize_clinical_and_radiology_labels() {
        assert_eq!(normalize_entity_label("PROBLEM"), EntityType::Disease);
        assert_eq!(normalize_entity_label("TREATMENT"), EntityType::Procedure);
        assert_eq!(normalize_entity_label("OBSERVATION"), EntityType::Finding);
        assert_eq!(normalize_entity_label("ANATOMY"), EntityType::Anatomy);
    }

    #[test]
    fn test_normalize_bio_prefixes() {
        assert_eq!(normalize_entity_label("B-DISEASE"), EntityType::Disease);
        assert_eq!(normalize_entity_label("I-PROTEIN"), EntityType::Protein);
        assert_eq!(normalize_entity_label("S-SPECIES"), EntityType::Species);
    }

    #[test]
    fn test_unknown_labels_are_other() {
        assert_eq!(normalize_entity_label("RandomLabel"), EntityType::Other);
        assert_eq!(EntityType::Other.as_str(), "OTHER");
    }
}
