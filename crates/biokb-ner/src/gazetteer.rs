//! Embedded gazetteers for the built-in biomedical models.
//!
//! Each list is a small, curated subset of the label space of the corpus the
//! model is named after. A lexicon file can extend any of them at startup.

pub(crate) type Entry = (&'static str, &'static str);

const BC5CDR: &[Entry] = &[
    ("aspirin", "CHEMICAL"), ("ibuprofen", "CHEMICAL"), ("acetaminophen", "CHEMICAL"),
    ("paracetamol", "CHEMICAL"), ("cisplatin", "CHEMICAL"), ("doxorubicin", "CHEMICAL"),
    ("metformin", "CHEMICAL"), ("insulin", "CHEMICAL"), ("warfarin", "CHEMICAL"),
    ("heparin", "CHEMICAL"), ("morphine", "CHEMICAL"), ("dexamethasone", "CHEMICAL"),
    ("tamoxifen", "CHEMICAL"), ("gemcitabine", "CHEMICAL"), ("caffeine", "CHEMICAL"),
    ("nicotine", "CHEMICAL"), ("penicillin", "CHEMICAL"), ("cholesterol", "CHEMICAL"),
    ("glucose", "CHEMICAL"), ("lithium", "CHEMICAL"), ("cocaine", "CHEMICAL"),
    ("haloperidol", "CHEMICAL"), ("cyclophosphamide", "CHEMICAL"), ("methotrexate", "CHEMICAL"),
    ("inflammation", "DISEASE"), ("hypertension", "DISEASE"), ("diabetes", "DISEASE"),
    ("asthma", "DISEASE"), ("pain", "DISEASE"), ("fever", "DISEASE"), ("obesity", "DISEASE"),
    ("stroke", "DISEASE"), ("myocardial infarction", "DISEASE"), ("hepatotoxicity", "DISEASE"),
    ("nephrotoxicity", "DISEASE"), ("cardiotoxicity", "DISEASE"), ("seizures", "DISEASE"),
    ("hypotension", "DISEASE"), ("bleeding", "DISEASE"), ("cancer", "DISEASE"),
    ("arrhythmia", "DISEASE"), ("neutropenia", "DISEASE"),
];

const NCBI_DISEASE: &[Entry] = &[
    ("cancer", "DISEASE"), ("breast cancer", "DISEASE"), ("colorectal cancer", "DISEASE"),
    ("lung cancer", "DISEASE"), ("pancreatic cancer", "DISEASE"), ("prostate cancer", "DISEASE"),
    ("ovarian cancer", "DISEASE"), ("tumor", "DISEASE"), ("tumors", "DISEASE"),
    ("tumour", "DISEASE"), ("carcinoma", "DISEASE"), ("leukemia", "DISEASE"),
    ("lymphoma", "DISEASE"), ("melanoma", "DISEASE"), ("glioblastoma", "DISEASE"),
    ("diabetes mellitus", "DISEASE"), ("diabetes", "DISEASE"), ("cystic fibrosis", "DISEASE"),
    ("huntington's disease", "DISEASE"), ("alzheimer's disease", "DISEASE"),
    ("parkinson's disease", "DISEASE"), ("inflammation", "DISEASE"), ("sepsis", "DISEASE"),
    ("pneumonia", "DISEASE"), ("tuberculosis", "DISEASE"), ("malaria", "DISEASE"),
    ("hemophilia", "DISEASE"), ("muscular dystrophy", "DISEASE"), ("ataxia", "DISEASE"),
    ("atherosclerosis", "DISEASE"), ("covid-19", "DISEASE"),
];

const JNLPBA: &[Entry] = &[
    ("p53", "PROTEIN"), ("interleukin-6", "PROTEIN"), ("il-6", "PROTEIN"), ("il-2", "PROTEIN"),
    ("tnf-alpha", "PROTEIN"), ("nf-kappab", "PROTEIN"), ("cyclooxygenase", "PROTEIN"),
    ("cox-2", "PROTEIN"), ("egfr", "PROTEIN"), ("her2", "PROTEIN"), ("insulin receptor", "PROTEIN"),
    ("cytokines", "PROTEIN"), ("cytokine", "PROTEIN"), ("kinase", "PROTEIN"),
    ("transcription factor", "PROTEIN"), ("immunoglobulin", "PROTEIN"),
    ("promoter", "DNA"), ("enhancer", "DNA"), ("brca1 gene", "DNA"), ("cdna", "DNA"),
    ("mrna", "RNA"), ("microrna", "RNA"),
    ("t cells", "CELL_TYPE"), ("b cells", "CELL_TYPE"), ("macrophages", "CELL_TYPE"),
    ("monocytes", "CELL_TYPE"), ("lymphocytes", "CELL_TYPE"), ("neutrophils", "CELL_TYPE"),
    ("fibroblasts", "CELL_TYPE"), ("platelets", "CELL_TYPE"),
    ("hela", "CELL_LINE"), ("jurkat", "CELL_LINE"), ("mcf-7", "CELL_LINE"),
    ("hek293", "CELL_LINE"), ("a549", "CELL_LINE"), ("hepg2", "CELL_LINE"),
];

const BIONLP13CG: &[Entry] = &[
    ("kras", "GENE_OR_GENE_PRODUCT"), ("tp53", "GENE_OR_GENE_PRODUCT"),
    ("egfr", "GENE_OR_GENE_PRODUCT"), ("brca1", "GENE_OR_GENE_PRODUCT"),
    ("brca2", "GENE_OR_GENE_PRODUCT"), ("myc", "GENE_OR_GENE_PRODUCT"),
    ("vegf", "GENE_OR_GENE_PRODUCT"), ("cyclooxygenase", "GENE_OR_GENE_PRODUCT"),
    ("aspirin", "SIMPLE_CHEMICAL"), ("glucose", "SIMPLE_CHEMICAL"), ("oxygen", "SIMPLE_CHEMICAL"),
    ("calcium", "SIMPLE_CHEMICAL"), ("cisplatin", "SIMPLE_CHEMICAL"),
    ("tyrosine", "AMINO_ACID"), ("serine", "AMINO_ACID"), ("glutamine", "AMINO_ACID"),
    ("cancer", "CANCER"), ("tumor", "CANCER"), ("tumors", "CANCER"), ("carcinoma", "CANCER"),
    ("metastasis", "CANCER"), ("adenocarcinoma", "CANCER"),
    ("cells", "CELL"), ("stem cells", "CELL"), ("cancer cells", "CELL"), ("hela", "CELL"),
    ("liver", "ORGAN"), ("lung", "ORGAN"), ("lungs", "ORGAN"), ("kidney", "ORGAN"),
    ("heart", "ORGAN"), ("brain", "ORGAN"), ("pancreas", "ORGAN"), ("skin", "ORGAN"),
    ("blood", "TISSUE"), ("epithelium", "TISSUE"), ("bone marrow", "TISSUE"),
    ("mice", "ORGANISM"), ("patients", "ORGANISM"), ("human", "ORGANISM"),
];

const LINNAEUS: &[Entry] = &[
    ("human", "SPECIES"), ("humans", "SPECIES"), ("patients", "SPECIES"), ("patient", "SPECIES"),
    ("mouse", "SPECIES"), ("mice", "SPECIES"), ("rat", "SPECIES"), ("rats", "SPECIES"),
    ("zebrafish", "SPECIES"), ("yeast", "SPECIES"), ("escherichia coli", "SPECIES"),
    ("e. coli", "SPECIES"), ("homo sapiens", "SPECIES"), ("mus musculus", "SPECIES"),
    ("drosophila melanogaster", "SPECIES"), ("arabidopsis thaliana", "SPECIES"),
    ("saccharomyces cerevisiae", "SPECIES"), ("pig", "SPECIES"), ("dog", "SPECIES"),
    ("rabbit", "SPECIES"), ("hiv", "SPECIES"), ("sars-cov-2", "SPECIES"),
];

const S800: &[Entry] = &[
    ("homo sapiens", "SPECIES"), ("human", "SPECIES"), ("humans", "SPECIES"),
    ("mus musculus", "SPECIES"), ("mice", "SPECIES"), ("rattus norvegicus", "SPECIES"),
    ("escherichia coli", "SPECIES"), ("staphylococcus aureus", "SPECIES"),
    ("pseudomonas aeruginosa", "SPECIES"), ("mycobacterium tuberculosis", "SPECIES"),
    ("plasmodium falciparum", "SPECIES"), ("candida albicans", "SPECIES"),
    ("bacillus subtilis", "SPECIES"), ("caenorhabditis elegans", "SPECIES"),
    ("influenza virus", "SPECIES"), ("sars-cov-2", "SPECIES"),
];

const I2B2: &[Entry] = &[
    ("inflammation", "PROBLEM"), ("pain", "PROBLEM"), ("fever", "PROBLEM"),
    ("hypertension", "PROBLEM"), ("infection", "PROBLEM"), ("cough", "PROBLEM"),
    ("nausea", "PROBLEM"), ("diabetes", "PROBLEM"), ("shortness of breath", "PROBLEM"),
    ("chest pain", "PROBLEM"), ("bleeding", "PROBLEM"), ("swelling", "PROBLEM"),
    ("aspirin", "TREATMENT"), ("ibuprofen", "TREATMENT"), ("insulin", "TREATMENT"),
    ("surgery", "TREATMENT"), ("chemotherapy", "TREATMENT"), ("radiotherapy", "TREATMENT"),
    ("radiation therapy", "TREATMENT"), ("antibiotics", "TREATMENT"), ("metformin", "TREATMENT"),
    ("transplantation", "TREATMENT"), ("vaccination", "TREATMENT"),
    ("mri", "TEST"), ("ct scan", "TEST"), ("blood pressure", "TEST"), ("biopsy", "TEST"),
    ("x-ray", "TEST"), ("ecg", "TEST"), ("ultrasound", "TEST"), ("blood glucose", "TEST"),
];

const RADIOLOGY: &[Entry] = &[
    ("lung", "ANATOMY"), ("lungs", "ANATOMY"), ("liver", "ANATOMY"), ("chest", "ANATOMY"),
    ("heart", "ANATOMY"), ("brain", "ANATOMY"), ("kidney", "ANATOMY"), ("abdomen", "ANATOMY"),
    ("pleural", "ANATOMY"), ("spine", "ANATOMY"), ("lobe", "ANATOMY"),
    ("opacity", "OBSERVATION"), ("effusion", "OBSERVATION"), ("nodule", "OBSERVATION"),
    ("mass", "OBSERVATION"), ("lesion", "OBSERVATION"), ("lesions", "OBSERVATION"),
    ("fracture", "OBSERVATION"), ("edema", "OBSERVATION"), ("consolidation", "OBSERVATION"),
    ("atelectasis", "OBSERVATION"), ("inflammation", "OBSERVATION"), ("cardiomegaly", "OBSERVATION"),
    ("left", "ANATOMY_MODIFIER"), ("right", "ANATOMY_MODIFIER"), ("bilateral", "ANATOMY_MODIFIER"),
    ("upper", "ANATOMY_MODIFIER"), ("lower", "ANATOMY_MODIFIER"),
    ("mild", "OBSERVATION_MODIFIER"), ("severe", "OBSERVATION_MODIFIER"),
    ("small", "OBSERVATION_MODIFIER"), ("large", "OBSERVATION_MODIFIER"),
    ("possible", "UNCERTAINTY"), ("likely", "UNCERTAINTY"), ("may represent", "UNCERTAINTY"),
];

const CONLL03: &[Entry] = &[
    ("fda", "ORG"), ("who", "ORG"), ("nih", "ORG"), ("cdc", "ORG"), ("ema", "ORG"),
    ("world health organization", "ORG"), ("food and drug administration", "ORG"),
    ("united states", "LOC"), ("china", "LOC"), ("europe", "LOC"), ("japan", "LOC"),
    ("africa", "LOC"), ("germany", "LOC"), ("india", "LOC"), ("brazil", "LOC"),
];

/// Built-in entries for a model tag, if the model is known.
pub(crate) fn builtin_entries(model: &str) -> Option<&'static [Entry]> {
    let entries = match model {
        "bc5cdr" => BC5CDR,
        "ncbi_disease" => NCBI_DISEASE,
        "jnlpba" => JNLPBA,
        "bionlp13cg" => BIONLP13CG,
        "linnaeus" => LINNAEUS,
        "s800" => S800,
        "i2b2" => I2B2,
        "radiology" => RADIOLOGY,
        "conll03" => CONLL03,
        _ => return None,
    };
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_entry_is_lowercase() {
        for model in ["bc5cdr", "ncbi_disease", "jnlpba", "bionlp13cg", "linnaeus", "s800", "i2b2", "radiology", "conll03"] {
            let entries = builtin_entries(model).unwrap();
            assert!(!entries.is_empty(), "{model} has no entries");
            for (term, _) in entries {
                assert_eq!(*term, term.to_lowercase(), "{model}: {term}");
            }
        }
    }

    #[test]
    fn test_unknown_model_has_no_entries() {
        assert!(builtin_entries("craft").is_none());
    }
}
