//! Column names of the pharmacogenomic reference spreadsheets.

pub const DCI: &str = "DCI";
pub const INN: &str = "INN";
pub const GENES_INVOLVED: &str = "Genes_Involved";
pub const VARIANTS_HAPLOTYPES: &str = "Variants_Haplotypes";
pub const EVIDENCE_LEVELS: &str = "Evidence_Levels";
pub const PHENOTYPES: &str = "Phenotypes";

/// Percentage column of the toxicity spreadsheet.
pub const TOXICITY: &str = "Toxicité (%)";

/// Columns scanned when resolving a drug name, in display order.
pub const SEARCH_COLUMNS: [&str; 23] = [
    DCI,
    INN,
    "Types",
    "Formule",
    "Masse_molaire",
    "PGx_SMILES",
    "Synonymes",
    "PGx_Nom_IUPAC_Complet",
    "StructureImagePath",
    "PharmGKB Accession Id",
    "PGx_Name",
    "PGx_Type",
    "Clinical_Annotations_Count",
    GENES_INVOLVED,
    VARIANTS_HAPLOTYPES,
    EVIDENCE_LEVELS,
    PHENOTYPES,
    "Clinical_Annotation_IDs",
    "Alleles_Details",
    "Evidence_Types",
    "Evidence_Scores",
    "Clinical_Variants_Count",
    "Variant_Types",
];

/// A row missing any of these is not trusted as answer context.
pub const CRITICAL_COLUMNS: [&str; 4] = [
    GENES_INVOLVED,
    VARIANTS_HAPLOTYPES,
    EVIDENCE_LEVELS,
    PHENOTYPES,
];

/// Columns used for exact record lookups.
pub const IDENTITY_COLUMNS: [&str; 2] = [DCI, INN];
