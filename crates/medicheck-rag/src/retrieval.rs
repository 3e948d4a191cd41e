//! Context retrieval and the fallback decision.
//!
//! The decision is made from local data only, before any call to the
//! completion backend.

use medicheck_common::columns::{CRITICAL_COLUMNS, SEARCH_COLUMNS};
use medicheck_common::{DrugRecord, DrugTable};

use crate::extract::extract_drug_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    /// Nothing usable locally; carries the reason.
    NoMatch(String),
    /// A row matched but one of the critical pharmacogenomic fields is empty.
    FallbackRequired,
    /// Formatted context lines from the matched row.
    Context(String),
}

impl RetrievalOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalOutcome::NoMatch(_)       => "no_match",
            RetrievalOutcome::FallbackRequired => "fallback_required",
            RetrievalOutcome::Context(_)       => "context",
        }
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            RetrievalOutcome::Context(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// First row (table order) where any search column contains `drug_name`,
/// compared in uppercase.
pub fn find_first_match<'a>(table: &'a DrugTable, drug_name: &str) -> Option<&'a DrugRecord> {
    let needle = drug_name.to_uppercase();
    table.rows().iter().find(|row| {
        SEARCH_COLUMNS
            .iter()
            .any(|col| row.get(col).is_some_and(|v| v.to_uppercase().contains(&needle)))
    })
}

/// True when any critical column is absent or blank.
pub fn requires_fallback(record: &DrugRecord) -> bool {
    CRITICAL_COLUMNS.iter().any(|col| record.is_blank(col))
}

/// `- <column> : <value>` for each non-empty search column, in column
/// order, every line preceded by a newline.
pub fn format_context(record: &DrugRecord) -> String {
    SEARCH_COLUMNS
        .iter()
        .filter_map(|col| record.get(col).map(|v| format!("\n- {col} : {v}")))
        .collect()
}

/// Run extraction, search and the sufficiency gate for one question.
pub fn retrieve_context(table: &DrugTable, question: &str) -> RetrievalOutcome {
    let Some(drug_name) = extract_drug_name(question) else {
        return RetrievalOutcome::NoMatch("Aucune molécule extraite de la question.".to_string());
    };

    let Some(record) = find_first_match(table, &drug_name) else {
        return RetrievalOutcome::NoMatch(format!(
            "Aucune donnée trouvée pour le médicament {drug_name}."
        ));
    };

    if requires_fallback(record) {
        return RetrievalOutcome::FallbackRequired;
    }

    RetrievalOutcome::Context(format_context(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aspirin() -> DrugRecord {
        DrugRecord::new()
            .with_field("DCI", "ASPIRIN")
            .with_field("Genes_Involved", "CYP2C9")
            .with_field("Variants_Haplotypes", "*2")
            .with_field("Evidence_Levels", "1A")
            .with_field("Phenotypes", "normal metabolizer")
    }

    fn table(rows: Vec<DrugRecord>) -> DrugTable {
        DrugTable::new(Vec::new(), rows)
    }

    #[test]
    fn test_complete_row_yields_context() {
        let t = table(vec![aspirin()]);
        let outcome = retrieve_context(&t, "Quels sont les effets de ASPIRIN ?");
        assert_eq!(
            outcome,
            RetrievalOutcome::Context(
                "\n- DCI : ASPIRIN\
                 \n- Genes_Involved : CYP2C9\
                 \n- Variants_Haplotypes : *2\
                 \n- Evidence_Levels : 1A\
                 \n- Phenotypes : normal metabolizer"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_unknown_drug_is_no_match() {
        let t = table(vec![aspirin()]);
        let outcome = retrieve_context(&t, "parle-moi de IBUPROFEN");
        assert_eq!(
            outcome,
            RetrievalOutcome::NoMatch("Aucune donnée trouvée pour le médicament IBUPROFEN.".into())
        );
    }

    #[test]
    fn test_no_extracted_name_is_no_match() {
        let t = table(vec![aspirin()]);
        let outcome = retrieve_context(&t, "ASPIRIN ?");
        assert_eq!(
            outcome,
            RetrievalOutcome::NoMatch("Aucune molécule extraite de la question.".into())
        );
    }

    #[test]
    fn test_empty_critical_field_forces_fallback() {
        let row = DrugRecord::new()
            .with_field("DCI", "ASPIRIN")
            .with_field("Genes_Involved", "CYP2C9")
            .with_field("Variants_Haplotypes", "*2")
            .with_field("Evidence_Levels", "1A")
            .with_field("Phenotypes", "")
            .with_field("Synonymes", "acide acétylsalicylique")
            .with_field("Formule", "C9H8O4");
        let t = table(vec![row]);
        assert_eq!(
            retrieve_context(&t, "effets de aspirin"),
            RetrievalOutcome::FallbackRequired
        );
    }

    #[test]
    fn test_blanking_a_critical_field_forces_fallback() {
        let mut row = aspirin();
        assert!(!requires_fallback(&row));
        row.insert("Evidence_Levels", "   ");
        assert!(requires_fallback(&row));
    }

    #[test]
    fn test_name_only_in_unsearched_column_is_no_match() {
        let row = aspirin().with_field("Notes", "souvent comparé à IBUPROFEN");
        let t = table(vec![row]);
        assert!(matches!(
            retrieve_context(&t, "parle-moi de IBUPROFEN"),
            RetrievalOutcome::NoMatch(_)
        ));
    }

    #[test]
    fn test_substring_match_in_any_search_column() {
        let row = aspirin().with_field("Synonymes", "Acetylsalicylic acid; ASA");
        let t = table(vec![row]);
        let hit = find_first_match(&t, "ACETYLSALICYLIC").unwrap();
        assert_eq!(hit.get("DCI"), Some("ASPIRIN"));
    }

    #[test]
    fn test_first_matching_row_wins() {
        let first = DrugRecord::new().with_field("DCI", "CODEINE").with_field("Types", "opioid");
        let second = aspirin().with_field("Types", "opioid-free");
        let t = table(vec![first, second]);
        let hit = find_first_match(&t, "OPIOID").unwrap();
        assert_eq!(hit.get("DCI"), Some("CODEINE"));
    }

    #[test]
    fn test_context_follows_column_order_without_duplicates() {
        let row = aspirin()
            .with_field("Variant_Types", "SNP")
            .with_field("INN", "acetylsalicylic acid")
            .with_field("Evidence_Scores", "")
            .with_field("Unlisted", "ignored");
        let text = format_context(&row);
        let columns: Vec<&str> = text
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.trim_start_matches("- ").split(" : ").next().unwrap())
            .collect();
        assert_eq!(
            columns,
            vec![
                "DCI",
                "INN",
                "Genes_Involved",
                "Variants_Haplotypes",
                "Evidence_Levels",
                "Phenotypes",
                "Variant_Types",
            ]
        );
    }
}
