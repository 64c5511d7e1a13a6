/// File-name suffixes stripped when deriving a model identity.
const RESULT_SUFFIXES: [&str; 2] = ["_evaluation_results.csv", ".evaluation_results.csv"];

/// Separators allowed between a variant prefix and the model name.
const PREFIX_SEPARATORS: [char; 4] = ['_', '-', '.', ' '];

/// Derive the model identity from a result table file name.
///
/// The `_evaluation_results.csv` / `.evaluation_results.csv` suffix is removed
/// (or, failing that, a plain `.csv` extension) and the rest lowercased.
/// Suffixes match case-insensitively. The result may be empty.
///
/// ```text
/// "Falcon_evaluation_results.csv"     → "falcon"
/// "mistral.evaluation_results.csv"    → "mistral"
/// "RAG_llama_evaluation_results.csv"  → "rag_llama"
/// "notes.csv"                         → "notes"
/// "Falcon.CSV"                        → "falcon"
/// ```
pub fn model_identity(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    let stripped = RESULT_SUFFIXES
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .or_else(|| lower.strip_suffix(".csv"))
        .unwrap_or(&lower);
    stripped.to_string()
}

/// Identity of a variant table once its prefix (e.g. `rag`) is removed.
///
/// `"rag_falcon_evaluation_results.csv"` with prefix `"rag"` → `"falcon"`.
/// Returns `None` when the name does not start with the prefix.
pub fn variant_identity(file_name: &str, prefix: &str) -> Option<String> {
    let identity = model_identity(file_name);
    let rest = identity.strip_prefix(&prefix.to_lowercase())?;
    let rest = rest
        .strip_prefix(|c: char| PREFIX_SEPARATORS.contains(&c))
        .unwrap_or(rest);
    Some(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_identity() {
        assert_eq!(model_identity("Falcon_evaluation_results.csv"), "falcon");
        assert_eq!(model_identity("mistral.evaluation_results.csv"), "mistral");
        assert_eq!(model_identity("RAG_llama_evaluation_results.csv"), "rag_llama");
        assert_eq!(model_identity("notes.csv"), "notes");
        assert_eq!(model_identity("falcon"), "falcon");
        assert_eq!(model_identity("Falcon.CSV"), "falcon");
        assert_eq!(model_identity("LLAMA_EVALUATION_RESULTS.CSV"), "llama");
        assert_eq!(model_identity("_evaluation_results.csv"), "");
    }

    #[test]
    fn test_variant_identity() {
        assert_eq!(
            variant_identity("rag_falcon_evaluation_results.csv", "rag").as_deref(),
            Some("falcon")
        );
        assert_eq!(variant_identity("RAG-Llama2.csv", "rag").as_deref(), Some("llama2"));
        assert_eq!(variant_identity("ragfalcon.csv", "rag").as_deref(), Some("falcon"));
        assert_eq!(variant_identity("falcon.csv", "rag"), None);
        assert_eq!(variant_identity("falcon.csv", "").as_deref(), Some("falcon"));
        assert_eq!(variant_identity("RAG_Falcon.CSV", "rag").as_deref(), Some("falcon"));
    }
}
