//! Answer-synthesis context formatting
//!
//! Renders the fused evidence set into the structured Czech context block
//! handed to the answer-synthesis model. Complete fields, no truncation:
//! the model cites decisions by footnote index, so every record carries
//! its full identification and text.

use std::fmt::Write;

use crate::record::CaseRecord;

const NOT_STATED: &str = "Neuvedeno";

/// Format records for the answer-synthesis prompt. Records are numbered
/// 1-based and cited as `[^n]`.
pub fn format_cases_for_context(cases: &[CaseRecord]) -> String {
    if cases.is_empty() {
        return "Žádná rozhodnutí nebyla nalezena.".to_string();
    }

    let mut context = format!("CELKEM NALEZENO: {} rozhodnutí\n\n", cases.len());

    for (index, case) in cases.iter().enumerate() {
        let number = index + 1;
        let keywords = if case.keywords.is_empty() {
            "Neuvedena".to_string()
        } else {
            case.keywords.join(", ")
        };
        let legal_references = if case.legal_references.is_empty() {
            "Neuvedeny".to_string()
        } else {
            case.legal_references.join(", ")
        };
        let subject = if case.subject.is_empty() { NOT_STATED } else { &case.subject };

        let _ = write!(
            context,
            "═══════════════════════════════════════════════\n\
             ROZHODNUTÍ [{number}] - Pro citaci použijte: [^{number}]\n\
             ═══════════════════════════════════════════════\n\
             Spisová značka: {}\n\
             Soud: {}\n\
             Soudce: {}\n\
             Datum vydání: {}\n\
             Datum publikace: {}\n\
             ECLI: {}\n\n\
             PŘEDMĚT SPORU:\n{}\n\n\
             KLÍČOVÁ SLOVA:\n{}\n\n\
             PRÁVNÍ PŘEDPISY ZMÍNĚNÉ V ROZHODNUTÍ:\n{}\n\n\
             ZDROJ:\n{}\n\n\
             RELEVANCE: {:.4}\n\n",
            case.case_number,
            case.court,
            case.judge.as_deref().unwrap_or(NOT_STATED),
            case.date_issued.as_deref().unwrap_or(NOT_STATED),
            case.date_published.as_deref().unwrap_or(NOT_STATED),
            case.ecli.as_deref().unwrap_or(NOT_STATED),
            subject,
            keywords,
            legal_references,
            case.source_url.as_deref().unwrap_or(NOT_STATED),
            case.relevance_score,
        );
    }

    context.push_str(
        "INSTRUKCE PRO CITACI:\n\
         - Citujte rozhodnutí pomocí [^1], [^2], [^3] atd.\n\
         - Na konci odpovědi uveďte seznam všech citovaných rozhodnutí\n\
         - Používejte POUZE informace z těchto rozhodnutí\n\
         - Pokud rozhodnutí neobsahují odpověď, jasně to řekněte\n",
    );

    context
}
