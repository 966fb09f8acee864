//! Plain-text formatting of bot message payloads.
//!
//! Each renderable content kind has a textual form used both for the
//! terminal display and as the copy-to-clipboard representation.

use crate::models::{MeasureOutcome, Reference, TrialDocument, TrialMetadata};

/// Base URL for ClinicalTrials.gov study pages.
pub const CTGOV_URL: &str = "https://clinicaltrials.gov/study";

/// Base URL for PubMed.
pub const PUBMED_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// Listing of retrieved trials, numbered so the user can open a chat on
/// entry N with Alt+N.
pub fn format_retrieved(ids: &[String], titles: &[String]) -> String {
    let mut out = format!(
        "Here are the top {} clinical trials that match your query. \
         Press Alt+<number> to start a chat on a specific trial.\n",
        ids.len()
    );
    for (index, (id, title)) in ids.iter().zip(titles.iter()).enumerate() {
        out.push_str(&format!(
            "\n[{}] {}\n    {}/{}",
            index + 1,
            title,
            CTGOV_URL,
            id
        ));
    }
    out
}

/// References and related documents of a trial, for the `/docs` command.
pub fn format_docs(references: &[Reference], documents: &[TrialDocument]) -> String {
    let mut out = String::new();
    if references.is_empty() {
        out.push_str("No references found.");
    } else {
        out.push_str("References\n");
        for reference in references {
            out.push_str(&format!(
                "- {}\n  {}/{}\n",
                reference.citation, PUBMED_URL, reference.pmid
            ));
        }
    }
    out.push('\n');
    if documents.is_empty() {
        out.push_str("No related documents found.");
    } else {
        out.push_str("Related Documents\n");
        for document in documents {
            let name = document.url.rsplit('/').next().unwrap_or(&document.url);
            out.push_str(&format!(
                "- {} ({}KB)\n  {}\n",
                name,
                (document.size as f64 / 1024.0).round() as u64,
                document.url
            ));
        }
    }
    out.trim_end().to_string()
}

fn push_field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        out.push_str(&format!("{label}: {value}\n"));
    }
}

fn push_list(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        out.push_str(&format!("{label}: {}\n", values.join("; ")));
    }
}

fn push_outcomes(out: &mut String, label: &str, outcomes: &[MeasureOutcome]) {
    if outcomes.is_empty() {
        return;
    }
    out.push_str(&format!("{label}:\n"));
    for outcome in outcomes {
        out.push_str(&format!("- {} [{}]\n", outcome.measure, outcome.time_frame));
    }
}

/// Readable dump of the trial metadata, for the `/meta` command.
pub fn format_meta(meta: &TrialMetadata) -> String {
    let mut out = String::new();
    push_field(&mut out, "Short Title", &meta.short_title);
    push_field(&mut out, "Full Title", &meta.long_title);
    push_field(&mut out, "Organization", &meta.organization);
    push_field(&mut out, "Sponsor", &meta.sponsor);
    push_list(&mut out, "Collaborators", &meta.collaborators);
    push_field(&mut out, "Study Type", &meta.study_type);
    push_field(&mut out, "Study Phases", &meta.study_phases);
    if meta.enrollment_count > 0 {
        out.push_str(&format!("Enrollment: {}\n", meta.enrollment_count));
    }
    push_list(&mut out, "Conditions", &meta.conditions);
    push_field(&mut out, "Allocation", &meta.allocation);
    push_field(&mut out, "Intervention Model", &meta.intervention_model);
    push_field(&mut out, "Observational Model", &meta.observational_model);
    push_field(&mut out, "Primary Purpose", &meta.primary_purpose);
    push_field(&mut out, "Who Masked", &meta.who_masked);
    if !meta.interventions.is_empty() {
        out.push_str("Interventions:\n");
        for intervention in &meta.interventions {
            out.push_str(&format!(
                "- {} ({})\n",
                intervention.name, intervention.intervention_type
            ));
        }
    }
    push_outcomes(&mut out, "Primary Outcomes", &meta.primary_measure_outcomes);
    push_outcomes(
        &mut out,
        "Secondary Outcomes",
        &meta.secondary_measure_outcomes,
    );
    push_outcomes(&mut out, "Other Outcomes", &meta.other_measure_outcomes);
    if meta.min_age > 0.0 || meta.max_age > 0.0 {
        out.push_str(&format!(
            "Age Range: {} - {} years\n",
            meta.min_age, meta.max_age
        ));
    }
    push_field(&mut out, "Eligible Sex", &meta.eligible_sex);
    out.push_str(&format!(
        "Accepts Healthy Volunteers: {}\n",
        if meta.accepts_healthy { "yes" } else { "no" }
    ));
    push_field(&mut out, "Summary", &meta.summary);
    push_field(&mut out, "Inclusion Criteria", &meta.inclusion_criteria);
    push_field(&mut out, "Exclusion Criteria", &meta.exclusion_criteria);
    push_list(&mut out, "Officials", &meta.officials);
    push_list(&mut out, "Locations", &meta.locations);
    push_field(&mut out, "Submit Date", &meta.submit_date);
    push_field(&mut out, "Last Update", &meta.last_update_date);
    push_field(&mut out, "Verify Date", &meta.verify_date);
    out.trim_end().to_string()
}
