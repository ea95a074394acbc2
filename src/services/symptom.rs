//! # Symptom Recommendations
//!
//! A fixed table mapping symptom keys to advice. Built once at startup and
//! shared read-only through the application state.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::utils::constant::FALLBACK_RECOMMENDATION;

const BUILTIN: [(&str, &str); 2] = [
    (
        "fever",
        "If you have a fever, drink plenty of fluids and rest. If it persists, consider seeing a doctor.",
    ),
    (
        "headache",
        "Try drinking water and resting. If the headache continues, you may need medical advice.",
    ),
];

/// Immutable symptom → advice lookup
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    entries: HashMap<&'static str, &'static str>,
}

impl RecommendationTable {
    /// The table the service ships with.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.into_iter().collect(),
        }
    }

    /// Advice for one symptom, or [`FALLBACK_RECOMMENDATION`] for unknown keys.
    ///
    /// Keys are matched exactly; `"Fever"` is not `"fever"`.
    #[inline]
    pub fn lookup(&self, symptom: &str) -> &'static str {
        self.entries
            .get(symptom)
            .copied()
            .unwrap_or(FALLBACK_RECOMMENDATION)
    }

    /// Advice for each symptom, in input order.
    #[instrument(skip_all, fields(symptom_count = symptoms.len()))]
    pub fn recommend<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<&'static str> {
        let recommendations: Vec<&'static str> = symptoms
            .iter()
            .map(|symptom| self.lookup(symptom.as_ref()))
            .collect();

        debug!(
            known = symptoms
                .iter()
                .filter(|s| self.entries.contains_key(s.as_ref()))
                .count(),
            "Recommendations resolved"
        );
        recommendations
    }

    /// Symptom keys with registered advice.
    pub fn known_symptoms(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for RecommendationTable {
    fn default() -> Self {
        Self::builtin()
    }
}
