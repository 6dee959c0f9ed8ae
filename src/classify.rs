//! Two independent rule-based confidence tiers for a scored compound.
//!
//! The basic scheme looks only at PMI, t-score and log-likelihood; the
//! comprehensive scheme counts how many of eight criteria hold. Both are
//! reported side by side and never merged.

use std::fmt;

use serde::{Serialize, Serializer};

/// Confidence tier, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    VeryWeak,
    Weak,
    Possible,
    VeryPossible,
    Strong,
    VeryStrong,
}

impl Tier {
    /// Label shown to the analyst.
    pub fn label(self) -> &'static str {
        match self {
            Tier::VeryStrong => "ترجيح قوي جدًّا",
            Tier::Strong => "ترجيح قوي",
            Tier::VeryPossible => "ترجيح محتمل جدًّا",
            Tier::Possible => "ترجيح محتمل",
            Tier::Weak => "تركيب ضعيف",
            Tier::VeryWeak => "تركيب ضعيف جدًّا",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// (pmi, t, ll) floors, strongest first
const BASIC_RULES: [(f64, f64, f64, Tier); 5] = [
    (7.0, 5.0, 150.0, Tier::VeryStrong),
    (6.0, 4.0, 100.0, Tier::Strong),
    (5.0, 3.5, 70.0, Tier::VeryPossible),
    (4.0, 3.0, 50.0, Tier::Possible),
    (3.0, 2.5, 20.0, Tier::Weak),
];

/// First rule whose three floors are all met wins.
pub fn classify_basic(pmi: f64, t: f64, ll: f64) -> Tier {
    BASIC_RULES
        .iter()
        .find(|(p, ts, l, _)| pmi >= *p && t >= *ts && ll >= *l)
        .map(|rule| rule.3)
        .unwrap_or(Tier::VeryWeak)
}

/// Inputs of the comprehensive scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    pub pmi: f64,
    pub t_score: f64,
    pub log_likelihood: f64,
    pub spread: usize,
    pub density: f64,
    pub strong_parts: bool,
    pub pmi_ll_ratio: f64,
    pub entropy: f64,
}

impl Criteria {
    /// Number of the eight criteria that hold.
    pub fn points(&self) -> usize {
        [
            self.pmi >= 6.0,
            self.t_score >= 4.0,
            self.log_likelihood >= 100.0,
            self.spread >= 3,
            self.density >= 2.0,
            self.strong_parts,
            self.pmi_ll_ratio < 0.15,
            self.entropy >= 1.0,
        ]
        .iter()
        .filter(|&&hit| hit)
        .count()
    }
}

pub fn classify_comprehensive(criteria: &Criteria) -> Tier {
    match criteria.points() {
        8.. => Tier::VeryStrong,
        6..=7 => Tier::Strong,
        5 => Tier::VeryPossible,
        4 => Tier::Possible,
        2..=3 => Tier::Weak,
        _ => Tier::VeryWeak,
    }
}
