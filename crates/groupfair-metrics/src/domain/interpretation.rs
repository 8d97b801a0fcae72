//! Categorical interpretation of metric values
//!
//! Each metric maps a value to a label through an ordered list of
//! (predicate, label) rules. The first matching rule wins; the fallback
//! covers whatever no rule matched (including NaN).

use serde::Serialize;
use std::fmt;

/// Ordered bucket rules with a fallback label
pub struct BucketRules<L: 'static> {
    rules: &'static [(fn(f64) -> bool, L)],
    fallback: L,
}

impl<L: Copy> BucketRules<L> {
    pub const fn new(rules: &'static [(fn(f64) -> bool, L)], fallback: L) -> Self {
        Self { rules, fallback }
    }

    /// Label of the first rule whose predicate holds for `value`
    pub fn classify(&self, value: f64) -> L {
        self.rules
            .iter()
            .find(|(predicate, _)| predicate(value))
            .map(|(_, label)| *label)
            .unwrap_or(self.fallback)
    }
}

macro_rules! interpretation_labels {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// Disparate impact ratio
// =============================================================================

interpretation_labels!(DirInterpretation {
    Reference => "Reference",
    Acceptable => "Acceptable",
    ModerateImbalance => "Moderate Imbalance",
    SevereUnderrepresentation => "Severe Underrepresentation",
    CriticalUnderrepresentation => "Critical Underrepresentation",
});

const DIR_BUCKETS: &[(fn(f64) -> bool, DirInterpretation)] = &[
    (|v: f64| v == 1.0, DirInterpretation::Reference),
    (|v: f64| (0.8..1.0).contains(&v), DirInterpretation::Acceptable),
    (|v: f64| (0.6..0.8).contains(&v), DirInterpretation::ModerateImbalance),
    (|v: f64| (0.4..0.6).contains(&v), DirInterpretation::SevereUnderrepresentation),
];

pub static DIR_RULES: BucketRules<DirInterpretation> =
    BucketRules::new(DIR_BUCKETS, DirInterpretation::CriticalUnderrepresentation);

// =============================================================================
// Generalised disparate impact
// =============================================================================

interpretation_labels!(GdiInterpretation {
    WellRepresented => "Well Represented",
    ModerateUnderrepresentation => "Moderate Underrepresentation",
    SevereUnderrepresentation => "Severe Underrepresentation",
    ModerateOverrepresentation => "Moderate Overrepresentation",
    SevereOverrepresentation => "Severe Overrepresentation",
});

const GDI_BUCKETS: &[(fn(f64) -> bool, GdiInterpretation)] = &[
    (|v: f64| (0.95..=1.05).contains(&v), GdiInterpretation::WellRepresented),
    (|v: f64| (0.8..0.95).contains(&v), GdiInterpretation::ModerateUnderrepresentation),
    (|v: f64| v < 0.8, GdiInterpretation::SevereUnderrepresentation),
    (|v: f64| v > 1.05 && v <= 1.25, GdiInterpretation::ModerateOverrepresentation),
];

pub static GDI_RULES: BucketRules<GdiInterpretation> =
    BucketRules::new(GDI_BUCKETS, GdiInterpretation::SevereOverrepresentation);

// =============================================================================
// Risk ratio
// =============================================================================

interpretation_labels!(RiskInterpretation {
    EqualPrevalence => "Equal prevalence",
    Acceptable => "Acceptable",
    Underrepresentation => "Underrepresentation",
    Overrepresentation => "Overrepresentation",
});

const RISK_BUCKETS: &[(fn(f64) -> bool, RiskInterpretation)] = &[
    (|v: f64| v == 1.0, RiskInterpretation::EqualPrevalence),
    (|v: f64| (0.8..=1.25).contains(&v), RiskInterpretation::Acceptable),
    (|v: f64| v < 0.8, RiskInterpretation::Underrepresentation),
];

pub static RISK_RULES: BucketRules<RiskInterpretation> =
    BucketRules::new(RISK_BUCKETS, RiskInterpretation::Overrepresentation);

// =============================================================================
// Jensen-Shannon distance
// =============================================================================

interpretation_labels!(DivergenceInterpretation {
    VerySimilar => "Very similar to population",
    ModeratelyDifferent => "Moderately different",
    SubstantiallyDifferent => "Substantially different",
    HighlyDivergent => "Highly divergent",
});

const DIVERGENCE_BUCKETS: &[(fn(f64) -> bool, DivergenceInterpretation)] = &[
    (|v: f64| v < 0.05, DivergenceInterpretation::VerySimilar),
    (|v: f64| v < 0.15, DivergenceInterpretation::ModeratelyDifferent),
    (|v: f64| v < 0.30, DivergenceInterpretation::SubstantiallyDifferent),
];

pub static DIVERGENCE_RULES: BucketRules<DivergenceInterpretation> =
    BucketRules::new(DIVERGENCE_BUCKETS, DivergenceInterpretation::HighlyDivergent);
