//! Oyster aquaculture calculator (nutrient assimilation in harvested tissue).
//!
//! With a size-class secondary code (`oyster_aquaculture.triploid_4`) the
//! class's default N and P content per animal is applied to `animal_units`.
//! Otherwise `units` (animals per class) are multiplied by
//! `avg_tissue_dry_weight` (grams per class, falling back to the class
//! default), and the tissue mass is credited at the N and P multipliers
//! below.
//! Pollutants whose total is zero are left out of the result.

use crate::Calculator;
use crate::numeric::GRAMS_PER_POUND;
use bmp_types::{AttrValue, PracticeRecord, ReductionResult};

/// Tissue nitrogen multiplier applied to dry weight.
pub const TISSUE_N: f64 = 8.2;
/// Tissue phosphorus multiplier applied to dry weight.
pub const TISSUE_P: f64 = 0.9;

/// Ploidy and shell-length class of a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// `diploid_225`
    Diploid225,
    /// `diploid_3`
    Diploid3,
    /// `diploid_4`
    Diploid4,
    /// `diploid_5`
    Diploid5,
    /// `diploid_gt_6`
    DiploidGt6,
    /// `triploid_225`
    Triploid225,
    /// `triploid_3`
    Triploid3,
    /// `triploid_4`
    Triploid4,
    /// `triploid_5`
    Triploid5,
    /// `triploid_gt_6`
    TriploidGt6,
}

impl SizeClass {
    /// All classes in table order.
    pub const ALL: [Self; 10] = [
        Self::Diploid225,
        Self::Diploid3,
        Self::Diploid4,
        Self::Diploid5,
        Self::DiploidGt6,
        Self::Triploid225,
        Self::Triploid3,
        Self::Triploid4,
        Self::Triploid5,
        Self::TriploidGt6,
    ];

    /// Token used in practice codes and per-class input maps.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Diploid225 => "diploid_225",
            Self::Diploid3 => "diploid_3",
            Self::Diploid4 => "diploid_4",
            Self::Diploid5 => "diploid_5",
            Self::DiploidGt6 => "diploid_gt_6",
            Self::Triploid225 => "triploid_225",
            Self::Triploid3 => "triploid_3",
            Self::Triploid4 => "triploid_4",
            Self::Triploid5 => "triploid_5",
            Self::TriploidGt6 => "triploid_gt_6",
        }
    }

    /// Parse a class token.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.code() == code)
    }

    const fn index(self) -> usize {
        self as usize
    }

    /// Default tissue dry weight per animal (g).
    pub const fn dry_weight(self) -> f64 {
        DRY_WEIGHT[self.index()]
    }

    /// Default nitrogen content per animal (g).
    pub const fn n_content(self) -> f64 {
        N_CONTENT[self.index()]
    }

    /// Default phosphorus content per animal (g).
    pub const fn p_content(self) -> f64 {
        P_CONTENT[self.index()]
    }
}

const DRY_WEIGHT: [f64; 10] = [0.63, 1.06, 1.81, 2.70, 3.74, 0.79, 1.56, 3.16, 5.33, 8.20];
const N_CONTENT: [f64; 10] = [0.05, 0.09, 0.15, 0.22, 0.31, 0.06, 0.13, 0.26, 0.44, 0.67];
const P_CONTENT: [f64; 10] = [0.01, 0.01, 0.02, 0.02, 0.03, 0.01, 0.01, 0.03, 0.05, 0.07];

/// Total N and P grams held in the tissue of every cohort in `units`.
pub fn tissue_grams(record: &PracticeRecord) -> (f64, f64) {
    let Some(units) = record.object("units") else {
        return (0.0, 0.0);
    };
    let weights = record.object("avg_tissue_dry_weight");
    SizeClass::ALL.iter().fold((0.0, 0.0), |(n, p), class| {
        let Some(animals) = units.get(class.code()).and_then(AttrValue::as_number) else {
            return (n, p);
        };
        let weight = weights
            .and_then(|w| w.get(class.code()))
            .and_then(AttrValue::as_number)
            .unwrap_or_else(|| class.dry_weight());
        let mass = animals * weight;
        (n + mass * TISSUE_N, p + mass * TISSUE_P)
    })
}

/// Nutrients assimilated into oyster tissue, per ploidy and size class.
#[derive(Debug, Default)]
pub struct OysterAquacultureCalculator;

impl Calculator for OysterAquacultureCalculator {
    fn code(&self) -> &'static str {
        "oyster_aquaculture"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        if let Some(class) = record.secondary_code().and_then(SizeClass::parse) {
            let animals = record.number("animal_units");
            return ReductionResult::new()
                .with("tn_lbs_reduced", class.n_content() * animals / GRAMS_PER_POUND)
                .with("tp_lbs_reduced", class.p_content() * animals / GRAMS_PER_POUND);
        }

        let (n_grams, p_grams) = tissue_grams(record);
        let mut result = ReductionResult::new();
        if n_grams != 0.0 {
            result.insert_number("tn_lbs_reduced", n_grams / GRAMS_PER_POUND);
        }
        if p_grams != 0.0 {
            result.insert_number("tp_lbs_reduced", p_grams / GRAMS_PER_POUND);
        }
        result
    }

    fn input_defaults(&self) -> PracticeRecord {
        let weights = SizeClass::ALL
            .iter()
            .map(|class| (class.code().to_string(), AttrValue::Float(class.dry_weight())))
            .collect();
        PracticeRecord::new().with("avg_tissue_dry_weight", AttrValue::Object(weights))
    }
}
