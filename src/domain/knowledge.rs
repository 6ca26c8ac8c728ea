//! Disease knowledge base.
//!
//! One static [`DiseaseRecord`] per [`ClassLabel`], including the healthy
//! pseudo-category. [`lookup`] is an exhaustive `match`, so adding a label
//! without a record is a compile error rather than a runtime gap.

use crate::domain::labels::ClassLabel;
use serde::Serialize;
use std::fmt;

/// How damaging a condition is, ordered from harmless to devastating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    None,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Severity {
    /// Display string, e.g. `"Very High"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad pathogen group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseCategory {
    Bacterial,
    Fungal,
    Viral,
    Pest,
    Healthy,
}

impl DiseaseCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiseaseCategory::Bacterial => "bacterial",
            DiseaseCategory::Fungal => "fungal",
            DiseaseCategory::Viral => "viral",
            DiseaseCategory::Pest => "pest",
            DiseaseCategory::Healthy => "healthy",
        }
    }
}

impl fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Management guidance split into two headed groups.
///
/// For diseases the groups are cultural and chemical control; for the
/// healthy class they are preventive care and general practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interventions {
    pub primary_heading: &'static str,
    pub primary: &'static [&'static str],
    pub secondary_heading: &'static str,
    pub secondary: &'static [&'static str],
}

impl Interventions {
    /// Renders both groups as plain text: a heading line followed by one
    /// `- ` bullet per step, groups separated by a blank line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, (heading, steps)) in [
            (self.primary_heading, self.primary),
            (self.secondary_heading, self.secondary),
        ]
        .into_iter()
        .enumerate()
        {
            if i > 0 {
                out.push_str("\n\n");
            }
            out.push_str(heading);
            out.push(':');
            for step in steps {
                out.push_str("\n- ");
                out.push_str(step);
            }
        }
        out
    }
}

/// Descriptive metadata for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseRecord {
    pub label: ClassLabel,
    pub scientific_name: &'static str,
    /// Free-text pathogen type, e.g. "Oomycete (fungus-like pathogen)".
    pub kind: &'static str,
    pub category: DiseaseCategory,
    pub symptoms: &'static str,
    pub interventions: Interventions,
    pub severity: Severity,
}

const CULTURAL: &str = "Cultural Control";
const CHEMICAL: &str = "Chemical Control";

static BACTERIAL_SPOT: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::BacterialSpot,
    scientific_name: "Xanthomonas campestris pv. vesicatoria",
    kind: "Bacterial disease",
    category: DiseaseCategory::Bacterial,
    symptoms: "Small, dark brown to black, greasy-looking spots on leaves with yellow halos. Spots may coalesce, causing leaf yellowing and drop.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Use certified disease-free seeds and transplants",
            "Remove infected leaves immediately",
            "Avoid overhead irrigation",
            "Rotate crops with non-host plants",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply copper-based bactericides at first sign of disease",
            "Use streptomycin sulfate for severe infections",
        ],
    },
    severity: Severity::Medium,
};

static EARLY_BLIGHT: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::EarlyBlight,
    scientific_name: "Alternaria solani",
    kind: "Fungal disease",
    category: DiseaseCategory::Fungal,
    symptoms: "Dark brown to black concentric rings (target spots) on older leaves with yellow halos around lesions, leading to leaf drop.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Remove infected plant debris after harvest",
            "Rotate crops with non-solanaceous plants for 2-3 years",
            "Space plants for good air circulation",
            "Water at soil level, avoid wetting foliage",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply chlorothalonil or mancozeb preventively",
            "Use azoxystrobin for curative treatment",
        ],
    },
    severity: Severity::High,
};

static LATE_BLIGHT: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::LateBlight,
    scientific_name: "Phytophthora infestans",
    kind: "Oomycete (fungus-like pathogen)",
    category: DiseaseCategory::Fungal,
    symptoms: "Large, irregular, water-soaked spots on leaves that turn dark brown/black. Rapid leaf collapse and plant death in severe cases.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Use certified disease-free transplants",
            "Remove and destroy infected plants immediately",
            "Avoid cull piles near production fields",
            "Ensure good air circulation",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply chlorothalonil or mancozeb preventively",
            "Use mefenoxam or dimethomorph for active infections",
            "Spray every 5-7 days during favorable conditions",
        ],
    },
    severity: Severity::VeryHigh,
};

static LEAF_MOLD: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::LeafMold,
    scientific_name: "Passalora fulva",
    kind: "Fungal disease",
    category: DiseaseCategory::Fungal,
    symptoms: "Pale green to yellow spots on upper leaf surface with olive-green to grayish-purple fuzzy mold growth on undersides.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Maintain low humidity and good ventilation",
            "Avoid overhead irrigation",
            "Remove and destroy affected leaves",
            "Space plants adequately",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply chlorothalonil or mancozeb",
            "Use azoxystrobin or boscalid for severe cases",
        ],
    },
    severity: Severity::Medium,
};

static SEPTORIA_LEAF_SPOT: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::SeptoriaLeafSpot,
    scientific_name: "Septoria lycopersici",
    kind: "Fungal disease",
    category: DiseaseCategory::Fungal,
    symptoms: "Small, circular spots (2-3 mm) with dark brown borders and tan centers. Multiple spots cause leaves to turn yellow and drop.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Remove and destroy infected leaves",
            "Rotate crops with non-solanaceous plants",
            "Avoid working in fields when wet",
            "Use drip irrigation",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply chlorothalonil preventively",
            "Use azoxystrobin for active infections",
        ],
    },
    severity: Severity::Medium,
};

static SPIDER_MITE: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::TwoSpottedSpiderMite,
    scientific_name: "Tetranychus urticae",
    kind: "Mite (arthropod pest)",
    category: DiseaseCategory::Pest,
    symptoms: "Tiny yellow or white speckling on upper leaf surface. Fine webbing on undersides of leaves, especially when populations are high.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Maintain adequate irrigation and humidity",
            "Avoid water stress on plants",
            "Remove weeds that host mites",
            "Release predatory mites (Phytoseiulus persimilis)",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Avoid broad-spectrum insecticides that kill beneficials",
            "Use selective miticides like abamectin or spiromesifen",
        ],
    },
    severity: Severity::Medium,
};

static TARGET_SPOT: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::TargetSpot,
    scientific_name: "Corynespora cassiicola",
    kind: "Fungal disease",
    category: DiseaseCategory::Fungal,
    symptoms: "Circular or irregular brown lesions with concentric rings (target pattern). Severely affected leaves turn yellow and drop.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Avoid overhead irrigation and wet foliage",
            "Improve air circulation through pruning",
            "Remove infected plant material",
            "Rotate with non-host crops",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply chlorothalonil preventively",
            "Use strobilurin fungicides for control",
        ],
    },
    severity: Severity::Medium,
};

static YELLOW_LEAF_CURL_VIRUS: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::YellowLeafCurlVirus,
    scientific_name: "Tomato yellow leaf curl virus (TYLCV)",
    kind: "Viral disease",
    category: DiseaseCategory::Viral,
    symptoms: "Severe stunting with small, upward-curling leaves that turn yellow. Reduced leaf size and interveinal chlorosis.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Remove and destroy infected plants immediately",
            "Control whitefly vector populations",
            "Use virus-free seedlings",
            "Install yellow sticky traps for monitoring",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "Apply insecticides to control whiteflies (imidacloprid, pyriproxyfen)",
            "Use reflective mulches to deter whiteflies",
        ],
    },
    severity: Severity::VeryHigh,
};

static MOSAIC_VIRUS: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::MosaicVirus,
    scientific_name: "Tomato mosaic virus (ToMV)",
    kind: "Viral disease",
    category: DiseaseCategory::Viral,
    symptoms: "Light and dark green mottling ('mosaic') on leaves. Leaves may be distorted, fern-like, or smaller than normal.",
    interventions: Interventions {
        primary_heading: CULTURAL,
        primary: &[
            "Use certified virus-free seeds and transplants",
            "Disinfect tools and hands after handling infected plants",
            "Avoid tobacco use when handling tomatoes",
            "Remove infected plants",
        ],
        secondary_heading: CHEMICAL,
        secondary: &[
            "No chemical cure for virus",
            "Focus on prevention and cultural control",
        ],
    },
    severity: Severity::High,
};

static HEALTHY: DiseaseRecord = DiseaseRecord {
    label: ClassLabel::Healthy,
    scientific_name: "No pathogen detected",
    kind: "Healthy",
    category: DiseaseCategory::Healthy,
    symptoms: "No visible disease symptoms. Leaves are uniform green color with normal growth pattern.",
    interventions: Interventions {
        primary_heading: "Preventive Care",
        primary: &[
            "Maintain proper watering (avoid overwatering)",
            "Provide adequate nutrition and fertilization",
            "Ensure good soil drainage",
            "Monitor plants regularly for early signs of stress",
        ],
        secondary_heading: "Best Practices",
        secondary: &[
            "Practice crop rotation",
            "Maintain garden hygiene",
            "Use clean tools and equipment",
        ],
    },
    severity: Severity::None,
};

/// Record for `label`. Total over every label.
pub fn lookup(label: ClassLabel) -> &'static DiseaseRecord {
    match label {
        ClassLabel::BacterialSpot => &BACTERIAL_SPOT,
        ClassLabel::EarlyBlight => &EARLY_BLIGHT,
        ClassLabel::LateBlight => &LATE_BLIGHT,
        ClassLabel::LeafMold => &LEAF_MOLD,
        ClassLabel::SeptoriaLeafSpot => &SEPTORIA_LEAF_SPOT,
        ClassLabel::TwoSpottedSpiderMite => &SPIDER_MITE,
        ClassLabel::TargetSpot => &TARGET_SPOT,
        ClassLabel::YellowLeafCurlVirus => &YELLOW_LEAF_CURL_VIRUS,
        ClassLabel::MosaicVirus => &MOSAIC_VIRUS,
        ClassLabel::Healthy => &HEALTHY,
    }
}

/// Record for a display name such as `"Late Blight"`; `None` for names that
/// are not class labels.
pub fn lookup_name(name: &str) -> Option<&'static DiseaseRecord> {
    name.parse::<ClassLabel>().ok().map(lookup)
}

/// Every record, in [`ClassLabel::ALL`] order.
pub fn all() -> impl Iterator<Item = &'static DiseaseRecord> {
    ClassLabel::ALL.into_iter().map(lookup)
}
