//! Profile classes from rating thresholds

use std::collections::BTreeMap;

/// A class computed from one profile rating
#[derive(Debug, Clone, Copy)]
pub struct ClassDeriver {
    pub name: &'static str,
    pub rating: &'static str,
    /// Descending by threshold; the last entry is the default tier
    pub thresholds: &'static [(f64, &'static str)],
}

impl ClassDeriver {
    /// First threshold met wins, below all of them is the lowest tier.
    /// An absent rating gives no class at all.
    pub fn derive(&self, ratings: &BTreeMap<String, Option<f64>>) -> Option<&'static str> {
        let rating = ratings.get(self.rating).copied().flatten()?;
        self.thresholds
            .iter()
            .find(|(min, _)| rating >= *min)
            .or_else(|| self.thresholds.last())
            .map(|(_, label)| *label)
    }
}

pub const SDVX_VF_CLASS: ClassDeriver = ClassDeriver {
    name: "vfClass",
    rating: "VF6",
    thresholds: &[
        (20.0, "IMPERIAL"),
        (19.0, "CRIMSON"),
        (18.0, "ELDORA"),
        (17.0, "ARGENTO"),
        (16.0, "CORAL"),
        (15.0, "SCARLET"),
        (14.0, "CYAN"),
        (12.0, "DANDELION"),
        (10.0, "COBALT"),
        (0.0, "SIENNA"),
    ],
};

pub const CHUNITHM_COLOUR: ClassDeriver = ClassDeriver {
    name: "colour",
    rating: "naiveRating",
    thresholds: &[
        (15.0, "RAINBOW"),
        (14.5, "PLATINUM"),
        (14.0, "GOLD"),
        (13.0, "SILVER"),
        (12.0, "COPPER"),
        (10.0, "PURPLE"),
        (7.0, "RED"),
        (4.0, "ORANGE"),
        (2.0, "GREEN"),
        (0.0, "BLUE"),
    ],
};

pub const WACCA_COLOUR: ClassDeriver = ClassDeriver {
    name: "colour",
    rating: "naiveRate",
    thresholds: &[
        (2500.0, "RAINBOW"),
        (2200.0, "GOLD"),
        (1900.0, "SILVER"),
        (1600.0, "BLUE"),
        (1300.0, "PURPLE"),
        (1000.0, "RED"),
        (600.0, "YELLOW"),
        (300.0, "NAVY"),
        (0.0, "ASH"),
    ],
};

pub const JUBEAT_COLOUR: ClassDeriver = ClassDeriver {
    name: "colour",
    rating: "jubility",
    thresholds: &[
        (9500.0, "GOLD"),
        (8500.0, "ORANGE"),
        (7000.0, "PINK"),
        (5500.0, "PURPLE"),
        (4000.0, "VIOLET"),
        (2500.0, "BLUE"),
        (1500.0, "LIGHT_BLUE"),
        (750.0, "GREEN"),
        (250.0, "YELLOW_GREEN"),
        (0.0, "BLACK"),
    ],
};

pub const GITADORA_COLOUR: ClassDeriver = ClassDeriver {
    name: "colour",
    rating: "naiveSkill",
    thresholds: &[
        (8500.0, "RAINBOW"),
        (8000.0, "GOLD"),
        (7500.0, "SILVER"),
        (7000.0, "BRONZE"),
        (6500.0, "RED_GRD"),
        (6000.0, "RED"),
        (5500.0, "PURPLE_GRD"),
        (5000.0, "PURPLE"),
        (4500.0, "BLUE_GRD"),
        (4000.0, "BLUE"),
        (3500.0, "GREEN_GRD"),
        (3000.0, "GREEN"),
        (2500.0, "YELLOW_GRD"),
        (2000.0, "YELLOW"),
        (1500.0, "ORANGE_GRD"),
        (1000.0, "ORANGE"),
        (0.0, "WHITE"),
    ],
};

pub const MAIMAIDX_COLOUR: ClassDeriver = ClassDeriver {
    name: "colour",
    rating: "naiveRate",
    thresholds: &[
        (15000.0, "RAINBOW"),
        (14500.0, "PLATINUM"),
        (14000.0, "GOLD"),
        (13000.0, "SILVER"),
        (12000.0, "BRONZE"),
        (10000.0, "PURPLE"),
        (7000.0, "RED"),
        (4000.0, "ORANGE"),
        (2000.0, "GREEN"),
        (1000.0, "BLUE"),
        (0.0, "WHITE"),
    ],
};

pub const POPN_CLASS: ClassDeriver = ClassDeriver {
    name: "class",
    rating: "naiveClassPoints",
    thresholds: &[
        (91.0, "GOD"),
        (79.0, "HERMIT"),
        (68.0, "GENERAL"),
        (59.0, "IDOL"),
        (46.0, "DETECTIVE"),
        (34.0, "DELINQUENT"),
        (21.0, "STUDENT"),
        (0.0, "KITTY"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(name: &str, value: Option<f64>) -> BTreeMap<String, Option<f64>> {
        BTreeMap::from([(name.to_string(), value)])
    }

    #[test]
    fn test_first_threshold_met_wins() {
        assert_eq!(CHUNITHM_COLOUR.derive(&ratings("naiveRating", Some(14.5))), Some("PLATINUM"));
        assert_eq!(CHUNITHM_COLOUR.derive(&ratings("naiveRating", Some(16.0))), Some("RAINBOW"));
        assert_eq!(CHUNITHM_COLOUR.derive(&ratings("naiveRating", Some(1.9))), Some("BLUE"));
    }

    #[test]
    fn test_below_all_is_lowest_tier() {
        assert_eq!(SDVX_VF_CLASS.derive(&ratings("VF6", Some(-1.0))), Some("SIENNA"));
    }

    #[test]
    fn test_absent_rating_gives_no_class() {
        assert_eq!(POPN_CLASS.derive(&ratings("naiveClassPoints", None)), None);
        assert_eq!(POPN_CLASS.derive(&BTreeMap::new()), None);
    }
}
