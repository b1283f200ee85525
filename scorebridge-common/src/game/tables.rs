//! Game-type configuration tables
//!
//! Enum domains are ordered worst to best; the position of a label is its
//! ordinal index. Grade tables are ascending by lower bound.

use super::config::{ClassSpec, GameTypeConfig, MergeStrategy, MetricSpec, PbMergeRule};
use super::grades::GradeBoundary;
use super::GameType;

// ============================================================================
// Enum domains
// ============================================================================

pub const IIDX_LAMPS: &[&str] = &[
    "NO PLAY",
    "FAILED",
    "ASSIST CLEAR",
    "EASY CLEAR",
    "CLEAR",
    "HARD CLEAR",
    "EX HARD CLEAR",
    "FULL COMBO",
];

/// BMS and PMS share the IIDX lamp ladder
pub const BMS_LAMPS: &[&str] = IIDX_LAMPS;

pub const IIDX_GRADES: &[&str] = &["F", "E", "D", "C", "B", "A", "AA", "AAA", "MAX-", "MAX"];

pub const SDVX_LAMPS: &[&str] = &[
    "FAILED",
    "CLEAR",
    "EXCESSIVE CLEAR",
    "ULTIMATE CHAIN",
    "PERFECT ULTIMATE CHAIN",
];

pub const SDVX_GRADES: &[&str] = &[
    "D", "C", "B", "A", "A+", "AA", "AA+", "AAA", "AAA+", "S", "PUC",
];

pub const CHUNITHM_LAMPS: &[&str] = &[
    "FAILED",
    "CLEAR",
    "FULL COMBO",
    "ALL JUSTICE",
    "ALL JUSTICE CRITICAL",
];

pub const CHUNITHM_GRADES: &[&str] = &[
    "D", "C", "B", "BB", "BBB", "A", "AA", "AAA", "S", "S+", "SS", "SS+", "SSS", "SSS+",
];

pub const WACCA_LAMPS: &[&str] = &["FAILED", "CLEAR", "MISSLESS", "FULL COMBO", "ALL MARVELOUS"];

pub const WACCA_GRADES: &[&str] = &[
    "D", "C", "B", "BB", "BBB", "A", "AA", "AAA", "S", "S+", "SS", "SS+", "SSS", "SSS+", "MASTER",
];

pub const JUBEAT_LAMPS: &[&str] = &["FAILED", "CLEAR", "FULL COMBO", "EXCELLENT"];

pub const JUBEAT_GRADES: &[&str] = &["E", "D", "C", "B", "A", "S", "SS", "SSS", "EXC"];

pub const GITADORA_LAMPS: &[&str] = &["FAILED", "CLEAR", "FULL COMBO", "EXCELLENT"];

pub const GITADORA_GRADES: &[&str] = &["C", "B", "A", "S", "SS", "MAX"];

pub const ITG_LAMPS: &[&str] = &[
    "FAILED",
    "CLEAR",
    "FULL COMBO",
    "FULL EXCELLENT COMBO",
    "QUAD",
    "QUINT",
];

pub const ITG_GRADES: &[&str] = &[
    "F", "D", "C-", "C", "C+", "B-", "B", "B+", "A-", "A", "A+", "S-", "S", "S+", "★", "★★", "★★★",
    "★★★★",
];

pub const MAIMAIDX_LAMPS: &[&str] = &[
    "FAILED",
    "CLEAR",
    "FULL COMBO",
    "FULL COMBO+",
    "ALL PERFECT",
    "ALL PERFECT+",
];

pub const MAIMAIDX_GRADES: &[&str] = &[
    "D", "C", "B", "BB", "BBB", "A", "AA", "AAA", "S", "S+", "SS", "SS+", "SSS", "SSS+",
];

pub const MUSECA_LAMPS: &[&str] = &["FAILED", "CLEAR", "CONNECT ALL", "PERFECT CONNECT ALL"];

pub const MUSECA_GRADES: &[&str] = &["没", "拙", "凡", "佳", "良", "優", "秀", "傑", "傑G"];

pub const POPN_CLEAR_MEDALS: &[&str] = &[
    "failedCircle",
    "failedDiamond",
    "failedStar",
    "easyClear",
    "clearCircle",
    "clearDiamond",
    "clearStar",
    "fullComboCircle",
    "fullComboDiamond",
    "fullComboStar",
    "perfect",
];

pub const POPN_LAMPS: &[&str] = &["FAILED", "EASY CLEAR", "CLEAR", "FULL COMBO", "PERFECT"];

pub const POPN_GRADES: &[&str] = &["E", "D", "C", "B", "A", "AA", "AAA", "S"];

// ============================================================================
// Grade boundaries
// ============================================================================

/// Percent of the maximum EX score (IIDX, BMS, PMS)
pub const IIDX_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("F", 0.0),
    GradeBoundary::new("E", 22.22),
    GradeBoundary::new("D", 33.33),
    GradeBoundary::new("C", 44.44),
    GradeBoundary::new("B", 55.55),
    GradeBoundary::new("A", 66.66),
    GradeBoundary::new("AA", 77.77),
    GradeBoundary::new("AAA", 88.88),
    GradeBoundary::new("MAX-", 94.44),
    GradeBoundary::new("MAX", 100.0),
];

pub const SDVX_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("D", 0.0),
    GradeBoundary::new("C", 7_000_000.0),
    GradeBoundary::new("B", 8_000_000.0),
    GradeBoundary::new("A", 8_700_000.0),
    GradeBoundary::new("A+", 9_000_000.0),
    GradeBoundary::new("AA", 9_300_000.0),
    GradeBoundary::new("AA+", 9_500_000.0),
    GradeBoundary::new("AAA", 9_700_000.0),
    GradeBoundary::new("AAA+", 9_800_000.0),
    GradeBoundary::new("S", 9_900_000.0),
    GradeBoundary::new("PUC", 10_000_000.0),
];

pub const CHUNITHM_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("D", 0.0),
    GradeBoundary::new("C", 500_000.0),
    GradeBoundary::new("B", 600_000.0),
    GradeBoundary::new("BB", 700_000.0),
    GradeBoundary::new("BBB", 800_000.0),
    GradeBoundary::new("A", 900_000.0),
    GradeBoundary::new("AA", 925_000.0),
    GradeBoundary::new("AAA", 950_000.0),
    GradeBoundary::new("S", 975_000.0),
    GradeBoundary::new("S+", 990_000.0),
    GradeBoundary::new("SS", 1_000_000.0),
    GradeBoundary::new("SS+", 1_005_000.0),
    GradeBoundary::new("SSS", 1_007_500.0),
    GradeBoundary::new("SSS+", 1_009_000.0),
];

pub const WACCA_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("D", 0.0),
    GradeBoundary::new("C", 1.0),
    GradeBoundary::new("B", 300_000.0),
    GradeBoundary::new("BB", 400_000.0),
    GradeBoundary::new("BBB", 500_000.0),
    GradeBoundary::new("A", 700_000.0),
    GradeBoundary::new("AA", 800_000.0),
    GradeBoundary::new("AAA", 850_000.0),
    GradeBoundary::new("S", 900_000.0),
    GradeBoundary::new("S+", 930_000.0),
    GradeBoundary::new("SS", 950_000.0),
    GradeBoundary::new("SS+", 970_000.0),
    GradeBoundary::new("SSS", 980_000.0),
    GradeBoundary::new("SSS+", 990_000.0),
    GradeBoundary::new("MASTER", 1_000_000.0),
];

pub const JUBEAT_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("E", 0.0),
    GradeBoundary::new("D", 500_000.0),
    GradeBoundary::new("C", 700_000.0),
    GradeBoundary::new("B", 800_000.0),
    GradeBoundary::new("A", 850_000.0),
    GradeBoundary::new("S", 900_000.0),
    GradeBoundary::new("SS", 950_000.0),
    GradeBoundary::new("SSS", 980_000.0),
    GradeBoundary::new("EXC", 1_000_000.0),
];

/// Percent based
pub const GITADORA_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("C", 0.0),
    GradeBoundary::new("B", 63.0),
    GradeBoundary::new("A", 73.0),
    GradeBoundary::new("S", 80.0),
    GradeBoundary::new("SS", 95.0),
    GradeBoundary::new("MAX", 100.0),
];

/// Score-percent based; "F" is only reachable through a failing lamp
pub const ITG_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("D", 0.0),
    GradeBoundary::new("C-", 55.0),
    GradeBoundary::new("C", 60.0),
    GradeBoundary::new("C+", 64.0),
    GradeBoundary::new("B-", 68.0),
    GradeBoundary::new("B", 72.0),
    GradeBoundary::new("B+", 76.0),
    GradeBoundary::new("A-", 80.0),
    GradeBoundary::new("A", 83.0),
    GradeBoundary::new("A+", 86.0),
    GradeBoundary::new("S-", 89.0),
    GradeBoundary::new("S", 92.0),
    GradeBoundary::new("S+", 94.0),
    GradeBoundary::new("★", 96.0),
    GradeBoundary::new("★★", 98.0),
    GradeBoundary::new("★★★", 99.0),
    GradeBoundary::new("★★★★", 100.0),
];

/// Percent based (0 - 101)
pub const MAIMAIDX_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("D", 0.0),
    GradeBoundary::new("C", 50.0),
    GradeBoundary::new("B", 60.0),
    GradeBoundary::new("BB", 70.0),
    GradeBoundary::new("BBB", 75.0),
    GradeBoundary::new("A", 80.0),
    GradeBoundary::new("AA", 90.0),
    GradeBoundary::new("AAA", 94.0),
    GradeBoundary::new("S", 97.0),
    GradeBoundary::new("S+", 98.0),
    GradeBoundary::new("SS", 99.0),
    GradeBoundary::new("SS+", 99.5),
    GradeBoundary::new("SSS", 100.0),
    GradeBoundary::new("SSS+", 100.5),
];

pub const MUSECA_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("没", 0.0),
    GradeBoundary::new("拙", 600_000.0),
    GradeBoundary::new("凡", 700_000.0),
    GradeBoundary::new("佳", 800_000.0),
    GradeBoundary::new("良", 850_000.0),
    GradeBoundary::new("優", 900_000.0),
    GradeBoundary::new("秀", 950_000.0),
    GradeBoundary::new("傑", 975_000.0),
    GradeBoundary::new("傑G", 1_000_000.0),
];

pub const POPN_GBOUNDARIES: &[GradeBoundary] = &[
    GradeBoundary::new("E", 0.0),
    GradeBoundary::new("D", 50_000.0),
    GradeBoundary::new("C", 62_000.0),
    GradeBoundary::new("B", 72_000.0),
    GradeBoundary::new("A", 82_000.0),
    GradeBoundary::new("AA", 90_000.0),
    GradeBoundary::new("AAA", 95_000.0),
    GradeBoundary::new("S", 98_000.0),
];

// ============================================================================
// Shared fragments
// ============================================================================

const BEST_LAMP: PbMergeRule = PbMergeRule {
    name: "Best Lamp",
    strategy: MergeStrategy::Largest,
    metric: "lamp",
    fields: &["lamp"],
};

const IIDX_LIKE_MERGES: &[PbMergeRule] = &[
    BEST_LAMP,
    PbMergeRule {
        name: "Lowest BP",
        strategy: MergeStrategy::Smallest,
        metric: "optional.bp",
        fields: &["optional.bp"],
    },
];

const IIDX_LIKE_PROVIDED: &[MetricSpec] = &[
    MetricSpec::integer("score", 0, None),
    MetricSpec::enumerated("lamp", IIDX_LAMPS),
];

const IIDX_LIKE_DERIVED: &[MetricSpec] = &[
    MetricSpec::decimal("percent", 0.0, Some(100.0)),
    MetricSpec::enumerated("grade", IIDX_GRADES),
];

const IIDX_LIKE_OPTIONAL: &[MetricSpec] = &[
    MetricSpec::integer("bp", 0, None),
    MetricSpec::integer("fast", 0, None),
    MetricSpec::integer("slow", 0, None),
    MetricSpec::integer("maxCombo", 0, None),
    MetricSpec::decimal("gauge", 0.0, Some(100.0)),
];

const IIDX_LIKE_JUDGEMENTS: &[&str] = &["pgreat", "great", "good", "bad", "poor"];

const SDVX_LIKE_PROVIDED: &[MetricSpec] = &[
    MetricSpec::integer("score", 0, Some(10_000_000)),
    MetricSpec::enumerated("lamp", SDVX_LAMPS),
];

const SDVX_LIKE_DERIVED: &[MetricSpec] = &[MetricSpec::enumerated("grade", SDVX_GRADES)];

const SDVX_LIKE_OPTIONAL: &[MetricSpec] = &[
    MetricSpec::decimal("gauge", 0.0, Some(100.0)),
    MetricSpec::integer("maxCombo", 0, None),
    MetricSpec::integer("exScore", 0, None),
];

const SDVX_LIKE_JUDGEMENTS: &[&str] = &["critical", "near", "miss"];

const MEAN_RATING: &[&str] = &["naiveRating"];

// ============================================================================
// Game-type configurations
// ============================================================================

static IIDX_SP: GameTypeConfig = GameTypeConfig {
    game_type: GameType::IidxSp,
    difficulties: &["BEGINNER", "NORMAL", "HYPER", "ANOTHER", "LEGGENDARIA"],
    provided_metrics: IIDX_LIKE_PROVIDED,
    derived_metrics: IIDX_LIKE_DERIVED,
    optional_metrics: IIDX_LIKE_OPTIONAL,
    judgements: IIDX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: IIDX_LIKE_MERGES,
    score_ratings: &["ktLampRating"],
    session_ratings: &["ktLampRating"],
    profile_ratings: &["ktLampRating"],
    classes: &[],
};

static IIDX_DP: GameTypeConfig = GameTypeConfig {
    game_type: GameType::IidxDp,
    difficulties: &["NORMAL", "HYPER", "ANOTHER", "LEGGENDARIA"],
    provided_metrics: IIDX_LIKE_PROVIDED,
    derived_metrics: IIDX_LIKE_DERIVED,
    optional_metrics: IIDX_LIKE_OPTIONAL,
    judgements: IIDX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: IIDX_LIKE_MERGES,
    score_ratings: &["ktLampRating"],
    session_ratings: &["ktLampRating"],
    profile_ratings: &["ktLampRating"],
    classes: &[],
};

static BMS_7K: GameTypeConfig = GameTypeConfig {
    game_type: GameType::Bms7K,
    difficulties: &["CHART"],
    provided_metrics: IIDX_LIKE_PROVIDED,
    derived_metrics: IIDX_LIKE_DERIVED,
    optional_metrics: IIDX_LIKE_OPTIONAL,
    judgements: IIDX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: IIDX_LIKE_MERGES,
    score_ratings: &["sieglinde"],
    session_ratings: &["sieglinde"],
    profile_ratings: &["sieglinde"],
    classes: &[],
};

static BMS_14K: GameTypeConfig = GameTypeConfig {
    game_type: GameType::Bms14K,
    difficulties: &["CHART"],
    provided_metrics: IIDX_LIKE_PROVIDED,
    derived_metrics: IIDX_LIKE_DERIVED,
    optional_metrics: IIDX_LIKE_OPTIONAL,
    judgements: IIDX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: IIDX_LIKE_MERGES,
    score_ratings: &["sieglinde"],
    session_ratings: &["sieglinde"],
    profile_ratings: &["sieglinde"],
    classes: &[],
};

static PMS_CONTROLLER: GameTypeConfig = GameTypeConfig {
    game_type: GameType::PmsController,
    difficulties: &["CHART"],
    provided_metrics: IIDX_LIKE_PROVIDED,
    derived_metrics: IIDX_LIKE_DERIVED,
    optional_metrics: IIDX_LIKE_OPTIONAL,
    judgements: IIDX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: IIDX_LIKE_MERGES,
    score_ratings: &["sieglinde"],
    session_ratings: &["sieglinde"],
    profile_ratings: &["sieglinde"],
    classes: &[],
};

static PMS_KEYBOARD: GameTypeConfig = GameTypeConfig {
    game_type: GameType::PmsKeyboard,
    difficulties: &["CHART"],
    provided_metrics: IIDX_LIKE_PROVIDED,
    derived_metrics: IIDX_LIKE_DERIVED,
    optional_metrics: IIDX_LIKE_OPTIONAL,
    judgements: IIDX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: IIDX_LIKE_MERGES,
    score_ratings: &["sieglinde"],
    session_ratings: &["sieglinde"],
    profile_ratings: &["sieglinde"],
    classes: &[],
};

static SDVX_SINGLE: GameTypeConfig = GameTypeConfig {
    game_type: GameType::SdvxSingle,
    difficulties: &["NOV", "ADV", "EXH", "ANY_INF", "MXM"],
    provided_metrics: SDVX_LIKE_PROVIDED,
    derived_metrics: SDVX_LIKE_DERIVED,
    optional_metrics: SDVX_LIKE_OPTIONAL,
    judgements: SDVX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["VF6"],
    session_ratings: &["VF6"],
    profile_ratings: &["VF6"],
    classes: &[ClassSpec {
        name: "vfClass",
        values: &[
            "SIENNA", "COBALT", "DANDELION", "CYAN", "SCARLET", "CORAL", "ARGENTO", "ELDORA",
            "CRIMSON", "IMPERIAL",
        ],
    }],
};

static USC_CONTROLLER: GameTypeConfig = GameTypeConfig {
    game_type: GameType::UscController,
    difficulties: &["NOV", "ADV", "EXH", "INF"],
    provided_metrics: SDVX_LIKE_PROVIDED,
    derived_metrics: SDVX_LIKE_DERIVED,
    optional_metrics: SDVX_LIKE_OPTIONAL,
    judgements: SDVX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["VF6"],
    session_ratings: &["VF6"],
    profile_ratings: &["VF6"],
    classes: &[],
};

static USC_KEYBOARD: GameTypeConfig = GameTypeConfig {
    game_type: GameType::UscKeyboard,
    difficulties: &["NOV", "ADV", "EXH", "INF"],
    provided_metrics: SDVX_LIKE_PROVIDED,
    derived_metrics: SDVX_LIKE_DERIVED,
    optional_metrics: SDVX_LIKE_OPTIONAL,
    judgements: SDVX_LIKE_JUDGEMENTS,
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["VF6"],
    session_ratings: &["VF6"],
    profile_ratings: &["VF6"],
    classes: &[],
};

static CHUNITHM_SINGLE: GameTypeConfig = GameTypeConfig {
    game_type: GameType::ChunithmSingle,
    difficulties: &["BASIC", "ADVANCED", "EXPERT", "MASTER", "ULTIMA"],
    provided_metrics: &[
        MetricSpec::integer("score", 0, Some(1_010_000)),
        MetricSpec::enumerated("lamp", CHUNITHM_LAMPS),
    ],
    derived_metrics: &[MetricSpec::enumerated("grade", CHUNITHM_GRADES)],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["jcrit", "justice", "attack", "miss"],
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["rating"],
    session_ratings: MEAN_RATING,
    profile_ratings: MEAN_RATING,
    classes: &[ClassSpec {
        name: "colour",
        values: &[
            "BLUE", "GREEN", "ORANGE", "RED", "PURPLE", "COPPER", "SILVER", "GOLD", "PLATINUM",
            "RAINBOW",
        ],
    }],
};

static WACCA_SINGLE: GameTypeConfig = GameTypeConfig {
    game_type: GameType::WaccaSingle,
    difficulties: &["NORMAL", "HARD", "EXPERT", "INFERNO"],
    provided_metrics: &[
        MetricSpec::integer("score", 0, Some(1_000_000)),
        MetricSpec::enumerated("lamp", WACCA_LAMPS),
    ],
    derived_metrics: &[MetricSpec::enumerated("grade", WACCA_GRADES)],
    optional_metrics: &[MetricSpec::integer("fast", 0, None), MetricSpec::integer("slow", 0, None)],
    judgements: &["marvelous", "great", "good", "miss"],
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["rate"],
    session_ratings: &["naiveRate"],
    profile_ratings: &["naiveRate"],
    classes: &[ClassSpec {
        name: "colour",
        values: &[
            "ASH", "NAVY", "YELLOW", "RED", "PURPLE", "BLUE", "SILVER", "GOLD", "RAINBOW",
        ],
    }],
};

static JUBEAT_SINGLE: GameTypeConfig = GameTypeConfig {
    game_type: GameType::JubeatSingle,
    difficulties: &["BSC", "ADV", "EXT", "HARD BSC", "HARD ADV", "HARD EXT"],
    provided_metrics: &[
        MetricSpec::integer("score", 0, Some(1_000_000)),
        MetricSpec::decimal("musicRate", 0.0, Some(120.0)),
        MetricSpec::enumerated("lamp", JUBEAT_LAMPS),
    ],
    derived_metrics: &[MetricSpec::enumerated("grade", JUBEAT_GRADES)],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["perfect", "great", "good", "poor", "miss"],
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[
        BEST_LAMP,
        PbMergeRule {
            name: "Best Music Rate",
            strategy: MergeStrategy::Largest,
            metric: "musicRate",
            fields: &["musicRate"],
        },
    ],
    score_ratings: &["jubility"],
    session_ratings: &["jubility"],
    profile_ratings: &["jubility"],
    classes: &[ClassSpec {
        name: "colour",
        values: &[
            "BLACK",
            "YELLOW_GREEN",
            "GREEN",
            "LIGHT_BLUE",
            "BLUE",
            "VIOLET",
            "PURPLE",
            "PINK",
            "ORANGE",
            "GOLD",
        ],
    }],
};

const GITADORA_COLOURS: &[&str] = &[
    "WHITE",
    "ORANGE",
    "ORANGE_GRD",
    "YELLOW",
    "YELLOW_GRD",
    "GREEN",
    "GREEN_GRD",
    "BLUE",
    "BLUE_GRD",
    "PURPLE",
    "PURPLE_GRD",
    "RED",
    "RED_GRD",
    "BRONZE",
    "SILVER",
    "GOLD",
    "RAINBOW",
];

const GITADORA_PROVIDED: &[MetricSpec] = &[
    MetricSpec::decimal("percent", 0.0, Some(100.0)),
    MetricSpec::enumerated("lamp", GITADORA_LAMPS),
];

static GITADORA_GITA: GameTypeConfig = GameTypeConfig {
    game_type: GameType::GitadoraGita,
    difficulties: &[
        "BASIC",
        "ADVANCED",
        "EXTREME",
        "MASTER",
        "BASS BASIC",
        "BASS ADVANCED",
        "BASS EXTREME",
        "BASS MASTER",
    ],
    provided_metrics: GITADORA_PROVIDED,
    derived_metrics: &[MetricSpec::enumerated("grade", GITADORA_GRADES)],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["perfect", "great", "good", "ok", "miss"],
    default_metric: "percent",
    default_merge_ref_name: "Best Percent",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["skill"],
    session_ratings: &["skill"],
    profile_ratings: &["naiveSkill"],
    classes: &[ClassSpec {
        name: "colour",
        values: GITADORA_COLOURS,
    }],
};

static GITADORA_DORA: GameTypeConfig = GameTypeConfig {
    game_type: GameType::GitadoraDora,
    difficulties: &["BASIC", "ADVANCED", "EXTREME", "MASTER"],
    provided_metrics: GITADORA_PROVIDED,
    derived_metrics: &[MetricSpec::enumerated("grade", GITADORA_GRADES)],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["perfect", "great", "good", "ok", "miss"],
    default_metric: "percent",
    default_merge_ref_name: "Best Percent",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["skill"],
    session_ratings: &["skill"],
    profile_ratings: &["naiveSkill"],
    classes: &[ClassSpec {
        name: "colour",
        values: GITADORA_COLOURS,
    }],
};

static ITG_STAMINA: GameTypeConfig = GameTypeConfig {
    game_type: GameType::ItgStamina,
    difficulties: &["Beginner", "Easy", "Medium", "Hard", "Expert", "Edit"],
    provided_metrics: &[
        MetricSpec::decimal("scorePercent", 0.0, Some(100.0)),
        MetricSpec::decimal("survivedPercent", 0.0, Some(100.0)),
        MetricSpec::enumerated("lamp", ITG_LAMPS),
    ],
    derived_metrics: &[
        MetricSpec::decimal("finalPercent", 0.0, Some(200.0)),
        MetricSpec::enumerated("grade", ITG_GRADES),
    ],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["fantastic", "excellent", "great", "decent", "wayoff", "miss"],
    default_metric: "derived.finalPercent",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["blockRating"],
    session_ratings: &["blockRating"],
    profile_ratings: &["highestBlock"],
    classes: &[],
};

static MAIMAIDX_SINGLE: GameTypeConfig = GameTypeConfig {
    game_type: GameType::MaimaidxSingle,
    difficulties: &[
        "Basic",
        "Advanced",
        "Expert",
        "Master",
        "Re:Master",
        "DX Basic",
        "DX Advanced",
        "DX Expert",
        "DX Master",
        "DX Re:Master",
    ],
    provided_metrics: &[
        MetricSpec::decimal("percent", 0.0, Some(101.0)),
        MetricSpec::enumerated("lamp", MAIMAIDX_LAMPS),
    ],
    derived_metrics: &[MetricSpec::enumerated("grade", MAIMAIDX_GRADES)],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["pcrit", "perfect", "great", "good", "miss"],
    default_metric: "percent",
    default_merge_ref_name: "Best Percent",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["rate"],
    session_ratings: &["naiveRate"],
    profile_ratings: &["naiveRate"],
    classes: &[ClassSpec {
        name: "colour",
        values: &[
            "WHITE", "BLUE", "GREEN", "ORANGE", "RED", "PURPLE", "BRONZE", "SILVER", "GOLD",
            "PLATINUM", "RAINBOW",
        ],
    }],
};

static MUSECA_SINGLE: GameTypeConfig = GameTypeConfig {
    game_type: GameType::MusecaSingle,
    difficulties: &["Green", "Yellow", "Red"],
    provided_metrics: &[
        MetricSpec::integer("score", 0, Some(1_000_000)),
        MetricSpec::enumerated("lamp", MUSECA_LAMPS),
    ],
    derived_metrics: &[MetricSpec::enumerated("grade", MUSECA_GRADES)],
    optional_metrics: &[MetricSpec::integer("maxCombo", 0, None)],
    judgements: &["critical", "near", "miss"],
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[BEST_LAMP],
    score_ratings: &["curatorSkill"],
    session_ratings: &["curatorSkill"],
    profile_ratings: &["curatorSkill"],
    classes: &[],
};

static POPN_9B: GameTypeConfig = GameTypeConfig {
    game_type: GameType::Popn9B,
    difficulties: &["Easy", "Normal", "Hyper", "EX"],
    provided_metrics: &[
        MetricSpec::integer("score", 0, Some(100_000)),
        MetricSpec::enumerated("clearMedal", POPN_CLEAR_MEDALS),
    ],
    derived_metrics: &[
        MetricSpec::enumerated("lamp", POPN_LAMPS),
        MetricSpec::enumerated("grade", POPN_GRADES),
    ],
    optional_metrics: &[
        MetricSpec::decimal("gauge", 0.0, Some(100.0)),
        MetricSpec::integer("maxCombo", 0, None),
    ],
    judgements: &["cool", "great", "good", "bad"],
    default_metric: "score",
    default_merge_ref_name: "Best Score",
    pb_merge_rules: &[PbMergeRule {
        name: "Best Clear",
        strategy: MergeStrategy::Largest,
        metric: "clearMedal",
        fields: &["clearMedal", "derived.lamp"],
    }],
    score_ratings: &["classPoints"],
    session_ratings: &["classPoints"],
    profile_ratings: &["naiveClassPoints"],
    classes: &[ClassSpec {
        name: "class",
        values: &[
            "KITTY",
            "STUDENT",
            "DELINQUENT",
            "DETECTIVE",
            "IDOL",
            "GENERAL",
            "HERMIT",
            "GOD",
        ],
    }],
};

/// Exhaustive game-type → configuration table
pub fn config_for(game_type: GameType) -> &'static GameTypeConfig {
    match game_type {
        GameType::IidxSp => &IIDX_SP,
        GameType::IidxDp => &IIDX_DP,
        GameType::Bms7K => &BMS_7K,
        GameType::Bms14K => &BMS_14K,
        GameType::PmsController => &PMS_CONTROLLER,
        GameType::PmsKeyboard => &PMS_KEYBOARD,
        GameType::SdvxSingle => &SDVX_SINGLE,
        GameType::UscController => &USC_CONTROLLER,
        GameType::UscKeyboard => &USC_KEYBOARD,
        GameType::ChunithmSingle => &CHUNITHM_SINGLE,
        GameType::WaccaSingle => &WACCA_SINGLE,
        GameType::JubeatSingle => &JUBEAT_SINGLE,
        GameType::GitadoraGita => &GITADORA_GITA,
        GameType::GitadoraDora => &GITADORA_DORA,
        GameType::ItgStamina => &ITG_STAMINA,
        GameType::MaimaidxSingle => &MAIMAIDX_SINGLE,
        GameType::MusecaSingle => &MUSECA_SINGLE,
        GameType::Popn9B => &POPN_9B,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::MetricKind;

    fn all_boundary_tables() -> Vec<(&'static [GradeBoundary], &'static [&'static str])> {
        vec![
            (IIDX_GBOUNDARIES, IIDX_GRADES),
            (SDVX_GBOUNDARIES, SDVX_GRADES),
            (CHUNITHM_GBOUNDARIES, CHUNITHM_GRADES),
            (WACCA_GBOUNDARIES, WACCA_GRADES),
            (JUBEAT_GBOUNDARIES, JUBEAT_GRADES),
            (GITADORA_GBOUNDARIES, GITADORA_GRADES),
            (ITG_GBOUNDARIES, ITG_GRADES),
            (MAIMAIDX_GBOUNDARIES, MAIMAIDX_GRADES),
            (MUSECA_GBOUNDARIES, MUSECA_GRADES),
            (POPN_GBOUNDARIES, POPN_GRADES),
        ]
    }

    #[test]
    fn test_boundaries_ascending_and_declared() {
        for (table, grades) in all_boundary_tables() {
            for pair in table.windows(2) {
                assert!(
                    pair[0].lower_bound < pair[1].lower_bound,
                    "{} must sit below {}",
                    pair[0].name,
                    pair[1].name
                );
            }
            for boundary in table {
                assert!(
                    grades.contains(&boundary.name),
                    "grade {} missing from its enum domain",
                    boundary.name
                );
            }
        }
    }

    #[test]
    fn test_config_table_matches_game_type() {
        for gt in GameType::ALL {
            let config = config_for(gt);
            assert_eq!(config.game_type, gt);
            assert!(!config.provided_metrics.is_empty());
            assert!(!config.difficulties.is_empty());
            assert!(!config.score_ratings.is_empty());
        }
    }

    #[test]
    fn test_enum_domains_have_unique_labels() {
        for gt in GameType::ALL {
            let config = config_for(gt);
            let specs = config
                .provided_metrics
                .iter()
                .chain(config.derived_metrics)
                .chain(config.optional_metrics);

            for spec in specs {
                if let MetricKind::Enum { values } = spec.kind {
                    for (i, v) in values.iter().enumerate() {
                        assert_eq!(
                            values.iter().position(|o| o == v),
                            Some(i),
                            "{} {} repeats '{}'",
                            gt,
                            spec.name,
                            v
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_enum_value_lookup() {
        let config = config_for(GameType::IidxSp);
        let hc = config.enum_value("lamp", "HARD CLEAR").unwrap();
        assert_eq!(hc.index, 5);
        assert!(config.enum_value("lamp", "SUPER CLEAR").is_err());
        assert!(config.enum_value("score", "1").is_err());
        assert!(config.enum_value("nope", "1").is_err());
    }
}
