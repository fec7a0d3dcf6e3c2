//! Session field names the pipeline reads or writes directly.

pub const PIZZA_STYLE_ID: &str = "pizza_style_id";
pub const OVEN_TYPE: &str = "oven_type";
pub const FLOUR_BLEND_ID: &str = "flour_blend_id";
pub const WARNINGS_ENABLED: &str = "warnings_enabled";

// Target sizing
pub const TARGET_PIZZA_COUNT: &str = "target_pizza_count";
pub const DOUGH_UNIT_WEIGHT_G: &str = "dough_unit_weight_g";
pub const PAN_AREA_CM2: &str = "pan_area_cm2";
pub const DOUGH_GRAMS_PER_CM2: &str = "dough_grams_per_cm2";
pub const TARGET_TOTAL_DOUGH_G: &str = "target_total_dough_g";
pub const MAX_BATCH_DOUGH_G: &str = "max_batch_dough_g";

// Baker's percentages
pub const HYDRATION_PERCENT: &str = "hydration_percent";
pub const SALT_PERCENT: &str = "salt_percent";
pub const OIL_PERCENT: &str = "oil_percent";
pub const HONEY_PERCENT: &str = "honey_percent";
pub const SUGAR_PERCENT: &str = "sugar_percent";
pub const DIASTATIC_MALT_PERCENT: &str = "diastatic_malt_percent";
pub const YEAST_PERCENT: &str = "yeast_percent";

// Preferment
pub const PREFERMENT_ENABLED: &str = "preferment_enabled";
pub const PREFERMENT_FLOUR_PERCENT: &str = "preferment_flour_percent";
pub const PREFERMENT_HYDRATION_PERCENT: &str = "preferment_hydration_percent";
pub const POOLISH_SHARE_PERCENT: &str = "poolish_share_percent";
pub const BIGA_SHARE_PERCENT: &str = "biga_share_percent";
pub const POOLISH_HYDRATION_PERCENT: &str = "poolish_hydration_percent";
pub const BIGA_HYDRATION_PERCENT: &str = "biga_hydration_percent";

// Starter
pub const STARTER_ENABLED: &str = "starter_enabled";
pub const STARTER_INOCULATION_PERCENT: &str = "starter_inoculation_percent";
pub const STARTER_HYDRATION_PERCENT: &str = "starter_hydration_percent";
