//! Pizza styles and their target-sizing defaults.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PizzaStyle {
    NeapolitanRound,
    PanPizza,
    Focaccia,
    PizzaRossa,
}

/// Default pizza count and dough ball weight for a style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSizing {
    pub target_pizza_count: f64,
    pub dough_unit_weight_g: f64,
}

impl PizzaStyle {
    pub const ALL: &'static [Self] = &[
        Self::NeapolitanRound,
        Self::PanPizza,
        Self::Focaccia,
        Self::PizzaRossa,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::NeapolitanRound => "neapolitan_round",
            Self::PanPizza => "pan_pizza",
            Self::Focaccia => "focaccia",
            Self::PizzaRossa => "pizza_rossa",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL.iter().copied().find(|style| style.id() == id)
    }

    #[must_use]
    pub const fn sizing(self) -> TargetSizing {
        match self {
            Self::NeapolitanRound => TargetSizing {
                target_pizza_count: 6.0,
                dough_unit_weight_g: 280.0,
            },
            Self::PanPizza | Self::Focaccia => TargetSizing {
                target_pizza_count: 1.0,
                dough_unit_weight_g: 1200.0,
            },
            Self::PizzaRossa => TargetSizing {
                target_pizza_count: 1.0,
                dough_unit_weight_g: 1000.0,
            },
        }
    }
}
