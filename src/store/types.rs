// src/store/types.rs
// Domain records backing the knowledge base.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Central,
    Split,
    Duct,
    Portable,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Central => "central",
            ProductKind::Split => "split",
            ProductKind::Duct => "duct",
            ProductKind::Portable => "portable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "central" => Some(ProductKind::Central),
            "split" => Some(ProductKind::Split),
            "duct" => Some(ProductKind::Duct),
            "portable" => Some(ProductKind::Portable),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::Central => "central air conditioning",
            ProductKind::Split => "split unit",
            ProductKind::Duct => "ducted unit",
            ProductKind::Portable => "portable unit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaRange {
    pub min: f64,
    pub max: f64,
}

/// One air-conditioning product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcProduct {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub kind: ProductKind,
    /// Nominal capacity in Chinese horsepower ("匹").
    pub horse_power: f64,
    pub suitable_area: AreaRange,
    pub energy_level: String,
    pub current_price: f64,
    pub original_price: Option<f64>,
    pub stock: i64,
    pub in_stock: bool,
    pub features: Vec<String>,
    pub best_for: Vec<String>,
    /// Noise level in dB.
    pub noise: i64,
    /// Cooling capacity in watts.
    pub cooling: i64,
    /// Heating capacity in watts.
    pub heating: i64,
    pub promotion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseProfile {
    pub area: f64,
    pub rooms: String,
    pub orientation: String,
    pub floor: i64,
    pub building_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionProduct {
    pub room: String,
    pub product_id: String,
    pub quantity: i64,
    pub install_position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub kind: String,
    pub products: Vec<SolutionProduct>,
    pub total_cost: f64,
    pub install_cost: f64,
}

/// A completed installation used as a reference case in the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalCase {
    pub id: String,
    pub title: String,
    pub house: HouseProfile,
    pub description: String,
    pub floor_plan_image: Option<String>,
    pub solution: Solution,
    pub customer_feedback: String,
    pub tips: Vec<String>,
    pub completed_date: String,
}
