use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const COOPERATIVE_TYPES: &[&str] = &["energy", "housing", "agriculture", "consumer", "work", "services"];

pub const ENERGY_SERVICE_CATEGORIES: &[&str] = &[
    "electricity_supply",
    "solar_installation",
    "self_consumption",
    "energy_audit",
    "ev_charging",
    "maintenance",
];

pub const PRICE_UNITS: &[&str] = &["kwh", "month", "year", "installation", "hour", "service"];

pub const CARBON_CATEGORIES: &[&str] = &["transport", "food", "energy", "digital", "household"];

pub const PLANT_TYPES: &[&str] = &["tree", "shrub", "herb", "climber", "succulent"];

pub const WATER_NEEDS: &[&str] = &["low", "medium", "high"];

/// Spanish CIF: organisation letter, seven digits, control digit or letter
pub const TAX_ID_PATTERN: &str = "/^[A-HJNP-SUVW][0-9]{7}[0-9A-J]$/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Municipality {
    pub id: Option<i64>,
    pub name: String,
    pub province: String,
    pub ine_code: String,
    pub population: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cooperative {
    pub id: Option<i64>,
    pub name: String,
    pub legal_name: Option<String>,
    pub tax_id: String,
    pub cooperative_type: String,
    pub municipality_id: Option<i64>,
    pub founded_at: Option<NaiveDate>,
    pub members_count: i64,
    pub website: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub accepts_new_members: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cooperative {
    pub fn is_energy(&self) -> bool {
        self.cooperative_type == "energy"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyService {
    pub id: Option<i64>,
    pub cooperative_id: Option<i64>,
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub price_unit: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonEquivalence {
    pub id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub co2_kg_equivalent: f64,
    pub unit: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub is_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CarbonEquivalence {
    /// How many units emit `co2_kg`
    pub fn units_for(&self, co2_kg: f64) -> f64 {
        if self.co2_kg_equivalent == 0.0 {
            0.0
        } else {
            co2_kg / self.co2_kg_equivalent
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSpecies {
    pub id: Option<i64>,
    pub common_name: String,
    pub scientific_name: String,
    pub family: Option<String>,
    pub plant_type: String,
    pub co2_absorption_kg_year: f64,
    pub max_height_m: Option<f64>,
    pub water_needs: String,
    pub native_region: Option<String>,
    pub is_endemic: bool,
    pub is_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
