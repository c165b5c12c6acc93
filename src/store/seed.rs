// src/store/seed.rs
// Representative catalog rows for first-run setup and demos.

use crate::error::Result;
use crate::store::{
    AcProduct, AreaRange, HistoricalCase, HouseProfile, ProductKind, RecordStore, Solution,
    SolutionProduct,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn seed_products() -> Vec<AcProduct> {
    vec![
        AcProduct {
            id: "central-001".into(),
            brand: "Gree".into(),
            model: "GMV-H180WL/A".into(),
            kind: ProductKind::Central,
            horse_power: 6.0,
            suitable_area: AreaRange { min: 100.0, max: 150.0 },
            energy_level: "Grade 1".into(),
            current_price: 39800.0,
            original_price: Some(45000.0),
            stock: 6,
            in_stock: true,
            features: strings(&["full DC inverter", "smart control", "quiet operation", "energy saving"]),
            best_for: strings(&["large homes", "villas", "duplexes"]),
            noise: 38,
            cooling: 18000,
            heating: 20000,
            promotion: None,
        },
        AcProduct {
            id: "central-002".into(),
            brand: "Midea".into(),
            model: "MDS-H140W".into(),
            kind: ProductKind::Central,
            horse_power: 5.0,
            suitable_area: AreaRange { min: 80.0, max: 120.0 },
            energy_level: "Grade 1".into(),
            current_price: 31500.0,
            original_price: Some(38000.0),
            stock: 9,
            in_stock: true,
            features: strings(&["smart thermostat", "low noise", "fast cooling", "wifi control"]),
            best_for: strings(&["three-bedroom homes", "four-bedroom homes"]),
            noise: 36,
            cooling: 14000,
            heating: 16000,
            promotion: Some("installation included".into()),
        },
        AcProduct {
            id: "duct-001".into(),
            brand: "Daikin".into(),
            model: "FDXS50".into(),
            kind: ProductKind::Duct,
            horse_power: 2.0,
            suitable_area: AreaRange { min: 20.0, max: 32.0 },
            energy_level: "Grade 1".into(),
            current_price: 8600.0,
            original_price: None,
            stock: 14,
            in_stock: true,
            features: strings(&["concealed install", "even airflow", "quiet operation"]),
            best_for: strings(&["living rooms", "master bedrooms"]),
            noise: 33,
            cooling: 5000,
            heating: 6000,
            promotion: None,
        },
        AcProduct {
            id: "split-001".into(),
            brand: "Gree".into(),
            model: "KFR-35GW".into(),
            kind: ProductKind::Split,
            horse_power: 1.5,
            suitable_area: AreaRange { min: 14.0, max: 22.0 },
            energy_level: "Grade 1".into(),
            current_price: 3199.0,
            original_price: Some(3599.0),
            stock: 32,
            in_stock: true,
            features: strings(&["inverter", "self cleaning", "sleep mode"]),
            best_for: strings(&["bedrooms", "studies"]),
            noise: 21,
            cooling: 3500,
            heating: 4000,
            promotion: None,
        },
        AcProduct {
            id: "split-002".into(),
            brand: "Haier".into(),
            model: "KFR-26GW".into(),
            kind: ProductKind::Split,
            horse_power: 1.0,
            suitable_area: AreaRange { min: 10.0, max: 16.0 },
            energy_level: "Grade 2".into(),
            current_price: 2399.0,
            original_price: None,
            stock: 0,
            in_stock: false,
            features: strings(&["compact", "quick install"]),
            best_for: strings(&["small bedrooms", "rentals"]),
            noise: 23,
            cooling: 2600,
            heating: 3200,
            promotion: None,
        },
        AcProduct {
            id: "portable-001".into(),
            brand: "Midea".into(),
            model: "KY-26".into(),
            kind: ProductKind::Portable,
            horse_power: 1.0,
            suitable_area: AreaRange { min: 8.0, max: 15.0 },
            energy_level: "Grade 3".into(),
            current_price: 1899.0,
            original_price: None,
            stock: 11,
            in_stock: true,
            features: strings(&["no install", "castors", "dehumidify"]),
            best_for: strings(&["rentals", "temporary spaces"]),
            noise: 45,
            cooling: 2600,
            heating: 0,
            promotion: None,
        },
    ]
}

pub fn seed_cases() -> Vec<HistoricalCase> {
    vec![
        HistoricalCase {
            id: "case-001".into(),
            title: "89㎡ three-bedroom, split units throughout".into(),
            house: HouseProfile {
                area: 89.0,
                rooms: "3br1ba".into(),
                orientation: "south".into(),
                floor: 12,
                building_type: "apartment".into(),
            },
            description: "Compact south-facing flat; owner prioritized budget over concealment."
                .into(),
            floor_plan_image: None,
            solution: Solution {
                kind: "split".into(),
                products: vec![
                    SolutionProduct {
                        room: "living room".into(),
                        product_id: "split-001".into(),
                        quantity: 1,
                        install_position: "above the balcony door".into(),
                    },
                    SolutionProduct {
                        room: "master bedroom".into(),
                        product_id: "split-001".into(),
                        quantity: 1,
                        install_position: "side wall away from the bed".into(),
                    },
                ],
                total_cost: 9800.0,
                install_cost: 1200.0,
            },
            customer_feedback: "Cooling is quick and the bedroom unit is barely audible at night."
                .into(),
            tips: strings(&["keep outdoor units on the north wall", "book install before July"]),
            completed_date: "2024-05-18".into(),
        },
        HistoricalCase {
            id: "case-002".into(),
            title: "142㎡ four-bedroom, central system".into(),
            house: HouseProfile {
                area: 142.0,
                rooms: "4br2ba".into(),
                orientation: "southeast".into(),
                floor: 3,
                building_type: "apartment".into(),
            },
            description: "Large family flat renovated from scratch; ceiling height allowed ducting."
                .into(),
            floor_plan_image: None,
            solution: Solution {
                kind: "central".into(),
                products: vec![SolutionProduct {
                    room: "whole house".into(),
                    product_id: "central-002".into(),
                    quantity: 1,
                    install_position: "outdoor unit on the utility balcony".into(),
                }],
                total_cost: 33000.0,
                install_cost: 6500.0,
            },
            customer_feedback: "Even temperature in every room, wish we had added a fresh-air unit."
                .into(),
            tips: strings(&["plan duct runs with the renovation", "oversize slightly for west rooms"]),
            completed_date: "2024-03-02".into(),
        },
    ]
}

/// Insert seed rows, skipping ids that already exist.
pub async fn install(store: &RecordStore) -> Result<(usize, usize)> {
    let mut products = 0;
    for product in seed_products() {
        if store.add_product(&product).await.is_ok() {
            products += 1;
        }
    }
    let mut cases = 0;
    for case in seed_cases() {
        if store.add_case(&case).await.is_ok() {
            cases += 1;
        }
    }
    Ok((products, cases))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_unique() {
        let products = seed_products();
        let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn test_seed_covers_every_kind() {
        let products = seed_products();
        for kind in [
            ProductKind::Central,
            ProductKind::Split,
            ProductKind::Duct,
            ProductKind::Portable,
        ] {
            assert!(products.iter().any(|p| p.kind == kind), "missing {kind:?}");
        }
    }
}
