// src/store/mod.rs
// SQLite-backed CRUD over products and historical cases.

pub mod seed;
pub mod types;

use sqlx::{Row, SqlitePool};

use crate::error::Result;
pub use types::{
    AcProduct, AreaRange, HistoricalCase, HouseProfile, ProductKind, Solution, SolutionProduct,
};

pub struct RecordStore {
    pub pool: SqlitePool,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Create tables when missing. List-valued columns are stored as JSON
    /// text.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                product_id TEXT PRIMARY KEY,
                brand TEXT NOT NULL,
                model TEXT NOT NULL,
                type TEXT NOT NULL,
                horse_power REAL NOT NULL,
                suitable_area_min REAL NOT NULL,
                suitable_area_max REAL NOT NULL,
                energy_level TEXT NOT NULL,
                current_price REAL NOT NULL,
                original_price REAL,
                stock INTEGER NOT NULL DEFAULT 0,
                in_stock INTEGER NOT NULL DEFAULT 1,
                features TEXT NOT NULL DEFAULT '[]',
                best_for TEXT NOT NULL DEFAULT '[]',
                noise INTEGER NOT NULL DEFAULT 0,
                cooling INTEGER NOT NULL DEFAULT 0,
                heating INTEGER NOT NULL DEFAULT 0,
                promotion TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS historical_cases (
                case_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                house_area REAL NOT NULL,
                house_rooms TEXT NOT NULL,
                house_orientation TEXT NOT NULL,
                house_floor INTEGER NOT NULL,
                house_building_type TEXT NOT NULL,
                description TEXT NOT NULL,
                floor_plan_image TEXT,
                solution_type TEXT NOT NULL,
                solution_products TEXT NOT NULL DEFAULT '[]',
                solution_total_cost REAL NOT NULL,
                solution_install_cost REAL NOT NULL,
                customer_feedback TEXT NOT NULL,
                tips TEXT NOT NULL DEFAULT '[]',
                completed_date TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== Products ====================

    pub async fn all_products(&self) -> Result<Vec<AcProduct>> {
        let rows = sqlx::query(
            "SELECT * FROM products ORDER BY type ASC, horse_power ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(product_from_row).collect()
    }

    pub async fn products_by_kind(&self, kind: ProductKind) -> Result<Vec<AcProduct>> {
        let rows = sqlx::query(
            "SELECT * FROM products WHERE type = ? ORDER BY horse_power ASC",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(product_from_row).collect()
    }

    pub async fn in_stock_products(&self) -> Result<Vec<AcProduct>> {
        let rows = sqlx::query(
            "SELECT * FROM products WHERE in_stock = 1 ORDER BY type ASC, horse_power ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(product_from_row).collect()
    }

    pub async fn add_product(&self, product: &AcProduct) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id, brand, model, type, horse_power,
                suitable_area_min, suitable_area_max, energy_level,
                current_price, original_price, stock, in_stock,
                features, best_for, noise, cooling, heating, promotion
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(product.kind.as_str())
        .bind(product.horse_power)
        .bind(product.suitable_area.min)
        .bind(product.suitable_area.max)
        .bind(&product.energy_level)
        .bind(product.current_price)
        .bind(product.original_price)
        .bind(product.stock)
        .bind(product.in_stock)
        .bind(serde_json::to_string(&product.features)?)
        .bind(serde_json::to_string(&product.best_for)?)
        .bind(product.noise)
        .bind(product.cooling)
        .bind(product.heating)
        .bind(&product.promotion)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_product(&self, product: &AcProduct) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                brand = ?, model = ?, type = ?, horse_power = ?,
                suitable_area_min = ?, suitable_area_max = ?, energy_level = ?,
                current_price = ?, original_price = ?, stock = ?, in_stock = ?,
                features = ?, best_for = ?, noise = ?, cooling = ?, heating = ?,
                promotion = ?
            WHERE product_id = ?
            "#,
        )
        .bind(&product.brand)
        .bind(&product.model)
        .bind(product.kind.as_str())
        .bind(product.horse_power)
        .bind(product.suitable_area.min)
        .bind(product.suitable_area.max)
        .bind(&product.energy_level)
        .bind(product.current_price)
        .bind(product.original_price)
        .bind(product.stock)
        .bind(product.in_stock)
        .bind(serde_json::to_string(&product.features)?)
        .bind(serde_json::to_string(&product.best_for)?)
        .bind(product.noise)
        .bind(product.cooling)
        .bind(product.heating)
        .bind(&product.promotion)
        .bind(&product.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== Historical cases ====================

    pub async fn all_cases(&self) -> Result<Vec<HistoricalCase>> {
        let rows = sqlx::query("SELECT * FROM historical_cases ORDER BY house_area ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(case_from_row).collect()
    }

    pub async fn case_by_id(&self, case_id: &str) -> Result<Option<HistoricalCase>> {
        let row = sqlx::query("SELECT * FROM historical_cases WHERE case_id = ?")
            .bind(case_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(case_from_row).transpose()
    }

    pub async fn cases_by_area_range(&self, min: f64, max: f64) -> Result<Vec<HistoricalCase>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM historical_cases
            WHERE house_area >= ? AND house_area <= ?
            ORDER BY house_area ASC
            "#,
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(case_from_row).collect()
    }

    pub async fn add_case(&self, case: &HistoricalCase) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO historical_cases (
                case_id, title, house_area, house_rooms, house_orientation,
                house_floor, house_building_type, description, floor_plan_image,
                solution_type, solution_products, solution_total_cost,
                solution_install_cost, customer_feedback, tips, completed_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&case.id)
        .bind(&case.title)
        .bind(case.house.area)
        .bind(&case.house.rooms)
        .bind(&case.house.orientation)
        .bind(case.house.floor)
        .bind(&case.house.building_type)
        .bind(&case.description)
        .bind(&case.floor_plan_image)
        .bind(&case.solution.kind)
        .bind(serde_json::to_string(&case.solution.products)?)
        .bind(case.solution.total_cost)
        .bind(case.solution.install_cost)
        .bind(&case.customer_feedback)
        .bind(serde_json::to_string(&case.tips)?)
        .bind(&case.completed_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_case(&self, case: &HistoricalCase) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE historical_cases SET
                title = ?, house_area = ?, house_rooms = ?, house_orientation = ?,
                house_floor = ?, house_building_type = ?, description = ?,
                floor_plan_image = ?, solution_type = ?, solution_products = ?,
                solution_total_cost = ?, solution_install_cost = ?,
                customer_feedback = ?, tips = ?, completed_date = ?
            WHERE case_id = ?
            "#,
        )
        .bind(&case.title)
        .bind(case.house.area)
        .bind(&case.house.rooms)
        .bind(&case.house.orientation)
        .bind(case.house.floor)
        .bind(&case.house.building_type)
        .bind(&case.description)
        .bind(&case.floor_plan_image)
        .bind(&case.solution.kind)
        .bind(serde_json::to_string(&case.solution.products)?)
        .bind(case.solution.total_cost)
        .bind(case.solution.install_cost)
        .bind(&case.customer_feedback)
        .bind(serde_json::to_string(&case.tips)?)
        .bind(&case.completed_date)
        .bind(&case.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_case(&self, case_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM historical_cases WHERE case_id = ?")
            .bind(case_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ==================== Row mapping ====================

fn json_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}

fn product_from_row(row: sqlx::sqlite::SqliteRow) -> Result<AcProduct> {
    let kind_raw: String = row.get("type");
    let kind = ProductKind::parse(&kind_raw)
        .ok_or_else(|| crate::error::AcError::Other(format!("unknown product type: {kind_raw}")))?;
    Ok(AcProduct {
        id: row.get("product_id"),
        brand: row.get("brand"),
        model: row.get("model"),
        kind,
        horse_power: row.get("horse_power"),
        suitable_area: AreaRange {
            min: row.get("suitable_area_min"),
            max: row.get("suitable_area_max"),
        },
        energy_level: row.get("energy_level"),
        current_price: row.get("current_price"),
        original_price: row.get("original_price"),
        stock: row.get("stock"),
        in_stock: row.get("in_stock"),
        features: json_list(row.get("features")),
        best_for: json_list(row.get("best_for")),
        noise: row.get("noise"),
        cooling: row.get("cooling"),
        heating: row.get("heating"),
        promotion: row.get("promotion"),
    })
}

fn case_from_row(row: sqlx::sqlite::SqliteRow) -> Result<HistoricalCase> {
    let products_json: String = row.get("solution_products");
    Ok(HistoricalCase {
        id: row.get("case_id"),
        title: row.get("title"),
        house: HouseProfile {
            area: row.get("house_area"),
            rooms: row.get("house_rooms"),
            orientation: row.get("house_orientation"),
            floor: row.get("house_floor"),
            building_type: row.get("house_building_type"),
        },
        description: row.get("description"),
        floor_plan_image: row.get("floor_plan_image"),
        solution: Solution {
            kind: row.get("solution_type"),
            products: serde_json::from_str(&products_json).unwrap_or_default(),
            total_cost: row.get("solution_total_cost"),
            install_cost: row.get("solution_install_cost"),
        },
        customer_feedback: row.get("customer_feedback"),
        tips: json_list(row.get("tips")),
        completed_date: row.get("completed_date"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> RecordStore {
        RecordStore::in_memory().await.expect("in-memory store")
    }

    fn sample_product(id: &str, kind: ProductKind, horse_power: f64) -> AcProduct {
        AcProduct {
            id: id.to_string(),
            brand: "Gree".to_string(),
            model: "GMV-H180WL/A".to_string(),
            kind,
            horse_power,
            suitable_area: AreaRange { min: 100.0, max: 150.0 },
            energy_level: "Grade 1".to_string(),
            current_price: 38000.0,
            original_price: Some(45000.0),
            stock: 5,
            in_stock: true,
            features: vec!["full DC inverter".to_string(), "quiet".to_string()],
            best_for: vec!["large homes".to_string()],
            noise: 38,
            cooling: 18000,
            heating: 20000,
            promotion: None,
        }
    }

    fn sample_case(id: &str, area: f64) -> HistoricalCase {
        HistoricalCase {
            id: id.to_string(),
            title: "Three-bedroom ducted install".to_string(),
            house: HouseProfile {
                area,
                rooms: "3br2ba".to_string(),
                orientation: "south".to_string(),
                floor: 8,
                building_type: "apartment".to_string(),
            },
            description: "Full-house ducted system".to_string(),
            floor_plan_image: None,
            solution: Solution {
                kind: "duct".to_string(),
                products: vec![SolutionProduct {
                    room: "living room".to_string(),
                    product_id: "duct-001".to_string(),
                    quantity: 1,
                    install_position: "above the hallway".to_string(),
                }],
                total_cost: 52000.0,
                install_cost: 8000.0,
            },
            customer_feedback: "Very quiet, even cooling".to_string(),
            tips: vec!["reserve ceiling height".to_string()],
            completed_date: "2024-06-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_product_crud_roundtrip() {
        let store = memory_store().await;
        let product = sample_product("central-001", ProductKind::Central, 6.0);
        store.add_product(&product).await.unwrap();

        let all = store.all_products().await.unwrap();
        assert_eq!(all, vec![product.clone()]);

        let mut updated = product.clone();
        updated.stock = 0;
        updated.in_stock = false;
        assert!(store.update_product(&updated).await.unwrap());
        assert!(store.in_stock_products().await.unwrap().is_empty());

        assert!(store.delete_product("central-001").await.unwrap());
        assert!(!store.delete_product("central-001").await.unwrap());
        assert!(store.all_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_products_ordered_by_type_then_power() {
        let store = memory_store().await;
        store
            .add_product(&sample_product("split-002", ProductKind::Split, 2.0))
            .await
            .unwrap();
        store
            .add_product(&sample_product("split-001", ProductKind::Split, 1.5))
            .await
            .unwrap();
        store
            .add_product(&sample_product("central-001", ProductKind::Central, 6.0))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .all_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["central-001", "split-001", "split-002"]);

        let split = store.products_by_kind(ProductKind::Split).await.unwrap();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].id, "split-001");
    }

    #[tokio::test]
    async fn test_case_crud_and_area_range() {
        let store = memory_store().await;
        store.add_case(&sample_case("case-001", 89.0)).await.unwrap();
        store.add_case(&sample_case("case-002", 140.0)).await.unwrap();

        let found = store.case_by_id("case-001").await.unwrap().unwrap();
        assert_eq!(found.house.area, 89.0);
        assert!(store.case_by_id("case-404").await.unwrap().is_none());

        let mid = store.cases_by_area_range(80.0, 100.0).await.unwrap();
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].id, "case-001");

        let mut updated = sample_case("case-002", 140.0);
        updated.title = "Large flat revisited".to_string();
        assert!(store.update_case(&updated).await.unwrap());
        assert_eq!(
            store.case_by_id("case-002").await.unwrap().unwrap().title,
            "Large flat revisited"
        );

        assert!(store.delete_case("case-001").await.unwrap());
        assert_eq!(store.all_cases().await.unwrap().len(), 1);
    }
}
