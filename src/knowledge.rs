// src/knowledge.rs
// Renders the product catalog and reference cases into the markdown digest
// embedded in each recommendation prompt.

use async_trait::async_trait;
use std::fmt::Write;

use crate::error::Result;
use crate::store::{AcProduct, HistoricalCase, RecordStore};

/// Anything that can supply catalog data for prompt assembly. The store is
/// the production source; tests substitute fixed slices.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn products(&self) -> Result<Vec<AcProduct>>;
    async fn cases(&self) -> Result<Vec<HistoricalCase>>;
}

#[async_trait]
impl KnowledgeSource for RecordStore {
    async fn products(&self) -> Result<Vec<AcProduct>> {
        self.in_stock_products().await
    }

    async fn cases(&self) -> Result<Vec<HistoricalCase>> {
        self.all_cases().await
    }
}

/// Build the digest from a source. Out-of-stock products are excluded so the
/// model never recommends something that cannot be bought.
pub async fn build_digest(source: &dyn KnowledgeSource) -> Result<String> {
    let products = source.products().await?;
    let cases = source.cases().await?;
    Ok(render_digest(&products, &cases))
}

pub fn render_digest(products: &[AcProduct], cases: &[HistoricalCase]) -> String {
    let mut out = String::new();

    out.push_str("### Product catalog\n");
    if products.is_empty() {
        out.push_str("(no products on record)\n");
    }
    for p in products {
        let _ = write!(
            out,
            "- {} {} ({}), {}hp, fits {:.0}-{:.0}㎡, {}, ¥{:.0}",
            p.brand,
            p.model,
            p.kind.label(),
            p.horse_power,
            p.suitable_area.min,
            p.suitable_area.max,
            p.energy_level,
            p.current_price,
        );
        if !p.features.is_empty() {
            let _ = write!(out, "; {}", p.features.join(", "));
        }
        if let Some(promo) = &p.promotion {
            let _ = write!(out, "; promo: {promo}");
        }
        out.push('\n');
    }

    out.push_str("\n### Reference cases\n");
    if cases.is_empty() {
        out.push_str("(no cases on record)\n");
    }
    for c in cases {
        let _ = write!(
            out,
            "- {} — {:.0}㎡ {} facing {}, {} solution, total ¥{:.0} (install ¥{:.0})",
            c.title,
            c.house.area,
            c.house.rooms,
            c.house.orientation,
            c.solution.kind,
            c.solution.total_cost,
            c.solution.install_cost,
        );
        if !c.customer_feedback.is_empty() {
            let _ = write!(out, "; feedback: {}", c.customer_feedback);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    #[test]
    fn test_digest_lists_products_and_cases() {
        let digest = render_digest(&seed::seed_products(), &seed::seed_cases());
        assert!(digest.contains("### Product catalog"));
        assert!(digest.contains("Gree GMV-H180WL/A"));
        assert!(digest.contains("### Reference cases"));
        assert!(digest.contains("142㎡ four-bedroom, central system"));
    }

    #[test]
    fn test_digest_handles_empty_store() {
        let digest = render_digest(&[], &[]);
        assert!(digest.contains("(no products on record)"));
        assert!(digest.contains("(no cases on record)"));
    }

    #[tokio::test]
    async fn test_store_source_skips_out_of_stock() {
        let store = RecordStore::in_memory().await.unwrap();
        for p in seed::seed_products() {
            store.add_product(&p).await.unwrap();
        }
        let digest = build_digest(&store).await.unwrap();
        // split-002 is seeded with in_stock = false.
        assert!(!digest.contains("KFR-26GW"));
        assert!(digest.contains("KFR-35GW"));
    }
}
