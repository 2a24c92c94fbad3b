use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parse::lenient_decimal;
use crate::types::{non_negative, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A recurring cost per accounting period (month), e.g. rent or salaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    #[serde(default = "new_item_id")]
    pub id: String,
    pub name: String,
    /// Monthly amount, never negative
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Money,
}

/// A per-unit cost, e.g. raw material consumed for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableCost {
    #[serde(default = "new_item_id")]
    pub id: String,
    pub name: String,
    /// Cost of one unit of the input, never negative
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Money,
    /// Units of the input consumed per product unit, never negative
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub quantity: Decimal,
}

/// Aggregated cost base fed into the pricing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Sum of all fixed cost amounts
    pub total_fixed_cost: Money,
    /// Sum of amount * quantity over all variable costs
    pub unit_variable_cost: Money,
}

pub(crate) fn new_item_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl FixedCost {
    /// New fixed cost with a fresh id. Negative amounts are clamped to zero.
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            amount: non_negative(amount),
        }
    }
}

impl VariableCost {
    /// New variable cost with a fresh id. Negative amounts and quantities are
    /// clamped to zero.
    pub fn new(name: impl Into<String>, amount: Money, quantity: Decimal) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            amount: non_negative(amount),
            quantity: non_negative(quantity),
        }
    }

    /// Contribution of this item to the per-unit variable cost. Saturates
    /// at `Decimal::MAX`.
    pub fn unit_cost(&self) -> Money {
        non_negative(self.amount).saturating_mul(non_negative(self.quantity))
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sum of fixed cost amounts. Negative amounts (only reachable by building
/// the struct directly) count as zero.
pub fn total_fixed_cost(fixed: &[FixedCost]) -> Money {
    fixed
        .iter()
        .map(|c| non_negative(c.amount))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of `amount * quantity` over the variable costs.
pub fn unit_variable_cost(variable: &[VariableCost]) -> Money {
    variable
        .iter()
        .map(VariableCost::unit_cost)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Reduce the cost line items to the two scalars the pricing engine needs.
/// Order of items never affects the result.
pub fn aggregate_costs(fixed: &[FixedCost], variable: &[VariableCost]) -> CostSummary {
    CostSummary {
        total_fixed_cost: total_fixed_cost(fixed),
        unit_variable_cost: unit_variable_cost(variable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bakery_fixed() -> Vec<FixedCost> {
        vec![
            FixedCost::new("Rent", dec!(1_000_000)),
            FixedCost::new("Electricity", dec!(250_000)),
        ]
    }

    fn bakery_variable() -> Vec<VariableCost> {
        vec![
            VariableCost::new("Flour", dec!(2_000), dec!(1)),
            VariableCost::new("Eggs", dec!(1_500), dec!(2)),
        ]
    }

    #[test]
    fn test_total_fixed_cost() {
        assert_eq!(total_fixed_cost(&bakery_fixed()), dec!(1_250_000));
    }

    #[test]
    fn test_unit_variable_cost_multiplies_quantity() {
        // 2000*1 + 1500*2 = 5000
        assert_eq!(unit_variable_cost(&bakery_variable()), dec!(5_000));
    }

    #[test]
    fn test_empty_collections_are_zero() {
        let summary = aggregate_costs(&[], &[]);
        assert_eq!(summary.total_fixed_cost, Decimal::ZERO);
        assert_eq!(summary.unit_variable_cost, Decimal::ZERO);
    }

    #[test]
    fn test_constructor_clamps_negative_values() {
        let f = FixedCost::new("Refund", dec!(-500));
        assert_eq!(f.amount, Decimal::ZERO);
        let v = VariableCost::new("Sugar", dec!(1000), dec!(-2));
        assert_eq!(v.quantity, Decimal::ZERO);
        assert_eq!(v.unit_cost(), Decimal::ZERO);
    }

    #[test]
    fn test_directly_built_negative_amount_ignored() {
        let mut items = bakery_fixed();
        items.push(FixedCost {
            id: "x".to_string(),
            name: "Bad".to_string(),
            amount: dec!(-100),
        });
        assert_eq!(total_fixed_cost(&items), dec!(1_250_000));
    }

    #[test]
    fn test_missing_amounts_deserialize_as_zero() {
        let json = r#"[
            {"id": "a", "name": "Flour", "amount": null, "quantity": 3},
            {"id": "b", "name": "Sugar", "amount": 1000}
        ]"#;
        let items: Vec<VariableCost> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].amount, Decimal::ZERO);
        assert_eq!(items[1].quantity, Decimal::ZERO);
        assert_eq!(unit_variable_cost(&items), Decimal::ZERO);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = dec!(1_000_000_000_000_000_000);
        let variable = vec![
            VariableCost::new("Gold", huge, huge),
            VariableCost::new("Flour", dec!(2_000), dec!(1)),
        ];
        assert_eq!(unit_variable_cost(&variable), Decimal::MAX);

        let fixed = vec![FixedCost::new("A", Decimal::MAX), FixedCost::new("B", Decimal::MAX)];
        assert_eq!(total_fixed_cost(&fixed), Decimal::MAX);
    }

    #[test]
    fn test_item_ids_are_unique() {
        let a = FixedCost::new("A", dec!(1));
        let b = FixedCost::new("A", dec!(1));
        assert_ne!(a.id, b.id);
    }
}
