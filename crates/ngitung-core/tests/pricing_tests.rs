use ngitung_core::cost::{aggregate_costs, FixedCost, VariableCost};
use ngitung_core::pricing::engine::{analyze_pricing, compute_pricing};
use ngitung_core::pricing::simulation::{
    profit_at_volume, simulate_material_cost_shock, simulate_sales_volume_shock,
};
use ngitung_core::{recompute, AnalysisConfig, PricingInput, PricingParameters};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Concrete scenarios
// ===========================================================================

fn scenario_a() -> (Vec<FixedCost>, Vec<VariableCost>, PricingParameters) {
    (
        vec![FixedCost::new("Rent", dec!(1_000_000))],
        vec![VariableCost::new("Flour", dec!(2_000), dec!(1))],
        PricingParameters {
            profit_margin: Some(dec!(30)),
            estimated_sales: 100,
            discount: Decimal::ZERO,
            pph: Decimal::ZERO,
            ppn: Decimal::ZERO,
        },
    )
}

#[test]
fn test_scenario_a_single_rent_and_flour() {
    let (fixed, variable, params) = scenario_a();
    let r = recompute(&fixed, &variable, &params);

    assert_eq!(r.total_fixed_cost, dec!(1_000_000));
    assert_eq!(r.unit_variable_cost, dec!(2_000));
    // 2,000 + 1,000,000 / 100
    assert_eq!(r.bpp, dec!(12_000));
    // 12,000 * 1.3
    assert_eq!(r.selling_price, dec!(15_600));
    // ceil(1,000,000 / 3,600) = ceil(277.78)
    assert_eq!(r.break_even_point_units, Some(dec!(278)));
    // no discount or tax: all price tiers agree
    assert_eq!(r.selling_price_after_discount, dec!(15_600));
    assert_eq!(r.selling_price_after_tax, dec!(15_600));
}

#[test]
fn test_scenario_b_discount_and_tax_chain() {
    let (fixed, variable, mut params) = scenario_a();
    params.discount = dec!(10);
    params.pph = dec!(5);
    params.ppn = dec!(10);
    let r = recompute(&fixed, &variable, &params);

    assert_eq!(r.selling_price, dec!(15_600));
    assert_eq!(r.selling_price_after_discount, dec!(14_040));
    assert_eq!(r.selling_price_after_tax, dec!(16_146));
    // break-even is based on the undiscounted price
    assert_eq!(r.break_even_point_units, Some(dec!(278)));
}

#[test]
fn test_scenario_c_zero_sales_estimate() {
    let (fixed, variable, mut params) = scenario_a();
    params.estimated_sales = 0;
    let r = recompute(&fixed, &variable, &params);

    assert_eq!(r.fixed_cost_per_unit, Decimal::ZERO);
    assert_eq!(r.bpp, r.unit_variable_cost);
    assert!(r.selling_price > r.bpp);
    assert!(r.break_even_point_units.is_some());
}

#[test]
fn test_break_even_undefined_when_price_equals_bpp() {
    let (fixed, variable, mut params) = scenario_a();
    params.profit_margin = Some(Decimal::ZERO);
    let r = recompute(&fixed, &variable, &params);

    assert_eq!(r.selling_price, r.bpp);
    assert_eq!(r.break_even_point_units, None);
    let out = analyze_pricing(&PricingInput {
        business_name: None,
        fixed_costs: fixed,
        variable_costs: variable,
        parameters: params,
    }, &AnalysisConfig::default());
    assert!(out.warnings.iter().any(|w| w.contains("break-even")));
    assert!(out.warnings.iter().any(|w| w.contains("below the 30% threshold")));
}

#[test]
fn test_zero_percent_shocks_are_identity() {
    let (fixed, variable, params) = scenario_a();
    let r = recompute(&fixed, &variable, &params);

    let material = simulate_material_cost_shock(&r, &params, Decimal::ZERO);
    assert_eq!(material.new_bpp, r.bpp);
    assert_eq!(material.new_selling_price, r.selling_price);

    let sales = simulate_sales_volume_shock(&r, &params, Decimal::ZERO);
    assert_eq!(sales.profit, profit_at_volume(&r, Decimal::from(params.estimated_sales)));
    assert_eq!(sales.profit_change, Decimal::ZERO);
}

#[test]
fn test_json_document_round_through_engine() {
    let json = r#"{
        "business_name": "Toko Roti",
        "fixed_costs": [{"name": "Rent", "amount": 1000000}],
        "variable_costs": [{"name": "Flour", "amount": 2000, "quantity": 1}],
        "profit_margin": 30,
        "estimated_sales": 100,
        "discount": 10,
        "pph": 5,
        "ppn": 10
    }"#;
    let input: PricingInput = serde_json::from_str(json).unwrap();
    let out = analyze_pricing(&input, &AnalysisConfig::default());
    assert_eq!(out.result.selling_price_after_tax, dec!(16_146));
    assert!(out.warnings.is_empty());
}

// ===========================================================================
// Properties
// ===========================================================================

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn fixed_items() -> impl Strategy<Value = Vec<FixedCost>> {
    prop::collection::vec(money(), 0..8).prop_map(|amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, a)| FixedCost::new(format!("fixed-{}", i), a))
            .collect()
    })
}

fn variable_items() -> impl Strategy<Value = Vec<VariableCost>> {
    prop::collection::vec((money(), 0i64..1_000), 0..8).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (a, q))| VariableCost::new(format!("var-{}", i), a, Decimal::new(q, 1)))
            .collect()
    })
}

fn params() -> impl Strategy<Value = PricingParameters> {
    (0i64..200, 0u64..10_000, 0i64..50, 0i64..20, 0i64..20).prop_map(
        |(margin, sales, discount, pph, ppn)| PricingParameters {
            profit_margin: Some(Decimal::from(margin)),
            estimated_sales: sales,
            discount: Decimal::from(discount),
            pph: Decimal::from(pph),
            ppn: Decimal::from(ppn),
        },
    )
}

/// The generated items together with a random permutation of them.
fn with_permutation<T>(
    items: impl Strategy<Value = Vec<T>>,
) -> impl Strategy<Value = (Vec<T>, Vec<T>)>
where
    T: Clone + std::fmt::Debug + 'static,
{
    items.prop_flat_map(|items| {
        let original = items.clone();
        Just(items)
            .prop_shuffle()
            .prop_map(move |shuffled| (original.clone(), shuffled))
    })
}

proptest! {
    #[test]
    fn aggregation_ignores_order(
        (fixed, fixed_shuffled) in with_permutation(fixed_items()),
        (variable, variable_shuffled) in with_permutation(variable_items()),
    ) {
        let original = aggregate_costs(&fixed, &variable);
        let permuted = aggregate_costs(&fixed_shuffled, &variable_shuffled);
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn raising_a_cost_never_lowers_price(
        fixed in fixed_items(),
        variable in variable_items(),
        p in params(),
        bump in money(),
    ) {
        let base = recompute(&fixed, &variable, &p);

        let mut more_fixed = fixed.clone();
        more_fixed.push(FixedCost::new("extra", bump));
        let r = recompute(&more_fixed, &variable, &p);
        prop_assert!(r.bpp >= base.bpp);
        prop_assert!(r.selling_price >= base.selling_price);

        let mut more_variable = variable.clone();
        more_variable.push(VariableCost::new("extra", bump, Decimal::ONE));
        let r = recompute(&fixed, &more_variable, &p);
        prop_assert!(r.bpp >= base.bpp);
        prop_assert!(r.selling_price >= base.selling_price);
    }

    #[test]
    fn selling_price_follows_margin(
        fixed in fixed_items(),
        variable in variable_items(),
        p in params(),
    ) {
        let costs = aggregate_costs(&fixed, &variable);
        let r = compute_pricing(&costs, &p);
        let margin = p.effective_margin();
        prop_assert_eq!(r.selling_price, r.bpp * (Decimal::ONE + margin / Decimal::ONE_HUNDRED));
    }

    #[test]
    fn recompute_is_idempotent(
        fixed in fixed_items(),
        variable in variable_items(),
        p in params(),
    ) {
        let first = recompute(&fixed, &variable, &p);
        let second = recompute(&fixed, &variable, &p);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn zero_shock_reproduces_baseline(
        fixed in fixed_items(),
        variable in variable_items(),
        p in params(),
    ) {
        let r = recompute(&fixed, &variable, &p);
        let m = simulate_material_cost_shock(&r, &p, Decimal::ZERO);
        prop_assert_eq!(m.new_bpp, r.bpp);
        prop_assert_eq!(m.new_selling_price, r.selling_price);
        let s = simulate_sales_volume_shock(&r, &p, Decimal::ZERO);
        prop_assert_eq!(s.profit, s.baseline_profit);
    }
}
