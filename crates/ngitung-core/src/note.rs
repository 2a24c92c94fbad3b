//! The note aggregate: one business or product line with its cost items,
//! parameters and last computed prices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cost::{FixedCost, VariableCost};
use crate::currency::format_rupiah;
use crate::error::NgitungError;
use crate::pricing::engine::{recompute, PricingInput, PricingParameters, PricingResult};
use crate::types::{non_negative, Money};
use crate::NgitungResult;

/// Colours offered for note cards; notes without one cycle through these.
pub const NOTE_PALETTE: [&str; 8] = [
    "#A78BFA", "#34D399", "#F472B6", "#60A5FA", "#FBBF24", "#FB923C", "#A855F7", "#EC4899",
];

fn zero_rupiah() -> String {
    format_rupiah(Decimal::ZERO)
}

/// Serialized in the stored shape: camelCase keys, amounts and percentages
/// as JSON numbers. snake_case keys are still accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub name: String,
    /// Formatted selling price shown on the note card
    #[serde(default = "zero_rupiah")]
    pub price: String,
    /// Formatted BPP shown on the note card
    #[serde(default = "zero_rupiah")]
    pub bpp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, alias = "fixed_costs")]
    pub fixed_costs: Vec<FixedCost>,
    #[serde(default, alias = "variable_costs")]
    pub variable_costs: Vec<VariableCost>,
    #[serde(flatten)]
    pub parameters: PricingParameters,
    #[serde(default, alias = "computed_result", skip_serializing_if = "Option::is_none")]
    pub computed_result: Option<PricingResult>,
    /// Unix timestamp in milliseconds of the last persisted change
    #[serde(default, alias = "updated_at")]
    pub updated_at: i64,
}

fn validated_name(name: &str) -> NgitungResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NgitungError::InvalidInput {
            field: "name".to_string(),
            reason: "Note name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

impl Note {
    /// Create an empty note. The name is trimmed and must not be blank.
    pub fn new(name: &str) -> NgitungResult<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: validated_name(name)?,
            price: zero_rupiah(),
            bpp: zero_rupiah(),
            color: None,
            fixed_costs: Vec::new(),
            variable_costs: Vec::new(),
            parameters: PricingParameters::default(),
            computed_result: None,
            updated_at: Utc::now().timestamp_millis(),
        })
    }

    pub fn rename(&mut self, name: &str) -> NgitungResult<()> {
        self.name = validated_name(name)?;
        Ok(())
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    pub fn set_parameters(&mut self, parameters: PricingParameters) {
        self.parameters = parameters;
    }

    /// Add a fixed cost and return its id.
    pub fn add_fixed_cost(&mut self, name: &str, amount: Money) -> String {
        let item = FixedCost::new(name.trim(), amount);
        let id = item.id.clone();
        self.fixed_costs.push(item);
        id
    }

    /// Add a variable cost and return its id.
    pub fn add_variable_cost(&mut self, name: &str, amount: Money, quantity: Decimal) -> String {
        let item = VariableCost::new(name.trim(), amount, quantity);
        let id = item.id.clone();
        self.variable_costs.push(item);
        id
    }

    pub fn update_fixed_cost(
        &mut self,
        id: &str,
        name: Option<&str>,
        amount: Option<Money>,
    ) -> NgitungResult<()> {
        let item = self
            .fixed_costs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| NgitungError::CostItemNotFound(id.to_string()))?;
        if let Some(name) = name {
            item.name = name.trim().to_string();
        }
        if let Some(amount) = amount {
            item.amount = non_negative(amount);
        }
        Ok(())
    }

    pub fn update_variable_cost(
        &mut self,
        id: &str,
        name: Option<&str>,
        amount: Option<Money>,
        quantity: Option<Decimal>,
    ) -> NgitungResult<()> {
        let item = self
            .variable_costs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| NgitungError::CostItemNotFound(id.to_string()))?;
        if let Some(name) = name {
            item.name = name.trim().to_string();
        }
        if let Some(amount) = amount {
            item.amount = non_negative(amount);
        }
        if let Some(quantity) = quantity {
            item.quantity = non_negative(quantity);
        }
        Ok(())
    }

    /// Remove a cost item of either kind by id.
    pub fn remove_cost(&mut self, id: &str) -> NgitungResult<()> {
        let before = self.fixed_costs.len() + self.variable_costs.len();
        self.fixed_costs.retain(|c| c.id != id);
        self.variable_costs.retain(|c| c.id != id);
        if self.fixed_costs.len() + self.variable_costs.len() == before {
            return Err(NgitungError::CostItemNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Pricing for the note's current items and parameters, without
    /// touching the note.
    pub fn recompute(&self) -> PricingResult {
        recompute(&self.fixed_costs, &self.variable_costs, &self.parameters)
    }

    /// Recompute and store the result along with the formatted card prices.
    /// The card price is the after-tax price when positive, else the plain
    /// selling price.
    pub fn apply_result(&mut self) -> PricingResult {
        let result = self.recompute();
        let card_price = if result.selling_price_after_tax > Decimal::ZERO {
            result.selling_price_after_tax
        } else {
            result.selling_price
        };
        self.price = format_rupiah(card_price);
        self.bpp = format_rupiah(result.bpp);
        self.computed_result = Some(result.clone());
        debug!(note = %self.id, price = %self.price, bpp = %self.bpp, "note result applied");
        result
    }

    /// The note's costs and parameters as a standalone pricing request.
    pub fn pricing_input(&self) -> PricingInput {
        PricingInput {
            business_name: Some(self.name.clone()),
            fixed_costs: self.fixed_costs.clone(),
            variable_costs: self.variable_costs.clone(),
            parameters: self.parameters.clone(),
        }
    }

    /// Card colour: the note's own, or the palette entry for its position.
    pub fn display_color(&self, index: usize) -> &str {
        self.color
            .as_deref()
            .unwrap_or(NOTE_PALETTE[index % NOTE_PALETTE.len()])
    }
}

/// Case-insensitive substring match on note names.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| n.name.to_lowercase().contains(&needle))
        .collect()
}

/// "today", "yesterday", "3 days ago", "2 weeks ago", or a short date such
/// as "5 Mar" for anything older than a month.
pub fn relative_saved_time(updated_at_ms: i64, now: DateTime<Utc>) -> String {
    let Some(saved) = DateTime::<Utc>::from_timestamp_millis(updated_at_ms) else {
        return "unknown".to_string();
    };
    let days = (now - saved).num_days();
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 14 => "1 week ago".to_string(),
        d if d < 30 => format!("{} weeks ago", d / 7),
        _ => saved.format("%-d %b").to_string(),
    }
}
