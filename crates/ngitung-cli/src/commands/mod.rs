pub mod note;
pub mod pricing;

use ngitung_core::parse::{parse_non_negative_number_or_default, parse_units_or_default};
use ngitung_core::PricingParameters;

/// Parameter overrides typed on the command line. Values go through the
/// same permissive parsing as the app's input fields.
#[derive(clap::Args, Debug, Default)]
pub struct ParameterFlags {
    /// Profit margin in percent (e.g. 30)
    #[arg(long)]
    pub margin: Option<String>,

    /// Estimated units sold per month
    #[arg(long)]
    pub sales: Option<String>,

    /// Discount in percent
    #[arg(long)]
    pub discount: Option<String>,

    /// Income tax (PPh) in percent
    #[arg(long)]
    pub pph: Option<String>,

    /// Value-added tax (PPN) in percent
    #[arg(long)]
    pub ppn: Option<String>,
}

impl ParameterFlags {
    /// Apply the flags that were given on top of `params`.
    pub fn apply(&self, params: &mut PricingParameters) {
        if let Some(ref m) = self.margin {
            params.profit_margin = match m.trim() {
                "" => None,
                text => Some(parse_non_negative_number_or_default(
                    text,
                    params.effective_margin(),
                )),
            };
        }
        if let Some(ref s) = self.sales {
            params.estimated_sales = parse_units_or_default(s, 0);
        }
        if let Some(ref d) = self.discount {
            params.discount = parse_non_negative_number_or_default(d, Default::default());
        }
        if let Some(ref p) = self.pph {
            params.pph = parse_non_negative_number_or_default(p, Default::default());
        }
        if let Some(ref p) = self.ppn {
            params.ppn = parse_non_negative_number_or_default(p, Default::default());
        }
    }
}
