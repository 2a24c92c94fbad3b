use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use ngitung_core::config::AnalysisConfig;
use ngitung_core::note::{relative_saved_time, search_notes, Note};
use ngitung_core::parse::{parse_currency, parse_non_negative_number_or_default};
use ngitung_core::report::generate_report;
use ngitung_core::store::NoteStore;

use super::ParameterFlags;
use crate::store::JsonFileStore;

/// Saved pricing notes
#[derive(Subcommand)]
pub enum NoteCommand {
    /// Create an empty note
    New { name: String },
    /// List notes, newest first
    List {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one note with its recomputed result
    Show { id: String },
    /// Delete a note
    Delete { id: String },
    /// Rename a note
    Rename { id: String, name: String },
    /// Set the card colour (omit to return to the palette colour)
    Color { id: String, color: Option<String> },
    /// Add a fixed cost item
    AddFixed(AddFixedArgs),
    /// Add a variable cost item
    AddVariable(AddVariableArgs),
    /// Change an existing cost item
    EditCost(EditCostArgs),
    /// Remove a cost item
    RemoveCost { id: String, cost_id: String },
    /// Update pricing parameters
    Set(SetArgs),
    /// Recompute and save the note's price
    Calc { id: String },
    /// Report for a saved note
    Report(NoteReportArgs),
}

#[derive(Args)]
pub struct AddFixedArgs {
    pub id: String,
    #[arg(long)]
    pub name: String,
    /// Monthly amount, e.g. "Rp 1.500.000"
    #[arg(long)]
    pub amount: String,
}

#[derive(Args)]
pub struct AddVariableArgs {
    pub id: String,
    #[arg(long)]
    pub name: String,
    /// Cost of one unit of the input
    #[arg(long)]
    pub amount: String,
    /// Units of the input used per product
    #[arg(long, default_value = "1")]
    pub quantity: String,
}

#[derive(Args)]
pub struct EditCostArgs {
    pub id: String,
    pub cost_id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    /// Only valid for variable items
    #[arg(long)]
    pub quantity: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub id: String,
    #[command(flatten)]
    pub params: ParameterFlags,
}

#[derive(Args)]
pub struct NoteReportArgs {
    pub id: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub plain: bool,
}

pub fn run_note(
    command: NoteCommand,
    store_path: &str,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = JsonFileStore::new(store_path);
    match command {
        NoteCommand::New { name } => {
            let note = store.create(&name)?;
            Ok(serde_json::to_value(note)?)
        }
        NoteCommand::List { search } => list_notes(&store, search.as_deref()),
        NoteCommand::Show { id } => {
            let note = store.get(&id)?;
            let result = note.recompute();
            Ok(json!({ "note": note, "result": result }))
        }
        NoteCommand::Delete { id } => {
            if !store.delete(&id)? {
                return Err(format!("Note not found: {}", id).into());
            }
            Ok(json!({ "deleted": id }))
        }
        NoteCommand::Rename { id, name } => {
            modify(&mut store, &id, |note| Ok(note.rename(&name)?))
        }
        NoteCommand::Color { id, color } => modify(&mut store, &id, |note| {
            note.set_color(color);
            Ok(())
        }),
        NoteCommand::AddFixed(args) => modify(&mut store, &args.id, |note| {
            note.add_fixed_cost(&args.name, parse_currency(&args.amount));
            Ok(())
        }),
        NoteCommand::AddVariable(args) => modify(&mut store, &args.id, |note| {
            let quantity = parse_non_negative_number_or_default(&args.quantity, Decimal::ONE);
            note.add_variable_cost(&args.name, parse_currency(&args.amount), quantity);
            Ok(())
        }),
        NoteCommand::EditCost(args) => modify(&mut store, &args.id, |note| {
            let amount = args.amount.as_deref().map(parse_currency);
            if note.fixed_costs.iter().any(|c| c.id == args.cost_id) {
                if args.quantity.is_some() {
                    return Err("--quantity only applies to variable cost items".into());
                }
                note.update_fixed_cost(&args.cost_id, args.name.as_deref(), amount)?;
            } else {
                let quantity = args
                    .quantity
                    .as_deref()
                    .map(|q| parse_non_negative_number_or_default(q, Decimal::ONE));
                note.update_variable_cost(&args.cost_id, args.name.as_deref(), amount, quantity)?;
            }
            Ok(())
        }),
        NoteCommand::RemoveCost { id, cost_id } => {
            modify(&mut store, &id, |note| Ok(note.remove_cost(&cost_id)?))
        }
        NoteCommand::Set(args) => modify(&mut store, &args.id, |note| {
            let mut params = note.parameters.clone();
            args.params.apply(&mut params);
            note.set_parameters(params);
            Ok(())
        }),
        NoteCommand::Calc { id } => modify(&mut store, &id, |_| Ok(())),
        NoteCommand::Report(args) => {
            let note = store.get(&args.id)?;
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            let output = generate_report(&note.pricing_input(), config, date);
            if args.plain {
                print!("{}", output.result);
                return Ok(Value::Null);
            }
            Ok(serde_json::to_value(output)?)
        }
    }
}

/// Load a note, apply `change`, recompute its price and persist it.
fn modify<F>(
    store: &mut JsonFileStore,
    id: &str,
    change: F,
) -> Result<Value, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Note) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut note = store.get(id)?;
    change(&mut note)?;
    note.apply_result();
    let saved = store.update(note)?;
    Ok(serde_json::to_value(saved)?)
}

fn list_notes(
    store: &JsonFileStore,
    search: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut notes = store.list()?;
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let now = Utc::now();
    let rows: Vec<Value> = match search {
        Some(query) => search_notes(&notes, query),
        None => notes.iter().collect(),
    }
    .into_iter()
    .enumerate()
    .map(|(i, note)| {
        json!({
            "id": note.id,
            "name": note.name,
            "price": note.price,
            "bpp": note.bpp,
            "color": note.display_color(i),
            "saved": relative_saved_time(note.updated_at, now),
        })
    })
    .collect();
    Ok(Value::Array(rows))
}
