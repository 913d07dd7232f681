use clap::Subcommand;
use countdown_core::wishes::BUILTIN_WISHES;

use super::{open_settings, open_settings_strict};

#[derive(Subcommand)]
pub enum WishAction {
    /// List built-in and custom wishes
    List {
        /// Print custom wishes as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Add a custom wish
    Add {
        /// Wish text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete a custom wish by its index from `wish list`
    Delete { index: usize },
}

pub fn run(action: WishAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WishAction::List { json } => {
            let store = open_settings();
            let custom = &store.settings().custom_wishes;
            if json {
                println!("{}", serde_json::to_string(custom)?);
                return Ok(());
            }
            println!("built-in:");
            for wish in BUILTIN_WISHES {
                println!("     {wish}");
            }
            println!("custom:");
            if custom.is_empty() {
                println!("     (none)");
            }
            for (i, wish) in custom.iter().enumerate() {
                println!("  {i:>2} {wish}");
            }
        }
        WishAction::Add { text } => {
            let text = text.join(" ");
            let mut store = open_settings_strict()?;
            let before = store.settings().custom_wishes.len();
            let after = store.add_wish(&text)?.len();
            if after == before {
                println!("blank wish ignored");
            } else {
                println!("added wish {}", after - 1);
            }
        }
        WishAction::Delete { index } => {
            let mut store = open_settings_strict()?;
            let before = store.settings().custom_wishes.len();
            let after = store.delete_wish(index)?.len();
            if after == before {
                println!("no custom wish at index {index}");
            } else {
                println!("deleted wish {index}");
            }
        }
    }
    Ok(())
}
