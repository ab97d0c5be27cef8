use clap::Subcommand;
use presenter_timer_core::MessageStore;

#[derive(Subcommand, Debug)]
pub enum MessagesAction {
    /// List predefined messages with their indices
    List {
        /// Output as JSON array
        #[arg(long)]
        json: bool,
    },
    /// Append a message
    Add { text: String },
    /// Replace the message at an index
    Edit { index: usize, text: String },
    /// Remove the message at an index
    Delete { index: usize },
    /// Restore the default messages
    Reset,
}

pub fn run(action: MessagesAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = MessageStore::open()?;
    match action {
        MessagesAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.messages())?);
            } else {
                for (i, message) in store.messages().iter().enumerate() {
                    println!("{i}: {message}");
                }
            }
        }
        MessagesAction::Add { text } => {
            let index = store.add(&text)?;
            println!("added message {index}");
        }
        MessagesAction::Edit { index, text } => {
            store.edit(index, &text)?;
            println!("updated message {index}");
        }
        MessagesAction::Delete { index } => {
            let removed = store.delete(index)?;
            println!("deleted: {removed}");
        }
        MessagesAction::Reset => {
            store.reset()?;
            println!("messages reset to defaults");
        }
    }
    Ok(())
}
