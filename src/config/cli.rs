use clap::Subcommand;
use uuid::Uuid;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch every cover variant of a book
    Covers {
        #[arg(long)]
        book_id: Uuid,
    },
    /// Fetch a single cover by id
    Cover {
        #[arg(long)]
        id: String,
    },
}
