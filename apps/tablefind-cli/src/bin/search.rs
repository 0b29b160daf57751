use clap::Parser;

use tablefind_cli::setup::{init_tracing, load_expansion, load_settings, open_executor};
use tablefind_core::types::FieldPrefix;
use tablefind_engine::Page;

/// Query the persisted index and print the JSON payload.
#[derive(Debug, Parser)]
#[command(name = "tablefind-search")]
struct Args {
    /// Field prefix: S (schema) or D (data)
    prefix: String,
    /// Query words
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
    /// Expand the query with similar terms from the configured word-vector model
    #[arg(long)]
    expand: bool,
    #[arg(long)]
    offset: Option<i64>,
    #[arg(long)]
    limit: Option<i64>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings()?;
    let prefix: FieldPrefix = args.prefix.parse()?;

    let executor = open_executor(&settings.data.index_path(), &settings.search)?;
    let expansion = if args.expand { load_expansion(&settings)? } else { None };
    let page = Page::from_values(args.offset, args.limit, &settings.search);

    let result = executor.execute(&args.query.join(" "), prefix, page, expansion.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
