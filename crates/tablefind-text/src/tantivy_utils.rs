use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, RegexTokenizer, RemoveLongFilter, TextAnalyzer};
use tantivy::Index;

use tablefind_core::types::FieldPrefix;

pub const TOKENIZER: &str = "table_terms";

pub const DATASET_ID: &str = "dataset_id";
pub const SCHEMA_RAW: &str = "schema_raw";
pub const ROWS_RAW: &str = "rows_raw";
pub const SCHEMA_TEXT: &str = "schema";
pub const DATA_TEXT: &str = "data";

/// Schema text keeps positions for phrase queries; row text does not,
/// since adjacency across row values carries no meaning.
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(DATASET_ID, STRING | STORED);
	schema_builder.add_text_field(SCHEMA_RAW, STORED);
	schema_builder.add_text_field(ROWS_RAW, STORED);
	let schema_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	schema_builder.add_text_field(SCHEMA_TEXT, TextOptions::default().set_indexing_options(schema_indexing));
	let data_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqs);
	schema_builder.add_text_field(DATA_TEXT, TextOptions::default().set_indexing_options(data_indexing));
	schema_builder.build()
}

/// Word runs, lowercased: the same notion of a token the query side splits on.
pub fn register_tokenizer(index: &Index) -> tantivy::Result<()> {
	let tokenizer = TextAnalyzer::builder(RegexTokenizer::new(r"\w+")?)
		.filter(RemoveLongFilter::limit(64))
		.filter(LowerCaser)
		.build();
	index.tokenizers().register(TOKENIZER, tokenizer);
	Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct Fields {
	pub dataset_id: Field,
	pub schema_raw: Field,
	pub rows_raw: Field,
	pub schema_text: Field,
	pub data_text: Field,
}

impl Fields {
	pub fn resolve(schema: &Schema) -> tantivy::Result<Self> {
		Ok(Self {
			dataset_id: schema.get_field(DATASET_ID)?,
			schema_raw: schema.get_field(SCHEMA_RAW)?,
			rows_raw: schema.get_field(ROWS_RAW)?,
			schema_text: schema.get_field(SCHEMA_TEXT)?,
			data_text: schema.get_field(DATA_TEXT)?,
		})
	}

	pub fn text_field(&self, prefix: FieldPrefix) -> Field {
		match prefix {
			FieldPrefix::Schema => self.schema_text,
			FieldPrefix::Data => self.data_text,
		}
	}
}
