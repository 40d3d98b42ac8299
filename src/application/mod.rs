pub mod compactor;
pub mod entity_extractor;
pub mod news_source;
pub mod pipeline;
pub mod prompts;
pub mod quote_fetcher;
pub mod synthesizer;
