pub mod llm_provider;
pub mod news_provider;
pub mod quote_provider;
