pub mod http;
pub mod llm;
pub mod news;
pub mod quotes;
