pub mod compacted_context;
pub mod extracted_entities;
pub mod headline;
pub mod pipeline_run;
pub mod quote_snapshot;
pub mod recommendation;
