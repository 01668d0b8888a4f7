pub mod column_names;
pub mod pipeline;
pub mod report;
