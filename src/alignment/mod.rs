pub mod edges;
pub mod grouping;
pub mod report;
pub mod tokenization;
