pub mod export;
pub mod formatter;
pub mod insights;

pub use export::{export_csv, write_csv};
pub use formatter::{
    format_detail, format_ranked_table, format_score, format_single, format_summary, format_tsv,
    format_validation, format_weights, should_use_colors,
};
pub use insights::generate_insights;
