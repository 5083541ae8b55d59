//! Analysis pipeline: batch coordination and per-file processing.

mod coordinator;
mod processor;

pub use coordinator::{collect_input_files, output_dir_for, output_path_for, should_process};
pub use processor::{analyze_samples, process_file, AnalyzeOptions, ProcessOptions, ProcessOutcome};
