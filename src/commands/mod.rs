pub mod parse_report;
