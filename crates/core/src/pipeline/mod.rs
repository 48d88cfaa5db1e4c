pub mod infrastructure;
pub mod measure_use_case;
pub mod measurement;
