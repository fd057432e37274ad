pub mod criterion_config;
