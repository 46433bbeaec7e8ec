pub mod mean_config;
