pub mod mean_trait;
