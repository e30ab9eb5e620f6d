pub use super::feature_mapping::Entity as FeatureMapping;
