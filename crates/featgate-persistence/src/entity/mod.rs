//! `SeaORM` entities

pub mod prelude;

pub mod feature_mapping;
