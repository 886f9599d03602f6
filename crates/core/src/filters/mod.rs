//! Filter resolver - parses campaign targeting specs into audience predicates.

mod filters_model;
mod geo;


pub use filters_model::{
    AgeRange, AudienceQuery, FilterBlock, FilterSpec, GeoCircle, RegionValue, ResolvedFilters,
};
pub use geo::{haversine_distance_meters, BoundingBox};
