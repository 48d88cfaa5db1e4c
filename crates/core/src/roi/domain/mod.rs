pub mod face_geometry;
pub mod meniscus_roi_builder;
