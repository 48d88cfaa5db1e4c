pub mod row_projection_detector;
