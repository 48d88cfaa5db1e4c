pub mod meniscus_detector;
