pub mod config;
pub mod csv_loader;
pub mod dispatcher;
pub mod feature_extractor;
pub mod geometry;
pub mod gesture_classifier;
pub mod hid;
pub mod landmark_stream;
pub mod mouse_filter;
pub mod pipeline;
pub mod quit;
pub mod screen;
pub mod types;
