pub mod threaded_detection_runner;
