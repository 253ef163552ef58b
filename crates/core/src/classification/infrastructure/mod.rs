pub mod random_jitter;
