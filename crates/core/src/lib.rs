pub mod capture {
    pub mod capture_controller;
    pub mod domain {
        pub mod capture_error;
        pub mod capture_state;
        pub mod facing;
        pub mod still_image;
        pub mod video_source;
    }
    pub mod infrastructure;
}

pub mod classification {
    pub mod domain {
        pub mod category_scores;
        pub mod classification_result;
        pub mod color_heuristic;
        pub mod frame_classifier;
        pub mod frame_signature;
        pub mod image_quality;
        pub mod score_jitter;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod detection_logger;
    pub mod detection_loop;
    pub mod detection_runner;
    pub mod domain {
        pub mod detection_sink;
        pub mod detection_stats;
        pub mod overlay;
    }
    pub mod infrastructure;
}

pub mod scan {
    pub mod scan_photo_use_case;
    pub mod domain {
        pub mod photo_enhancer;
        pub mod scan_record;
        pub mod still_image_writer;
    }
    pub mod infrastructure;
}

pub mod storage {
    pub mod scanner_settings;
    pub mod domain {
        pub mod key_value_store;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod clock;
    pub mod constants;
    pub mod frame;
    pub mod history;
    pub mod scanner_config;
    pub mod waste_category;
}
