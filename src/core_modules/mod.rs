pub mod blob_selector;
pub mod catalog;
pub mod frame;
pub mod heading;
pub mod moment;
pub mod morphology;
pub mod pixel;
pub mod region;
pub mod segmenter;
