pub mod backend;
pub mod file;

pub use backend::{
    CaptureConfig, CaptureEngine, CaptureEngineFactory, CaptureSource, MeteringEvent,
    UnavailableCaptureEngine,
};
pub use file::{metering_db, FileCaptureEngine};
