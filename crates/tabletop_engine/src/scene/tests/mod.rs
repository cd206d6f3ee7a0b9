//! End-to-end scene scenarios

mod frame_pipeline;
