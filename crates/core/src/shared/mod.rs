pub mod constants;
pub mod frame;
pub mod rect;
pub mod yuv_frame;
