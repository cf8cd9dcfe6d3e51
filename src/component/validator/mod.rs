//! 媒體驗證元件
//!
//! 圖片：完整解碼。影片：開啟串流並等待 ready。
//! 任何錯誤、逾時或非預期狀態都回報為 `ValidationStatus::Error`。

mod image_validator;
mod status;
mod video_validator;

pub use image_validator::{DecodedImage, FetchingImageDecoder, ImageDecoder, ImageValidator};
pub use status::ValidationStatus;
pub use video_validator::{
    FfprobeStreamOpener, PlayerEvent, StreamOpener, StreamSession, VideoValidator,
};
