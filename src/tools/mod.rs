mod ffprobe_info;
mod media_kind;
mod transport;

pub use ffprobe_info::{StreamInfo, probe_stream};
pub use media_kind::{IMAGE_EXTENSIONS, MediaKind, VIDEO_EXTENSIONS};
pub use transport::{ContentRoute, MediaLocation, Transport};
