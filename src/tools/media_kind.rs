use std::fmt;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
pub const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mkv", "avi", "mov", "flv", "wmv", "webm"];

/// 粗略的媒體類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Unknown,
}

impl MediaKind {
    /// 依定位字串與 MIME 提示判斷類型
    ///
    /// MIME 提示優先；提示缺少或不是 image/video 時改看副檔名。
    /// 沒有定位字串時一律是 `Unknown`，提示不算數。
    #[must_use]
    pub fn classify(locator: &str, content_type: Option<&str>) -> Self {
        if locator.is_empty() {
            return Self::Unknown;
        }

        content_type
            .and_then(Self::from_mime)
            .or_else(|| extension_of(locator).and_then(|ext| Self::from_extension(&ext)))
            .unwrap_or(Self::Unknown)
    }

    fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let (top_level, subtype) = essence.split_once('/')?;
        if subtype.is_empty() {
            return None;
        }

        if top_level.eq_ignore_ascii_case("image") {
            Some(Self::Image)
        } else if top_level.eq_ignore_ascii_case("video") {
            Some(Self::Video)
        } else {
            None
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        if IMAGE_EXTENSIONS.contains(&ext) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Some(Self::Video)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 取出最後一段路徑的副檔名（小寫），忽略 query 與 fragment
fn extension_of(locator: &str) -> Option<String> {
    let path = locator.split(&['?', '#'][..]).next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
